//! Velocity-Verlet style force simulation with an alpha cooling schedule.
//!
//! `alpha` is the simulation temperature: every tick it moves toward
//! `alpha_target` by `alpha_decay`, forces scale with it, and the clock stops
//! once it drops under `alpha_min`. A positive alpha target keeps the
//! simulation warm indefinitely.

use std::collections::{BTreeMap, HashMap};

use crate::model::{LinkId, NodeId, Topology};

use super::forces::{Body, Edge, Force, ForceKind};

/// Force simulation over the active part of a topology.
#[derive(Clone, Debug)]
pub struct Simulation {
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	running: bool,
	forces: BTreeMap<ForceKind, Force>,
}

impl Default for Simulation {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			alpha: 1.0,
			alpha_min,
			// Cools from 1 to alpha_min in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 0.6,
			running: false,
			forces: BTreeMap::new(),
		}
	}
}

impl Simulation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Installs a force in its slot, replacing any previous occupant.
	pub fn set_force(&mut self, force: Force) {
		self.forces.insert(force.kind(), force);
	}

	pub fn remove_force(&mut self, kind: ForceKind) -> Option<Force> {
		self.forces.remove(&kind)
	}

	pub fn remove_forces(&mut self, kinds: &[ForceKind]) {
		for kind in kinds {
			self.forces.remove(kind);
		}
	}

	pub fn has_force(&self, kind: ForceKind) -> bool {
		self.forces.contains_key(&kind)
	}

	pub fn active_forces(&self) -> impl Iterator<Item = ForceKind> + '_ {
		self.forces.keys().copied()
	}

	/// Starts the clock. Alpha is left where it is.
	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// True when the clock should halt after the tick it just ran.
	pub fn is_cooled(&self) -> bool {
		self.alpha < self.alpha_min
	}

	/// Advances the active nodes by one tick.
	///
	/// Positions are copied out of the arena, integrated, and written back.
	/// Links whose endpoints are not both active are ignored.
	pub fn tick(&mut self, topology: &mut Topology, nodes: &[NodeId], links: &[LinkId]) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		let mut slots = Vec::with_capacity(nodes.len());
		let mut bodies = Vec::with_capacity(nodes.len());
		let mut body_index = HashMap::with_capacity(nodes.len());
		for &id in nodes {
			let Some(slot) = topology.index_of(id) else {
				continue;
			};
			let node = topology.node_at(slot);
			body_index.insert(id, bodies.len());
			slots.push(slot);
			bodies.push(Body {
				id,
				x: node.x,
				y: node.y,
				vx: node.vx,
				vy: node.vy,
				fx: node.fx,
				fy: node.fy,
			});
		}

		let edges: Vec<Edge> = links
			.iter()
			.filter_map(|&id| {
				let link = topology.link(id)?;
				Some(Edge {
					id,
					link_type: link.link_type,
					source: *body_index.get(&link.source)?,
					target: *body_index.get(&link.target)?,
				})
			})
			.collect();

		for force in self.forces.values() {
			force.apply(&mut bodies, &edges, self.alpha);
		}

		for body in &mut bodies {
			integrate(&mut body.x, &mut body.vx, body.fx, self.velocity_decay);
			integrate(&mut body.y, &mut body.vy, body.fy, self.velocity_decay);
		}

		for (slot, body) in slots.into_iter().zip(bodies) {
			let node = topology.node_at_mut(slot);
			node.x = body.x;
			node.y = body.y;
			node.vx = body.vx;
			node.vy = body.vy;
		}
	}
}

fn integrate(pos: &mut f64, vel: &mut f64, fixed: Option<f64>, decay: f64) {
	match fixed {
		Some(p) => {
			*pos = p;
			*vel = 0.0;
		}
		None => {
			*vel *= decay;
			*pos += *vel;
		}
	}
}
