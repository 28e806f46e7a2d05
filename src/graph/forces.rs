//! Forces applied by the simulation on every tick.
//!
//! Each force reads body positions and nudges velocities (or, for centering,
//! positions). The engine registers forces under a [`ForceKind`] slot, so
//! installing a force replaces whatever occupied that slot before.

use std::collections::{HashMap, HashSet};

use crate::model::{LinkId, LinkType, NodeId};

use super::config::LinkSpring;
use super::grid::NeighbourGrid;

/// Registry slot of a force. The simulation applies slots in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForceKind {
	Links,
	Collide,
	Center,
	Charge,
	X,
	Y,
}

/// Per-tick working copy of an active node.
#[derive(Clone, Debug)]
pub struct Body {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

/// Active link resolved to body indices.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
	pub id: LinkId,
	pub link_type: LinkType,
	pub source: usize,
	pub target: usize,
}

/// Many-body repulsion between every pair of nodes closer than `distance_max`.
///
/// Only pairs inside that range interact, so candidates come from a grid
/// with `distance_max` cells and a tick costs O(n · neighbours).
#[derive(Clone, Debug)]
pub struct ManyBody {
	pub strength: f64,
	pub distance_max: f64,
}

/// Which links a link force acts on, and how hard.
#[derive(Clone, Debug)]
pub enum LinkForce {
	/// Every link, with a spring chosen by its type.
	ByType {
		interface: LinkSpring,
		internetworking: LinkSpring,
	},
	/// Only the listed links; every other link has zero strength.
	Scoped {
		links: HashSet<LinkId>,
		spring: LinkSpring,
	},
}

/// Which nodes take part in collision, and with what radius.
#[derive(Clone, Debug)]
pub enum CollideRadius {
	Uniform(f64),
	/// Listed nodes use `radius`, all others 0.
	Only { nodes: HashSet<NodeId>, radius: f64 },
}

#[derive(Clone, Debug)]
pub struct Collide {
	pub radius: CollideRadius,
	pub strength: f64,
}

/// Translates the whole layout so its centroid sits at `(x, y)`.
#[derive(Clone, Debug)]
pub struct Center {
	pub x: f64,
	pub y: f64,
}

/// Pulls each node toward a per-node target along one axis.
#[derive(Clone, Debug)]
pub struct Position {
	pub targets: HashMap<NodeId, f64>,
	/// Target used for nodes missing from `targets`.
	pub fallback: f64,
	pub strength: f64,
}

/// A force occupying one registry slot.
#[derive(Clone, Debug)]
pub enum Force {
	Charge(ManyBody),
	Links(LinkForce),
	Collide(Collide),
	Center(Center),
	X(Position),
	Y(Position),
}

impl Force {
	pub fn kind(&self) -> ForceKind {
		match self {
			Force::Charge(_) => ForceKind::Charge,
			Force::Links(_) => ForceKind::Links,
			Force::Collide(_) => ForceKind::Collide,
			Force::Center(_) => ForceKind::Center,
			Force::X(_) => ForceKind::X,
			Force::Y(_) => ForceKind::Y,
		}
	}

	pub fn apply(&self, bodies: &mut [Body], edges: &[Edge], alpha: f64) {
		match self {
			Force::Charge(f) => f.apply(bodies, alpha),
			Force::Links(f) => f.apply(bodies, edges, alpha),
			Force::Collide(f) => f.apply(bodies),
			Force::Center(f) => f.apply(bodies),
			Force::X(f) => {
				for body in bodies.iter_mut() {
					body.vx += (f.target(body.id) - body.x) * f.strength * alpha;
				}
			}
			Force::Y(f) => {
				for body in bodies.iter_mut() {
					body.vy += (f.target(body.id) - body.y) * f.strength * alpha;
				}
			}
		}
	}
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Tiny non-zero offset used to separate coincident nodes.
fn jiggle(seed: usize) -> f64 {
	(pseudo_random(seed as f64 + 1.0) - 0.5) * 1e-6
}

impl ManyBody {
	fn apply(&self, bodies: &mut [Body], alpha: f64) {
		let n = bodies.len();
		if n < 2 || self.distance_max <= 0.0 {
			return;
		}
		let max2 = self.distance_max * self.distance_max;
		let grid = NeighbourGrid::new(self.distance_max, bodies.iter().map(|b| (b.x, b.y)));
		let mut dv = vec![(0.0, 0.0); n];

		for i in 0..n {
			for j in grid.around(bodies[i].x, bodies[i].y) {
				if i == j {
					continue;
				}
				let mut dx = bodies[j].x - bodies[i].x;
				let mut dy = bodies[j].y - bodies[i].y;
				if dx == 0.0 {
					dx = jiggle(i * n + j);
				}
				if dy == 0.0 {
					dy = jiggle(j * n + i);
				}
				let mut l = dx * dx + dy * dy;
				if l >= max2 {
					continue;
				}
				if l < 1.0 {
					l = l.sqrt();
				}
				let w = self.strength * alpha / l;
				dv[i].0 += dx * w;
				dv[i].1 += dy * w;
			}
		}

		for (body, (dvx, dvy)) in bodies.iter_mut().zip(dv) {
			body.vx += dvx;
			body.vy += dvy;
		}
	}
}

impl LinkForce {
	fn spring(&self, edge: &Edge) -> Option<LinkSpring> {
		match self {
			LinkForce::ByType {
				interface,
				internetworking,
			} => Some(match edge.link_type {
				LinkType::InternetworkingOverlay => *internetworking,
				LinkType::InterfaceOverlay => *interface,
			}),
			LinkForce::Scoped { links, spring } => links.contains(&edge.id).then_some(*spring),
		}
	}

	fn apply(&self, bodies: &mut [Body], edges: &[Edge], alpha: f64) {
		let mut degree = vec![0usize; bodies.len()];
		for edge in edges {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}

		for (k, edge) in edges.iter().enumerate() {
			let Some(spring) = self.spring(edge) else {
				continue;
			};
			if spring.strength == 0.0 || edge.source == edge.target {
				continue;
			}
			let (s, t) = (&bodies[edge.source], &bodies[edge.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = jiggle(2 * k);
			}
			if y == 0.0 {
				y = jiggle(2 * k + 1);
			}
			let dist = (x * x + y * y).sqrt();
			let l = (dist - spring.distance) / dist * alpha * spring.strength;
			x *= l;
			y *= l;

			let bias = degree[edge.source] as f64
				/ (degree[edge.source] + degree[edge.target]) as f64;
			let t = &mut bodies[edge.target];
			t.vx -= x * bias;
			t.vy -= y * bias;
			let s = &mut bodies[edge.source];
			s.vx += x * (1.0 - bias);
			s.vy += y * (1.0 - bias);
		}
	}
}

impl CollideRadius {
	fn of(&self, id: NodeId) -> f64 {
		match self {
			CollideRadius::Uniform(r) => *r,
			CollideRadius::Only { nodes, radius } => {
				if nodes.contains(&id) {
					*radius
				} else {
					0.0
				}
			}
		}
	}
}

impl Collide {
	fn apply(&self, bodies: &mut [Body]) {
		let n = bodies.len();
		let radii: Vec<f64> = bodies.iter().map(|b| self.radius.of(b.id)).collect();
		let reach = 2.0 * radii.iter().copied().fold(0.0, f64::max);
		if n < 2 || reach <= 0.0 {
			return;
		}
		// Velocities change as pairs resolve; the grid indexes the tick-start prediction.
		let predicted: Vec<(f64, f64)> = bodies.iter().map(|b| (b.x + b.vx, b.y + b.vy)).collect();
		let grid = NeighbourGrid::new(reach, predicted.iter().copied());

		for i in 0..n {
			let ri = radii[i];
			let ri2 = ri * ri;
			let (px, py) = predicted[i];
			for j in grid.around(px, py) {
				if j <= i {
					continue;
				}
				let rj = radii[j];
				let r = ri + rj;
				if r <= 0.0 {
					continue;
				}
				let xi = bodies[i].x + bodies[i].vx;
				let yi = bodies[i].y + bodies[i].vy;
				let mut x = xi - bodies[j].x - bodies[j].vx;
				let mut y = yi - bodies[j].y - bodies[j].vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = jiggle(i * n + j);
					l += x * x;
				}
				if y == 0.0 {
					y = jiggle(j * n + i);
					l += y * y;
				}
				let dist = l.sqrt();
				let push = (r - dist) / dist * self.strength;
				x *= push;
				y *= push;
				let rj2 = rj * rj;
				let w = rj2 / (ri2 + rj2);
				bodies[i].vx += x * w;
				bodies[i].vy += y * w;
				bodies[j].vx -= x * (1.0 - w);
				bodies[j].vy -= y * (1.0 - w);
			}
		}
	}
}

impl Center {
	fn apply(&self, bodies: &mut [Body]) {
		if bodies.is_empty() {
			return;
		}
		let n = bodies.len() as f64;
		let sx = bodies.iter().map(|b| b.x).sum::<f64>() / n - self.x;
		let sy = bodies.iter().map(|b| b.y).sum::<f64>() / n - self.y;
		for body in bodies.iter_mut() {
			body.x -= sx;
			body.y -= sy;
		}
	}
}

impl Position {
	fn target(&self, id: NodeId) -> f64 {
		self.targets.get(&id).copied().unwrap_or(self.fallback)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn body(id: u64, x: f64, y: f64) -> Body {
		Body {
			id: NodeId(id),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	#[test]
	fn charge_pushes_close_nodes_apart() {
		let mut bodies = vec![body(1, 100.0, 100.0), body(2, 110.0, 100.0)];
		let charge = Force::Charge(ManyBody {
			strength: -5000.0,
			distance_max: 150.0,
		});
		charge.apply(&mut bodies, &[], 1.0);
		assert!(bodies[0].vx < 0.0);
		assert!(bodies[1].vx > 0.0);
	}

	#[test]
	fn charge_ignores_pairs_beyond_distance_max() {
		let mut bodies = vec![body(1, 0.0, 0.0), body(2, 500.0, 0.0)];
		let charge = Force::Charge(ManyBody {
			strength: -5000.0,
			distance_max: 150.0,
		});
		charge.apply(&mut bodies, &[], 1.0);
		assert_eq!(bodies[0].vx, 0.0);
		assert_eq!(bodies[1].vx, 0.0);
	}

	#[test]
	fn charge_matches_all_pairs_sum_within_range() {
		let mut bodies: Vec<Body> = (0..60)
			.map(|i| body(i, (i * 37 % 400) as f64, (i * 53 % 300) as f64))
			.collect();
		let (strength, distance_max) = (-300.0, 150.0);

		let mut expected = vec![(0.0, 0.0); bodies.len()];
		for (i, a) in bodies.iter().enumerate() {
			for b in &bodies {
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let l = dx * dx + dy * dy;
				if l == 0.0 || l >= distance_max * distance_max {
					continue;
				}
				expected[i].0 += dx * strength / l;
				expected[i].1 += dy * strength / l;
			}
		}

		Force::Charge(ManyBody {
			strength,
			distance_max,
		})
		.apply(&mut bodies, &[], 1.0);
		for (body, (ex, ey)) in bodies.iter().zip(expected) {
			assert!((body.vx - ex).abs() < 1e-9, "{}: {} vs {ex}", body.id, body.vx);
			assert!((body.vy - ey).abs() < 1e-9, "{}: {} vs {ey}", body.id, body.vy);
		}
	}

	#[test]
	fn collision_separates_overlapping_neighbours_only() {
		let mut bodies = vec![body(1, 100.0, 100.0), body(2, 120.0, 100.0), body(3, 400.0, 100.0)];
		Force::Collide(Collide {
			radius: CollideRadius::Uniform(20.0),
			strength: 1.0,
		})
		.apply(&mut bodies, &[], 1.0);
		assert!(bodies[0].vx < 0.0);
		assert!(bodies[1].vx > 0.0);
		assert_eq!(bodies[2].vx, 0.0);
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let mut bodies = vec![body(1, 0.0, 0.0), body(2, 300.0, 0.0)];
		let edges = [Edge {
			id: LinkId(1),
			link_type: LinkType::InterfaceOverlay,
			source: 0,
			target: 1,
		}];
		let spring = LinkSpring {
			distance: 150.0,
			strength: 0.7,
		};
		let links = Force::Links(LinkForce::ByType {
			interface: spring,
			internetworking: spring,
		});
		links.apply(&mut bodies, &edges, 1.0);
		assert!(bodies[0].vx > 0.0);
		assert!(bodies[1].vx < 0.0);
	}

	#[test]
	fn scoped_link_force_skips_other_links() {
		let mut bodies = vec![body(1, 0.0, 0.0), body(2, 300.0, 0.0)];
		let edges = [Edge {
			id: LinkId(1),
			link_type: LinkType::InterfaceOverlay,
			source: 0,
			target: 1,
		}];
		let links = Force::Links(LinkForce::Scoped {
			links: HashSet::from([LinkId(2)]),
			spring: LinkSpring {
				distance: 150.0,
				strength: 1.0,
			},
		});
		links.apply(&mut bodies, &edges, 1.0);
		assert_eq!(bodies[0].vx, 0.0);
		assert_eq!(bodies[1].vx, 0.0);
	}

	#[test]
	fn scoped_collision_ignores_pairs_without_radius() {
		let mut bodies = vec![body(1, 0.0, 0.0), body(2, 10.0, 0.0), body(3, 500.0, 0.0)];
		let collide = Force::Collide(Collide {
			radius: CollideRadius::Only {
				nodes: HashSet::from([NodeId(2)]),
				radius: 50.0,
			},
			strength: 1.0,
		});
		collide.apply(&mut bodies, &[], 1.0);
		// The push is split by inverse radius: the zero-radius node takes all of it.
		assert!(bodies[0].vx < 0.0);
		assert_eq!(bodies[1].vx, 0.0);
		assert_eq!(bodies[2].vx, 0.0);
	}

	#[test]
	fn center_moves_centroid_onto_target() {
		let mut bodies = vec![body(1, 0.0, 0.0), body(2, 100.0, 50.0)];
		Force::Center(Center { x: 400.0, y: 300.0 }).apply(&mut bodies, &[], 1.0);
		let cx = (bodies[0].x + bodies[1].x) / 2.0;
		let cy = (bodies[0].y + bodies[1].y) / 2.0;
		assert!((cx - 400.0).abs() < 1e-9);
		assert!((cy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn position_force_falls_back_for_unknown_nodes() {
		let mut bodies = vec![body(1, 100.0, 0.0), body(2, 100.0, 0.0)];
		let x = Force::X(Position {
			targets: HashMap::from([(NodeId(1), 200.0)]),
			fallback: 0.0,
			strength: 1.0,
		});
		x.apply(&mut bodies, &[], 0.5);
		assert_eq!(bodies[0].vx, 50.0);
		assert_eq!(bodies[1].vx, -50.0);
	}
}
