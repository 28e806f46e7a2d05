//! Force-directed graph engine.
//!
//! The engine owns the topology and splits its nodes and links into an
//! active set, which is simulated and drawn, and an inactive set holding
//! collapsed subnetworks. Revealing a router moves its children (and the
//! links to them) back into the active set and runs a short, locally scoped
//! settle so the rest of the layout stays where the user left it.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::{GraphError, Result};
use crate::model::{LinkId, Node, NodeId, Point, Topology};

use super::config::{GraphConfig, Viewport};
use super::forces::{
	Center, Collide, CollideRadius, Force, ForceKind, LinkForce, ManyBody, Position,
};
use super::hierarchical::HierarchicalLayoutCreator;
use super::simulation::Simulation;

/// Forces used only while settling the initial layout.
const INITIAL_FORCES: [ForceKind; 4] = [
	ForceKind::Links,
	ForceKind::Collide,
	ForceKind::Center,
	ForceKind::Charge,
];

const SUBNET_REVEAL_FORCES: [ForceKind; 2] = [ForceKind::Links, ForceKind::Collide];

const ALL_FORCES: [ForceKind; 6] = [
	ForceKind::Links,
	ForceKind::Collide,
	ForceKind::Center,
	ForceKind::Charge,
	ForceKind::X,
	ForceKind::Y,
];

/// Handle returned by [`ForceDirectedGraph::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type TickObserver = Box<dyn FnMut(&Topology, &[NodeId])>;

/// Simulated topology with expandable subnetworks.
pub struct ForceDirectedGraph {
	topology: Topology,
	nodes: Vec<NodeId>,
	/// Membership index over `nodes`.
	active: HashSet<NodeId>,
	links: Vec<LinkId>,
	non_active_nodes: Vec<NodeId>,
	non_active_links: Vec<LinkId>,
	viewport: Viewport,
	config: GraphConfig,
	simulation: Simulation,
	/// Children already seeded by a subnetwork reveal.
	placed: HashSet<NodeId>,
	observers: Vec<(SubscriptionId, TickObserver)>,
	next_subscription: u64,
	/// Pointer gestures currently holding nodes.
	gestures: usize,
}

impl ForceDirectedGraph {
	/// Builds the engine with the default configuration.
	pub fn new(topology: Topology, viewport: Viewport) -> Self {
		Self::with_config(topology, viewport, GraphConfig::default())
	}

	/// Builds the engine and pre-settles the whole topology.
	///
	/// Every node and link starts active. After settling, the clock is
	/// stopped and the settle-only forces are removed, so interaction starts
	/// from a static layout.
	pub fn with_config(topology: Topology, viewport: Viewport, config: GraphConfig) -> Self {
		let nodes = topology.node_ids();
		let links = topology.link_ids();
		let active = nodes.iter().copied().collect();

		let mut graph = Self {
			topology,
			nodes,
			active,
			links,
			non_active_nodes: Vec::new(),
			non_active_links: Vec::new(),
			viewport,
			config,
			simulation: Simulation::new(),
			placed: HashSet::new(),
			observers: Vec::new(),
			next_subscription: 0,
			gestures: 0,
		};

		graph.seed_positions();
		graph.simulation.set_force(Force::Charge(ManyBody {
			strength: graph.config.charge_strength,
			distance_max: graph.config.charge_distance_max,
		}));
		graph.simulation.set_force(Force::Links(LinkForce::ByType {
			interface: graph.config.interface_link,
			internetworking: graph.config.internetworking_link,
		}));

		graph.settle(graph.config.settle_ticks_per_node);
		graph.simulation.remove_forces(&INITIAL_FORCES);
		graph.simulation.restart();

		info!(
			"graph: settled {} nodes and {} links in {}x{}",
			graph.nodes.len(),
			graph.links.len(),
			graph.viewport.width,
			graph.viewport.height
		);
		graph
	}

	/// Stores the new viewport and re-centres the layout in it.
	pub fn on_resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		let (x, y) = viewport.center();
		self.simulation.set_force(Force::Center(Center { x, y }));
		self.simulation.restart();

		self.settle(self.config.settle_ticks_per_node);
		self.simulation.remove_force(ForceKind::Center);
		self.simulation.restart();
		debug!("graph: resized to {}x{}", viewport.width, viewport.height);
	}

	/// Spreads the active nodes apart around the viewport centre.
	pub fn init_position(&mut self) {
		let (x, y) = self.viewport.center();
		self.simulation.set_force(Force::Collide(Collide {
			radius: CollideRadius::Uniform(self.config.initial_collide_radius),
			strength: 1.0,
		}));
		self.simulation.set_force(Force::Center(Center { x, y }));
		self.simulation.restart();
		self.simulation.set_alpha_target(self.config.warm_alpha_target);

		self.settle(self.config.settle_ticks_per_node);
		self.simulation.remove_forces(&INITIAL_FORCES);
		self.simulation.restart();
	}

	/// Moves the hidden children of `router` (and the links to them) into the
	/// active set and lets them settle around it.
	///
	/// The router itself ends up exactly where it was before the call.
	pub fn add_subnetwork(&mut self, router: NodeId) -> Result<()> {
		let parent = self.topology.require_router(router)?;
		if !self.is_active(router) {
			return Err(GraphError::InactiveRouter(router));
		}
		let anchor = parent.position();
		let children = parent.children().to_vec();

		let mut revealed = HashSet::new();
		for (i, &child) in children.iter().enumerate() {
			let Some(slot) = self.non_active_nodes.iter().position(|&id| id == child) else {
				continue;
			};
			// Earlier siblings count, so child routers spread away from each other.
			let (max_x, max_y) = self.router_extremes();
			self.non_active_nodes.remove(slot);
			self.nodes.push(child);
			self.active.insert(child);
			revealed.insert(child);

			if self.placed.insert(child) {
				let seed = Point::new(
					self.child_x(anchor.x, i, max_x),
					self.child_y(anchor.y, max_y),
				);
				if let Some(node) = self.topology.node_mut(child) {
					node.set_position(seed);
					node.vx = 0.0;
					node.vy = 0.0;
				}
			}
		}

		let mut recovered = HashSet::new();
		let topology = &self.topology;
		let active = &self.active;
		self.non_active_links.retain(|&id| {
			let Some(link) = topology.link(id) else {
				return true;
			};
			let to_child = children
				.iter()
				.any(|&child| link.connects(router, child));
			let from_revealed = revealed.contains(&link.source) || revealed.contains(&link.target);
			let restore = (to_child || from_revealed)
				&& active.contains(&link.source)
				&& active.contains(&link.target);
			if restore {
				recovered.insert(id);
			}
			!restore
		});
		self.links.extend(
			self.topology
				.links()
				.iter()
				.map(|l| l.id)
				.filter(|id| recovered.contains(id)),
		);

		debug!(
			"graph: revealed {} nodes and {} links under {router}",
			revealed.len(),
			recovered.len()
		);

		self.simulation.set_force(Force::Collide(Collide {
			radius: CollideRadius::Only {
				nodes: revealed,
				radius: self.config.subnet_collide_radius,
			},
			strength: 1.0,
		}));
		self.simulation.set_force(Force::Links(LinkForce::Scoped {
			links: recovered,
			spring: self.config.subnet_link,
		}));
		self.simulation.set_alpha_target(self.config.warm_alpha_target);
		self.simulation.restart();

		self.settle(self.config.subnet_settle_ticks_per_node);
		self.simulation.remove_forces(&SUBNET_REVEAL_FORCES);
		self.simulation.restart();

		if let Some(node) = self.topology.node_mut(router) {
			node.set_position(anchor);
		}
		Ok(())
	}

	/// Moves the direct children of `router`, and every active link touching
	/// them, into the inactive set.
	///
	/// Only one level is hidden. A child router that still shows its own
	/// children must be collapsed first; otherwise nothing is changed and
	/// [`GraphError::RevealedDescendants`] is returned.
	pub fn remove_subnetwork(&mut self, router: NodeId) -> Result<()> {
		let children = self.topology.require_router(router)?.children().to_vec();
		for &child in &children {
			let Some(node) = self.topology.node(child) else {
				continue;
			};
			if node.children().iter().any(|&c| self.is_active(c)) {
				return Err(GraphError::RevealedDescendants { router, child });
			}
		}

		self.simulation.stop();

		let hidden: HashSet<NodeId> = children.iter().copied().collect();
		let topology = &self.topology;
		let mut moved_links = Vec::new();
		self.links.retain(|&id| {
			let touches = topology
				.link(id)
				.is_some_and(|l| hidden.contains(&l.source) || hidden.contains(&l.target));
			if touches {
				moved_links.push(id);
			}
			!touches
		});

		let mut moved_nodes = Vec::new();
		self.nodes.retain(|id| {
			let hide = hidden.contains(id);
			if hide {
				moved_nodes.push(*id);
			}
			!hide
		});
		for id in &moved_nodes {
			self.active.remove(id);
		}

		debug!(
			"graph: hid {} nodes and {} links under {router}",
			moved_nodes.len(),
			moved_links.len()
		);
		self.non_active_links.extend(moved_links);
		self.non_active_nodes.extend(moved_nodes);
		Ok(())
	}

	/// Removes every force; nodes drift to a halt.
	pub fn turn_off_forces(&mut self) {
		self.simulation.remove_forces(&ALL_FORCES);
		self.simulation.restart();
	}

	/// Pulls every node toward its slot in a layered tree layout.
	pub fn hierarchical_layout(&mut self) {
		let all: Vec<NodeId> = self
			.nodes
			.iter()
			.chain(&self.non_active_nodes)
			.copied()
			.collect();
		let positions = HierarchicalLayoutCreator::new(self.viewport.width)
			.positions_for_nodes(&self.topology, &all);

		let strength = self.config.hierarchical_pull_strength;
		self.simulation.set_force(Force::Collide(Collide {
			radius: CollideRadius::Uniform(self.config.hierarchical_collide_radius),
			strength: self.config.hierarchical_collide_strength,
		}));
		self.simulation.set_force(Force::Y(Position {
			targets: positions.iter().map(|(&id, p)| (id, p.y)).collect(),
			fallback: 0.0,
			strength,
		}));
		self.simulation.set_force(Force::X(Position {
			targets: positions.iter().map(|(&id, p)| (id, p.x)).collect(),
			fallback: 0.0,
			strength,
		}));
		self.simulation.set_alpha_target(self.config.warm_alpha_target);
		self.simulation.restart();
		debug!("graph: hierarchical layout over {} nodes", all.len());
	}

	/// Advances the running clock by one tick and notifies observers.
	///
	/// Returns `false` without doing anything when the clock is stopped. The
	/// clock stops itself once the simulation has cooled down.
	pub fn step(&mut self) -> bool {
		if !self.simulation.is_running() {
			return false;
		}
		self.tick();
		for (_, observer) in &mut self.observers {
			observer(&self.topology, &self.nodes);
		}
		if self.simulation.is_cooled() {
			self.simulation.stop();
		}
		true
	}

	/// Registers a callback run after every clock-driven tick.
	pub fn subscribe(
		&mut self,
		observer: impl FnMut(&Topology, &[NodeId]) + 'static,
	) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription);
		self.next_subscription += 1;
		self.observers.push((id, Box::new(observer)));
		id
	}

	/// Drops an observer. Returns whether it was registered.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.observers.len();
		self.observers.retain(|(sid, _)| *sid != id);
		self.observers.len() != before
	}

	pub fn graph_width(&self) -> f64 {
		self.viewport.width
	}

	pub fn graph_height(&self) -> f64 {
		self.viewport.height
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Revealed routers among `ids`, in the given order.
	pub fn router_nodes(&self, ids: &[NodeId]) -> Vec<NodeId> {
		ids.iter()
			.copied()
			.filter(|&id| self.topology.node(id).is_some_and(Node::is_revealed_router))
			.collect()
	}

	/// Active nodes, in activation order.
	pub fn nodes(&self) -> &[NodeId] {
		&self.nodes
	}

	pub fn links(&self) -> &[LinkId] {
		&self.links
	}

	pub fn non_active_nodes(&self) -> &[NodeId] {
		&self.non_active_nodes
	}

	pub fn non_active_links(&self) -> &[LinkId] {
		&self.non_active_links
	}

	pub fn is_active(&self, id: NodeId) -> bool {
		self.active.contains(&id)
	}

	pub fn topology(&self) -> &Topology {
		&self.topology
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub(crate) fn topology_mut(&mut self) -> &mut Topology {
		&mut self.topology
	}

	pub(crate) fn simulation_mut(&mut self) -> &mut Simulation {
		&mut self.simulation
	}

	/// Counts a new gesture. True if no other gesture was in progress.
	pub(crate) fn begin_gesture(&mut self) -> bool {
		self.gestures += 1;
		self.gestures == 1
	}

	/// Ends a gesture. True once the last one has finished.
	pub(crate) fn end_gesture(&mut self) -> bool {
		self.gestures = self.gestures.saturating_sub(1);
		self.gestures == 0
	}

	/// Clamps a coordinate pair into the area active nodes may occupy.
	pub fn clamp_to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
		let m = self.config.viewport_margin;
		(
			x.max(m).min(self.viewport.width - m),
			y.max(m).min(self.viewport.height - m),
		)
	}

	/// Advances one tick and clamps. Returns the largest distance any active
	/// node moved, measured after the clamp.
	fn tick(&mut self) -> f64 {
		let before: Vec<(usize, f64, f64)> = self
			.nodes
			.iter()
			.filter_map(|&id| self.topology.index_of(id))
			.map(|slot| {
				let node = self.topology.node_at(slot);
				(slot, node.x, node.y)
			})
			.collect();
		self.simulation
			.tick(&mut self.topology, &self.nodes, &self.links);

		let mut moved: f64 = 0.0;
		for (slot, x0, y0) in before {
			let node = self.topology.node_at(slot);
			let (x, y) = self.clamp_to_viewport(node.x, node.y);
			let node = self.topology.node_at_mut(slot);
			node.x = x;
			node.y = y;
			moved = moved.max((x - x0).hypot(y - y0));
		}
		moved
	}

	/// Runs up to `ticks_per_node` ticks per active node, then stops the clock.
	///
	/// Ends early once a tick leaves every node within
	/// `settle_rest_displacement` of where it started.
	fn settle(&mut self, ticks_per_node: usize) {
		let budget = self.nodes.len() * ticks_per_node;
		let mut ran = 0;
		while ran < budget {
			ran += 1;
			if self.tick() < self.config.settle_rest_displacement {
				break;
			}
		}
		self.simulation.stop();
		debug!("graph: settled after {ran} of {budget} ticks");
	}

	/// Gives unpositioned nodes a phyllotaxis spiral around the viewport centre.
	fn seed_positions(&mut self) {
		let (cx, cy) = self.viewport.center();
		let angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
		for (i, &id) in self.nodes.iter().enumerate() {
			let Some(slot) = self.topology.index_of(id) else {
				continue;
			};
			let node = self.topology.node_at_mut(slot);
			if node.has_position() {
				continue;
			}
			let radius = 10.0 * (0.5 + i as f64).sqrt();
			let a = i as f64 * angle;
			node.x = cx + radius * a.cos();
			node.y = cy + radius * a.sin();
		}
	}

	/// Largest x and y among active router and cloud nodes.
	fn router_extremes(&self) -> (f64, f64) {
		self.nodes
			.iter()
			.filter_map(|&id| self.topology.node(id))
			.filter(|n| n.physical_role.is_router_like())
			.fold((f64::NEG_INFINITY, f64::NEG_INFINITY), |(mx, my), n| {
				(mx.max(n.x), my.max(n.y))
			})
	}

	/// Seed x for the `index`-th child of a router at `parent_x`.
	///
	/// Children of the right-most router spread further right; all others
	/// spread left, away from the routers beyond them. This holds in both
	/// halves of the viewport.
	fn child_x(&self, parent_x: f64, index: usize, max_x: f64) -> f64 {
		let c = &self.config;
		let step = c.child_spacing * (index + 1) as f64;
		let x = if parent_x >= max_x - c.extreme_tolerance {
			parent_x + step
		} else {
			parent_x - step
		};
		x.min(self.viewport.width - c.child_max_margin)
			.max(c.child_min_offset)
	}

	/// Seed y for a child of a router at `parent_y`. Same rule as
	/// [`Self::child_x`], with "lowest" in place of "right-most".
	fn child_y(&self, parent_y: f64, max_y: f64) -> f64 {
		let c = &self.config;
		let lowest = parent_y >= max_y - c.extreme_tolerance;
		let y = if lowest {
			parent_y + c.child_spacing
		} else {
			parent_y - c.child_spacing
		};
		y.min(self.viewport.height - c.child_max_margin)
			.max(c.child_min_offset)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;
	use crate::model::{Link, LinkType, PhysicalRole};

	/// Router 1 with hosts 2 and 3, linked in both directions to host 2.
	fn one_router() -> Topology {
		let nodes = vec![
			Node::router(
				1,
				PhysicalRole::Router,
				"r1",
				None,
				None,
				vec![NodeId(2), NodeId(3)],
			),
			Node::host(2, PhysicalRole::Desktop, "pc", None, None, 2),
			Node::host(3, PhysicalRole::Server, "srv", None, None, 3),
		];
		let links = vec![
			Link::new(10, 1, 2, LinkType::InterfaceOverlay),
			Link::new(11, 2, 1, LinkType::InterfaceOverlay),
			Link::new(12, 3, 1, LinkType::InterfaceOverlay),
		];
		Topology::new(nodes, links).unwrap()
	}

	/// Two top-level routers, the first owning a nested router with a host.
	fn nested() -> Topology {
		let nodes = vec![
			Node::router(1, PhysicalRole::Router, "core", None, None, vec![NodeId(3)]),
			Node::router(2, PhysicalRole::Router, "edge", None, None, vec![]),
			Node::router(3, PhysicalRole::Router, "lan", None, None, vec![NodeId(4)]),
			Node::host(4, PhysicalRole::Desktop, "pc", None, None, 4),
		];
		let links = vec![
			Link::new(20, 1, 2, LinkType::InternetworkingOverlay),
			Link::new(21, 1, 3, LinkType::InterfaceOverlay),
			Link::new(22, 3, 4, LinkType::InterfaceOverlay),
		];
		Topology::new(nodes, links).unwrap()
	}

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0)
	}

	fn assert_partitioned(graph: &ForceDirectedGraph) {
		let mut nodes: Vec<_> = graph
			.nodes()
			.iter()
			.chain(graph.non_active_nodes())
			.copied()
			.collect();
		nodes.sort();
		let mut all = graph.topology().node_ids();
		all.sort();
		assert_eq!(nodes, all);

		let mut links: Vec<_> = graph
			.links()
			.iter()
			.chain(graph.non_active_links())
			.copied()
			.collect();
		links.sort();
		let mut all = graph.topology().link_ids();
		all.sort();
		assert_eq!(links, all);

		for &id in graph.links() {
			let link = graph.topology().link(id).unwrap();
			assert!(graph.is_active(link.source) && graph.is_active(link.target));
		}
	}

	#[test]
	fn construction_activates_everything_and_clears_forces() {
		let graph = ForceDirectedGraph::new(one_router(), viewport());
		assert_eq!(graph.nodes().len(), 3);
		assert_eq!(graph.links().len(), 3);
		assert!(graph.non_active_nodes().is_empty());
		assert_eq!(graph.simulation().active_forces().count(), 0);
		assert!(graph.simulation().is_running());
		assert!(graph.topology().nodes().iter().all(Node::has_position));
	}

	#[test]
	fn active_nodes_stay_inside_viewport() {
		let mut graph = ForceDirectedGraph::new(nested(), Viewport::new(300.0, 200.0));
		graph.init_position();
		for node in graph.topology().nodes() {
			assert!((50.0..=250.0).contains(&node.x), "x = {}", node.x);
			assert!((50.0..=150.0).contains(&node.y), "y = {}", node.y);
		}
	}

	#[test]
	fn resize_recentres_and_clamps_into_the_new_viewport() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		graph.on_resize(Viewport::new(400.0, 300.0));

		assert_eq!(graph.viewport(), Viewport::new(400.0, 300.0));
		assert!(!graph.simulation().has_force(ForceKind::Center));
		for node in graph.topology().nodes() {
			assert!((50.0..=350.0).contains(&node.x), "x = {}", node.x);
			assert!((50.0..=250.0).contains(&node.y), "y = {}", node.y);
		}
	}

	#[test]
	fn hide_and_reveal_single_router() {
		let mut graph = ForceDirectedGraph::new(one_router(), viewport());

		graph.remove_subnetwork(NodeId(1)).unwrap();
		assert_eq!(graph.nodes(), &[NodeId(1)]);
		assert!(graph.links().is_empty());
		assert_eq!(graph.non_active_links().len(), 3);
		assert_partitioned(&graph);

		let before = graph.topology().node(NodeId(1)).unwrap().position();
		graph.add_subnetwork(NodeId(1)).unwrap();
		assert_eq!(graph.nodes().len(), 3);
		assert_eq!(graph.links().len(), 3);
		assert!(graph.non_active_nodes().is_empty());
		assert_eq!(graph.topology().node(NodeId(1)).unwrap().position(), before);
		assert_partitioned(&graph);
	}

	#[test]
	fn revealing_twice_does_not_duplicate() {
		let mut graph = ForceDirectedGraph::new(one_router(), viewport());
		graph.remove_subnetwork(NodeId(1)).unwrap();
		graph.add_subnetwork(NodeId(1)).unwrap();
		graph.add_subnetwork(NodeId(1)).unwrap();
		assert_eq!(graph.nodes().len(), 3);
		assert_eq!(graph.links().len(), 3);
		assert_partitioned(&graph);
	}

	#[test]
	fn nested_round_trip_restores_every_link() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		graph.remove_subnetwork(NodeId(3)).unwrap();
		graph.remove_subnetwork(NodeId(1)).unwrap();
		assert_eq!(graph.nodes(), &[NodeId(1), NodeId(2)]);
		assert_eq!(graph.links(), &[LinkId(20)]);
		assert_partitioned(&graph);

		graph.add_subnetwork(NodeId(1)).unwrap();
		graph.add_subnetwork(NodeId(3)).unwrap();
		assert_eq!(graph.nodes().len(), 4);
		assert_eq!(graph.links().len(), 3);
		assert_partitioned(&graph);
	}

	#[test]
	fn collapsing_over_revealed_child_is_rejected_without_change() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		let err = graph.remove_subnetwork(NodeId(1)).unwrap_err();
		assert!(matches!(
			err,
			GraphError::RevealedDescendants {
				router: NodeId(1),
				child: NodeId(3)
			}
		));
		assert_eq!(graph.nodes().len(), 4);
		assert!(graph.non_active_links().is_empty());
	}

	#[test]
	fn reveal_checks_its_argument() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		assert!(matches!(
			graph.add_subnetwork(NodeId(4)),
			Err(GraphError::NotARouter(NodeId(4)))
		));
		assert!(matches!(
			graph.add_subnetwork(NodeId(99)),
			Err(GraphError::UnknownNode(NodeId(99)))
		));

		graph.remove_subnetwork(NodeId(3)).unwrap();
		graph.remove_subnetwork(NodeId(1)).unwrap();
		assert!(matches!(
			graph.add_subnetwork(NodeId(3)),
			Err(GraphError::InactiveRouter(NodeId(3)))
		));
		assert_partitioned(&graph);
	}

	#[test]
	fn first_reveal_seeds_children_inside_margins() {
		let mut graph = ForceDirectedGraph::new(one_router(), viewport());
		graph.remove_subnetwork(NodeId(1)).unwrap();
		graph.add_subnetwork(NodeId(1)).unwrap();
		for id in [NodeId(2), NodeId(3)] {
			let node = graph.topology().node(id).unwrap();
			assert!((50.0..=750.0).contains(&node.x));
			assert!((50.0..=550.0).contains(&node.y));
		}
	}

	#[test]
	fn child_seed_goes_toward_open_space() {
		let graph = ForceDirectedGraph::new(one_router(), viewport());
		// Another router far to the right: go left.
		assert_eq!(graph.child_x(500.0, 0, 700.0), 450.0);
		// Right-most router: go right, spaced by index.
		assert_eq!(graph.child_x(500.0, 1, 520.0), 600.0);
		assert_eq!(graph.child_x(200.0, 0, 210.0), 250.0);
		// Clamped away from the left edge.
		assert_eq!(graph.child_x(200.0, 2, 700.0), 150.0);
		// Lowest router goes down, others go up.
		assert_eq!(graph.child_y(300.0, 320.0), 350.0);
		assert_eq!(graph.child_y(300.0, 500.0), 250.0);
	}

	#[test]
	fn sibling_routers_spread_away_from_earlier_siblings() {
		let nodes = vec![
			Node::router(
				1,
				PhysicalRole::Router,
				"core",
				None,
				None,
				vec![NodeId(2), NodeId(3), NodeId(4)],
			),
			Node::router(2, PhysicalRole::Cloud, "a", None, None, vec![]),
			Node::router(3, PhysicalRole::Cloud, "b", None, None, vec![]),
			Node::router(4, PhysicalRole::Cloud, "c", None, None, vec![]),
		];
		let topology = Topology::new(nodes, vec![]).unwrap();
		let mut graph = ForceDirectedGraph::new(topology, viewport());
		graph.remove_subnetwork(NodeId(1)).unwrap();
		graph
			.topology
			.node_mut(NodeId(1))
			.unwrap()
			.set_position(Point::new(500.0, 300.0));

		graph.add_subnetwork(NodeId(1)).unwrap();
		// 2 and 3 step right of the router, which makes 3 the right-most
		// router, so 4 turns back left.
		let x = |id| graph.topology().node(NodeId(id)).unwrap().x;
		assert!(x(3) > 500.0, "x = {}", x(3));
		assert!(x(4) < 500.0, "x = {}", x(4));
	}

	#[test]
	fn settle_ends_early_when_nothing_moves() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		for id in graph.topology().node_ids() {
			let node = graph.topology.node_mut(id).unwrap();
			node.vx = 0.0;
			node.vy = 0.0;
		}
		let alpha = graph.simulation().alpha();
		graph.settle(graph.config().settle_ticks_per_node);

		// One cooling step, not 200.
		let decay = 1.0 - 0.001f64.powf(1.0 / 300.0);
		assert!((graph.simulation().alpha() - alpha * (1.0 - decay)).abs() < 1e-12);
	}

	#[test]
	fn hierarchical_layout_installs_position_forces() {
		let mut graph = ForceDirectedGraph::new(nested(), viewport());
		graph.hierarchical_layout();
		for kind in [ForceKind::X, ForceKind::Y, ForceKind::Collide] {
			assert!(graph.simulation().has_force(kind));
		}
		assert_eq!(graph.simulation().alpha_target(), 0.3);

		graph.turn_off_forces();
		assert_eq!(graph.simulation().active_forces().count(), 0);
	}

	#[test]
	fn observers_run_on_clock_ticks_only() {
		let mut graph = ForceDirectedGraph::new(one_router(), viewport());
		let seen = Rc::new(Cell::new(0));
		let counter = Rc::clone(&seen);
		let id = graph.subscribe(move |_, nodes| {
			assert_eq!(nodes.len(), 3);
			counter.set(counter.get() + 1);
		});

		graph.init_position();
		assert_eq!(seen.get(), 0);

		assert!(graph.step());
		assert_eq!(seen.get(), 1);

		assert!(graph.unsubscribe(id));
		graph.step();
		assert_eq!(seen.get(), 1);
	}

	#[test]
	fn stopped_clock_does_not_step() {
		let mut graph = ForceDirectedGraph::new(one_router(), viewport());
		graph.remove_subnetwork(NodeId(1)).unwrap();
		assert!(!graph.simulation().is_running());
		assert!(!graph.step());
	}

	#[test]
	fn router_nodes_filters_revealed_routers() {
		let mut topology = nested();
		topology.node_mut(NodeId(2)).unwrap().physical_role = PhysicalRole::Cloud;
		let graph = ForceDirectedGraph::new(topology, viewport());
		let ids = graph.nodes().to_vec();
		assert_eq!(graph.router_nodes(&ids), vec![NodeId(1), NodeId(3)]);
	}
}
