//! Layered tree layout.
//!
//! Nodes without a parent in the given set form the top layer, spread across
//! the viewport width. Each subnetwork is laid out as a row one layer lower,
//! centred under its router with a fixed spacing.

use std::collections::{HashMap, HashSet};

use crate::model::{NodeId, Point, Topology};

/// Vertical distance between tree layers.
const LAYER_SPACING: f64 = 150.0;
/// Horizontal distance between siblings below the top layer.
const SUBNET_SPACING: f64 = 100.0;

/// Computes target positions for a hierarchical layout.
#[derive(Clone, Copy, Debug)]
pub struct HierarchicalLayoutCreator {
	width: f64,
}

impl HierarchicalLayoutCreator {
	/// Layout spread across a viewport `width` wide. Depth grows downward
	/// without bound.
	pub fn new(width: f64) -> Self {
		Self { width }
	}

	/// Returns a position for every id in `ids` that names a topology node.
	///
	/// The result depends only on the set of ids, not their order.
	pub fn positions_for_nodes(
		&self,
		topology: &Topology,
		ids: &[NodeId],
	) -> HashMap<NodeId, Point> {
		let set: HashSet<NodeId> = ids
			.iter()
			.copied()
			.filter(|&id| topology.node(id).is_some())
			.collect();

		let mut roots: Vec<NodeId> = set
			.iter()
			.copied()
			.filter(|&id| topology.parent(id).is_none_or(|p| !set.contains(&p)))
			.collect();
		roots.sort();

		let mut layers = HashMap::with_capacity(set.len());
		for &root in &roots {
			assign_layers(topology, &set, root, 1, &mut layers);
		}

		let mut xs = HashMap::with_capacity(set.len());
		if !roots.is_empty() {
			let spacing = self.width / roots.len() as f64;
			let mut middle = self.width / 2.0;
			if roots.len() % 2 == 0 {
				middle += spacing / 2.0;
			}
			place_row(&roots, middle, spacing, &mut xs);
			for &root in &roots {
				place_subnets(topology, &set, root, &mut xs);
			}
		}

		set.iter()
			.map(|&id| {
				let x = xs.get(&id).copied().unwrap_or(0.0);
				let layer = layers.get(&id).copied().unwrap_or(1);
				(id, Point::new(x, layer as f64 * LAYER_SPACING))
			})
			.collect()
	}
}

/// Children of `id` that are part of the layout, sorted by id.
fn children_in(topology: &Topology, set: &HashSet<NodeId>, id: NodeId) -> Vec<NodeId> {
	let mut children: Vec<NodeId> = topology
		.node(id)
		.map(|n| n.children().iter().copied().filter(|c| set.contains(c)).collect())
		.unwrap_or_default();
	children.sort();
	children
}

/// Depth-first layer assignment; the first layer written for a node sticks.
fn assign_layers(
	topology: &Topology,
	set: &HashSet<NodeId>,
	id: NodeId,
	layer: usize,
	layers: &mut HashMap<NodeId, usize>,
) {
	if layers.contains_key(&id) {
		return;
	}
	layers.insert(id, layer);
	for child in children_in(topology, set, id) {
		assign_layers(topology, set, child, layer + 1, layers);
	}
}

/// Places a sorted row so its middle element sits at `middle`.
fn place_row(row: &[NodeId], middle: f64, spacing: f64, xs: &mut HashMap<NodeId, f64>) {
	let mid = (row.len() / 2) as f64;
	for (i, &id) in row.iter().enumerate() {
		xs.insert(id, middle + (i as f64 - mid) * spacing);
	}
}

fn place_subnets(
	topology: &Topology,
	set: &HashSet<NodeId>,
	parent: NodeId,
	xs: &mut HashMap<NodeId, f64>,
) {
	let children = children_in(topology, set, parent);
	if children.is_empty() {
		return;
	}
	let mut middle = xs.get(&parent).copied().unwrap_or(0.0);
	if children.len() % 2 == 0 {
		middle += SUBNET_SPACING / 2.0;
	}
	place_row(&children, middle, SUBNET_SPACING, xs);
	for child in children {
		place_subnets(topology, set, child, xs);
	}
}
