//! Pointer drag of a node, carrying a revealed subnetwork along with it.

use log::debug;

use crate::error::Result;
use crate::model::NodeId;

use super::force_directed::ForceDirectedGraph;

/// A drag gesture in progress.
///
/// While held, the node is pinned under the pointer. Dragging a revealed
/// router also pins its revealed descendants and moves them rigidly with it.
#[derive(Clone, Debug)]
pub struct NodeDrag {
	node: NodeId,
	subtree: Vec<NodeId>,
}

impl NodeDrag {
	/// Pins `node` (and its revealed subtree) where it currently is.
	pub fn start(graph: &mut ForceDirectedGraph, node: NodeId) -> Result<Self> {
		graph.topology().require(node)?;
		let subtree = revealed_descendants(graph, node);

		if graph.begin_gesture() {
			let warm = graph.config().warm_alpha_target;
			let simulation = graph.simulation_mut();
			simulation.set_alpha_target(warm);
			simulation.restart();
		}

		let topology = graph.topology_mut();
		for id in std::iter::once(node).chain(subtree.iter().copied()) {
			if let Some(n) = topology.node_mut(id) {
				n.fx = Some(n.x);
				n.fy = Some(n.y);
			}
		}
		debug!("drag: start {node} with {} descendants", subtree.len());
		Ok(Self { node, subtree })
	}

	/// Moves the held node to the pointer, clamped into the viewport.
	///
	/// Descendants keep their offset to the node, unless the node is pressed
	/// against the viewport border, in which case they stay put.
	pub fn move_to(&self, graph: &mut ForceDirectedGraph, x: f64, y: f64) {
		let Some(held) = graph.topology().node(self.node) else {
			return;
		};
		let previous = (held.fx.unwrap_or(held.x), held.fy.unwrap_or(held.y));
		let (fx, fy) = graph.clamp_to_viewport(x, y);

		let margin = graph.config().viewport_margin;
		let viewport = graph.viewport();
		let on_border = fx <= margin
			|| fx >= viewport.width - margin
			|| fy <= margin
			|| fy >= viewport.height - margin;

		let (dx, dy) = (fx - previous.0, fy - previous.1);
		let moved: Vec<_> = if on_border {
			Vec::new()
		} else {
			self.subtree
				.iter()
				.filter_map(|&id| {
					let n = graph.topology().node(id)?;
					let (cx, cy) = graph.clamp_to_viewport(
						n.fx.unwrap_or(n.x) + dx,
						n.fy.unwrap_or(n.y) + dy,
					);
					Some((id, cx, cy))
				})
				.collect()
		};

		let topology = graph.topology_mut();
		if let Some(n) = topology.node_mut(self.node) {
			n.fx = Some(fx);
			n.fy = Some(fy);
		}
		for (id, cx, cy) in moved {
			if let Some(n) = topology.node_mut(id) {
				n.fx = Some(cx);
				n.fy = Some(cy);
			}
		}
	}

	/// Releases every pin taken by this gesture.
	pub fn end(self, graph: &mut ForceDirectedGraph) {
		if graph.end_gesture() {
			let simulation = graph.simulation_mut();
			simulation.set_alpha_target(0.0);
			simulation.restart();
		}
		let topology = graph.topology_mut();
		for id in std::iter::once(self.node).chain(self.subtree) {
			if let Some(n) = topology.node_mut(id) {
				n.fx = None;
				n.fy = None;
			}
		}
		debug!("drag: end {}", self.node);
	}
}

/// Active descendants of a revealed router, following revealed child routers.
fn revealed_descendants(graph: &ForceDirectedGraph, root: NodeId) -> Vec<NodeId> {
	let topology = graph.topology();
	let mut out = Vec::new();
	let mut stack = vec![root];
	while let Some(id) = stack.pop() {
		let Some(node) = topology.node(id) else {
			continue;
		};
		if !node.is_revealed_router() {
			continue;
		}
		for &child in node.children() {
			if graph.is_active(child) {
				out.push(child);
				stack.push(child);
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Viewport;
	use crate::model::{Link, LinkType, Node, PhysicalRole, Point, Topology};

	/// Router 1 > router 2 > host 3, plus a stray host 4, laid out on a line.
	fn graph() -> ForceDirectedGraph {
		let nodes = vec![
			Node::router(1, PhysicalRole::Router, "r1", None, None, vec![NodeId(2)]),
			Node::router(2, PhysicalRole::Router, "r2", None, None, vec![NodeId(3)]),
			Node::host(3, PhysicalRole::Desktop, "pc", None, None, 3),
			Node::host(4, PhysicalRole::Desktop, "other", None, None, 4),
		];
		let links = vec![
			Link::new(1, 1, 2, LinkType::InterfaceOverlay),
			Link::new(2, 2, 3, LinkType::InterfaceOverlay),
		];
		let topology = Topology::new(nodes, links).unwrap();
		let mut graph = ForceDirectedGraph::new(topology, Viewport::new(800.0, 600.0));
		for (id, x) in [(1, 400.0), (2, 450.0), (3, 500.0), (4, 200.0)] {
			graph
				.topology_mut()
				.node_mut(NodeId(id))
				.unwrap()
				.set_position(Point::new(x, 300.0));
		}
		graph
	}

	fn pin(graph: &ForceDirectedGraph, id: u64) -> (Option<f64>, Option<f64>) {
		let node = graph.topology().node(NodeId(id)).unwrap();
		(node.fx, node.fy)
	}

	#[test]
	fn dragging_a_router_moves_its_revealed_subtree() {
		let mut graph = graph();
		let drag = NodeDrag::start(&mut graph, NodeId(1)).unwrap();
		assert_eq!(graph.simulation().alpha_target(), 0.3);
		assert_eq!(pin(&graph, 3), (Some(500.0), Some(300.0)));
		assert_eq!(pin(&graph, 4), (None, None));

		drag.move_to(&mut graph, 410.0, 320.0);
		assert_eq!(pin(&graph, 1), (Some(410.0), Some(320.0)));
		assert_eq!(pin(&graph, 2), (Some(460.0), Some(320.0)));
		assert_eq!(pin(&graph, 3), (Some(510.0), Some(320.0)));

		drag.end(&mut graph);
		for id in 1..=4 {
			assert_eq!(pin(&graph, id), (None, None));
		}
		assert_eq!(graph.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn pointer_outside_viewport_is_clamped_and_freezes_subtree() {
		let mut graph = graph();
		let drag = NodeDrag::start(&mut graph, NodeId(1)).unwrap();
		drag.move_to(&mut graph, -20.0, 300.0);
		assert_eq!(pin(&graph, 1), (Some(50.0), Some(300.0)));
		assert_eq!(pin(&graph, 2), (Some(450.0), Some(300.0)));
		drag.end(&mut graph);
	}

	#[test]
	fn collapsed_router_drags_alone() {
		let mut graph = graph();
		graph.remove_subnetwork(NodeId(2)).unwrap();
		graph
			.topology_mut()
			.node_mut(NodeId(2))
			.unwrap()
			.change_router_physical_role();

		let drag = NodeDrag::start(&mut graph, NodeId(2)).unwrap();
		drag.move_to(&mut graph, 470.0, 300.0);
		assert_eq!(pin(&graph, 2), (Some(470.0), Some(300.0)));
		assert_eq!(pin(&graph, 3), (None, None));
		drag.end(&mut graph);
	}

	#[test]
	fn overlapping_gestures_keep_simulation_warm() {
		let mut graph = graph();
		let first = NodeDrag::start(&mut graph, NodeId(4)).unwrap();
		let second = NodeDrag::start(&mut graph, NodeId(3)).unwrap();
		first.end(&mut graph);
		assert_eq!(graph.simulation().alpha_target(), 0.3);
		second.end(&mut graph);
		assert_eq!(graph.simulation().alpha_target(), 0.0);
	}

	#[test]
	fn unknown_node_cannot_be_dragged() {
		let mut graph = graph();
		assert!(NodeDrag::start(&mut graph, NodeId(99)).is_err());
	}
}
