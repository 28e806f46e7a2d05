//! Commands the view sends to the graph engine.
//!
//! The engine only ever reveals or hides one level of a subnetwork. Multi
//! level operations are composed here: collapsing walks the hierarchy
//! post-order so every child router is hidden before its parent, expanding
//! walks it pre-order so every parent is revealed before its children.

use log::info;

use crate::error::Result;
use crate::model::NodeId;

use super::force_directed::ForceDirectedGraph;

/// A command from the user interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphEvent {
	CollapseAllSubnets,
	ExpandAllSubnets,
	/// Hide a router's subnetwork, including any nested revealed subnetworks.
	HideSubnet(NodeId),
	/// Reveal one level of a router's subnetwork.
	RevealSubnet(NodeId),
	HierarchicalLayout,
	TurnOffForces,
}

/// Layouts that can be switched on from the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphLayout {
	Hierarchical,
}

/// Applies a command to the graph.
pub fn dispatch(graph: &mut ForceDirectedGraph, event: GraphEvent) -> Result<()> {
	match event {
		GraphEvent::CollapseAllSubnets => {
			let collapsed = collapse_all(graph)?;
			info!("events: collapsed {} subnetworks", collapsed.len());
		}
		GraphEvent::ExpandAllSubnets => {
			let expanded = expand_all(graph)?;
			info!("events: expanded {} subnetworks", expanded.len());
		}
		GraphEvent::HideSubnet(router) => {
			graph.topology().require_router(router)?;
			let mut order = Vec::new();
			collapse_subtree(graph, router, &mut order)?;
		}
		GraphEvent::RevealSubnet(router) => {
			graph.add_subnetwork(router)?;
			set_revealed(graph, router, true);
		}
		GraphEvent::HierarchicalLayout => graph.hierarchical_layout(),
		GraphEvent::TurnOffForces => graph.turn_off_forces(),
	}
	Ok(())
}

/// Switches layout: any running layout is stopped first.
pub fn set_layout(graph: &mut ForceDirectedGraph, layout: Option<GraphLayout>) -> Result<()> {
	dispatch(graph, GraphEvent::TurnOffForces)?;
	match layout {
		Some(GraphLayout::Hierarchical) => dispatch(graph, GraphEvent::HierarchicalLayout),
		None => Ok(()),
	}
}

/// Hides every shown subnetwork. Returns the routers in the order they were
/// collapsed.
pub fn collapse_all(graph: &mut ForceDirectedGraph) -> Result<Vec<NodeId>> {
	let mut order = Vec::new();
	for id in graph.nodes().to_vec() {
		if graph.is_active(id) && is_expanded(graph, id) {
			collapse_subtree(graph, id, &mut order)?;
		}
	}
	Ok(order)
}

/// Reveals every hidden subnetwork. Returns the routers in the order they
/// were expanded.
pub fn expand_all(graph: &mut ForceDirectedGraph) -> Result<Vec<NodeId>> {
	let mut order = Vec::new();
	for id in graph.nodes().to_vec() {
		if is_collapsed(graph, id) {
			expand_subtree(graph, id, &mut order)?;
		}
	}
	Ok(order)
}

/// A router showing its subnetwork, by role or by active children.
fn is_expanded(graph: &ForceDirectedGraph, id: NodeId) -> bool {
	graph.topology().node(id).is_some_and(|n| {
		n.is_revealed_router() || n.children().iter().any(|&c| graph.is_active(c))
	})
}

fn is_collapsed(graph: &ForceDirectedGraph, id: NodeId) -> bool {
	graph
		.topology()
		.node(id)
		.is_some_and(|n| n.is_router() && !n.is_revealed_router())
}

fn collapse_subtree(
	graph: &mut ForceDirectedGraph,
	router: NodeId,
	order: &mut Vec<NodeId>,
) -> Result<()> {
	let children = graph
		.topology()
		.node(router)
		.map(|n| n.children().to_vec())
		.unwrap_or_default();
	for child in children {
		if graph.is_active(child) && is_expanded(graph, child) {
			collapse_subtree(graph, child, order)?;
		}
	}
	graph.remove_subnetwork(router)?;
	set_revealed(graph, router, false);
	order.push(router);
	Ok(())
}

fn expand_subtree(
	graph: &mut ForceDirectedGraph,
	router: NodeId,
	order: &mut Vec<NodeId>,
) -> Result<()> {
	graph.add_subnetwork(router)?;
	set_revealed(graph, router, true);
	order.push(router);

	let children = graph
		.topology()
		.node(router)
		.map(|n| n.children().to_vec())
		.unwrap_or_default();
	for child in children {
		if is_collapsed(graph, child) {
			expand_subtree(graph, child, order)?;
		}
	}
	Ok(())
}

fn set_revealed(graph: &mut ForceDirectedGraph, id: NodeId, revealed: bool) {
	if let Some(node) = graph.topology_mut().node_mut(id) {
		if node.is_router() && node.is_revealed_router() != revealed {
			node.change_router_physical_role();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{ForceKind, Viewport};
	use crate::model::{Link, LinkType, Node, PhysicalRole, Topology};

	/// 1 > (2 > (4, 5), 3 > 6), 7 standalone host. Routers start as clouds.
	fn graph() -> ForceDirectedGraph {
		let cloud = |id, children: &[u64]| {
			Node::router(
				id,
				PhysicalRole::Cloud,
				format!("r{id}"),
				None,
				None,
				children.iter().map(|&c| NodeId(c)).collect(),
			)
		};
		let host = |id| Node::host(id, PhysicalRole::Desktop, format!("h{id}"), None, None, id);
		let nodes = vec![
			cloud(1, &[2, 3]),
			cloud(2, &[4, 5]),
			host(4),
			host(5),
			cloud(3, &[6]),
			host(6),
			host(7),
		];
		let links = vec![
			Link::new(1, 1, 2, LinkType::InterfaceOverlay),
			Link::new(2, 1, 3, LinkType::InterfaceOverlay),
			Link::new(3, 2, 4, LinkType::InterfaceOverlay),
			Link::new(4, 5, 2, LinkType::InterfaceOverlay),
			Link::new(5, 3, 6, LinkType::InterfaceOverlay),
			Link::new(6, 1, 7, LinkType::InternetworkingOverlay),
		];
		ForceDirectedGraph::new(Topology::new(nodes, links).unwrap(), Viewport::new(900.0, 700.0))
	}

	fn position(graph: &ForceDirectedGraph, id: NodeId) -> usize {
		graph.nodes().iter().position(|&n| n == id).unwrap()
	}

	fn role(graph: &ForceDirectedGraph, id: u64) -> PhysicalRole {
		graph.topology().node(NodeId(id)).unwrap().physical_role
	}

	#[test]
	fn collapse_all_hides_children_before_parents() {
		let mut graph = graph();
		let order = collapse_all(&mut graph).unwrap();

		let index = |id: u64| order.iter().position(|&n| n == NodeId(id)).unwrap();
		assert!(index(2) < index(1));
		assert!(index(3) < index(1));
		assert_eq!(graph.nodes(), &[NodeId(1), NodeId(7)]);
		assert_eq!(graph.links().len(), 1);
		for id in [1, 2, 3] {
			assert_eq!(role(&graph, id), PhysicalRole::Cloud);
		}
	}

	#[test]
	fn expand_all_reveals_parents_before_children() {
		let mut graph = graph();
		collapse_all(&mut graph).unwrap();
		let order = expand_all(&mut graph).unwrap();

		assert_eq!(order[0], NodeId(1));
		assert_eq!(order.len(), 3);
		assert_eq!(graph.nodes().len(), 7);
		assert_eq!(graph.links().len(), 6);
		assert!(graph.non_active_nodes().is_empty());
		for id in [1, 2, 3] {
			assert_eq!(role(&graph, id), PhysicalRole::Router);
		}
		assert!(position(&graph, NodeId(2)) < position(&graph, NodeId(4)));
	}

	#[test]
	fn hide_subnet_collapses_nested_subnets_first() {
		let mut graph = graph();
		collapse_all(&mut graph).unwrap();
		expand_all(&mut graph).unwrap();

		dispatch(&mut graph, GraphEvent::HideSubnet(NodeId(1))).unwrap();
		assert_eq!(graph.nodes(), &[NodeId(1), NodeId(7)]);
		assert_eq!(role(&graph, 2), PhysicalRole::Cloud);
		assert_eq!(role(&graph, 1), PhysicalRole::Cloud);
	}

	#[test]
	fn reveal_subnet_shows_one_level() {
		let mut graph = graph();
		collapse_all(&mut graph).unwrap();

		dispatch(&mut graph, GraphEvent::RevealSubnet(NodeId(1))).unwrap();
		assert_eq!(role(&graph, 1), PhysicalRole::Router);
		assert_eq!(role(&graph, 2), PhysicalRole::Cloud);
		assert_eq!(graph.nodes().len(), 4);
		assert_eq!(graph.links().len(), 3);
	}

	#[test]
	fn failed_reveal_leaves_role_untouched() {
		let mut graph = graph();
		collapse_all(&mut graph).unwrap();
		assert!(dispatch(&mut graph, GraphEvent::RevealSubnet(NodeId(2))).is_err());
		assert_eq!(role(&graph, 2), PhysicalRole::Cloud);
	}

	#[test]
	fn switching_layout_resets_forces() {
		let mut graph = graph();
		set_layout(&mut graph, Some(GraphLayout::Hierarchical)).unwrap();
		assert!(graph.simulation().has_force(ForceKind::X));

		set_layout(&mut graph, None).unwrap();
		assert_eq!(graph.simulation().active_forces().count(), 0);
	}
}
