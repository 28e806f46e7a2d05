//! Arena owning every node and link of a loaded topology.
//!
//! Hierarchy lives only in router children lists; the arena itself is flat and
//! indexed by id. Construction validates the forest so the graph engine can
//! rely on unique ids, resolvable links and single-parent, acyclic nesting.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Deserialize;

use super::link::{Link, LinkId, LinkType};
use super::node::{Node, NodeId, PhysicalRole};
use crate::error::{GraphError, Result};

/// Validated collection of nodes and links, addressable by id.
#[derive(Clone, Debug, Default)]
pub struct Topology {
	nodes: Vec<Node>,
	links: Vec<Link>,
	node_index: HashMap<NodeId, usize>,
	link_index: HashMap<LinkId, usize>,
	parents: HashMap<NodeId, NodeId>,
}

impl Topology {
	/// Builds the arena from a flat node list and the links between them.
	pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self> {
		let mut node_index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if node_index.insert(node.id, i).is_some() {
				return Err(GraphError::DuplicateNode(node.id));
			}
		}

		let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
		for node in &nodes {
			for &child in node.children() {
				if !node_index.contains_key(&child) {
					return Err(GraphError::UnknownChild {
						parent: node.id,
						child,
					});
				}
				if child == node.id {
					return Err(GraphError::CyclicHierarchy(child));
				}
				if let Some(&first) = parents.get(&child) {
					return Err(GraphError::SharedChild {
						child,
						first,
						second: node.id,
					});
				}
				parents.insert(child, node.id);
			}
		}

		for node in &nodes {
			let mut seen = HashSet::new();
			let mut current = node.id;
			while let Some(&parent) = parents.get(&current) {
				if parent == node.id {
					return Err(GraphError::CyclicHierarchy(node.id));
				}
				if !seen.insert(parent) {
					break;
				}
				current = parent;
			}
		}

		let mut link_index = HashMap::with_capacity(links.len());
		for (i, link) in links.iter().enumerate() {
			for endpoint in [link.source, link.target] {
				if !node_index.contains_key(&endpoint) {
					return Err(GraphError::DanglingLink {
						link: link.id,
						node: endpoint,
					});
				}
			}
			if link_index.insert(link.id, i).is_some() {
				return Err(GraphError::DuplicateLink(link.id));
			}
		}

		Ok(Self {
			nodes,
			links,
			node_index,
			link_index,
			parents,
		})
	}

	/// Parses a topology document.
	///
	/// Expected format: `{ children: [...], links: [...], router_links: [...] }`
	/// where nodes nest through their own `children` array. Every router
	/// starts collapsed (`cloud`), whatever role the document gives it.
	pub fn from_json(json: &str) -> Result<Self> {
		let document: TopologyDocument = serde_json::from_str(json)?;

		let mut nodes = Vec::new();
		flatten_nodes(document.children, &mut nodes);

		let links = document
			.links
			.into_iter()
			.map(|l| l.into_link(LinkType::InterfaceOverlay))
			.chain(
				document
					.router_links
					.into_iter()
					.map(|l| l.into_link(LinkType::InternetworkingOverlay)),
			)
			.collect();

		let topology = Self::new(nodes, links)?;
		debug!(
			"topology: parsed {} nodes, {} links",
			topology.nodes.len(),
			topology.links.len()
		);
		Ok(topology)
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.node_index.get(&id).map(|&i| &self.nodes[i])
	}

	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.node_index.get(&id).map(|&i| &mut self.nodes[i])
	}

	pub fn link(&self, id: LinkId) -> Option<&Link> {
		self.link_index.get(&id).map(|&i| &self.links[i])
	}

	/// Looks a node up, failing with [`GraphError::UnknownNode`].
	pub fn require(&self, id: NodeId) -> Result<&Node> {
		self.node(id).ok_or(GraphError::UnknownNode(id))
	}

	/// Looks up a router, failing if the id is unknown or names a host.
	pub fn require_router(&self, id: NodeId) -> Result<&Node> {
		let node = self.require(id)?;
		if node.is_router() {
			Ok(node)
		} else {
			Err(GraphError::NotARouter(id))
		}
	}

	/// All nodes in load order (pre-order over the hierarchy for loaded documents).
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node_ids(&self) -> Vec<NodeId> {
		self.nodes.iter().map(|n| n.id).collect()
	}

	pub fn link_ids(&self) -> Vec<LinkId> {
		self.links.iter().map(|l| l.id).collect()
	}

	/// Parent router of a node, if it has one.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.parents.get(&id).copied()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub(crate) fn index_of(&self, id: NodeId) -> Option<usize> {
		self.node_index.get(&id).copied()
	}

	pub(crate) fn node_at(&self, index: usize) -> &Node {
		&self.nodes[index]
	}

	pub(crate) fn node_at_mut(&mut self, index: usize) -> &mut Node {
		&mut self.nodes[index]
	}
}

#[derive(Deserialize)]
struct TopologyDocument {
	#[serde(default)]
	children: Vec<NodeDocument>,
	#[serde(default)]
	links: Vec<LinkDocument>,
	#[serde(default)]
	router_links: Vec<LinkDocument>,
}

#[derive(Deserialize)]
struct NodeDocument {
	id: u64,
	#[serde(default)]
	name: String,
	physical_role: PhysicalRole,
	#[serde(default)]
	address4: Option<String>,
	#[serde(default)]
	address6: Option<String>,
	#[serde(default)]
	host_node_id: Option<u64>,
	#[serde(default)]
	children: Vec<NodeDocument>,
}

#[derive(Deserialize)]
struct LinkDocument {
	id: u64,
	source_id: u64,
	target_id: u64,
}

impl LinkDocument {
	fn into_link(self, link_type: LinkType) -> Link {
		Link::new(self.id, self.source_id, self.target_id, link_type)
	}
}

fn non_empty(address: Option<String>) -> Option<String> {
	address.filter(|a| !a.is_empty())
}

/// Appends each node followed by its subtree, so parents precede children.
fn flatten_nodes(documents: Vec<NodeDocument>, out: &mut Vec<Node>) {
	for doc in documents {
		let address4 = non_empty(doc.address4);
		let address6 = non_empty(doc.address6);
		if doc.physical_role.is_router_like() {
			let children = doc.children.iter().map(|c| NodeId(c.id)).collect();
			out.push(Node::router(
				doc.id,
				PhysicalRole::Cloud,
				doc.name,
				address4,
				address6,
				children,
			));
			flatten_nodes(doc.children, out);
		} else {
			let host_id = doc.host_node_id.unwrap_or(doc.id);
			out.push(Node::host(
				doc.id,
				doc.physical_role,
				doc.name,
				address4,
				address6,
				host_id,
			));
		}
	}
}
