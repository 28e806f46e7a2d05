use std::fmt;

use serde::Deserialize;

use super::node::NodeId;

/// Stable link identifier assigned by the topology source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Kind of connection a link represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkType {
	/// Router to host (or router to its own sub-router) interface.
	InterfaceOverlay,
	/// Router to router connection between networks.
	InternetworkingOverlay,
}

/// A directed link between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub id: LinkId,
	pub source: NodeId,
	pub target: NodeId,
	pub link_type: LinkType,
}

impl Link {
	pub fn new(id: u64, source: u64, target: u64, link_type: LinkType) -> Self {
		Self {
			id: LinkId(id),
			source: NodeId(source),
			target: NodeId(target),
			link_type,
		}
	}

	/// True if this link joins `a` and `b` in either direction.
	pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}
}
