//! Error type shared by the topology model and the graph engine.
//!
//! Every variant is a precondition failure: the loader handed over a malformed
//! topology, or a caller drove the engine outside the router state machine.
//! Operations check their preconditions before touching any state, so an `Err`
//! never leaves the partitions half-updated.

use thiserror::Error;

use crate::model::{LinkId, NodeId};

/// Errors raised by topology construction and graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("node id {0} appears more than once")]
	DuplicateNode(NodeId),

	#[error("link id {0} appears more than once")]
	DuplicateLink(LinkId),

	#[error("link {link} references unknown node {node}")]
	DanglingLink { link: LinkId, node: NodeId },

	#[error("router {parent} lists unknown child {child}")]
	UnknownChild { parent: NodeId, child: NodeId },

	#[error("node {child} is a child of both {first} and {second}")]
	SharedChild {
		child: NodeId,
		first: NodeId,
		second: NodeId,
	},

	#[error("node {0} is its own ancestor")]
	CyclicHierarchy(NodeId),

	#[error("unknown node {0}")]
	UnknownNode(NodeId),

	#[error("node {0} is not a router")]
	NotARouter(NodeId),

	#[error("router {0} is not in the active set")]
	InactiveRouter(NodeId),

	#[error("router {router} still has a revealed subnetwork below child {child}")]
	RevealedDescendants { router: NodeId, child: NodeId },

	#[error("invalid topology document: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
