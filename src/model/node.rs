//! Topology nodes.
//!
//! A node is either a router, which owns a list of child node ids (its
//! subnetwork), or a host leaf. Routers show their subnetwork while their
//! physical role is [`PhysicalRole::Router`] and hide it while it is
//! [`PhysicalRole::Cloud`].

use std::fmt;

use serde::Deserialize;

use super::point::Point;

/// Stable node identifier assigned by the topology source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// What a node physically is. Routers alternate between `Router` and `Cloud`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalRole {
	Router,
	Cloud,
	Server,
	Desktop,
	Mobile,
}

impl PhysicalRole {
	/// True for the two roles a router node can take.
	pub fn is_router_like(self) -> bool {
		matches!(self, PhysicalRole::Router | PhysicalRole::Cloud)
	}
}

impl fmt::Display for PhysicalRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			PhysicalRole::Router => "router",
			PhysicalRole::Cloud => "cloud",
			PhysicalRole::Server => "server",
			PhysicalRole::Desktop => "desktop",
			PhysicalRole::Mobile => "mobile",
		};
		f.write_str(name)
	}
}

/// Variant-specific node data.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	/// Router owning the ids of its direct children.
	Router { children: Vec<NodeId> },
	/// Host leaf with a back-reference used to address host decorators.
	Host { host_id: u64 },
}

/// A node of the topology together with its simulation state.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: NodeId,
	pub physical_role: PhysicalRole,
	pub name: String,
	pub address4: Option<String>,
	pub address6: Option<String>,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x position, set while the node is held by a drag gesture.
	pub fx: Option<f64>,
	/// Pinned y position, set while the node is held by a drag gesture.
	pub fy: Option<f64>,
}

impl Node {
	/// Creates a router with the given children.
	pub fn router(
		id: u64,
		role: PhysicalRole,
		name: impl Into<String>,
		address4: Option<String>,
		address6: Option<String>,
		children: Vec<NodeId>,
	) -> Self {
		Self::new(
			NodeId(id),
			role,
			name.into(),
			address4,
			address6,
			NodeKind::Router { children },
		)
	}

	/// Creates a host leaf.
	pub fn host(
		id: u64,
		role: PhysicalRole,
		name: impl Into<String>,
		address4: Option<String>,
		address6: Option<String>,
		host_id: u64,
	) -> Self {
		Self::new(
			NodeId(id),
			role,
			name.into(),
			address4,
			address6,
			NodeKind::Host { host_id },
		)
	}

	fn new(
		id: NodeId,
		physical_role: PhysicalRole,
		name: String,
		address4: Option<String>,
		address6: Option<String>,
		kind: NodeKind,
	) -> Self {
		Self {
			id,
			physical_role,
			name,
			address4,
			address6,
			kind,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Children of a router; empty for hosts.
	pub fn children(&self) -> &[NodeId] {
		match &self.kind {
			NodeKind::Router { children } => children,
			NodeKind::Host { .. } => &[],
		}
	}

	pub fn is_router(&self) -> bool {
		matches!(self.kind, NodeKind::Router { .. })
	}

	/// A router whose subnetwork is currently shown.
	pub fn is_revealed_router(&self) -> bool {
		self.is_router() && self.physical_role == PhysicalRole::Router
	}

	/// Toggles `Router` <-> `Cloud`. Other roles are left untouched.
	pub fn change_router_physical_role(&mut self) {
		self.physical_role = match self.physical_role {
			PhysicalRole::Router => PhysicalRole::Cloud,
			PhysicalRole::Cloud => PhysicalRole::Router,
			other => other,
		};
	}

	/// True once the node has been given coordinates.
	pub fn has_position(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn set_position(&mut self, point: Point) {
		self.x = point.x;
		self.y = point.y;
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Name: {}", self.name)?;
		if let Some(address) = &self.address4 {
			writeln!(f, "IPv4 address: {address}")?;
		}
		if let Some(address) = &self.address6 {
			writeln!(f, "IPv6 address: {address}")?;
		}
		writeln!(f, "Physical role: {}", self.physical_role)?;
		writeln!(f, "Id: {}", self.id.0)
	}
}
