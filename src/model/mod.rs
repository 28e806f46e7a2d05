//! Network topology entities: nodes, links and the arena that owns them.

mod link;
mod node;
mod point;
mod topology;

pub use link::{Link, LinkId, LinkType};
pub use node::{Node, NodeId, NodeKind, PhysicalRole};
pub use point::Point;
pub use topology::Topology;
