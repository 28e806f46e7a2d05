//! Graph engine: physics, subnetwork reveal/hide, layouts and commands.

mod config;
mod drag;
mod events;
mod force_directed;
mod forces;
mod grid;
mod hierarchical;
mod simulation;

pub use config::{GraphConfig, LinkSpring, Viewport};
pub use drag::NodeDrag;
pub use events::{GraphEvent, GraphLayout, collapse_all, dispatch, expand_all, set_layout};
pub use force_directed::{ForceDirectedGraph, SubscriptionId};
pub use forces::{
	Body, Center, Collide, CollideRadius, Edge, Force, ForceKind, LinkForce, ManyBody, Position,
};
pub use hierarchical::HierarchicalLayoutCreator;
pub use simulation::Simulation;
