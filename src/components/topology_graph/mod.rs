//! Network topology visualization component.
//!
//! Renders the active part of a topology on an HTML canvas with:
//! - Force-directed positioning driven by the graph engine
//! - Double-click to reveal or hide a router's subnetwork
//! - Right-click a node for an info card with its details
//! - Pan, zoom (wheel or zoom commands), and node dragging (revealed
//!   subnetworks move with their router)
//! - Role-based theming and zoom-aware sizing
//!
//! # Example
//!
//! ```ignore
//! use topology_graph::{Topology, TopologyGraphCanvas, ViewCommand};
//!
//! let topology = Topology::from_json(json)?;
//! let commands = RwSignal::new(None::<ViewCommand>);
//!
//! view! { <TopologyGraphCanvas topology=topology commands=commands fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::TopologyGraphCanvas;
pub use state::{Gesture, PanState, TopologyViewState, ViewCommand, ViewTransform};
pub use theme::Theme;
