//! topology-graph: Interactive network topology visualization.
//!
//! Routers, hosts and the links between them are laid out by a force-directed
//! engine. Routers own subnetworks that can be revealed or hidden one level at
//! a time without disturbing the rest of the layout, and a hierarchical layout
//! can pin every node to a layered tree instead.
//!
//! The engine in [`graph`] is plain Rust and usable without a browser; the
//! [`components`] module wraps it in a Leptos canvas component.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, MouseEvent, Window};

pub mod components;
pub mod error;
pub mod graph;
pub mod model;

pub use components::topology_graph::{Theme, TopologyGraphCanvas, ViewCommand};
pub use error::{GraphError, Result};
pub use graph::{
	ForceDirectedGraph, GraphConfig, GraphEvent, GraphLayout, HierarchicalLayoutCreator, Viewport,
};
pub use model::{Link, LinkId, LinkType, Node, NodeId, PhysicalRole, Point, Topology};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("topology-graph: logging initialized");
}

/// Text content of the script element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load the topology from a script element with id="topology-data".
/// Expected format: JSON with { children: [...], links: [...], router_links: [...] }
fn load_topology() -> Option<Topology> {
	let json_text = script_text("topology-data")?;

	match Topology::from_json(&json_text) {
		Ok(topology) => {
			info!(
				"topology-graph: loaded {} nodes, {} links",
				topology.len(),
				topology.links().len()
			);
			Some(topology)
		}
		Err(e) => {
			warn!("topology-graph: failed to load topology: {}", e);
			None
		}
	}
}

/// Optional engine overrides from a script element with id="graph-config".
fn load_config() -> GraphConfig {
	let Some(json_text) = script_text("graph-config") else {
		return GraphConfig::default();
	};
	GraphConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("topology-graph: ignoring invalid graph config: {}", e);
		GraphConfig::default()
	})
}

/// Main application component.
/// Loads the topology from the DOM and renders it with a small command bar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let topology = load_topology().unwrap_or_default();
	let topology_signal = Signal::derive(move || topology.clone());
	let commands = RwSignal::new(None::<ViewCommand>);
	let send = move |command: ViewCommand| move |_: MouseEvent| commands.set(Some(command));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Network Topology" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<TopologyGraphCanvas
				topology=topology_signal
				config=load_config()
				commands=commands
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Network Topology"</h1>
				<p class="subtitle">
					"Double-click a router to open its subnetwork. Right-click a node for details. Drag nodes to reposition. Scroll to zoom."
				</p>
				<div class="graph-commands">
					<button on:click=send(GraphEvent::CollapseAllSubnets.into())>"Collapse all"</button>
					<button on:click=send(GraphEvent::ExpandAllSubnets.into())>"Expand all"</button>
					<button on:click=send(ViewCommand::Layout(Some(GraphLayout::Hierarchical)))>
						"Hierarchical layout"
					</button>
					<button on:click=send(ViewCommand::Layout(None))>"Layout off"</button>
					<button on:click=send(ViewCommand::ZoomIn)>"+"</button>
					<button on:click=send(ViewCommand::ZoomOut)>"-"</button>
					<button on:click=send(ViewCommand::ResetZoom)>"Reset zoom"</button>
				</div>
			</div>
		</div>
	}
}
