//! View state: the graph engine plus pan/zoom and pointer gesture tracking.
//!
//! Everything here is plain Rust so the interaction logic can be exercised
//! without a browser. The component only translates DOM events into calls on
//! [`TopologyViewState`].

use log::{debug, warn};

use crate::graph::{
	ForceDirectedGraph, GraphConfig, GraphEvent, GraphLayout, NodeDrag, Viewport, dispatch,
	set_layout,
};
use crate::model::{NodeId, Topology};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;

/// Zoom limits shared by the wheel and the zoom buttons.
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 5.0;
/// Scale change per zoom button press.
const ZOOM_STEP: f64 = 0.1;

/// A command pushed into the view from outside the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewCommand {
	Graph(GraphEvent),
	/// Switch layout; `None` turns the current one off.
	Layout(Option<GraphLayout>),
	ZoomIn,
	ZoomOut,
	ResetZoom,
}

impl From<GraphEvent> for ViewCommand {
	fn from(event: GraphEvent) -> Self {
		Self::Graph(event)
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..5.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zooms by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.zoom_to(sx, sy, self.k * factor);
	}

	/// One button step in, anchored at `(sx, sy)`.
	pub fn zoom_in(&mut self, sx: f64, sy: f64) {
		self.zoom_to(sx, sy, self.k + ZOOM_STEP);
	}

	pub fn zoom_out(&mut self, sx: f64, sy: f64) {
		self.zoom_to(sx, sy, self.k - ZOOM_STEP);
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	fn zoom_to(&mut self, sx: f64, sy: f64, k: f64) {
		let k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = k;
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What the pointer is currently doing.
#[derive(Debug, Default)]
pub enum Gesture {
	#[default]
	Idle,
	/// Holding a node. The offset keeps the grab point under the pointer.
	Drag {
		drag: NodeDrag,
		offset_x: f64,
		offset_y: f64,
	},
	Pan(PanState),
}

/// Core view state, created once when the component mounts.
pub struct TopologyViewState {
	pub graph: ForceDirectedGraph,
	pub transform: ViewTransform,
	pub gesture: Gesture,
	pub hovered: Option<NodeId>,
	/// Node whose details are shown in the info card.
	pub selected: Option<NodeId>,
	pub theme: Theme,
	pub scale: ScaleConfig,
	pub width: f64,
	pub height: f64,
}

impl TopologyViewState {
	/// Builds the engine, collapses every subnetwork and spreads the
	/// remaining nodes around the centre.
	pub fn new(topology: Topology, config: GraphConfig, width: f64, height: f64) -> Self {
		let mut graph = ForceDirectedGraph::with_config(topology, Viewport::new(width, height), config);
		if let Err(e) = dispatch(&mut graph, GraphEvent::CollapseAllSubnets) {
			warn!("topology-graph: initial collapse failed: {e}");
		}
		graph.init_position();

		Self {
			graph,
			transform: ViewTransform::default(),
			gesture: Gesture::Idle,
			hovered: None,
			selected: None,
			theme: Theme::default(),
			scale: ScaleConfig::default(),
			width,
			height,
		}
	}

	/// Top-most active node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(&self.scale, self.transform.k);
		let topology = self.graph.topology();
		self.graph.nodes().iter().rev().copied().find(|&id| {
			topology.node(id).is_some_and(|n| {
				let r = scale.radius(self.theme.node_radius(n.physical_role));
				let (dx, dy) = (n.x - gx, n.y - gy);
				dx * dx + dy * dy <= r * r
			})
		})
	}

	/// Starts dragging the node under the pointer, or panning if there is none.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.pointer_up();
		let Some(id) = self.node_at_position(sx, sy) else {
			self.gesture = Gesture::Pan(PanState {
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			});
			return;
		};
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let Some(node) = self.graph.topology().node(id) else {
			return;
		};
		let (offset_x, offset_y) = (node.x - gx, node.y - gy);
		match NodeDrag::start(&mut self.graph, id) {
			Ok(drag) => {
				self.gesture = Gesture::Drag {
					drag,
					offset_x,
					offset_y,
				}
			}
			Err(e) => warn!("topology-graph: cannot drag {id}: {e}"),
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match &self.gesture {
			Gesture::Idle => self.hovered = self.node_at_position(sx, sy),
			Gesture::Drag {
				drag,
				offset_x,
				offset_y,
			} => {
				let (gx, gy) = self.transform.screen_to_graph(sx, sy);
				drag.move_to(&mut self.graph, gx + offset_x, gy + offset_y);
			}
			Gesture::Pan(pan) => {
				self.transform.x = pan.transform_start_x + (sx - pan.start_x);
				self.transform.y = pan.transform_start_y + (sy - pan.start_y);
			}
		}
	}

	/// Ends the current gesture, releasing any dragged nodes.
	pub fn pointer_up(&mut self) {
		if let Gesture::Drag { drag, .. } = std::mem::take(&mut self.gesture) {
			drag.end(&mut self.graph);
		}
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.hovered = None;
	}

	/// Reveals or hides the subnetwork of the router under the pointer.
	pub fn toggle_subnet_at(&mut self, sx: f64, sy: f64) {
		let Some(id) = self.node_at_position(sx, sy) else {
			return;
		};
		let Some(node) = self.graph.topology().node(id) else {
			return;
		};
		if !node.is_router() {
			return;
		}
		let event = if node.is_revealed_router() {
			GraphEvent::HideSubnet(id)
		} else {
			GraphEvent::RevealSubnet(id)
		};
		self.apply(event);
	}

	/// Selects the node under the pointer for the info card, or clears the
	/// selection over empty space.
	pub fn select_at(&mut self, sx: f64, sy: f64) {
		self.selected = self.node_at_position(sx, sy);
	}

	/// Details of the selected node, one field per line. `None` once the
	/// node has been hidden.
	pub fn node_info(&self) -> Option<String> {
		let id = self.selected.filter(|&id| self.graph.is_active(id))?;
		self.graph.topology().node(id).map(|node| node.to_string())
	}

	/// Wheel zoom around the pointer; positive `delta_y` zooms out.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_at(sx, sy, factor);
	}

	pub fn command(&mut self, command: ViewCommand) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		match command {
			ViewCommand::Graph(event) => self.apply(event),
			ViewCommand::Layout(layout) => self.set_layout(layout),
			ViewCommand::ZoomIn => self.transform.zoom_in(cx, cy),
			ViewCommand::ZoomOut => self.transform.zoom_out(cx, cy),
			ViewCommand::ResetZoom => self.transform.reset(),
		}
	}

	pub fn apply(&mut self, event: GraphEvent) {
		debug!("topology-graph: {event:?}");
		if let Err(e) = dispatch(&mut self.graph, event) {
			warn!("topology-graph: {event:?} failed: {e}");
		}
	}

	/// Stops the running layout, then starts `layout` if there is one.
	pub fn set_layout(&mut self, layout: Option<GraphLayout>) {
		debug!("topology-graph: layout {layout:?}");
		if let Err(e) = set_layout(&mut self.graph, layout) {
			warn!("topology-graph: layout {layout:?} failed: {e}");
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.graph.on_resize(Viewport::new(width, height));
	}

	/// Advances the simulation clock. Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		self.graph.step()
	}
}
