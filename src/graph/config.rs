//! Tunable constants for the graph engine.
//!
//! Defaults reproduce the stock network view. Every field can be overridden
//! from JSON; missing fields fall back to their default.

use serde::Deserialize;

/// Viewport size in graph units (CSS pixels at zoom 1).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// Distance and strength of a link spring.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct LinkSpring {
	pub distance: f64,
	pub strength: f64,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Node pairs further apart than this do not repel each other.
	pub charge_distance_max: f64,
	/// Spring for router-to-router links.
	pub internetworking_link: LinkSpring,
	/// Spring for every other link.
	pub interface_link: LinkSpring,
	/// Active nodes are kept this far inside the viewport edges.
	pub viewport_margin: f64,
	/// Settle ticks per active node for construction, resize and initial positioning.
	pub settle_ticks_per_node: usize,
	/// Settle ticks per active node after revealing a subnetwork.
	pub subnet_settle_ticks_per_node: usize,
	/// A settle ends early once no active node moves further than this in a tick.
	pub settle_rest_displacement: f64,
	/// Collision radius used by `init_position`.
	pub initial_collide_radius: f64,
	/// Alpha target that keeps the simulation warm.
	pub warm_alpha_target: f64,
	/// Collision radius applied to freshly revealed children.
	pub subnet_collide_radius: f64,
	/// Spring applied to freshly revealed links.
	pub subnet_link: LinkSpring,
	/// Spacing between seeded children of a revealed router.
	pub child_spacing: f64,
	/// Seeded children never start closer than this to the top/left edge.
	pub child_min_offset: f64,
	/// Seeded children never start closer than this to the bottom/right edge.
	pub child_max_margin: f64,
	/// Slack when deciding whether a router is the outermost one.
	pub extreme_tolerance: f64,
	/// Collision radius used by the hierarchical layout.
	pub hierarchical_collide_radius: f64,
	/// Collision strength used by the hierarchical layout.
	pub hierarchical_collide_strength: f64,
	/// Strength of the pull toward hierarchical target positions.
	pub hierarchical_pull_strength: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			charge_strength: -5000.0,
			charge_distance_max: 150.0,
			internetworking_link: LinkSpring {
				distance: 400.0,
				strength: 0.5,
			},
			interface_link: LinkSpring {
				distance: 150.0,
				strength: 0.7,
			},
			viewport_margin: 50.0,
			settle_ticks_per_node: 50,
			subnet_settle_ticks_per_node: 3,
			settle_rest_displacement: 0.01,
			initial_collide_radius: 75.0,
			warm_alpha_target: 0.3,
			subnet_collide_radius: 50.0,
			subnet_link: LinkSpring {
				distance: 150.0,
				strength: 1.0,
			},
			child_spacing: 50.0,
			child_min_offset: 150.0,
			child_max_margin: 80.0,
			extreme_tolerance: 75.0,
			hierarchical_collide_radius: 50.0,
			hierarchical_collide_strength: 0.6,
			hierarchical_pull_strength: 1.0,
		}
	}
}

impl GraphConfig {
	/// Parses a (possibly partial) configuration document.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}
