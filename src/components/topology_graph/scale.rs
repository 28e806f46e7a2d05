//! Zoom-dependent sizing for the topology view.
//!
//! Node radii live in world space, so they grow with zoom, but never shrink
//! below a readable screen size. Strokes and labels use constant screen
//! sizes, and labels fade out when zoomed far out.

/// How a size reacts to the zoom factor `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space size, clamped to screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value to draw with after the canvas transform is applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Zoom-dependent parameters for one frame.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node_behavior: ScaleBehavior,
	pub stroke_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Labels are invisible at or below this zoom.
	pub label_hidden_k: f64,
	/// Labels are fully visible at or above this zoom.
	pub label_full_k: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: f64::INFINITY,
			},
			stroke_behavior: ScaleBehavior::Screen,
			label_size: 11.0,
			label_hidden_k: 0.35,
			label_full_k: 0.7,
		}
	}
}

/// Values derived from a [`ScaleConfig`] at a zoom level.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub label_alpha: f64,
	pub label_font: String,
	config: ScaleConfig,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let span = config.label_full_k - config.label_hidden_k;
		let label_alpha = if span <= 0.0 {
			1.0
		} else {
			((k - config.label_hidden_k) / span).clamp(0.0, 1.0)
		};
		Self {
			k,
			label_alpha,
			label_font: format!("{}px sans-serif", config.label_size / k),
			config: config.clone(),
		}
	}

	/// Drawn radius for a node of world radius `base`.
	pub fn radius(&self, base: f64) -> f64 {
		self.config.node_behavior.apply(base, self.k)
	}

	/// Stroke width for a screen-space width `base`.
	pub fn stroke(&self, base: f64) -> f64 {
		self.config.stroke_behavior.apply(base, self.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_keeps_a_minimum_screen_size() {
		let values = ScaledValues::new(&ScaleConfig::default(), 0.1);
		// 11 world units at k=0.1 would be 1.1px on screen; clamp to 4px.
		assert!((values.radius(11.0) - 40.0).abs() < 1e-9);

		let values = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(values.radius(11.0), 11.0);
	}

	#[test]
	fn screen_strokes_counter_the_zoom() {
		let values = ScaledValues::new(&ScaleConfig::default(), 4.0);
		assert_eq!(values.stroke(2.0), 0.5);
	}

	#[test]
	fn labels_fade_between_thresholds() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 0.2).label_alpha, 0.0);
		assert_eq!(ScaledValues::new(&config, 1.0).label_alpha, 1.0);
		let mid = ScaledValues::new(&config, 0.525).label_alpha;
		assert!((mid - 0.5).abs() < 1e-9);
	}
}
