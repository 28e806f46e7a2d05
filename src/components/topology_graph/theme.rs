//! Visual theming for the topology view.
//!
//! Colors and sizes are keyed by what a node or link *is*: its physical role
//! or link type. Routers and clouds are drawn larger than hosts.

use crate::model::{LinkType, PhysicalRole};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Centre color of the radial gradient.
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Link stroke per link type.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub interface: Color,
	pub internetworking: Color,
	/// Stroke width in screen pixels.
	pub width: f64,
	/// Router-to-router links are dashed (dash, gap) in world units.
	pub internetworking_dash: (f64, f64),
}

/// Fill colors and radii per physical role.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub router: Color,
	pub cloud: Color,
	pub server: Color,
	pub desktop: Color,
	pub mobile: Color,
	pub router_radius: f64,
	pub host_radius: f64,
	pub border_color: Color,
	pub label_color: Color,
	pub hover_ring: Color,
}

/// Card listing the selected node's details, drawn in screen space.
#[derive(Clone, Debug)]
pub struct InfoCardStyle {
	pub background: Color,
	pub border: Color,
	pub text: Color,
	pub font: String,
	pub line_height: f64,
	pub padding: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub info: InfoCardStyle,
}

impl Theme {
	pub fn role_color(&self, role: PhysicalRole) -> Color {
		match role {
			PhysicalRole::Router => self.node.router,
			PhysicalRole::Cloud => self.node.cloud,
			PhysicalRole::Server => self.node.server,
			PhysicalRole::Desktop => self.node.desktop,
			PhysicalRole::Mobile => self.node.mobile,
		}
	}

	/// Radius in world units.
	pub fn node_radius(&self, role: PhysicalRole) -> f64 {
		if role.is_router_like() {
			self.node.router_radius
		} else {
			self.node.host_radius
		}
	}

	pub fn link_color(&self, link_type: LinkType) -> Color {
		match link_type {
			LinkType::InterfaceOverlay => self.link.interface,
			LinkType::InternetworkingOverlay => self.link.internetworking,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			link: LinkStyle {
				interface: Color::rgba(140, 160, 180, 0.6),
				internetworking: Color::rgba(214, 170, 100, 0.7),
				width: 1.5,
				internetworking_dash: (10.0, 6.0),
			},
			node: NodeStyle {
				router: Color::rgb(94, 129, 172),
				cloud: Color::rgb(143, 163, 180),
				server: Color::rgb(180, 120, 100),
				desktop: Color::rgb(100, 148, 160),
				mobile: Color::rgb(130, 120, 150),
				router_radius: 18.0,
				host_radius: 11.0,
				border_color: Color::rgba(255, 255, 255, 0.35),
				label_color: Color::rgba(255, 255, 255, 0.85),
				hover_ring: Color::rgba(255, 255, 255, 0.8),
			},
			info: InfoCardStyle {
				background: Color::rgba(13, 17, 23, 0.9),
				border: Color::rgba(255, 255, 255, 0.2),
				text: Color::rgba(255, 255, 255, 0.9),
				font: "12px monospace".to_string(),
				line_height: 16.0,
				padding: 10.0,
			},
		}
	}
}
