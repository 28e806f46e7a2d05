//! Canvas rendering for the topology view.
//!
//! Draws in four passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Active links (world space)
//! 3. Active nodes, then the hover ring and labels on top
//! 4. Info card for the selected node (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::model::{LinkType, Node, PhysicalRole};

use super::scale::ScaledValues;
use super::state::TopologyViewState;
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(state: &TopologyViewState, ctx: &CanvasRenderingContext2d) {
	let scale = ScaledValues::new(&state.scale, state.transform.k);

	draw_background(state, ctx, &state.theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, &scale);
	draw_nodes(state, ctx, &scale);

	ctx.restore();

	if let Some(info) = state.node_info() {
		draw_info_card(ctx, &info, &state.theme);
	}
}

fn draw_background(state: &TopologyViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let background = &theme.background;
	let gradient = background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &TopologyViewState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	let theme = &state.theme;
	let topology = state.graph.topology();
	ctx.set_line_width(scale.stroke(theme.link.width));

	for &id in state.graph.links() {
		let Some(link) = topology.link(id) else {
			continue;
		};
		let (Some(source), Some(target)) = (topology.node(link.source), topology.node(link.target))
		else {
			continue;
		};

		match link.link_type {
			LinkType::InternetworkingOverlay => {
				let (dash, gap) = theme.link.internetworking_dash;
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
			}
			LinkType::InterfaceOverlay => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}
		ctx.set_stroke_style_str(&theme.link_color(link.link_type).to_css());
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &TopologyViewState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	let topology = state.graph.topology();
	for &id in state.graph.nodes() {
		if let Some(node) = topology.node(id) {
			draw_node(ctx, node, scale, &state.theme);
		}
	}

	let Some(node) = state.hovered.and_then(|id| topology.node(id)) else {
		return;
	};
	let radius = scale.radius(state.theme.node_radius(node.physical_role));
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, radius + scale.stroke(3.0), 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&state.theme.node.hover_ring.to_css());
	ctx.set_line_width(scale.stroke(1.5));
	ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &Node, scale: &ScaledValues, theme: &Theme) {
	let (x, y) = (node.x, node.y);
	let radius = scale.radius(theme.node_radius(node.physical_role));
	let base = theme.role_color(node.physical_role);

	match ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();

	// Collapsed routers get a dashed outline hinting at hidden content.
	if node.physical_role == PhysicalRole::Cloud {
		let dash = scale.stroke(4.0);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(dash),
		));
	}
	ctx.set_stroke_style_str(&theme.node.border_color.to_css());
	ctx.set_line_width(scale.stroke(1.0));
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if scale.label_alpha > 0.0 {
		ctx.set_global_alpha(scale.label_alpha);
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		let _ = ctx.fill_text(&node.name, x + radius + 4.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	}
}

fn draw_info_card(ctx: &CanvasRenderingContext2d, info: &str, theme: &Theme) {
	let style = &theme.info;
	ctx.set_font(&style.font);
	let lines: Vec<&str> = info.lines().collect();
	let text_width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);

	let (x, y) = (style.padding, style.padding);
	let width = text_width + 2.0 * style.padding;
	let height = lines.len() as f64 * style.line_height + 2.0 * style.padding;
	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(x, y, width, height);
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, height);

	ctx.set_fill_style_str(&style.text.to_css());
	for (i, line) in lines.iter().enumerate() {
		let baseline = y + style.padding + (i as f64 + 0.75) * style.line_height;
		let _ = ctx.fill_text(line, x + style.padding, baseline);
	}
}
