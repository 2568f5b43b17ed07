use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{MapState, NODE_RADIUS};

/// Fill used for desaturated (out-of-selection) nodes.
const DESATURATED_FILL: &str = "#6b7280";

pub fn render(state: &MapState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let layout = &state.scene.layout;

	for (edge, style) in layout.edges.iter().zip(&state.scene.projection.edge_styles) {
		let Some((source, target)) = state.endpoints(edge) else {
			continue;
		};
		let (x1, y1, x2, y2) = (source.x, source.y, target.x, target.y);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		ctx.set_global_alpha(style.opacity);
		ctx.set_stroke_style_str(style.stroke);
		ctx.set_line_width(style.width / k.max(0.5));
		if style.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(style.stroke);
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &MapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let layout = &state.scene.layout;

	for (idx, (node, style)) in layout
		.nodes
		.iter()
		.zip(&state.scene.projection.node_styles)
		.enumerate()
	{
		let (x, y) = (node.position.x, node.position.y);
		let hovered = state.hovered == Some(idx);
		let radius = if hovered {
			NODE_RADIUS * 1.15
		} else {
			NODE_RADIUS
		};
		let fill = if style.desaturate {
			DESATURATED_FILL
		} else {
			style.fill
		};

		ctx.set_global_alpha(style.opacity);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();

		ctx.set_stroke_style_str(style.stroke);
		ctx.set_line_width(2.0 / k.max(0.5));
		ctx.stroke();

		if let Some(tech) = node.technology_tag {
			ctx.set_fill_style_str(if style.desaturate {
				"white"
			} else {
				tech.accent_color()
			});
			ctx.set_text_align("center");
			ctx.set_font(&format!("{}px sans-serif", radius * 0.7));
			let _ = ctx.fill_text(tech.icon(), x, y + radius * 0.25);
			ctx.set_text_align("start");
		}

		let label_alpha = if hovered { 1.0 } else { 0.8 };
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", label_alpha));
		ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.label, x + radius + 4.0, y + 4.0);
		if hovered && !node.sub_label.is_empty() {
			ctx.set_fill_style_str("rgba(200, 210, 230, 0.8)");
			ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
			let _ = ctx.fill_text(&node.sub_label, x + radius + 4.0, y + 16.0 / k.max(0.5));
		}
	}
	ctx.set_global_alpha(1.0);
}
