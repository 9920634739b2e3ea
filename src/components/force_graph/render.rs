use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeInfo, ForceGraphState, NodeInfo};
use crate::graph::style::{
	Arrow, EMBEDDED_BORDER, LineStyle, PLACEHOLDER_BORDER, PLACEHOLDER_FILL, Shape,
};

const BACKGROUND: &str = "#f5f7fa";
const SEARCH_RING: &str = "#FFC107";
/// Below this zoom edge labels are skipped.
const EDGE_LABEL_ZOOM: f64 = 1.2;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn set_dash(ctx: &CanvasRenderingContext2d, segments: &[f64]) {
	let array = js_sys::Array::new();
	for &segment in segments {
		array.push(&JsValue::from_f64(segment));
	}
	let _ = ctx.set_line_dash(&array);
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let positions = state.node_positions();
	let radii = state.node_radii();
	let highlight = state.active_highlight();
	let t = ease_out_cubic(state.highlight_t);

	for edge in state.edges() {
		if state.classes.hidden.hides_edge(&edge.id) {
			continue;
		}
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (r1, r2) = (
			radii.get(&edge.source).copied().unwrap_or_default(),
			radii.get(&edge.target).copied().unwrap_or_default(),
		);

		let alpha = if highlight.faded_edges.contains(&edge.id) {
			1.0 - 0.8 * t
		} else {
			0.8 + 0.2 * t
		};
		let (color, width, line) = edge_stroke(edge);
		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(width / k.max(0.5));
		match line {
			LineStyle::Solid => set_dash(ctx, &[]),
			LineStyle::Dashed => {
				let (dash, gap) = (8.0 / k, 4.0 / k);
				set_dash(ctx, &[dash, gap]);
				ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));
			}
			LineStyle::Dotted => set_dash(ctx, &[2.0 / k, 3.0 / k]),
		}

		if edge.source == edge.target {
			draw_self_loop(ctx, x1, y1, r1);
			set_dash(ctx, &[]);
			continue;
		}

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let arrow_size = if edge.style.arrow == Arrow::Triangle { 8.0 / k.max(0.5) } else { 0.0 };

		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();
		set_dash(ctx, &[]);

		if arrow_size > 0.0 {
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		if k >= EDGE_LABEL_ZOOM {
			ctx.set_fill_style_str("#555555");
			ctx.set_font(&format!("{}px sans-serif", 8.0 / k.max(0.5)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&edge.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 2.0 / k);
			ctx.set_text_align("start");
		}
	}
	ctx.set_global_alpha(1.0);
	set_dash(ctx, &[]);
}

/// Color, width and dash of an edge after class overlays.
fn edge_stroke(edge: &EdgeInfo) -> (&'static str, f64, LineStyle) {
	if edge.placeholder {
		(PLACEHOLDER_BORDER, 1.0, LineStyle::Dashed)
	} else if edge.embedded {
		(edge.style.color, edge.style.width, LineStyle::Dotted)
	} else {
		(edge.style.color, edge.style.width, edge.style.line)
	}
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x + r, y - r, r * 0.8, 0.0, 2.0 * PI);
	ctx.stroke();
}

fn polygon(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, sides: usize, rotation: f64) {
	for i in 0..sides {
		let angle = rotation + i as f64 * 2.0 * PI / sides as f64;
		let (px, py) = (x + r * angle.cos(), y + r * angle.sin());
		if i == 0 {
			ctx.move_to(px, py);
		} else {
			ctx.line_to(px, py);
		}
	}
	ctx.close_path();
}

fn shape_path(ctx: &CanvasRenderingContext2d, shape: Shape, x: f64, y: f64, r: f64) {
	ctx.begin_path();
	match shape {
		Shape::Ellipse => {
			let _ = ctx.ellipse(x, y, r, r * 0.85, 0.0, 0.0, 2.0 * PI);
		}
		Shape::RoundRectangle => {
			let (w, h, c) = (r, r * 0.75, r * 0.3);
			ctx.move_to(x - w + c, y - h);
			ctx.line_to(x + w - c, y - h);
			ctx.quadratic_curve_to(x + w, y - h, x + w, y - h + c);
			ctx.line_to(x + w, y + h - c);
			ctx.quadratic_curve_to(x + w, y + h, x + w - c, y + h);
			ctx.line_to(x - w + c, y + h);
			ctx.quadratic_curve_to(x - w, y + h, x - w, y + h - c);
			ctx.line_to(x - w, y - h + c);
			ctx.quadratic_curve_to(x - w, y - h, x - w + c, y - h);
			ctx.close_path();
		}
		Shape::Diamond => polygon(ctx, x, y, r, 4, -PI / 2.0),
		Shape::Hexagon => polygon(ctx, x, y, r, 6, 0.0),
		Shape::Octagon => polygon(ctx, x, y, r, 8, PI / 8.0),
		Shape::Tag => {
			let (w, h) = (r, r * 0.7);
			ctx.move_to(x - w, y - h);
			ctx.line_to(x + w * 0.5, y - h);
			ctx.line_to(x + w, y);
			ctx.line_to(x + w * 0.5, y + h);
			ctx.line_to(x - w, y + h);
			ctx.close_path();
		}
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, info: &NodeInfo, x: f64, y: f64, r: f64, k: f64) {
	shape_path(ctx, info.style.shape, x, y, r);
	ctx.set_fill_style_str(if info.placeholder { PLACEHOLDER_FILL } else { info.style.color });
	ctx.fill();

	if info.placeholder || info.embedded {
		let (border, dash) = if info.placeholder {
			(PLACEHOLDER_BORDER, [4.0 / k, 2.0 / k])
		} else {
			(EMBEDDED_BORDER, [1.5 / k, 1.5 / k])
		};
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(2.0 / k.max(0.5));
		set_dash(ctx, &dash);
		ctx.stroke();
		set_dash(ctx, &[]);
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, r: f64, k: f64, alpha: f64) {
	ctx.set_fill_style_str(&format!("rgba(33, 33, 33, {})", alpha));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(label, x, y + r + 12.0 / k.max(0.5));
	ctx.set_text_align("start");
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let highlight = state.active_highlight();
	let t = ease_out_cubic(state.highlight_t);

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		if state.classes.hidden.hides_node(&info.id) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let focused = highlight.focused.as_deref() == Some(info.id.as_str());
		let faded = highlight.faded_nodes.contains(&info.id);
		let (alpha, radius) = if faded {
			(1.0 - 0.7 * t, info.radius * (1.0 - 0.15 * t))
		} else if focused {
			(1.0, info.radius * (1.0 + 0.35 * t))
		} else {
			(1.0, info.radius)
		};

		if focused && t > 0.01 {
			let glow_radius = info.radius * (1.8 + 1.2 * t);
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let glow = 0.45 * t;
				let _ = gradient.add_color_stop(0.0, &format!("rgba(66, 133, 244, {})", glow));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(66, 133, 244, {})", glow * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(66, 133, 244, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		draw_node(ctx, info, x, y, radius, k);

		if highlight.search_matches.contains(&info.id) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 4.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(SEARCH_RING);
			ctx.set_line_width(3.0 / k.max(0.5));
			ctx.stroke();
		}

		if state.hover == Some(node.index()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(33, 33, 33, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(ctx, &info.label, x, y, radius, k, alpha * 0.9);
		ctx.set_global_alpha(1.0);
	});
}
