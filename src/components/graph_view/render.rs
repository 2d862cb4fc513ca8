//! Canvas rendering for the graph view.
//!
//! Draw order:
//! 1. Background (screen space)
//! 2. Links, then nodes, under the view transform (graph space)
//! 3. Brush selector overlay (screen space)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::gesture::BrushRect;
use super::layout::LayoutAdapter;
use super::scene::{LinkElement, NodeElement};
use super::theme::{Color, StylePalette};
use super::view::GraphView;

/// Renders the scene at time `now` (milliseconds, same clock as the view).
pub fn render<L: LayoutAdapter>(view: &GraphView<L>, ctx: &CanvasRenderingContext2d, now: f64) {
	let (width, height) = view.size();
	let theme = &view.config().theme;

	let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	ctx.save();
	let [a, b, c, d, e, f] = view.transform().matrix();
	let _ = ctx.set_transform(a, b, c, d, e, f);

	for link in view.scene().links() {
		draw_link(ctx, link, &theme.palette, now);
	}
	for node in view.scene().nodes() {
		draw_node(ctx, node, now);
	}

	ctx.restore();

	if let Some(rect) = view.brush_overlay() {
		draw_brush(ctx, rect, &theme.palette);
	}
}

fn faded(color: Color, opacity: f64) -> String {
	color.with_alpha(color.a * opacity).to_css()
}

fn draw_link(ctx: &CanvasRenderingContext2d, link: &LinkElement, palette: &StylePalette, now: f64) {
	let width = link.width.value(now);
	let opacity = link.opacity.value(now);
	if width <= 0.0 || opacity <= 0.0 {
		return;
	}

	ctx.set_stroke_style_str(&faded(palette.link, opacity));
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(link.from.x, link.from.y);
	ctx.line_to(link.to.x, link.to.y);
	ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeElement, now: f64) {
	let radius = node.radius.value(now);
	let opacity = node.opacity.value(now);
	if radius <= 0.0 || opacity <= 0.0 {
		return;
	}
	let (x, y) = (node.center.x, node.center.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&faded(node.style.fill, opacity));
	ctx.fill();

	if node.style.stroke_width > 0.0 {
		ctx.set_stroke_style_str(&faded(node.style.stroke, opacity));
		ctx.set_line_width(node.style.stroke_width);
		ctx.stroke();
	}
}

fn draw_brush(ctx: &CanvasRenderingContext2d, rect: BrushRect, palette: &StylePalette) {
	ctx.set_fill_style_str(&palette.selector.to_css());
	ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
}
