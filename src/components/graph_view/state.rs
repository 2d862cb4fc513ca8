//! View-side state: geometry, the pan/zoom transform and per-node flags.
//!
//! Node flags (`selected`, `fixed`) live in a table keyed by node key rather
//! than on the model's nodes, so the graph model stays read-only to the view.

use std::collections::HashMap;

use super::types::NodeKey;

/// A point in either screen or graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downward.
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Affine transform `(scale_x, 0, 0, scale_y, translate_x, translate_y)` from
/// graph space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal zoom factor.
	pub scale_x: f64,
	/// Vertical zoom factor; kept equal to `scale_x`.
	pub scale_y: f64,
	/// Screen-space x offset.
	pub translate_x: f64,
	/// Screen-space y offset.
	pub translate_y: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			scale_x: 1.0,
			scale_y: 1.0,
			translate_x: 0.0,
			translate_y: 0.0,
		}
	}
}

impl ViewTransform {
	/// Canvas `setTransform` arguments.
	pub fn matrix(&self) -> [f64; 6] {
		[
			self.scale_x,
			0.0,
			0.0,
			self.scale_y,
			self.translate_x,
			self.translate_y,
		]
	}

	/// Graph space to screen space.
	pub fn to_screen(&self, p: Point) -> Point {
		Point::new(
			p.x * self.scale_x + self.translate_x,
			p.y * self.scale_y + self.translate_y,
		)
	}

	/// Screen space to graph space.
	pub fn to_graph(&self, p: Point) -> Point {
		Point::new(
			(p.x - self.translate_x) / self.scale_x,
			(p.y - self.translate_y) / self.scale_y,
		)
	}

	/// Translates by a screen-space delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.translate_x += dx;
		self.translate_y += dy;
	}

	/// Scales by `factor` around the screen point `anchor`, which keeps its
	/// graph-space position. The resulting scale is clamped to
	/// `[min_scale, max_scale]`.
	pub fn zoom(&mut self, factor: f64, anchor: Point, min_scale: f64, max_scale: f64) {
		let new_k = (self.scale_x * factor).clamp(min_scale, max_scale);
		let s = new_k / self.scale_x;
		self.scale_x = new_k;
		self.scale_y *= s;
		self.translate_x = self.translate_x * s + (1.0 - s) * anchor.x;
		self.translate_y = self.translate_y * s + (1.0 - s) * anchor.y;
	}
}

/// Per-node flags owned by the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeViewState {
	/// Drawn with the selection stroke.
	pub selected: bool,
	/// Pinned against layout movement while a reconciliation settles.
	pub fixed: bool,
}

/// [`NodeViewState`] by node key. Unknown keys read as default.
#[derive(Clone, Debug, Default)]
pub struct ViewStateTable {
	nodes: HashMap<NodeKey, NodeViewState>,
}

impl ViewStateTable {
	/// Flags for `key`.
	pub fn get(&self, key: &str) -> NodeViewState {
		self.nodes.get(key).copied().unwrap_or_default()
	}

	/// Mutable flags for `key`, inserted on first use.
	pub fn entry(&mut self, key: &str) -> &mut NodeViewState {
		self.nodes.entry(key.to_string()).or_default()
	}

	/// Forgets a node that left the model.
	pub fn remove(&mut self, key: &str) {
		self.nodes.remove(key);
	}

	pub fn is_selected(&self, key: &str) -> bool {
		self.get(key).selected
	}

	/// Drops the `selected` flag on every node.
	pub fn clear_selected(&mut self) {
		for state in self.nodes.values_mut() {
			state.selected = false;
		}
	}

	/// Unpins every fixed node and returns their keys.
	pub fn release_fixed(&mut self) -> Vec<NodeKey> {
		let mut released = Vec::new();
		for (key, state) in &mut self.nodes {
			if state.fixed {
				state.fixed = false;
				released.push(key.clone());
			}
		}
		released
	}
}
