//! Maps node state onto fill and stroke.

use super::theme::{Color, StylePalette};

/// Resolved paint for one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Disc colour.
	pub fill: Color,
	/// Outline colour.
	pub stroke: Color,
	/// Zero when the node is not selected.
	pub stroke_width: f64,
}

impl NodeStyle {
	/// Unselected, unfocused, non-root appearance given to entering nodes.
	pub fn plain(palette: &StylePalette) -> Self {
		Self {
			fill: palette.plain,
			stroke: palette.stroke,
			stroke_width: 0.0,
		}
	}
}

/// Focus wins over root, root over plain.
pub fn fill(key: &str, root: bool, focused: Option<&str>, palette: &StylePalette) -> Color {
	if focused == Some(key) {
		palette.focused
	} else if root {
		palette.root
	} else {
		palette.plain
	}
}

/// Selection stroke width, or zero.
pub fn stroke_width(selected: bool, palette: &StylePalette) -> f64 {
	if selected {
		palette.selected_stroke_width
	} else {
		0.0
	}
}

/// Full style for a node in the given state.
pub fn resolve(
	key: &str,
	root: bool,
	selected: bool,
	focused: Option<&str>,
	palette: &StylePalette,
) -> NodeStyle {
	NodeStyle {
		fill: fill(key, root, focused, palette),
		stroke: palette.stroke,
		stroke_width: stroke_width(selected, palette),
	}
}
