//! Pointer gesture recognition for the interaction surface.
//!
//! Pan, zoom, node drag and brush select share one pointer stream. Only one
//! gesture is active at a time; a press is arbitrated first by what it landed
//! on, then by button:
//!
//! | target  | button | gesture            |
//! |---------|--------|--------------------|
//! | node    | left   | node drag          |
//! | node    | other  | swallowed          |
//! | surface | left   | brush select       |
//! | surface | middle | pan                |
//! | surface | right  | zoom               |
//!
//! Any release ends the active gesture. The coordinator only tracks state and
//! reports [`GestureEffect`]s; the view applies them.

use super::state::Point;
use super::types::NodeKey;

/// Mouse button that started a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	/// Primary button.
	Left,
	/// Wheel button.
	Middle,
	/// Secondary button.
	Right,
	/// Any other DOM button code.
	Other(i16),
}

impl PointerButton {
	/// Decodes a DOM `MouseEvent.button` value.
	pub fn from_dom(code: i16) -> Self {
		match code {
			0 => Self::Left,
			1 => Self::Middle,
			2 => Self::Right,
			other => Self::Other(other),
		}
	}
}

/// Modifier keys held during a press or release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Shift: toggle membership, extend a brush.
	pub shift: bool,
	/// Ctrl: focus the clicked node.
	pub ctrl: bool,
}

impl Modifiers {
	/// No modifiers.
	pub const NONE: Self = Self {
		shift: false,
		ctrl: false,
	};
	/// Shift only.
	pub const SHIFT: Self = Self {
		shift: true,
		ctrl: false,
	};
	/// Ctrl only.
	pub const CTRL: Self = Self {
		shift: false,
		ctrl: true,
	};
}

/// What a press landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PressTarget {
	/// A bound node under the pointer.
	Node(NodeKey),
	/// Empty canvas.
	Surface,
}

/// Axis-aligned rectangle with non-negative extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushRect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl BrushRect {
	/// Rectangle spanning two corners in any order.
	pub fn spanning(a: Point, b: Point) -> Self {
		Self {
			x: a.x.min(b.x),
			y: a.y.min(b.y),
			width: (a.x - b.x).abs(),
			height: (a.y - b.y).abs(),
		}
	}

	/// Open-interval containment on both axes; edges are outside.
	pub fn contains_strictly(&self, p: Point) -> bool {
		self.x < p.x && p.x < self.x + self.width && self.y < p.y && p.y < self.y + self.height
	}

	/// Top-left and bottom-right corners.
	pub fn corners(&self) -> (Point, Point) {
		(
			Point::new(self.x, self.y),
			Point::new(self.x + self.width, self.y + self.height),
		)
	}
}

/// The active gesture, if any. Points are in surface (screen) coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Middle-drag moving the view.
	Pan {
		last: Point,
	},
	/// Right-drag scaling around `anchor`.
	Zoom {
		anchor: Point,
		last: Point,
	},
	/// Left-drag of the node `key`.
	NodeDrag {
		key: NodeKey,
		last: Point,
	},
	/// Left-drag selecting a rectangle.
	Brush {
		origin: Point,
		current: Point,
		/// Overlay appears on the first move after the press.
		overlay: bool,
	},
}

/// A state change the view must apply.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEffect {
	/// Brush started; clear the selection unless `additive`.
	BrushStart { additive: bool },
	/// Brush overlay now covers this rectangle (screen space).
	BrushResize(BrushRect),
	/// Brush released; select nodes strictly inside `rect` (screen space).
	BrushEnd { rect: BrushRect, overlay: bool },
	/// Translate the view by a screen delta.
	Pan { dx: f64, dy: f64 },
	/// Scale the view around a screen point.
	Zoom { factor: f64, anchor: Point },
	/// Anchor the node in the layout.
	DragStart(NodeKey),
	/// Screen-space pointer delta for the dragged node.
	DragMove { key: NodeKey, dx: f64, dy: f64 },
	/// Release the drag anchor.
	DragEnd(NodeKey),
	/// A node press released without moving.
	Click { key: NodeKey, modifiers: Modifiers },
}

/// Maps vertical right-drag movement to a multiplicative scale factor.
pub fn zoom_factor(dy: f64, sensitivity: f64) -> f64 {
	1.0 - dy / sensitivity
}

/// Tracks the single active gesture.
#[derive(Clone, Debug, Default)]
pub struct GestureCoordinator {
	gesture: Gesture,
	/// Set once a node drag moves; swallows the click that ends it.
	dragging: bool,
	zoom_sensitivity: f64,
}

impl GestureCoordinator {
	/// Idle coordinator; `zoom_sensitivity` is pixels per 100% of right-drag zoom.
	pub fn new(zoom_sensitivity: f64) -> Self {
		Self {
			zoom_sensitivity,
			..Self::default()
		}
	}

	/// The gesture in progress.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// True when no button is held.
	pub fn is_idle(&self) -> bool {
		self.gesture == Gesture::Idle
	}

	/// Starts a gesture for a press on `target`. Ignored while another gesture is active.
	pub fn press(
		&mut self,
		target: PressTarget,
		button: PointerButton,
		modifiers: Modifiers,
		at: Point,
	) -> Option<GestureEffect> {
		if !self.is_idle() {
			return None;
		}
		let (gesture, effect) = match (target, button) {
			(PressTarget::Node(key), PointerButton::Left) => {
				self.dragging = false;
				(
					Gesture::NodeDrag {
						key: key.clone(),
						last: at,
					},
					Some(GestureEffect::DragStart(key)),
				)
			}
			(PressTarget::Node(_), _) => (Gesture::Idle, None),
			(PressTarget::Surface, PointerButton::Left) => (
				Gesture::Brush {
					origin: at,
					current: at,
					overlay: false,
				},
				Some(GestureEffect::BrushStart {
					additive: modifiers.shift,
				}),
			),
			(PressTarget::Surface, PointerButton::Middle) => (Gesture::Pan { last: at }, None),
			(PressTarget::Surface, PointerButton::Right) => (
				Gesture::Zoom {
					anchor: at,
					last: at,
				},
				None,
			),
			(PressTarget::Surface, PointerButton::Other(_)) => (Gesture::Idle, None),
		};
		self.gesture = gesture;
		effect
	}

	/// Pointer moved to `at`; returns what the active gesture changes.
	pub fn motion(&mut self, at: Point) -> Option<GestureEffect> {
		match &mut self.gesture {
			Gesture::Idle => None,
			Gesture::Pan { last } => {
				let (dx, dy) = (at.x - last.x, at.y - last.y);
				*last = at;
				Some(GestureEffect::Pan { dx, dy })
			}
			Gesture::Zoom { anchor, last } => {
				let dy = at.y - last.y;
				*last = at;
				Some(GestureEffect::Zoom {
					factor: zoom_factor(dy, self.zoom_sensitivity),
					anchor: *anchor,
				})
			}
			Gesture::NodeDrag { key, last } => {
				let (dx, dy) = (at.x - last.x, at.y - last.y);
				if dx == 0.0 && dy == 0.0 {
					return None;
				}
				*last = at;
				self.dragging = true;
				Some(GestureEffect::DragMove {
					key: key.clone(),
					dx,
					dy,
				})
			}
			Gesture::Brush {
				origin,
				current,
				overlay,
			} => {
				*overlay = true;
				*current = at;
				Some(GestureEffect::BrushResize(BrushRect::spanning(*origin, at)))
			}
		}
	}

	/// Ends whatever gesture is active. Safe to call repeatedly, e.g. from
	/// both the surface and the document-level fallback.
	pub fn release(&mut self, modifiers: Modifiers) -> Vec<GestureEffect> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Idle | Gesture::Pan { .. } | Gesture::Zoom { .. } => Vec::new(),
			Gesture::NodeDrag { key, .. } => {
				let mut effects = vec![GestureEffect::DragEnd(key.clone())];
				if !self.dragging {
					effects.push(GestureEffect::Click { key, modifiers });
				}
				self.dragging = false;
				effects
			}
			Gesture::Brush {
				origin,
				current,
				overlay,
			} => vec![GestureEffect::BrushEnd {
				rect: BrushRect::spanning(origin, current),
				overlay,
			}],
		}
	}
}
