//! Visual theming for the graph view.
//!
//! Colours deserialize from CSS strings so a page can restyle the view through
//! its JSON configuration.

use serde::Deserialize;

use super::error::ConfigError;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS colour string for canvas styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses hex (`#RRGGBB`), `rgb()`/`rgba()` functional notation, or one of
	/// the named colours the default theme uses.
	pub fn parse(color_str: &str) -> Result<Self, ConfigError> {
		let s = color_str.trim();
		let invalid = || ConfigError::Color(color_str.to_string());

		if let Some(hex) = s.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return Err(invalid());
			}
			let channel = |range: std::ops::Range<usize>| {
				u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
			};
			return Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
		}

		if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			if !(3..=4).contains(&nums.len()) {
				return Err(invalid());
			}
			let channel = |i: usize| nums[i].parse::<u8>().map_err(|_| invalid());
			let a = match nums.get(3) {
				Some(a) => a.parse::<f64>().map_err(|_| invalid())?,
				None => 1.0,
			};
			return Ok(Color::rgba(channel(0)?, channel(1)?, channel(2)?, a));
		}

		match s.to_ascii_lowercase().as_str() {
			"black" => Ok(Color::rgb(0, 0, 0)),
			"white" => Ok(Color::rgb(255, 255, 255)),
			"blue" => Ok(Color::rgb(0, 0, 255)),
			"crimson" => Ok(Color::rgb(220, 20, 60)),
			"gold" => Ok(Color::rgb(255, 215, 0)),
			"limegreen" => Ok(Color::rgb(50, 205, 50)),
			_ => Err(invalid()),
		}
	}
}

impl TryFrom<String> for Color {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value)
	}
}

/// Colours and widths the style resolver maps node state onto.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StylePalette {
	/// Fill of the focused node.
	pub focused: Color,
	/// Fill of root nodes.
	pub root: Color,
	/// Fill of every other node.
	pub plain: Color,
	/// Node outline colour.
	pub stroke: Color,
	/// Outline width of selected nodes; unselected nodes have none.
	pub selected_stroke_width: f64,
	/// Link line colour.
	pub link: Color,
	/// Brush selector fill, drawn with its own alpha.
	pub selector: Color,
}

impl Default for StylePalette {
	fn default() -> Self {
		Self {
			focused: Color::rgb(220, 20, 60),
			root: Color::rgb(255, 215, 0),
			plain: Color::rgb(50, 205, 50),
			stroke: Color::rgb(0, 0, 255),
			selected_stroke_width: 2.0,
			link: Color::rgb(0, 0, 0),
			selector: Color::rgba(0, 0, 0, 0.1),
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
	/// Canvas clear colour.
	pub background: Color,
	/// Node, link and brush colours.
	pub palette: StylePalette,
}

impl Theme {
	/// Light theme matching classic SVG graph views (default).
	pub fn light() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			palette: StylePalette::default(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
