//! View tuning knobs, loadable from JSON.

use serde::Deserialize;

use super::error::ConfigError;
use super::theme::Theme;

/// Runtime configuration of the graph view. Every field has a default, so a
/// JSON document only needs to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	/// Settled node radius in graph units.
	pub node_radius: f64,
	/// Target link length handed to the layout.
	pub link_distance: f64,
	/// Duration of enter/exit transitions (ms).
	pub transition_ms: f64,
	/// Extra wait after a transition before reconciled nodes are released to
	/// the layout again (ms).
	pub release_margin_ms: f64,
	/// Model changes closer together than this collapse into one pass (ms).
	pub debounce_ms: f64,
	/// Pixels of vertical right-drag movement per 100% of zoom.
	pub zoom_sensitivity: f64,
	/// Scale factor applied per wheel notch.
	pub wheel_zoom_step: f64,
	/// Lower zoom bound.
	pub min_scale: f64,
	/// Upper zoom bound.
	pub max_scale: f64,
	/// Physics step per animation frame (seconds).
	pub layout_step: f64,
	/// Colours for background, nodes, links and the brush.
	pub theme: Theme,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			node_radius: 7.5,
			link_distance: 100.0,
			transition_ms: 500.0,
			release_margin_ms: 5.0,
			debounce_ms: 100.0,
			zoom_sensitivity: 100.0,
			wheel_zoom_step: 1.1,
			min_scale: 0.1,
			max_scale: 10.0,
			layout_step: 0.016,
			theme: Theme::default(),
		}
	}
}

impl ViewConfig {
	/// Parses and validates a JSON configuration document.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: ViewConfig = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks that every duration and size is positive and the scale bounds are ordered.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let positive = [
			("node_radius", self.node_radius),
			("link_distance", self.link_distance),
			("transition_ms", self.transition_ms),
			("zoom_sensitivity", self.zoom_sensitivity),
			("wheel_zoom_step", self.wheel_zoom_step),
			("min_scale", self.min_scale),
			("layout_step", self.layout_step),
		];
		for (field, value) in positive {
			// Written so NaN fails too.
			if !(value > 0.0) {
				return Err(ConfigError::NonPositive { field, value });
			}
		}
		for (field, value) in [
			("release_margin_ms", self.release_margin_ms),
			("debounce_ms", self.debounce_ms),
		] {
			if !(value >= 0.0) {
				return Err(ConfigError::NonPositive { field, value });
			}
		}
		if self.min_scale > self.max_scale {
			return Err(ConfigError::ScaleBounds {
				min: self.min_scale,
				max: self.max_scale,
			});
		}
		Ok(())
	}

	/// Time after a reconciliation at which pinned nodes are released.
	pub fn release_delay(&self) -> f64 {
		self.transition_ms + self.release_margin_ms
	}
}
