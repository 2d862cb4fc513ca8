use thiserror::Error;

/// Rejected view configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A size, duration or step was zero or negative.
	#[error("{field} must be positive, got {value}")]
	NonPositive { field: &'static str, value: f64 },

	/// `min_scale` exceeds `max_scale`.
	#[error("scale bounds are inverted: min {min} > max {max}")]
	ScaleBounds { min: f64, max: f64 },

	/// A colour string is not valid CSS.
	#[error("invalid color: {0:?}")]
	Color(String),

	/// The document is not valid configuration JSON.
	#[error("malformed configuration: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Failure to construct a graph view.
#[derive(Debug, Error)]
pub enum ViewError {
	/// The configuration was rejected.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The canvas has no area.
	#[error("canvas size must be positive, got {width}x{height}")]
	CanvasSize { width: f64, height: f64 },
}
