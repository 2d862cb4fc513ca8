//! Coalesces bursts of model changes into a single reconciliation.

/// Dirty flag with a trailing debounce window. Each change pushes the due
/// time back, so a burst reconciles once, `window_ms` after it ends.
#[derive(Clone, Debug)]
pub struct RenderScheduler {
	window_ms: f64,
	due_at: Option<f64>,
}

impl RenderScheduler {
	/// Clean scheduler with a `window_ms` debounce window.
	pub fn new(window_ms: f64) -> Self {
		Self {
			window_ms,
			due_at: None,
		}
	}

	/// Records a change at `now`, pushing the due time back.
	pub fn mark_dirty(&mut self, now: f64) {
		self.due_at = Some(now + self.window_ms);
	}

	/// Whether a change is waiting.
	pub fn is_dirty(&self) -> bool {
		self.due_at.is_some()
	}

	/// Clears and returns true once the window has elapsed.
	pub fn take_due(&mut self, now: f64) -> bool {
		match self.due_at {
			Some(due) if now >= due => {
				self.due_at = None;
				true
			}
			_ => false,
		}
	}

	/// Clears and returns true if anything is pending, ignoring the window.
	pub fn take_pending(&mut self) -> bool {
		self.due_at.take().is_some()
	}
}
