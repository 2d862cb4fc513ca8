//! Time-based value transitions for visual element attributes.
//!
//! A [`Tween`] interpolates one attribute (radius, opacity, stroke width) from
//! a start value to a target over a fixed duration. Retargeting a running
//! tween starts the new transition from the value currently on screen, which
//! is how a later reconciliation supersedes an earlier one.

/// Cubic in-out easing.
fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// One animated attribute value.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
	from: f64,
	to: f64,
	start: f64,
	duration: f64,
}

impl Tween {
	/// A tween already at rest at `value`.
	pub fn settled(value: f64) -> Self {
		Self {
			from: value,
			to: value,
			start: 0.0,
			duration: 0.0,
		}
	}

	/// Eases from `from` to `to` over `duration` ms starting at `start`.
	pub fn animate(from: f64, to: f64, start: f64, duration: f64) -> Self {
		Self {
			from,
			to,
			start,
			duration: duration.max(0.0),
		}
	}

	/// Value on screen at `now`.
	pub fn value(&self, now: f64) -> f64 {
		if self.duration <= 0.0 || now >= self.start + self.duration {
			return self.to;
		}
		if now <= self.start {
			return self.from;
		}
		let t = ease_cubic_in_out((now - self.start) / self.duration);
		self.from + (self.to - self.from) * t
	}

	/// Value the tween ends at.
	pub fn target(&self) -> f64 {
		self.to
	}

	/// True once `now` is past the end of the transition.
	pub fn is_finished(&self, now: f64) -> bool {
		now >= self.start + self.duration
	}

	/// Restarts the transition toward `to` from the current value.
	pub fn retarget(&mut self, now: f64, to: f64, duration: f64) {
		*self = Self::animate(self.value(now), to, now, duration);
	}
}
