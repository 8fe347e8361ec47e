//! Pinch-to-click detection with a cooldown.
//!
//! The raw pinch distance hovers around the threshold while a pinch is held,
//! so there is no clean on/off edge to trigger on.  Instead every frame under
//! the threshold is a click *intent*, and the timer enforces a minimum
//! spacing between the clicks that actually fire.

use std::time::{Duration, Instant};

/// Time of the last fired click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickTimer {
    last_click: Option<Instant>,
}

impl ClickTimer {
    pub fn last_click(&self) -> Option<Instant> { self.last_click }

    /// True when no click has fired yet or `cooldown` has fully elapsed.
    pub fn ready(&self, now: Instant, cooldown: Duration) -> bool {
        match self.last_click {
            None       => true,
            Some(last) => now.saturating_duration_since(last) >= cooldown,
        }
    }

    pub fn fire(self, now: Instant) -> Self {
        ClickTimer { last_click: Some(now) }
    }
}

/// Result of evaluating one click-candidate frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchReading {
    pub distance: f64,
    /// Distance was under the threshold this frame.
    pub pinched:  bool,
    /// A click was emitted this frame.
    pub fired:    bool,
}

// ════════════════════════════════════════════════════════════════════════════
// ClickDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickDetector {
    threshold: f64,
    cooldown:  Duration,
}

impl ClickDetector {
    pub fn new(threshold: f64, cooldown: Duration) -> Self {
        ClickDetector { threshold, cooldown }
    }

    pub fn threshold(&self) -> f64      { self.threshold }
    pub fn cooldown(&self)  -> Duration { self.cooldown }

    /// Evaluate the pinch between the index and middle fingertips.
    /// Returns the reading and the timer to carry into the next frame.
    pub fn evaluate(
        &self,
        index_tip:  (i32, i32),
        middle_tip: (i32, i32),
        timer:      ClickTimer,
        now:        Instant,
    ) -> (PinchReading, ClickTimer) {
        let distance = pinch_distance(index_tip, middle_tip);
        let pinched  = distance < self.threshold;
        let fired    = pinched && timer.ready(now, self.cooldown);
        let timer    = if fired { timer.fire(now) } else { timer };
        (PinchReading { distance, pinched, fired }, timer)
    }
}

/// Euclidean distance between two pixel positions.
pub fn pinch_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = (b.0 - a.0) as f64;
    let dy = (b.1 - a.1) as f64;
    (dx * dx + dy * dy).sqrt()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
