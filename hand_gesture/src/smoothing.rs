//! Exponential smoothing of the cursor target.
//!
//! Each axis moves `1/s` of the way from the previous smoothed position to
//! the new target per frame.  `s = 1` snaps straight to the target; larger
//! values trade responsiveness for steadiness.

/// Smoothed cursor position carried from frame to frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorState {
    pub previous: (f64, f64),
    pub current:  (f64, f64),
}

impl CursorState {
    /// Commit a freshly smoothed position.
    pub fn advance(self, next: (f64, f64)) -> Self {
        CursorState { previous: self.current, current: next }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSmoother {
    factor: f64,
}

impl PositionSmoother {
    /// `factor` is clamped to at least 1 so the filter can never overshoot.
    pub fn new(factor: f64) -> Self {
        PositionSmoother { factor: factor.max(1.0) }
    }

    pub fn factor(&self) -> f64 { self.factor }

    pub fn smooth(&self, prev: (f64, f64), target: (f64, f64)) -> (f64, f64) {
        (
            prev.0 + (target.0 - prev.0) / self.factor,
            prev.1 + (target.1 - prev.1) / self.factor,
        )
    }

    /// Number of frames a held target needs before the remaining error falls
    /// below `tolerance`, starting `distance` away.  With `s = 1` that is a
    /// single frame.
    pub fn frames_to_settle(&self, distance: f64, tolerance: f64) -> u32 {
        if distance <= tolerance {
            return 0;
        }
        if self.factor <= 1.0 {
            return 1;
        }
        let decay = (self.factor - 1.0) / self.factor;
        ((tolerance / distance).ln() / decay.ln()).ceil() as u32
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
