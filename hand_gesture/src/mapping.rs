//! Image-space → screen-space coordinate mapping.
//!
//! Only an interior rectangle of the camera frame (inset by `margin` on every
//! side) is mapped onto the full screen, so the whole screen is reachable
//! without the fingertip leaving the camera's view.  Points outside that
//! rectangle extrapolate along the same line and may land off-screen.

use serde::{Deserialize, Serialize};

/// Screen dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width:  f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        ScreenSize { width, height }
    }
}

/// The active rectangle `[margin, width - margin] × [margin, height - margin]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveRegion {
    pub left:   f64,
    pub top:    f64,
    pub right:  f64,
    pub bottom: f64,
}

impl ActiveRegion {
    pub fn inset(frame_width: u32, frame_height: u32, margin: u32) -> Self {
        ActiveRegion {
            left:   margin as f64,
            top:    margin as f64,
            right:  frame_width as f64 - margin as f64,
            bottom: frame_height as f64 - margin as f64,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CoordinateMapper
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    region: ActiveRegion,
    screen: ScreenSize,
}

impl CoordinateMapper {
    /// `region` must have positive width and height; the gesture config
    /// validation guarantees that.
    pub fn new(region: ActiveRegion, screen: ScreenSize) -> Self {
        CoordinateMapper { region, screen }
    }

    pub fn region(&self) -> ActiveRegion { self.region }
    pub fn screen(&self) -> ScreenSize   { self.screen }

    /// Map a fingertip pixel to a screen target.  Never clamps.
    pub fn map(&self, x: i32, y: i32) -> (f64, f64) {
        let r = &self.region;
        (
            lerp(x as f64, r.left, r.right,  self.screen.width),
            lerp(y as f64, r.top,  r.bottom, self.screen.height),
        )
    }
}

/// Linear map of `v` from `[lo, hi]` onto `[0, out]`, extended beyond both ends.
fn lerp(v: f64, lo: f64, hi: f64, out: f64) -> f64 {
    (v - lo) / (hi - lo) * out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
