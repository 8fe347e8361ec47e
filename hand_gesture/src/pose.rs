//! Synthetic hand poses.
//!
//! Builds a plausible 21-landmark hand from a handful of switches, for the
//! simulation rig, the trace tool, and tests.  Offsets are pixels relative to
//! the wrist with the palm facing the camera and fingers pointing up.

use crate::landmark::*;

// Finger templates: (MCP, PIP, DIP, TIP) offsets from the wrist.
type Finger = [(i32, i32); 4];

const THUMB: Finger = [(-30, -20), (-52, -45), (-66, -66), (-76, -86)];

const INDEX_UP:     Finger = [(-28, -90), (-34, -130), (-38, -155), (-40, -176)];
const INDEX_DOWN:   Finger = [(-28, -90), (-30, -115), (-27, -96),  (-24, -82)];
const INDEX_PINCH:  Finger = [(-28, -90), (-24, -130), (-20, -155), (-16, -176)];

const MIDDLE_UP:    Finger = [(0, -95),   (4, -140),   (7, -166),   (10, -186)];
const MIDDLE_DOWN:  Finger = [(0, -95),   (1, -120),   (3, -100),   (5, -86)];
const MIDDLE_PINCH: Finger = [(0, -95),   (-1, -140),  (-2, -166),  (-3, -186)];

const RING_DOWN:    Finger = [(24, -88),  (25, -110),  (24, -93),   (22, -80)];
const PINKY_DOWN:   Finger = [(44, -76),  (46, -94),   (44, -80),   (41, -70)];

/// Switches describing a synthetic hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    /// Wrist position in image pixels.
    pub wrist:  (i32, i32),
    pub index:  bool,
    pub middle: bool,
    /// Bring the index and middle fingertips together (only meaningful when
    /// both are extended).
    pub pinch:  bool,
    /// Extra offset applied to every landmark, e.g. simulated tremor.
    pub jitter: (i32, i32),
}

impl HandPose {
    /// Pose whose index fingertip lands on `tip`.
    pub fn pointing_at(tip: (i32, i32)) -> Self {
        let off = INDEX_UP[3];
        HandPose {
            wrist:  (tip.0 - off.0, tip.1 - off.1),
            index:  true,
            middle: false,
            pinch:  false,
            jitter: (0, 0),
        }
    }

    /// Offset from wrist to index fingertip for the current finger switches.
    pub fn index_tip_offset(&self) -> (i32, i32) {
        self.index_finger()[3]
    }

    fn index_finger(&self) -> Finger {
        match (self.index, self.middle && self.pinch) {
            (false, _)    => INDEX_DOWN,
            (true, false) => INDEX_UP,
            (true, true)  => INDEX_PINCH,
        }
    }

    fn middle_finger(&self) -> Finger {
        match (self.middle, self.index && self.pinch) {
            (false, _)    => MIDDLE_DOWN,
            (true, false) => MIDDLE_UP,
            (true, true)  => MIDDLE_PINCH,
        }
    }

    /// Render the landmarks, clamped into a `width × height` frame.
    pub fn observe(&self, width: u32, height: u32) -> HandObservation {
        let max_x = width.saturating_sub(1) as i32;
        let max_y = height.saturating_sub(1) as i32;
        let wx = self.wrist.0.saturating_add(self.jitter.0);
        let wy = self.wrist.1.saturating_add(self.jitter.1);
        let place = |(dx, dy): (i32, i32)| {
            (wx.saturating_add(dx).clamp(0, max_x), wy.saturating_add(dy).clamp(0, max_y))
        };

        let mut pts = [(0, 0); LANDMARK_COUNT];
        pts[WRIST as usize] = place((0, 0));

        let fingers = [
            (THUMB_CMC,  THUMB),
            (INDEX_MCP,  self.index_finger()),
            (MIDDLE_MCP, self.middle_finger()),
            (RING_MCP,   RING_DOWN),
            (PINKY_MCP,  PINKY_DOWN),
        ];
        for (base, finger) in fingers {
            for (k, &off) in finger.iter().enumerate() {
                pts[base as usize + k] = place(off);
            }
        }

        HandObservation::from_points(pts, 1.0)
    }
}
