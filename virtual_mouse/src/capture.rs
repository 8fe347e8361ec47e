//! Capture and landmark-detection capabilities.
//!
//! The frame loop only ever talks to these traits, so the keyboard
//! simulation and the LeapMotion hardware are interchangeable:
//!
//! * [`FrameSource::acquire`] — block for the next frame; `None` is a
//!   capture failure.
//! * [`LandmarkSource::detect`] — at most one hand per frame.
//!
//! [`ConfidenceGate`] sits between detection and the gesture core and applies
//! the detection / tracking confidence thresholds.

use std::time::Instant;

use hand_gesture::HandObservation;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// One captured image, ARGB pixels row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width:       u32,
    pub height:      u32,
    pub pixels:      Vec<u32>,
    pub captured_at: Instant,
}

impl Frame {
    pub fn blank(width: u32, height: u32, color: u32, captured_at: Instant) -> Self {
        Frame {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
            captured_at,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Capability traits
// ════════════════════════════════════════════════════════════════════════════

pub trait FrameSource {
    fn acquire(&mut self) -> Option<Frame>;
}

pub trait LandmarkSource {
    fn detect(&mut self, frame: &Frame) -> Option<HandObservation>;
}

/// A device that both captures frames and finds the hand in them.
pub trait HandRig: FrameSource + LandmarkSource {
    fn name(&self) -> &str;
}

// ════════════════════════════════════════════════════════════════════════════
// ConfidenceGate
// ════════════════════════════════════════════════════════════════════════════

/// Detection/tracking confidence thresholds.
///
/// A new hand needs `detection` confidence to be picked up; once tracked it
/// is kept while it scores at least `tracking`.  Losing the hand (or a score
/// under the bar) drops back to detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceGate {
    detection: f32,
    tracking:  f32,
    tracking_active: bool,
}

impl ConfidenceGate {
    pub fn new(detection: f32, tracking: f32) -> Self {
        ConfidenceGate {
            detection: detection.clamp(0.0, 1.0),
            tracking:  tracking.clamp(0.0, 1.0),
            tracking_active: false,
        }
    }

    pub fn is_tracking(&self) -> bool { self.tracking_active }

    pub fn admit(&mut self, observation: Option<HandObservation>) -> Option<HandObservation> {
        let bar = if self.tracking_active { self.tracking } else { self.detection };
        let admitted = observation.filter(|hand| hand.score >= bar);

        match (self.tracking_active, admitted.is_some()) {
            (false, true) => debug!(bar, "hand acquired"),
            (true, false) => debug!(bar, "hand lost"),
            _ => {}
        }
        self.tracking_active = admitted.is_some();
        admitted
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::HandPose;

    fn hand(score: f32) -> Option<HandObservation> {
        let mut h = HandPose::pointing_at((320, 240)).observe(640, 480);
        h.score = score;
        Some(h)
    }

    #[test]
    fn detection_bar_applies_until_tracking() {
        let mut gate = ConfidenceGate::new(0.7, 0.4);
        assert!(gate.admit(hand(0.5)).is_none());
        assert!(!gate.is_tracking());
        assert!(gate.admit(hand(0.75)).is_some());
        assert!(gate.is_tracking());
    }

    #[test]
    fn tracking_bar_keeps_hand() {
        let mut gate = ConfidenceGate::new(0.7, 0.4);
        gate.admit(hand(0.9));
        assert!(gate.admit(hand(0.5)).is_some());
        assert!(gate.admit(hand(0.3)).is_none());
        // Lost: back to the detection bar.
        assert!(gate.admit(hand(0.5)).is_none());
    }

    #[test]
    fn missing_hand_ends_tracking() {
        let mut gate = ConfidenceGate::new(0.7, 0.1);
        gate.admit(hand(1.0));
        assert!(gate.admit(None).is_none());
        assert!(!gate.is_tracking());
    }

    #[test]
    fn blank_frame_has_every_pixel() {
        let f = Frame::blank(4, 3, 0xFF000000, Instant::now());
        assert_eq!(f.pixels.len(), 12);
    }
}
