//! LeapMotion rig (feature `leap`).
//!
//! The controller does its own hand tracking, so "detection" here is a
//! projection: each tracking frame's most confident hand is flattened from
//! the device's millimetre space into the configured image plane and
//! relabelled as the 21 standard landmarks.
//!
//! Projection (device looking up from the desk, user facing the screen):
//!
//! * x ∈ [-`HALF_WIDTH_MM`, +`HALF_WIDTH_MM`] → [0, width)
//! * y ∈ [`FLOOR_MM`, `CEILING_MM`]          → [height, 0) (higher = smaller y)
//!
//! Requires the LeapC shared library installed on the system.

use std::time::Instant;

use hand_gesture::landmark::LANDMARK_COUNT;
use hand_gesture::HandObservation;
use leaprs::*;
use tracing::{debug, info, warn};

use crate::capture::{Frame, FrameSource, HandRig, LandmarkSource};
use crate::error::AppError;

const HALF_WIDTH_MM: f32 = 160.0;
const FLOOR_MM:      f32 = 100.0;
const CEILING_MM:    f32 = 400.0;
/// 100 ms polls without a tracking event before an acquisition counts as
/// failed.
const MAX_IDLE_POLLS: u32 = 50;
const BACKGROUND: u32 = 0xFF101018;

/// Device millimetres → image pixels.
#[derive(Clone, Copy, Debug)]
struct Projection {
    width:  u32,
    height: u32,
    mirror: bool,
}

pub struct LeapRig {
    connection: Connection,
    projection: Projection,
    latest:     Option<HandObservation>,
}

impl LeapRig {
    pub fn open(width: u32, height: u32, mirror: bool) -> Result<Self, AppError> {
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| AppError::Device(format!("LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| AppError::Device(format!("LeapMotion device: {:?}", e)))?;
        info!("LeapMotion connection opened");

        Ok(LeapRig {
            connection,
            projection: Projection { width, height, mirror },
            latest: None,
        })
    }
}

impl Projection {
    fn project(&self, x: f32, y: f32) -> (i32, i32) {
        let w = self.width as f32;
        let h = self.height as f32;
        let mut u = (x + HALF_WIDTH_MM) / (2.0 * HALF_WIDTH_MM);
        if self.mirror {
            u = 1.0 - u;
        }
        let v = 1.0 - (y - FLOOR_MM) / (CEILING_MM - FLOOR_MM);
        (
            ((u * w) as i32).clamp(0, self.width as i32 - 1),
            ((v * h) as i32).clamp(0, self.height as i32 - 1),
        )
    }

    /// Flatten one tracked hand into the 21-landmark layout.
    fn landmarks_of(&self, hand: &Hand) -> Option<HandObservation> {
        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 {
            return None;
        }

        let mut pts = [(0, 0); LANDMARK_COUNT];
        let base = digits[2].metacarpal().prev_joint();
        pts[0] = self.project(base.x, base.y);

        for (d, digit) in digits.iter().take(5).enumerate() {
            let joints = [
                digit.proximal().prev_joint(),
                digit.intermediate().prev_joint(),
                digit.distal().prev_joint(),
                digit.distal().next_joint(),
            ];
            for (k, j) in joints.iter().enumerate() {
                pts[1 + d * 4 + k] = self.project(j.x, j.y);
            }
        }

        Some(HandObservation::from_points(pts, hand.confidence))
    }
}

impl FrameSource for LeapRig {
    fn acquire(&mut self) -> Option<Frame> {
        let projection = self.projection;
        for _ in 0..MAX_IDLE_POLLS {
            let msg = match self.connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    warn!("LeapC poll failed: {:?}", e);
                    return None;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let best = frame
                    .hands()
                    .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
                self.latest = best.and_then(|h| projection.landmarks_of(&h));
                return Some(Frame::blank(
                    projection.width,
                    projection.height,
                    BACKGROUND,
                    Instant::now(),
                ));
            }
        }
        None
    }
}

impl LandmarkSource for LeapRig {
    fn detect(&mut self, _frame: &Frame) -> Option<HandObservation> {
        self.latest.take()
    }
}

impl HandRig for LeapRig {
    fn name(&self) -> &str { "LeapMotion" }
}

impl Drop for LeapRig {
    fn drop(&mut self) {
        debug!("LeapMotion connection released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VGA: Projection = Projection { width: 640, height: 480, mirror: false };

    #[test]
    fn interaction_box_corners_land_on_image_corners() {
        assert_eq!(VGA.project(-HALF_WIDTH_MM, CEILING_MM), (0, 0));
        assert_eq!(VGA.project(HALF_WIDTH_MM, FLOOR_MM), (639, 479));
        assert_eq!(VGA.project(0.0, (FLOOR_MM + CEILING_MM) / 2.0), (320, 240));
    }

    #[test]
    fn higher_hand_is_nearer_the_top() {
        let (_, low)  = VGA.project(0.0, 150.0);
        let (_, high) = VGA.project(0.0, 350.0);
        assert!(high < low);
    }

    #[test]
    fn mirror_flips_horizontally_only() {
        let mirrored = Projection { mirror: true, ..VGA };
        assert_eq!(mirrored.project(-HALF_WIDTH_MM, CEILING_MM), (639, 0));
        assert_eq!(mirrored.project(HALF_WIDTH_MM, FLOOR_MM), (0, 479));
    }

    #[test]
    fn outside_the_box_is_clamped_into_the_image() {
        assert_eq!(VGA.project(-1000.0, 2000.0), (0, 0));
        assert_eq!(VGA.project(1000.0, -50.0), (639, 479));
    }
}
