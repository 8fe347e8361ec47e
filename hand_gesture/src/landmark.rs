//! Hand landmarks as delivered by a landmark source.
//!
//! A [`HandObservation`] is exactly 21 keypoints in image pixel space, one per
//! anatomical id.  Ids follow the usual 21-point hand model: 0 is the wrist,
//! then four points per digit from the base outward.

use crate::error::ObservationError;

// ════════════════════════════════════════════════════════════════════════════
// Landmark ids
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      u8 = 0;
pub const THUMB_CMC:  u8 = 1;
pub const THUMB_MCP:  u8 = 2;
pub const THUMB_IP:   u8 = 3;
pub const THUMB_TIP:  u8 = 4;
pub const INDEX_MCP:  u8 = 5;
pub const INDEX_PIP:  u8 = 6;
pub const INDEX_DIP:  u8 = 7;
pub const INDEX_TIP:  u8 = 8;
pub const MIDDLE_MCP: u8 = 9;
pub const MIDDLE_PIP: u8 = 10;
pub const MIDDLE_DIP: u8 = 11;
pub const MIDDLE_TIP: u8 = 12;
pub const RING_MCP:   u8 = 13;
pub const RING_PIP:   u8 = 14;
pub const RING_DIP:   u8 = 15;
pub const RING_TIP:   u8 = 16;
pub const PINKY_MCP:  u8 = 17;
pub const PINKY_PIP:  u8 = 18;
pub const PINKY_DIP:  u8 = 19;
pub const PINKY_TIP:  u8 = 20;

/// Bone connections, used for drawing the skeleton overlay.
pub const HAND_CONNECTIONS: [(u8, u8); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One labelled keypoint in image pixel coordinates (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landmark {
    pub id: u8,
    pub x:  i32,
    pub y:  i32,
}

impl Landmark {
    pub fn new(id: u8, x: i32, y: i32) -> Self {
        Landmark { id, x, y }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// All 21 landmarks of the tracked hand for one frame, stored in id order.
///
/// The only way to build one is through a constructor that checks every id
/// occurs exactly once, so lookups by id never fail.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
    /// Detection score in `[0, 1]` reported by the landmark source.
    pub score: f32,
}

impl HandObservation {
    /// Build from landmarks in any order.
    pub fn from_landmarks<I>(landmarks: I, score: f32) -> Result<Self, ObservationError>
    where
        I: IntoIterator<Item = Landmark>,
    {
        let mut slots: [Option<Landmark>; LANDMARK_COUNT] = [None; LANDMARK_COUNT];
        let mut count = 0usize;

        for lm in landmarks {
            count += 1;
            let slot = slots
                .get_mut(lm.id as usize)
                .ok_or(ObservationError::IdOutOfRange(lm.id))?;
            if slot.is_some() {
                return Err(ObservationError::DuplicateId(lm.id));
            }
            *slot = Some(lm);
        }

        if count != LANDMARK_COUNT {
            return Err(ObservationError::WrongCount(count));
        }

        let mut out = [Landmark::new(0, 0, 0); LANDMARK_COUNT];
        for (id, slot) in slots.iter().enumerate() {
            out[id] = slot.ok_or(ObservationError::MissingId(id as u8))?;
        }

        Ok(HandObservation { landmarks: out, score: score.clamp(0.0, 1.0) })
    }

    /// Build from 21 positions indexed by landmark id.
    pub fn from_points(points: [(i32, i32); LANDMARK_COUNT], score: f32) -> Self {
        let mut landmarks = [Landmark::new(0, 0, 0); LANDMARK_COUNT];
        for (id, &(x, y)) in points.iter().enumerate() {
            landmarks[id] = Landmark::new(id as u8, x, y);
        }
        HandObservation { landmarks, score: score.clamp(0.0, 1.0) }
    }

    /// Landmark by anatomical id.  Panics if `id > 20`; use the id constants.
    pub fn get(&self, id: u8) -> Landmark {
        self.landmarks[id as usize]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn index_tip(&self) -> (i32, i32) {
        self.get(INDEX_TIP).position()
    }

    pub fn middle_tip(&self) -> (i32, i32) {
        self.get(MIDDLE_TIP).position()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
