//! Finger-state classification and gesture mode selection.
//!
//! | Index | Middle | Mode |
//! |---|---|---|
//! | down | down | `Idle` |
//! | down | up   | `Idle` |
//! | up   | down | `Move` |
//! | up   | up   | `ClickCandidate` |
//!
//! The mode carries no memory: it is recomputed from each frame's landmarks,
//! so finger flicker shows up as mode flicker.

use serde::{Deserialize, Serialize};

use crate::landmark::{HandObservation, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP};

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Which tracked fingers are extended this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState {
    pub index:  bool,
    pub middle: bool,
}

impl FingerState {
    /// Classify both tracked fingers.
    ///
    /// A finger is extended when its tip sits strictly above (smaller y than)
    /// its proximal joint.  A tie counts as not extended.
    pub fn classify(hand: &HandObservation) -> Self {
        FingerState {
            index:  is_extended(hand, INDEX_TIP,  INDEX_PIP),
            middle: is_extended(hand, MIDDLE_TIP, MIDDLE_PIP),
        }
    }

    /// `[index, middle]`, in that order.
    pub fn as_array(&self) -> [bool; 2] {
        [self.index, self.middle]
    }
}

fn is_extended(hand: &HandObservation, tip: u8, joint: u8) -> bool {
    hand.get(tip).y < hand.get(joint).y
}

// ════════════════════════════════════════════════════════════════════════════
// GestureMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureMode {
    Idle,
    Move,
    ClickCandidate,
}

impl GestureMode {
    pub fn select(fingers: FingerState) -> Self {
        match (fingers.index, fingers.middle) {
            (false, _)    => GestureMode::Idle,
            (true, false) => GestureMode::Move,
            (true, true)  => GestureMode::ClickCandidate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GestureMode::Idle           => "idle",
            GestureMode::Move           => "move",
            GestureMode::ClickCandidate => "click",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::LANDMARK_COUNT;

    fn hand_with(index_tip_y: i32, middle_tip_y: i32) -> HandObservation {
        let mut pts = [(300, 300); LANDMARK_COUNT];
        pts[INDEX_PIP as usize]  = (280, 200);
        pts[INDEX_TIP as usize]  = (280, index_tip_y);
        pts[MIDDLE_PIP as usize] = (320, 200);
        pts[MIDDLE_TIP as usize] = (320, middle_tip_y);
        HandObservation::from_points(pts, 1.0)
    }

    #[test]
    fn tip_one_pixel_above_joint_is_extended() {
        let s = FingerState::classify(&hand_with(199, 199));
        assert!(s.index);
        assert!(s.middle);
    }

    #[test]
    fn tip_one_pixel_below_joint_is_not_extended() {
        let s = FingerState::classify(&hand_with(201, 201));
        assert!(!s.index);
        assert!(!s.middle);
    }

    #[test]
    fn tie_is_not_extended() {
        let s = FingerState::classify(&hand_with(200, 200));
        assert_eq!(s, FingerState { index: false, middle: false });
    }

    #[test]
    fn fingers_classified_independently() {
        let s = FingerState::classify(&hand_with(150, 260));
        assert_eq!(s.as_array(), [true, false]);
    }

    #[test]
    fn mode_table_is_total_with_three_modes() {
        use std::collections::HashSet;
        let cases = [
            ((false, false), GestureMode::Idle),
            ((false, true),  GestureMode::Idle),
            ((true,  false), GestureMode::Move),
            ((true,  true),  GestureMode::ClickCandidate),
        ];
        let mut seen = HashSet::new();
        for ((index, middle), want) in cases {
            let got = GestureMode::select(FingerState { index, middle });
            assert_eq!(got, want, "index={} middle={}", index, middle);
            seen.insert(got);
        }
        assert_eq!(seen.len(), 3);
    }
}
