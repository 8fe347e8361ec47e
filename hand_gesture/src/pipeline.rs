//! Per-frame gesture processing.
//!
//! [`GesturePipeline::process`] takes the state carried over from the last
//! frame plus this frame's observation, drives the pointer, and returns the
//! next state together with a [`FrameReport`] for diagnostics.
//!
//! ```text
//! observation ─► fingers ─► mode ─┬─ Move ──────────► map ─► smooth ─► move_to
//!                                 ├─ ClickCandidate ► pinch ─► cooldown ─► click
//!                                 └─ Idle ──────────► (nothing)
//! ```

use std::time::Instant;

use tracing::{debug, trace};

use crate::click::{ClickDetector, ClickTimer, PinchReading};
use crate::config::GestureConfig;
use crate::fingers::{FingerState, GestureMode};
use crate::landmark::HandObservation;
use crate::mapping::{ActiveRegion, CoordinateMapper, ScreenSize};
use crate::pointer::PointerSink;
use crate::smoothing::{CursorState, PositionSmoother};

// ════════════════════════════════════════════════════════════════════════════
// GestureState — everything that survives from one frame to the next
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    pub cursor: CursorState,
    pub click:  ClickTimer,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReport
// ════════════════════════════════════════════════════════════════════════════

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// `None` when no hand was observed.
    pub mode:       Option<GestureMode>,
    pub fingers:    Option<FingerState>,
    pub index_tip:  Option<(i32, i32)>,
    pub middle_tip: Option<(i32, i32)>,
    /// Unsmoothed screen target (Move mode only).
    pub target:     Option<(f64, f64)>,
    /// Smoothed position sent to the pointer (Move mode only).
    pub moved_to:   Option<(f64, f64)>,
    /// Pinch evaluation (ClickCandidate mode only).
    pub pinch:      Option<PinchReading>,
}

impl FrameReport {
    pub fn clicked(&self) -> bool {
        self.pinch.map_or(false, |p| p.fired)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GesturePipeline
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GesturePipeline {
    mapper:   CoordinateMapper,
    smoother: PositionSmoother,
    clicker:  ClickDetector,
}

impl GesturePipeline {
    /// Assumes `cfg` has passed [`GestureConfig::validate`].
    pub fn new(cfg: &GestureConfig, screen: ScreenSize) -> Self {
        let region = ActiveRegion::inset(cfg.frame_width, cfg.frame_height, cfg.margin);
        GesturePipeline {
            mapper:   CoordinateMapper::new(region, screen),
            smoother: PositionSmoother::new(cfg.smoothing),
            clicker:  ClickDetector::new(cfg.click_distance, cfg.click_cooldown()),
        }
    }

    pub fn mapper(&self)   -> &CoordinateMapper { &self.mapper }
    pub fn smoother(&self) -> &PositionSmoother { &self.smoother }
    pub fn clicker(&self)  -> &ClickDetector    { &self.clicker }

    /// Process one frame.  A missing hand leaves the state untouched.
    pub fn process(
        &self,
        state:       GestureState,
        observation: Option<&HandObservation>,
        now:         Instant,
        pointer:     &mut dyn PointerSink,
    ) -> (GestureState, FrameReport) {
        let hand = match observation {
            Some(h) => h,
            None    => return (state, FrameReport::default()),
        };

        let fingers = FingerState::classify(hand);
        let mode    = GestureMode::select(fingers);
        let index   = hand.index_tip();
        let middle  = hand.middle_tip();

        let mut report = FrameReport {
            mode:       Some(mode),
            fingers:    Some(fingers),
            index_tip:  Some(index),
            middle_tip: Some(middle),
            ..FrameReport::default()
        };
        let mut next = state;

        match mode {
            GestureMode::Idle => {}

            GestureMode::Move => {
                let target = self.mapper.map(index.0, index.1);
                let pos    = self.smoother.smooth(state.cursor.current, target);
                pointer.move_to(pos.0, pos.1);
                trace!(?index, ?target, ?pos, "move");
                next.cursor     = state.cursor.advance(pos);
                report.target   = Some(target);
                report.moved_to = Some(pos);
            }

            GestureMode::ClickCandidate => {
                let (reading, timer) = self.clicker.evaluate(index, middle, state.click, now);
                if reading.fired {
                    pointer.click();
                    debug!(distance = reading.distance, "click");
                }
                next.click   = timer;
                report.pinch = Some(reading);
            }
        }

        (next, report)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::pointer::{PointerCommand, RecordingPointer};
    use crate::pose::HandPose;

    fn pipeline() -> GesturePipeline {
        GesturePipeline::new(&GestureConfig::default(), ScreenSize::new(1920.0, 1080.0))
    }

    fn pointing(tip: (i32, i32)) -> HandObservation {
        HandPose::pointing_at(tip).observe(640, 480)
    }

    fn pinching(tip: (i32, i32), closed: bool) -> HandObservation {
        HandPose { middle: true, pinch: closed, ..HandPose::pointing_at(tip) }.observe(640, 480)
    }

    #[test]
    fn no_hand_leaves_state_and_pointer_alone() {
        let p = pipeline();
        let mut sink = RecordingPointer::default();
        let state = GestureState {
            cursor: CursorState { previous: (1.0, 2.0), current: (3.0, 4.0) },
            click:  ClickTimer::default().fire(Instant::now()),
        };
        let (next, report) = p.process(state, None, Instant::now(), &mut sink);
        assert_eq!(next, state);
        assert_eq!(report, FrameReport::default());
        assert!(sink.commands.is_empty());
    }

    #[test]
    fn move_mode_smooths_from_origin() {
        let p = pipeline();
        let mut sink = RecordingPointer::default();
        let (next, report) = p.process(GestureState::default(), Some(&pointing((320, 240))), Instant::now(), &mut sink);
        assert_eq!(report.mode, Some(GestureMode::Move));
        assert_eq!(report.target, Some((960.0, 540.0)));
        let (x, y) = report.moved_to.unwrap();
        assert!((x - 960.0 / 7.0).abs() < 1e-9);
        assert!((y - 540.0 / 7.0).abs() < 1e-9);
        assert_eq!(next.cursor.current, (x, y));
        assert_eq!(next.cursor.previous, (0.0, 0.0));
        assert_eq!(sink.commands, vec![PointerCommand::MoveTo { x, y }]);
    }

    #[test]
    fn idle_and_click_modes_hold_the_cursor() {
        let p = pipeline();
        let mut sink = RecordingPointer::default();
        let now = Instant::now();
        let (state, _) = p.process(GestureState::default(), Some(&pointing((320, 240))), now, &mut sink);

        let fist = HandPose { index: false, ..HandPose::pointing_at((100, 100)) }.observe(640, 480);
        let (after_idle, r) = p.process(state, Some(&fist), now, &mut sink);
        assert_eq!(r.mode, Some(GestureMode::Idle));
        assert_eq!(after_idle.cursor, state.cursor);

        let (after_click, r) = p.process(after_idle, Some(&pinching((500, 300), false)), now, &mut sink);
        assert_eq!(r.mode, Some(GestureMode::ClickCandidate));
        assert_eq!(after_click.cursor, state.cursor);
        assert_eq!(sink.moves().count(), 1);
        assert_eq!(sink.clicks(), 0);
    }

    #[test]
    fn held_pinch_clicks_once_per_cooldown() {
        let p = pipeline();
        let cooldown = p.clicker().cooldown();
        let mut sink = RecordingPointer::default();
        let mut state = GestureState::default();
        let t0 = Instant::now();
        let hand = pinching((320, 240), true);

        // 30 fps for 0.1 s, all within the 0.15 s cooldown.
        for f in 0..4u64 {
            let (s, _) = p.process(state, Some(&hand), t0 + Duration::from_millis(f * 33), &mut sink);
            state = s;
        }
        assert_eq!(sink.clicks(), 1);

        let (s, r) = p.process(state, Some(&hand), t0 + cooldown, &mut sink);
        assert!(r.clicked());
        state = s;
        assert_eq!(sink.clicks(), 2);

        let (_, r) = p.process(state, Some(&hand), t0 + cooldown + Duration::from_millis(33), &mut sink);
        assert!(!r.clicked());
        assert_eq!(sink.clicks(), 2);
    }

    #[test]
    fn open_fingers_in_click_mode_do_not_click() {
        let p = pipeline();
        let mut sink = RecordingPointer::default();
        let (next, r) = p.process(GestureState::default(), Some(&pinching((320, 240), false)), Instant::now(), &mut sink);
        assert!(!r.pinch.unwrap().pinched);
        assert_eq!(next.click.last_click(), None);
        assert!(sink.commands.is_empty());
    }

    /// Index tip sweeps (100,100) → (540,380) across a 640×480 frame with a
    /// 100 px margin onto 1920×1080, then holds still.
    #[test]
    fn sweep_lags_then_converges() {
        let p = pipeline();
        let mut sink = RecordingPointer::default();
        let mut state = GestureState::default();
        let t0 = Instant::now();
        const STEPS: i32 = 44;

        for i in 0..=STEPS {
            let tip = (100 + 440 * i / STEPS, 100 + 280 * i / STEPS);
            let now = t0 + Duration::from_millis(33 * i as u64);
            let (s, r) = p.process(state, Some(&pointing(tip)), now, &mut sink);
            state = s;
            let target = r.target.unwrap();
            let pos = r.moved_to.unwrap();
            if i > 0 {
                assert!(pos.0 < target.0 && pos.1 < target.1, "frame {} should lag", i);
            }
        }

        let end = (1920.0, 1080.0);
        let lag = end.0 - state.cursor.current.0;
        assert!(lag > 1.0, "still catching up at the end of the sweep");

        let settle = p.smoother().frames_to_settle(lag.max(end.1 - state.cursor.current.1), 0.5);
        for f in 0..settle {
            let now = t0 + Duration::from_millis(33 * (STEPS as u64 + 1 + f as u64));
            let (s, _) = p.process(state, Some(&pointing((540, 380))), now, &mut sink);
            state = s;
        }
        let (x, y) = state.cursor.current;
        assert!(end.0 - x < 0.5 && end.1 - y < 0.5, "settled at ({}, {})", x, y);
        assert!(x <= end.0 && y <= end.1);
        assert_eq!(sink.clicks(), 0);
    }
}
