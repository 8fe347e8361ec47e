//! Keyboard-driven simulated hand, the default rig.
//!
//! The preview window translates key presses into [`SimInput`] events and
//! sends them over a channel; [`SimRig`] drains the channel at the start of
//! every frame and renders the resulting [`HandPose`] as landmarks.  The
//! window loop and the rig never need to know about each other's types
//! beyond this channel.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use hand_gesture::{ConfigError, HandObservation, HandPose};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::{Frame, FrameSource, HandRig, LandmarkSource};

const BACKGROUND: u32 = 0xFF202028;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Move the hand one step; `dx`/`dy` are -1, 0 or 1.
    Move { dx: i32, dy: i32, fast: bool },
    ToggleIndex,
    ToggleMiddle,
    /// Pinch key held (`true`) or released (`false`).
    Pinch(bool),
    /// Take the hand out of view, or bring it back.
    ToggleHand,
}

// ════════════════════════════════════════════════════════════════════════════
// SimConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pixels per frame while an arrow key is held.
    pub step_px:      i32,
    /// Pixels per frame with Shift held.
    pub fast_step_px: i32,
    /// Amplitude (pixels) of a sinusoidal wobble added to every landmark.
    pub tremor_px:    f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig { step_px: 4, fast_step_px: 14, tremor_px: 2.0 }
    }
}

impl SimConfig {
    /// Steps and tremor must fit inside a `width × height` frame.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        let span = width.max(height) as i64;
        for (field, step) in [("sim.step_px", self.step_px), ("sim.fast_step_px", self.fast_step_px)] {
            if step < 0 || step as i64 > span {
                return Err(ConfigError::invalid(field, format!("{} is outside 0..={}", step, span)));
            }
        }
        if !self.tremor_px.is_finite() || self.tremor_px < 0.0 || self.tremor_px > span as f64 {
            return Err(ConfigError::invalid(
                "sim.tremor_px",
                format!("{} is outside 0..={}", self.tremor_px, span),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimRig
// ════════════════════════════════════════════════════════════════════════════

pub struct SimRig {
    rx:      Receiver<SimInput>,
    cfg:     SimConfig,
    width:   u32,
    height:  u32,
    pose:    HandPose,
    visible: bool,
    frames:  u64,
}

impl SimRig {
    /// Starts with a relaxed hand (index curled) in the middle of the frame.
    pub fn new(rx: Receiver<SimInput>, cfg: SimConfig, width: u32, height: u32) -> Self {
        let centre = (width as i32 / 2, height as i32 / 2);
        SimRig {
            rx,
            cfg,
            width,
            height,
            pose: HandPose { index: false, ..HandPose::pointing_at(centre) },
            visible: true,
            frames:  0,
        }
    }

    pub fn pose(&self) -> &HandPose { &self.pose }
    pub fn is_visible(&self) -> bool { self.visible }

    /// Apply one input event.
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Move { dx, dy, fast } => {
                let step = if fast { self.cfg.fast_step_px } else { self.cfg.step_px };
                let (lo, hi) = self.wrist_bounds();
                let w = self.pose.wrist;
                self.pose.wrist.0 = w.0.saturating_add(dx.saturating_mul(step)).clamp(lo.0, hi.0);
                self.pose.wrist.1 = w.1.saturating_add(dy.saturating_mul(step)).clamp(lo.1, hi.1);
            }
            SimInput::ToggleIndex  => {
                self.pose.index = !self.pose.index;
                debug!(index = self.pose.index, "sim: index finger");
            }
            SimInput::ToggleMiddle => {
                self.pose.middle = !self.pose.middle;
                debug!(middle = self.pose.middle, "sim: middle finger");
            }
            SimInput::Pinch(held)  => self.pose.pinch = held,
            SimInput::ToggleHand   => {
                self.visible = !self.visible;
                debug!(visible = self.visible, "sim: hand");
            }
        }
    }

    /// Wrist range that keeps an extended index fingertip inside the frame.
    fn wrist_bounds(&self) -> ((i32, i32), (i32, i32)) {
        let off = HandPose { index: true, ..self.pose }.index_tip_offset();
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        ((-off.0, -off.1), (max_x - off.0, max_y - off.1))
    }

    fn tremor(&self) -> (i32, i32) {
        let t = self.frames as f64;
        let limit = self.width.max(self.height) as f64;
        let a = if self.cfg.tremor_px.is_finite() { self.cfg.tremor_px.clamp(0.0, limit) } else { 0.0 };
        ((a * (t * 0.9).sin()).round() as i32, (a * (t * 1.3).cos()).round() as i32)
    }
}

impl FrameSource for SimRig {
    fn acquire(&mut self) -> Option<Frame> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.frames += 1;
        self.pose.jitter = self.tremor();
        Some(Frame::blank(self.width, self.height, BACKGROUND, Instant::now()))
    }
}

impl LandmarkSource for SimRig {
    fn detect(&mut self, frame: &Frame) -> Option<HandObservation> {
        self.visible.then(|| self.pose.observe(frame.width, frame.height))
    }
}

impl HandRig for SimRig {
    fn name(&self) -> &str { "keyboard simulation" }
}

impl Drop for SimRig {
    fn drop(&mut self) {
        debug!(frames = self.frames, "simulated camera released");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
