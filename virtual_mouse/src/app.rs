//! Top-level application: configuration, the per-frame step and the run loop.
//!
//! [`App`] owns everything that survives between frames (gesture state,
//! confidence gate, FPS clock, counters) and is driven one frame at a time
//! by [`App::step`], which is what the tests exercise.  [`run`] wires an
//! `App` to the preview window, a hand rig and the OS pointer.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use hand_gesture::{
    ActiveRegion, ConfigError, FrameReport, GestureConfig, GestureMode, GesturePipeline,
    GestureState, HandObservation, PointerSink, ScreenSize,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capture::{ConfidenceGate, Frame, HandRig};
use crate::error::AppError;
use crate::pointer::open_pointer;
use crate::sim::{SimConfig, SimInput};
use crate::visualizer::{Preview, Visualizer};

pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.7;
pub const DEFAULT_TRACKING_CONFIDENCE:  f32 = 0.7;
pub const DEFAULT_MAX_CAPTURE_FAILURES: u32 = 30;
/// Used when neither the config nor the pointer backend knows the display.
pub const FALLBACK_SCREEN: ScreenSize = ScreenSize { width: 1920.0, height: 1080.0 };

const WINDOW_TITLE: &str = "Virtual Mouse";

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture:              GestureConfig,
    pub detection_confidence: f32,
    pub tracking_confidence:  f32,
    /// Overrides the size reported by the pointer backend.
    pub screen:               Option<ScreenSize>,
    /// Consecutive failed acquisitions before giving up.
    pub max_capture_failures: u32,
    /// Mirror the LeapMotion projection horizontally.
    pub mirror:               bool,
    pub sim:                  SimConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            gesture:              GestureConfig::default(),
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            tracking_confidence:  DEFAULT_TRACKING_CONFIDENCE,
            screen:               None,
            max_capture_failures: DEFAULT_MAX_CAPTURE_FAILURES,
            mirror:               false,
            sim:                  SimConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let cfg: AppConfig =
            serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;

        for (field, value) in [
            ("detection_confidence", self.detection_confidence),
            ("tracking_confidence",  self.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{} is outside [0, 1]", value)));
            }
        }

        if let Some(screen) = self.screen {
            if !(screen.width > 0.0 && screen.height > 0.0) {
                return Err(ConfigError::invalid(
                    "screen",
                    format!("{}x{} is not a usable display size", screen.width, screen.height),
                ));
            }
        }

        if self.max_capture_failures == 0 {
            return Err(ConfigError::invalid("max_capture_failures", "must be at least 1"));
        }
        self.sim.validate(self.gesture.frame_width, self.gesture.frame_height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FpsCounter / SessionStats
// ════════════════════════════════════════════════════════════════════════════

/// Instantaneous frame rate from consecutive frame timestamps.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsCounter {
    last: Option<Instant>,
}

impl FpsCounter {
    /// `None` on the first frame and whenever the clock did not advance.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let fps = self.last.and_then(|prev| {
            let dt = now.checked_duration_since(prev)?.as_secs_f64();
            (dt > 0.0).then(|| 1.0 / dt)
        });
        self.last = Some(now);
        fps
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames:           u64,
    pub hand_frames:      u64,
    pub moves:            u64,
    pub clicks:           u64,
    pub capture_failures: u64,
}

impl SessionStats {
    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.mode.is_some()     { self.hand_frames += 1; }
        if report.moved_to.is_some() { self.moves += 1; }
        if report.clicked()          { self.clicks += 1; }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App — one frame at a time
// ════════════════════════════════════════════════════════════════════════════

/// Everything produced by one successful frame.
#[derive(Clone, Debug)]
pub struct Tick {
    pub frame:  Frame,
    pub hand:   Option<HandObservation>,
    pub report: FrameReport,
    pub fps:    Option<f64>,
}

pub struct App {
    pipeline:  GesturePipeline,
    gate:      ConfidenceGate,
    state:     GestureState,
    fps:       FpsCounter,
    stats:     SessionStats,
    last_mode: Option<GestureMode>,
    failures:  u32,
    max_failures: u32,
}

impl App {
    pub fn new(cfg: &AppConfig, screen: ScreenSize) -> Self {
        App {
            pipeline:  GesturePipeline::new(&cfg.gesture, screen),
            gate:      ConfidenceGate::new(cfg.detection_confidence, cfg.tracking_confidence),
            state:     GestureState::default(),
            fps:       FpsCounter::default(),
            stats:     SessionStats::default(),
            last_mode: None,
            failures:  0,
            max_failures: cfg.max_capture_failures.max(1),
        }
    }

    pub fn pipeline(&self) -> &GesturePipeline { &self.pipeline }
    pub fn state(&self)    -> GestureState     { self.state }
    pub fn stats(&self)    -> SessionStats     { self.stats }

    /// Acquire, detect, gate and process one frame.
    ///
    /// `Ok(None)` is a skipped frame (capture failed, counter below the
    /// limit); the counter resets on the next good frame.
    pub fn step(
        &mut self,
        rig:     &mut dyn HandRig,
        pointer: &mut dyn PointerSink,
    ) -> Result<Option<Tick>, AppError> {
        let frame = match rig.acquire() {
            Some(f) => f,
            None => {
                self.failures += 1;
                self.stats.capture_failures += 1;
                warn!(consecutive = self.failures, "{}: frame capture failed", rig.name());
                if self.failures >= self.max_failures {
                    return Err(AppError::CaptureLost { failures: self.failures });
                }
                return Ok(None);
            }
        };
        self.failures = 0;

        let hand = self.gate.admit(rig.detect(&frame));
        let (state, report) = self.pipeline.process(self.state, hand.as_ref(), frame.captured_at, pointer);
        self.state = state;
        self.stats.record(&report);

        if report.mode != self.last_mode {
            debug!(from = ?self.last_mode, to = ?report.mode, "gesture mode");
            self.last_mode = report.mode;
        }

        let fps = self.fps.tick(frame.captured_at);
        Ok(Some(Tick { frame, hand, report, fps }))
    }

    /// One-line status for the preview window.
    pub fn status(&self, report: &FrameReport) -> String {
        let mode = report.mode.map_or("no hand", |m| m.label());
        let (cx, cy) = self.state.cursor.current;
        let mut line = format!("{}  cursor {:.0},{:.0}", mode, cx, cy);
        if let Some(p) = report.pinch {
            line.push_str(&format!("  pinch {:.0}/{:.0}", p.distance, self.pipeline.clicker().threshold()));
        }
        line.push_str(&format!("  clicks {}", self.stats.clicks));
        line
    }

    /// Status while frames are failing to arrive.
    pub fn capture_status(&self) -> String {
        format!("no frame  ({} of {} failed captures)", self.failures, self.max_failures)
    }
}

/// Step frames into `preview` until it asks to quit or capture is lost.
///
/// Skipped frames still go through [`Preview::idle`] so the window keeps
/// pumping its events and `q` stays live during a failure streak.
pub fn drive(
    app:     &mut App,
    rig:     &mut dyn HandRig,
    pointer: &mut dyn PointerSink,
    preview: &mut dyn Preview,
    region:  &ActiveRegion,
) -> Result<(), AppError> {
    while preview.poll_input() {
        match app.step(rig, pointer)? {
            Some(tick) => {
                let status = app.status(&tick.report);
                preview.render(&tick.frame, tick.hand.as_ref(), &tick.report, region, tick.fps, &status);
            }
            None => preview.idle(&app.capture_status()),
        }
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn open_rig(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn HandRig>, AppError> {
    use crate::sim::SimRig;
    let g = &cfg.gesture;
    Ok(Box::new(SimRig::new(sim_rx, cfg.sim.clone(), g.frame_width, g.frame_height)))
}

#[cfg(feature = "leap")]
fn open_rig(cfg: &AppConfig, _sim_rx: Receiver<SimInput>) -> Result<Box<dyn HandRig>, AppError> {
    use crate::leap::LeapRig;
    let g = &cfg.gesture;
    Ok(Box::new(LeapRig::open(g.frame_width, g.frame_height, cfg.mirror)?))
}

/// Run the application until `q`, window close, or capture loss.
///
/// The window, rig and pointer are owned by this function and released when
/// it returns, on every path.
pub fn run(cfg: AppConfig, dry_run: bool) -> Result<SessionStats, AppError> {
    cfg.validate()?;
    let g = &cfg.gesture;

    // ── Sim input channel (window → rig) ──────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut vis = Visualizer::new(WINDOW_TITLE, g.frame_width, g.frame_height, sim_tx)?;
    let mut rig = open_rig(&cfg, sim_rx)?;

    // ── Pointer + screen size ─────────────────────────────────────────────
    let (mut pointer, reported) = open_pointer(dry_run);
    let screen = cfg.screen.or(reported).unwrap_or(FALLBACK_SCREEN);

    let mut app = App::new(&cfg, screen);
    let region = app.pipeline().mapper().region();
    info!(
        rig = rig.name(),
        screen = %format!("{}x{}", screen.width, screen.height),
        ?region,
        "virtual mouse running, press 'q' to exit"
    );

    // ── Main loop ─────────────────────────────────────────────────────────
    let started = Instant::now();
    let outcome = drive(&mut app, rig.as_mut(), pointer.as_mut(), &mut vis, &region);

    let stats = app.stats();
    info!(
        frames = stats.frames,
        hand_frames = stats.hand_frames,
        moves = stats.moves,
        clicks = stats.clicks,
        capture_failures = stats.capture_failures,
        elapsed_s = started.elapsed().as_secs_f64(),
        "session finished"
    );
    outcome.map(|()| stats)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{FrameSource, LandmarkSource};
    use crate::sim::SimRig;
    use hand_gesture::{HandPose, RecordingPointer};
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    fn sim_app() -> (Sender<SimInput>, SimRig, App) {
        let cfg = AppConfig {
            sim: SimConfig { tremor_px: 0.0, ..SimConfig::default() },
            ..AppConfig::default()
        };
        let (tx, rx) = mpsc::channel();
        let rig = SimRig::new(rx, cfg.sim.clone(), 640, 480);
        (tx, rig, App::new(&cfg, FALLBACK_SCREEN))
    }

    /// Rig replaying a fixed script of frames; `None` entries fail capture.
    struct ScriptedRig {
        script: Vec<Option<Option<HandObservation>>>,
        clock:  Instant,
        next:   Option<HandObservation>,
    }

    impl ScriptedRig {
        fn new(mut script: Vec<Option<Option<HandObservation>>>) -> Self {
            script.reverse();
            ScriptedRig { script, clock: Instant::now(), next: None }
        }
    }

    impl FrameSource for ScriptedRig {
        fn acquire(&mut self) -> Option<Frame> {
            let hand = self.script.pop().flatten()?;
            self.next = hand;
            self.clock += Duration::from_millis(20);
            Some(Frame::blank(640, 480, 0, self.clock))
        }
    }

    impl LandmarkSource for ScriptedRig {
        fn detect(&mut self, _frame: &Frame) -> Option<HandObservation> { self.next.take() }
    }

    impl HandRig for ScriptedRig {
        fn name(&self) -> &str { "scripted" }
    }

    #[test]
    fn idle_sim_hand_leaves_pointer_alone() {
        let (_tx, mut rig, mut app) = sim_app();
        let mut pointer = RecordingPointer::default();
        let tick = app.step(&mut rig, &mut pointer).unwrap().unwrap();
        assert_eq!(tick.report.mode, Some(GestureMode::Idle));
        assert!(pointer.commands.is_empty());
    }

    #[test]
    fn raising_index_moves_pointer() {
        let (tx, mut rig, mut app) = sim_app();
        let mut pointer = RecordingPointer::default();
        tx.send(SimInput::ToggleIndex).unwrap();
        for _ in 0..3 {
            app.step(&mut rig, &mut pointer).unwrap();
        }
        assert_eq!(pointer.moves().count(), 3);
        assert_eq!(app.stats().moves, 3);
    }

    #[test]
    fn held_pinch_clicks_once_per_cooldown() {
        let pinched = HandPose { middle: true, pinch: true, ..HandPose::pointing_at((320, 240)) }
            .observe(640, 480);
        // Frames 20 ms apart: the click on frame 1 holds off frames 2..=8.
        let mut rig = ScriptedRig::new(vec![Some(Some(pinched)); 9]);
        let mut app = App::new(&AppConfig::default(), FALLBACK_SCREEN);
        let mut pointer = RecordingPointer::default();

        for _ in 0..7 {
            app.step(&mut rig, &mut pointer).unwrap();
        }
        assert_eq!(pointer.clicks(), 1);

        app.step(&mut rig, &mut pointer).unwrap();
        assert_eq!(pointer.clicks(), 1);
        app.step(&mut rig, &mut pointer).unwrap();
        assert_eq!(pointer.clicks(), 2);
        assert_eq!(app.stats().clicks, 2);
    }

    #[test]
    fn hidden_hand_counts_frame_but_not_hand_frame() {
        let (tx, mut rig, mut app) = sim_app();
        let mut pointer = RecordingPointer::default();
        tx.send(SimInput::ToggleHand).unwrap();
        let tick = app.step(&mut rig, &mut pointer).unwrap().unwrap();
        assert!(tick.hand.is_none());
        assert_eq!(tick.report.mode, None);
        assert_eq!(app.stats(), SessionStats { frames: 1, ..SessionStats::default() });
    }

    #[test]
    fn low_confidence_hand_is_ignored() {
        let mut weak = HandPose::pointing_at((320, 240)).observe(640, 480);
        weak.score = 0.2;
        let mut rig = ScriptedRig::new(vec![Some(Some(weak))]);
        let mut app = App::new(&AppConfig::default(), FALLBACK_SCREEN);
        let mut pointer = RecordingPointer::default();
        let tick = app.step(&mut rig, &mut pointer).unwrap().unwrap();
        assert!(tick.hand.is_none());
        assert!(pointer.commands.is_empty());
    }

    #[test]
    fn capture_failures_skip_then_give_up() {
        let cfg = AppConfig { max_capture_failures: 3, ..AppConfig::default() };
        let mut app = App::new(&cfg, FALLBACK_SCREEN);
        let mut pointer = RecordingPointer::default();
        let mut rig = ScriptedRig::new(vec![None, None, Some(None), None, None, None]);

        assert!(app.step(&mut rig, &mut pointer).unwrap().is_none());
        assert!(app.step(&mut rig, &mut pointer).unwrap().is_none());
        // A good frame resets the consecutive count.
        assert!(app.step(&mut rig, &mut pointer).unwrap().is_some());
        assert!(app.step(&mut rig, &mut pointer).unwrap().is_none());
        assert!(app.step(&mut rig, &mut pointer).unwrap().is_none());
        match app.step(&mut rig, &mut pointer) {
            Err(AppError::CaptureLost { failures }) => assert_eq!(failures, 3),
            other => panic!("expected CaptureLost, got {:?}", other.map(|t| t.is_some())),
        }
        assert_eq!(app.stats().capture_failures, 5);
    }

    #[test]
    fn fps_needs_two_advancing_timestamps() {
        let mut fps = FpsCounter::default();
        let t0 = Instant::now();
        assert_eq!(fps.tick(t0), None);
        assert_eq!(fps.tick(t0), None);
        let reading = fps.tick(t0 + Duration::from_millis(40)).unwrap();
        assert!((reading - 25.0).abs() < 1e-6);
    }

    #[test]
    fn fps_ignores_clock_going_backwards() {
        let mut fps = FpsCounter::default();
        let t0 = Instant::now() + Duration::from_secs(1);
        fps.tick(t0);
        assert_eq!(fps.tick(t0 - Duration::from_millis(10)), None);
    }

    #[test]
    fn status_line_names_mode_and_pinch() {
        let (tx, mut rig, mut app) = sim_app();
        let mut pointer = RecordingPointer::default();
        tx.send(SimInput::ToggleIndex).unwrap();
        tx.send(SimInput::ToggleMiddle).unwrap();
        let tick = app.step(&mut rig, &mut pointer).unwrap().unwrap();
        let status = app.status(&tick.report);
        assert!(status.starts_with(GestureMode::ClickCandidate.label()));
        assert!(status.contains("pinch"));
    }

    #[test]
    fn config_round_trips_through_json_file() {
        let path = std::env::temp_dir().join(format!("virtual_mouse_cfg_{}.json", std::process::id()));
        let cfg = AppConfig {
            screen: Some(ScreenSize::new(2560.0, 1440.0)),
            mirror: true,
            ..AppConfig::default()
        };
        cfg.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{ "gesture": { "smoothing": 3.0 } }"#).unwrap();
        assert_eq!(cfg.gesture.smoothing, 3.0);
        assert_eq!(cfg.gesture.margin, GestureConfig::default().margin);
        assert_eq!(cfg.max_capture_failures, DEFAULT_MAX_CAPTURE_FAILURES);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("virtual_mouse_bad_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse(_)));
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert!(source.is_some_and(|s| s.contains("line 1")), "json error position is kept");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            AppConfig { detection_confidence: 1.5, ..AppConfig::default() },
            AppConfig { tracking_confidence: -0.1, ..AppConfig::default() },
            AppConfig { screen: Some(ScreenSize::new(0.0, 1080.0)), ..AppConfig::default() },
            AppConfig { max_capture_failures: 0, ..AppConfig::default() },
            AppConfig { sim: SimConfig { tremor_px: 1e12, ..SimConfig::default() }, ..AppConfig::default() },
            AppConfig { sim: SimConfig { step_px: i32::MAX, ..SimConfig::default() }, ..AppConfig::default() },
            AppConfig {
                gesture: GestureConfig { smoothing: 0.5, ..GestureConfig::default() },
                ..AppConfig::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{:?} should be rejected", cfg);
        }
        assert!(AppConfig::default().validate().is_ok());
    }

    /// Preview that quits after a fixed number of polls.
    #[derive(Default)]
    struct CountingPreview {
        polls_left: usize,
        renders:    usize,
        idles:      Vec<String>,
    }

    impl Preview for CountingPreview {
        fn poll_input(&mut self) -> bool {
            let open = self.polls_left > 0;
            self.polls_left = self.polls_left.saturating_sub(1);
            open
        }

        fn render(
            &mut self,
            _frame:  &Frame,
            _hand:   Option<&HandObservation>,
            _report: &FrameReport,
            _region: &ActiveRegion,
            _fps:    Option<f64>,
            _status: &str,
        ) {
            self.renders += 1;
        }

        fn idle(&mut self, status: &str) {
            self.idles.push(status.to_string());
        }
    }

    #[test]
    fn quit_is_honoured_during_capture_failures() {
        let mut app = App::new(&AppConfig::default(), FALLBACK_SCREEN);
        let region = app.pipeline().mapper().region();
        let mut rig = ScriptedRig::new(vec![None; 10]);
        let mut pointer = RecordingPointer::default();
        let mut preview = CountingPreview { polls_left: 3, ..CountingPreview::default() };

        let outcome = drive(&mut app, &mut rig, &mut pointer, &mut preview, &region);
        assert!(outcome.is_ok());
        assert_eq!(preview.renders, 0);
        assert_eq!(preview.idles.len(), 3);
        assert!(preview.idles[2].contains("3 of 30"));
        assert_eq!(app.stats().capture_failures, 3);
    }

    #[test]
    fn drive_renders_good_frames_and_stops_on_capture_loss() {
        let cfg = AppConfig { max_capture_failures: 2, ..AppConfig::default() };
        let mut app = App::new(&cfg, FALLBACK_SCREEN);
        let region = app.pipeline().mapper().region();
        let hand = HandPose::pointing_at((320, 240)).observe(640, 480);
        let mut rig = ScriptedRig::new(vec![Some(Some(hand)), Some(None), None, None]);
        let mut pointer = RecordingPointer::default();
        let mut preview = CountingPreview { polls_left: 100, ..CountingPreview::default() };

        let outcome = drive(&mut app, &mut rig, &mut pointer, &mut preview, &region);
        assert!(matches!(outcome, Err(AppError::CaptureLost { failures: 2 })));
        assert_eq!(preview.renders, 2);
        assert_eq!(preview.idles.len(), 1);
        assert_eq!(pointer.moves().count(), 1);
    }
}
