//! gesture_trace — print the cursor trajectory for a synthetic index-finger
//! sweep, showing how far the smoothed cursor lags the raw mapping and how
//! long it takes to settle once the finger stops.
//!
//! ```text
//! gesture_trace [--steps N] [--smoothing S] [--hold N]
//! ```

use std::time::{Duration, Instant};

use clap::Parser;
use hand_gesture::config::DEFAULT_SMOOTHING;
use hand_gesture::{
    GestureConfig, GesturePipeline, GestureState, HandPose, RecordingPointer, ScreenSize,
};

const FROM:   (i32, i32) = (100, 100);
const TO:     (i32, i32) = (540, 380);
const SCREEN: (f64, f64) = (1920.0, 1080.0);

#[derive(Parser, Debug)]
#[command(name = "gesture_trace", about = "Print the smoothed cursor path for a synthetic sweep")]
struct Args {
    /// Frames spent moving from the start to the end point
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i32).range(1..=10_000))]
    steps: i32,

    /// Frames to hold still after the sweep
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(0..=100_000))]
    hold: u32,

    /// Smoothing factor (>= 1; 1 disables smoothing)
    #[arg(long, default_value_t = DEFAULT_SMOOTHING)]
    smoothing: f64,
}

fn main() {
    let Args { steps, hold, smoothing } = Args::parse();

    let cfg = GestureConfig { smoothing, ..GestureConfig::default() };
    if let Err(e) = cfg.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Gesture Trace — smoothed cursor sweep           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "  {}x{} frame, margin {}, screen {}x{}, smoothing {}",
        cfg.frame_width, cfg.frame_height, cfg.margin, SCREEN.0, SCREEN.1, cfg.smoothing
    );
    println!("  sweep {:?} → {:?} in {} steps, then hold {} frames", FROM, TO, steps, hold);
    println!();
    println!("  {:>5}  {:>11}  {:>19}  {:>19}  {:>8}", "frame", "tip", "target", "cursor", "lag");

    let pipeline = GesturePipeline::new(&cfg, ScreenSize::new(SCREEN.0, SCREEN.1));
    let mut pointer = RecordingPointer::default();
    let mut state = GestureState::default();
    let t0 = Instant::now();

    let total = steps as u64 + 1 + hold as u64;
    for frame in 0..total {
        let i = frame.min(steps as u64) as i32;
        let tip = (
            FROM.0 + (TO.0 - FROM.0) * i / steps,
            FROM.1 + (TO.1 - FROM.1) * i / steps,
        );
        let hand = HandPose::pointing_at(tip).observe(cfg.frame_width, cfg.frame_height);
        let now = t0 + Duration::from_millis(33 * frame);

        let (next, report) = pipeline.process(state, Some(&hand), now, &mut pointer);
        state = next;

        if let (Some(target), Some(pos)) = (report.target, report.moved_to) {
            let lag = ((target.0 - pos.0).powi(2) + (target.1 - pos.1).powi(2)).sqrt();
            println!(
                "  {:>5}  ({:>4},{:>4})  ({:>8.1},{:>8.1})  ({:>8.1},{:>8.1})  {:>8.2}",
                frame, tip.0, tip.1, target.0, target.1, pos.0, pos.1, lag
            );
        }
    }

    let (x, y) = state.cursor.current;
    let remaining = (SCREEN.0 - x).max(SCREEN.1 - y);
    println!();
    println!(
        "  final cursor ({:.2}, {:.2}); {} more frames to get within 1 px",
        x, y, pipeline.smoother().frames_to_settle(remaining, 1.0)
    );
    println!();
}
