//! # hand_gesture
//!
//! Turns a stream of per-frame hand landmarks into pointer control: a
//! gesture mode, a smoothed cursor position, and debounced clicks.
//!
//! ## Gesture → Action mapping
//!
//! | Index | Middle | Mode | Action |
//! |---|---|---|---|
//! | down | any  | Idle           | nothing; cursor holds |
//! | up   | down | Move           | index tip drives the cursor |
//! | up   | up   | ClickCandidate | pinch the two tips together to click |
//!
//! Everything here is synchronous and free of I/O.  The camera, the landmark
//! model and the OS pointer live outside this crate; the pointer is reached
//! through [`PointerSink`].
//!
//! ```
//! use std::time::Instant;
//! use hand_gesture::{GestureConfig, GesturePipeline, GestureState, HandPose,
//!                    RecordingPointer, ScreenSize};
//!
//! let pipeline = GesturePipeline::new(&GestureConfig::default(), ScreenSize::new(1920.0, 1080.0));
//! let mut pointer = RecordingPointer::default();
//! let hand = HandPose::pointing_at((320, 240)).observe(640, 480);
//!
//! let (state, report) = pipeline.process(GestureState::default(), Some(&hand), Instant::now(), &mut pointer);
//! assert!(report.moved_to.is_some());
//! assert_eq!(state.cursor.current, pointer.last_move().unwrap());
//! ```

pub mod click;
pub mod config;
pub mod error;
pub mod fingers;
pub mod landmark;
pub mod mapping;
pub mod pipeline;
pub mod pointer;
pub mod pose;
pub mod smoothing;

pub use click::{pinch_distance, ClickDetector, ClickTimer, PinchReading};
pub use config::GestureConfig;
pub use error::{ConfigError, ObservationError};
pub use fingers::{FingerState, GestureMode};
pub use landmark::{HandObservation, Landmark};
pub use mapping::{ActiveRegion, CoordinateMapper, ScreenSize};
pub use pipeline::{FrameReport, GesturePipeline, GestureState};
pub use pointer::{PointerCommand, PointerSink, RecordingPointer};
pub use pose::HandPose;
pub use smoothing::{CursorState, PositionSmoother};
