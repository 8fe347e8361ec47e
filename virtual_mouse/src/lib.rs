//! # virtual_mouse
//!
//! Drives the OS mouse pointer from hand gestures, using the
//! [`hand_gesture`] core, with a live preview window.
//!
//! ## Per-frame flow
//!
//! ```text
//! rig.acquire ─▶ rig.detect ─▶ ConfidenceGate ─▶ GesturePipeline ─▶ PointerSink
//!                                                      │
//!                                                      ▼
//!                                                 Visualizer
//! ```
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a keyboard-driven synthetic hand.
//! * `leap` — **Hardware mode**: hand landmarks from a LeapMotion controller
//!   via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | Arrows / `WASD` | Move the hand (faster with Shift) |
//! | `I` | Raise / lower the index finger |
//! | `M` | Raise / lower the middle finger |
//! | `P` (hold) | Pinch index and middle fingertips together |
//! | `H` | Take the hand out of view / bring it back |
//! | `Q` | Quit |

pub mod app;
pub mod capture;
pub mod error;
#[cfg(feature = "leap")]
pub mod leap;
pub mod pointer;
pub mod sim;
pub mod visualizer;
