//! OS pointer backends.
//!
//! `enigo` injects real moves and clicks; when it cannot be opened (or the
//! user asked for a dry run) a logging sink takes its place so the rest of
//! the app runs unchanged.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use hand_gesture::{PointerSink, ScreenSize};
use tracing::{debug, info, warn};

// ── enigo backend ─────────────────────────────────────────────────────────

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn open() -> Result<Self, String> {
        Enigo::new(&Settings::default())
            .map(|enigo| EnigoPointer { enigo })
            .map_err(|e| format!("{:?}", e))
    }

    /// Size of the main display, if the backend can report it.
    pub fn screen_size(&self) -> Option<ScreenSize> {
        match self.enigo.main_display() {
            Ok((w, h)) if w > 0 && h > 0 => Some(ScreenSize::new(w as f64, h as f64)),
            Ok((w, h)) => {
                warn!("[pointer] display reported as {}x{}", w, h);
                None
            }
            Err(e) => {
                warn!("[pointer] cannot query display size: {:?}", e);
                None
            }
        }
    }
}

impl PointerSink for EnigoPointer {
    fn move_to(&mut self, x: f64, y: f64) {
        if let Err(e) = self.enigo.move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs) {
            warn!("[pointer] move failed: {:?}", e);
        }
    }

    fn click(&mut self) {
        if let Err(e) = self.enigo.button(Button::Left, Direction::Click) {
            warn!("[pointer] click failed: {:?}", e);
        }
    }
}

// ── logging backend (dry run / no injector available) ─────────────────────

#[derive(Debug, Default)]
pub struct LogPointer {
    pub last:   Option<(f64, f64)>,
    pub clicks: u64,
}

impl PointerSink for LogPointer {
    fn move_to(&mut self, x: f64, y: f64) {
        debug!("[pointer] move_to ({:.1}, {:.1})", x, y);
        self.last = Some((x, y));
    }

    fn click(&mut self) {
        self.clicks += 1;
        info!("[pointer] click #{} at {:?}", self.clicks, self.last);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_pointer — pick a backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the OS pointer, falling back to [`LogPointer`] on failure.
/// Also returns the display size when the backend knows it.
pub fn open_pointer(dry_run: bool) -> (Box<dyn PointerSink>, Option<ScreenSize>) {
    if dry_run {
        info!("[pointer] dry run, pointer actions are only logged");
        return (Box::new(LogPointer::default()), None);
    }

    match EnigoPointer::open() {
        Ok(p) => {
            let screen = p.screen_size();
            info!("[pointer] OS pointer ready, display {:?}", screen);
            (Box::new(p), screen)
        }
        Err(e) => {
            warn!("[pointer] cannot open OS pointer ({}), logging actions instead", e);
            (Box::new(LogPointer::default()), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_never_touches_the_os() {
        let (mut p, screen) = open_pointer(true);
        assert!(screen.is_none());
        p.move_to(10.0, 20.0);
        p.click();
    }

    #[test]
    fn log_pointer_tracks_last_move_and_clicks() {
        let mut p = LogPointer::default();
        p.move_to(-5.0, 2000.0);
        p.click();
        p.click();
        assert_eq!(p.last, Some((-5.0, 2000.0)));
        assert_eq!(p.clicks, 2);
    }
}
