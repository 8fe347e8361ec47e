//! Software-rendered preview window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ 30 fps                                       │
//! │      ┌──────── active region ─────────┐      │
//! │      │                                │      │
//! │      │        hand skeleton           │      │
//! │      │        + gesture marker        │      │
//! │      │                                │      │
//! │      └────────────────────────────────┘      │
//! ├──────────────────────────────────────────────┤
//! │ status bar                                   │
//! │ key legend                                   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Drawing goes through [`Canvas`], which owns the pixel buffer and knows
//! nothing about the window, so the overlays can be checked without a
//! display.

use std::sync::mpsc::Sender;
use std::time::Duration;

use hand_gesture::landmark::HAND_CONNECTIONS;
use hand_gesture::{ActiveRegion, FrameReport, GestureMode, HandObservation};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::capture::Frame;
use crate::error::AppError;
use crate::sim::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const STATUS_H:    usize = 40;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const TEXT_BG:         u32   = 0xFF0F3460;
const REGION_COLOR:    u32   = 0xFFFF00FF;  // magenta
const MARKER_COLOR:    u32   = 0xFFFF00FF;
const CLICK_COLOR:     u32   = 0xFF00FF00;  // green
const BONE_COLOR:      u32   = 0xFFCCCCCC;
const JOINT_COLOR:     u32   = 0xFFFF3030;
const FPS_COLOR:       u32   = 0xFF4060FF;
const MARKER_RADIUS:   i32   = 15;
const OUTSIDE_DIM:     f32   = 0.35;

const LEGEND: &str =
    "ARROWS/WASD=move  SHIFT=fast  I=index  M=middle  P=pinch  H=hide hand  Q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

/// ARGB pixel buffer with clipped drawing primitives.
pub struct Canvas {
    buf: Vec<u32>,
    w:   usize,
    h:   usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    /// Copy a captured frame into the top-left corner.
    pub fn blit(&mut self, frame: &Frame) {
        let fw = frame.width as usize;
        let rows = (frame.height as usize).min(self.h);
        let cols = fw.min(self.w);
        for row in 0..rows {
            let src = &frame.pixels[row * fw..row * fw + cols];
            self.buf[row * self.w..row * self.w + cols].copy_from_slice(src);
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col as i32, y as i32, color);
            self.set_pixel(col as i32, (y + h - 1) as i32, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x as i32, row as i32, color);
            self.set_pixel((x + w - 1) as i32, row as i32, color);
        }
    }

    /// Darken everything outside `[x0, x1) × [y0, y1)` within the top
    /// `rows` rows.
    pub fn dim_outside(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, rows: usize) {
        for row in 0..rows.min(self.h) {
            for col in 0..self.w {
                if col >= x0 && col < x1 && row >= y0 && row < y1 { continue; }
                let p = &mut self.buf[row * self.w + col];
                *p = blend(*p, 0xFF000000, OUTSIDE_DIM);
            }
        }
    }

    /// Signed coordinates; anything off-canvas is dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.buf[y as usize * self.w + x as usize] = color;
        }
    }

    /// Bresenham line, `thickness` pixels wide (square pen).
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), thickness: i32, color: u32) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        let r = (thickness.max(1) - 1) / 2;

        loop {
            for oy in -r..=r {
                for ox in -r..=r {
                    self.set_pixel(x + ox, y + oy, color);
                }
            }
            if (x, y) == to { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn fill_circle(&mut self, centre: (i32, i32), r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(centre.0 + dx, centre.1 + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap text, each font pixel drawn as a `scale`×`scale` block.
    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let advance = 4 * scale;
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.w { break; }
            let glyph = char_glyph(ch);
            for row in 0..5 {
                for col in 0..3 {
                    if glyph & (1 << (14 - row * 3 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += advance;
        }
    }

    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_text(text, x, y, 1, color);
    }

    // ── Overlays ──────────────────────────────────────────────────────────

    pub fn draw_region(&mut self, region: &ActiveRegion, frame_h: usize) {
        let x0 = region.left.max(0.0) as usize;
        let y0 = region.top.max(0.0) as usize;
        let x1 = region.right.max(0.0) as usize;
        let y1 = region.bottom.max(0.0) as usize;
        self.dim_outside(x0, y0, x1, y1, frame_h);
        if x1 > x0 && y1 > y0 {
            self.draw_border(x0, y0, x1 - x0, y1 - y0, REGION_COLOR);
            self.draw_border(x0 + 1, y0 + 1, (x1 - x0).saturating_sub(2), (y1 - y0).saturating_sub(2), REGION_COLOR);
        }
    }

    pub fn draw_hand(&mut self, hand: &HandObservation) {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            self.draw_line(hand.get(a).position(), hand.get(b).position(), 1, BONE_COLOR);
        }
        for lm in hand.landmarks() {
            self.fill_circle(lm.position(), 3, JOINT_COLOR);
        }
    }

    /// Mode marker: a filled circle on the index tip while moving; the
    /// pinch segment with a midpoint circle (green once a click fires)
    /// while in click mode.
    pub fn draw_gesture(&mut self, report: &FrameReport) {
        match report.mode {
            Some(GestureMode::Move) => {
                if let Some(tip) = report.index_tip {
                    self.fill_circle(tip, MARKER_RADIUS, MARKER_COLOR);
                }
            }
            Some(GestureMode::ClickCandidate) => {
                if let (Some(a), Some(b)) = (report.index_tip, report.middle_tip) {
                    self.draw_line(a, b, 3, MARKER_COLOR);
                    let mid = ((a.0 + b.0) / 2, (a.1 + b.1) / 2);
                    let color = if report.clicked() { CLICK_COLOR } else { MARKER_COLOR };
                    self.fill_circle(mid, MARKER_RADIUS, color);
                }
            }
            Some(GestureMode::Idle) | None => {}
        }
    }

    /// Everything below the first `frame_h` rows: status line and key legend.
    pub fn draw_status_bar(&mut self, status: &str, frame_h: usize) {
        let (w, h) = (self.w, self.h);
        self.fill_rect(0, frame_h, w, h.saturating_sub(frame_h), TEXT_BG);
        self.draw_label(status, 10, frame_h + 10, 0xFFEEEEEE);
        self.draw_label(LEGEND, 10, h.saturating_sub(12), 0xFF888888);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

/// Where frames are shown and quit requests come from.
pub trait Preview {
    /// False once the user asks to quit or closes the window.
    fn poll_input(&mut self) -> bool;

    /// Show one processed frame.
    fn render(
        &mut self,
        frame:  &Frame,
        hand:   Option<&HandObservation>,
        report: &FrameReport,
        region: &ActiveRegion,
        fps:    Option<f64>,
        status: &str,
    );

    /// Called instead of `render` when no frame arrived.
    fn idle(&mut self, status: &str);
}

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    frame_h:    usize,
    sim_tx:     Sender<SimInput>,
    pinch_held: bool,
}

impl Visualizer {
    /// Window sized to the capture resolution plus the status bar.
    pub fn new(title: &str, frame_w: u32, frame_h: u32, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let w = frame_w as usize;
        let h = frame_h as usize + STATUS_H;
        let mut window = Window::new(
            title,
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(Visualizer {
            window,
            canvas: Canvas::new(w, h),
            frame_h: frame_h as usize,
            sim_tx,
            pinch_held: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

}

impl Preview for Visualizer {
    /// Translate keys into [`SimInput`] events.  Returns false once the
    /// user asks to quit or closes the window.
    fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let down     = |k: Key| self.window.is_key_down(k);
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) {
            return false;
        }

        let shift = down(Key::LeftShift) || down(Key::RightShift);
        let dx = (down(Key::Right) || down(Key::D)) as i32 - (down(Key::Left) || down(Key::A)) as i32;
        let dy = (down(Key::Down) || down(Key::S)) as i32 - (down(Key::Up) || down(Key::W)) as i32;
        let toggles = [
            (one_shot(Key::I), SimInput::ToggleIndex),
            (one_shot(Key::M), SimInput::ToggleMiddle),
            (one_shot(Key::H), SimInput::ToggleHand),
        ];
        let pinch = down(Key::P);

        if dx != 0 || dy != 0 {
            let _ = self.sim_tx.send(SimInput::Move { dx, dy, fast: shift });
        }
        for (pressed, input) in toggles {
            if pressed {
                let _ = self.sim_tx.send(input);
            }
        }
        if pinch != self.pinch_held {
            self.pinch_held = pinch;
            let _ = self.sim_tx.send(SimInput::Pinch(pinch));
        }

        true
    }

    fn render(
        &mut self,
        frame:  &Frame,
        hand:   Option<&HandObservation>,
        report: &FrameReport,
        region: &ActiveRegion,
        fps:    Option<f64>,
        status: &str,
    ) {
        let c = &mut self.canvas;
        c.clear(BG_COLOR);
        c.blit(frame);

        // ── Active region ─────────────────────────────────────────────────
        c.draw_region(region, self.frame_h);

        // ── Hand + gesture marker ─────────────────────────────────────────
        if let Some(hand) = hand {
            c.draw_hand(hand);
        }
        c.draw_gesture(report);

        // ── FPS ───────────────────────────────────────────────────────────
        if let Some(fps) = fps {
            c.draw_text(&format!("{:.0} fps", fps), 20, 50, 3, FPS_COLOR);
        }

        // ── Status bar + key legend ───────────────────────────────────────
        c.draw_status_bar(status, self.frame_h);

        self.window.update_with_buffer(c.pixels(), c.width(), c.height()).ok();
    }

    /// Keep the last picture, refresh the status line, and pump window
    /// events so key state stays current.
    fn idle(&mut self, status: &str) {
        let c = &mut self.canvas;
        c.draw_status_bar(status, self.frame_h);
        self.window.update_with_buffer(c.pixels(), c.width(), c.height()).ok();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font, rows packed top to bottom, 3 bits per row
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> u16 {
    match c {
        '0' => 0x7B6F,
        '1' => 0x2C97,
        '2' => 0x73E7,
        '3' => 0x73CF,
        '4' => 0x5BC9,
        '5' => 0x79CF,
        '6' => 0x79EF,
        '7' => 0x7249,
        '8' => 0x7BEF,
        '9' => 0x7BCF,
        'a' | 'A' => 0x7BED,
        'b' | 'B' => 0x6BAE,
        'c' | 'C' => 0x7927,
        'd' | 'D' => 0x6B6E,
        'e' | 'E' => 0x79E7,
        'f' | 'F' => 0x79E4,
        'g' | 'G' => 0x796F,
        'h' | 'H' => 0x5BED,
        'i' | 'I' => 0x7497,
        'j' | 'J' => 0x126F,
        'k' | 'K' => 0x5BAD,
        'l' | 'L' => 0x4927,
        'm' | 'M' => 0x5F6D,
        'n' | 'N' => 0x7B6D,
        'o' | 'O' => 0x7B6F,
        'p' | 'P' => 0x7BE4,
        'q' | 'Q' => 0x7B79,
        'r' | 'R' => 0x6BAD,
        's' | 'S' => 0x79CF,
        't' | 'T' => 0x7492,
        'u' | 'U' => 0x5B6F,
        'v' | 'V' => 0x5B52,
        'w' | 'W' => 0x5B7D,
        'x' | 'X' => 0x5AAD,
        'y' | 'Y' => 0x5BD2,
        'z' | 'Z' => 0x72A7,
        ' ' => 0x0000,
        '#' => 0x5F7D,
        '%' => 0x52A5,
        '(' => 0x2922,
        ')' => 0x224A,
        '+' => 0x05D0,
        ',' => 0x0014,
        '-' => 0x01C0,
        '.' => 0x0002,
        '/' => 0x12A4,
        ':' => 0x0410,
        '<' => 0x1511,
        '=' => 0x0E38,
        '>' => 0x4454,
        '|' => 0x2492,
        _   => 0x0080,
    }
}

/// Mix two ARGB colors; `t` = 0 keeps `a`, `t` = 1 gives `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca + (cb - ca) * t).round() as u32) << shift
    };
    0xFF000000 | mix(16) | mix(8) | mix(0)
}
