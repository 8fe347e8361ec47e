//! The pointer capability the gesture pipeline drives.

/// Anything that can move the OS cursor and click.
///
/// Coordinates are absolute screen pixels and may fall outside the visible
/// screen; implementations decide what that means for their device.
pub trait PointerSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn click(&mut self);
}

/// A single command as seen by a sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerCommand {
    MoveTo { x: f64, y: f64 },
    Click,
}

/// Sink that remembers every command instead of touching the OS.
#[derive(Clone, Debug, Default)]
pub struct RecordingPointer {
    pub commands: Vec<PointerCommand>,
}

impl RecordingPointer {
    pub fn clicks(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, PointerCommand::Click)).count()
    }

    pub fn moves(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            PointerCommand::MoveTo { x, y } => Some((x, y)),
            PointerCommand::Click           => None,
        })
    }

    pub fn last_move(&self) -> Option<(f64, f64)> {
        self.moves().last()
    }
}

impl PointerSink for RecordingPointer {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PointerCommand::MoveTo { x, y });
    }

    fn click(&mut self) {
        self.commands.push(PointerCommand::Click);
    }
}

impl<P: PointerSink + ?Sized> PointerSink for Box<P> {
    fn move_to(&mut self, x: f64, y: f64) { (**self).move_to(x, y) }
    fn click(&mut self)                   { (**self).click() }
}
