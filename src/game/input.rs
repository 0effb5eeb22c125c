use super::heading::Heading;

/// Current key-held state, sampled by the engine once per frame.
///
/// This is a snapshot, not an event queue: the environment flips these
/// booleans on press/release, and only the value at sampling time matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub pause: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the directional key for the given heading is currently held
    pub fn is_held(&self, heading: Heading) -> bool {
        match heading {
            Heading::Left => self.left,
            Heading::Right => self.right,
            Heading::Up => self.up,
            Heading::Down => self.down,
        }
    }

    pub fn set_held(&mut self, heading: Heading, held: bool) {
        match heading {
            Heading::Left => self.left = held,
            Heading::Right => self.right = held,
            Heading::Up => self.up = held,
            Heading::Down => self.down = held,
        }
    }
}
