use std::collections::VecDeque;

use super::heading::Heading;
use super::state::Position;

/// The snake: an ordered body queue plus travel heading and pause state.
///
/// The front of the queue is the head (most recently added segment), the
/// back is the tail (oldest, next to be removed). The queue is non-empty at
/// all times during play, and no two segments share a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Heading,
    paused: bool,
    pause_key_was_down: bool,
}

impl Snake {
    /// Create a snake with a single segment at `pos`, travelling `heading`,
    /// paused, with the pause-key latch cleared. This is the only way to
    /// produce a valid starting state.
    pub fn new(heading: Heading, pos: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(pos);
        Self {
            body,
            heading,
            paused: true,
            pause_key_was_down: false,
        }
    }

    /// The head position (most recently added segment)
    pub fn head(&self) -> Position {
        *self.body.front().expect("snake body is never empty")
    }

    /// Body segments from head to tail
    pub fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// Prepend a new head segment. Growth is an insert without a matching
    /// tail removal.
    pub fn insert_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    /// Remove and return the tail segment (oldest).
    ///
    /// Precondition: the body has more than one segment. The caller checks
    /// this; removing the only segment would break the non-empty invariant.
    pub fn remove_tail(&mut self) -> Position {
        self.body.pop_back().expect("snake body is never empty")
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Edge-triggered pause toggle, fed the current pause-key state once per
    /// frame. Toggles only on the released-to-pressed transition against the
    /// previous frame's value, then unconditionally stores the new value, so
    /// a held key flips the pause state exactly once.
    pub fn update_pause_from_input(&mut self, key_down: bool) {
        if key_down && !self.pause_key_was_down {
            self.toggle_pause();
        }
        self.pause_key_was_down = key_down;
    }
}
