use super::grid::Grid;
use super::heading::Heading;
use super::snake::Snake;

/// A position on the game grid.
///
/// Coordinates are signed so that a candidate move can step off the board
/// and still be representable before the bounds check rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring position one cell along `heading`
    pub fn moved_in_heading(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

/// Complete simulation state, owned and passed into the engine's step
/// functions. There are no globals; the engine mutates this in place and is
/// the only writer of both the grid and the snake body.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub score: u32,
    /// Frames observed since the last (re)initialization while unpaused
    pub frames: u32,
}

impl GameState {
    pub fn new(grid: Grid, snake: Snake) -> Self {
        Self {
            grid,
            snake,
            score: 0,
            frames: 0,
        }
    }
}
