use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Rendered frames per simulation advance. The update step runs every
    /// frame but the snake only moves when the frame counter reaches a
    /// multiple of this, decoupling game speed from display refresh rate.
    pub frames_per_tick: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 26,
            grid_height: 26,
            frames_per_tick: 5,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }
}
