use rand::seq::SliceRandom;
use tracing::debug;

use super::config::GameConfig;
use super::grid::{Cell, Grid};
use super::heading::Heading;
use super::input::InputSnapshot;
use super::snake::Snake;
use super::state::{GameState, Position};

/// What happened when one rendered frame was fed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Simulation is paused; no state changed
    Paused,
    /// Unpaused frame that has not yet reached the simulation cadence
    Waiting,
    /// One simulation advance ran
    Advanced { ate_fruit: bool },
    /// The move was illegal (left the board or hit the body); the state was
    /// reinitialized in place
    Restarted { final_score: u32 },
}

/// The game engine: drives the fixed-cadence simulation over an owned
/// [`GameState`] and owns restart-on-loss.
///
/// The engine is the only writer of the grid and the snake body, so the two
/// views of the snake's position stay in lockstep across every mutation.
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the fixed initial configuration: an empty board, a length-1
    /// snake at the center heading left, one fruit on a random empty cell,
    /// score 0, paused until the first pause-key press.
    pub fn reset(&mut self) -> GameState {
        let mut grid = Grid::new(self.config.grid_width, self.config.grid_height);
        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );

        let snake = Snake::new(Heading::Left, center);
        grid.set(center, Cell::SnakeBody);

        let mut state = GameState::new(grid, snake);
        self.spawn_fruit(&mut state);
        state
    }

    /// Feed one rendered frame to the simulation.
    ///
    /// Pause input is sampled every frame so the edge detector compares
    /// consecutive frames; the snake itself only moves when the frame
    /// counter reaches a multiple of the configured cadence.
    pub fn frame(&mut self, state: &mut GameState, input: &InputSnapshot) -> FrameOutcome {
        state.snake.update_pause_from_input(input.pause);
        if state.snake.is_paused() {
            return FrameOutcome::Paused;
        }

        state.frames += 1;
        if state.frames % self.config.frames_per_tick != 0 {
            return FrameOutcome::Waiting;
        }

        self.advance(state, input)
    }

    /// One simulation advance: resolve the heading, validate the move,
    /// then eat-and-grow or shift forward.
    fn advance(&mut self, state: &mut GameState, input: &InputSnapshot) -> FrameOutcome {
        self.resolve_heading(state, input);

        let candidate = state.snake.head().moved_in_heading(state.snake.heading());

        // Loss condition: off the board or onto the body. Not an error,
        // just a silent transition back to the initial state.
        if !state.grid.contains(candidate) || state.grid.get(candidate) == Cell::SnakeBody {
            let final_score = state.score;
            debug!(final_score, ?candidate, "illegal move, reinitializing");
            *state = self.reset();
            return FrameOutcome::Restarted { final_score };
        }

        let ate_fruit = state.grid.get(candidate) == Cell::Fruit;
        if ate_fruit {
            state.score += 1;
            // Spawn while the candidate cell still reads Fruit, so the
            // eaten cell is never picked as the new location.
            self.spawn_fruit(state);
        }

        state.grid.set(candidate, Cell::SnakeBody);
        state.snake.insert_head(candidate);

        if !ate_fruit {
            // Head goes in first, so the body always has at least two
            // segments when the tail comes off.
            let tail = state.snake.remove_tail();
            state.grid.set(tail, Cell::Empty);
        }

        FrameOutcome::Advanced { ate_fruit }
    }

    /// Apply the first held directional key, in fixed priority order, that
    /// is not a direct reversal of the current heading. At most one heading
    /// change per tick.
    fn resolve_heading(&self, state: &mut GameState, input: &InputSnapshot) {
        let current = state.snake.heading();
        for heading in Heading::INPUT_PRIORITY {
            if input.is_held(heading) && !heading.is_reverse_of(current) {
                state.snake.set_heading(heading);
                return;
            }
        }
    }

    /// Place a fruit uniformly at random among empty cells. On a board with
    /// no empty cell left, the board simply stays fruitless.
    fn spawn_fruit(&mut self, state: &mut GameState) {
        let empty = state.grid.empty_cells();
        match empty.choose(&mut self.rng) {
            Some(&pos) => state.grid.set(pos, Cell::Fruit),
            None => debug!("no empty cell left, board stays fruitless"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unpause via the public edge-trigger path, leaving the latch clear
    fn unpause(state: &mut GameState) {
        state.snake.update_pause_from_input(true);
        state.snake.update_pause_from_input(false);
    }

    fn fruit_cells(state: &GameState) -> Vec<Position> {
        let mut cells = Vec::new();
        for y in 0..state.grid.height() {
            for x in 0..state.grid.width() {
                let pos = Position::new(x as i32, y as i32);
                if state.grid.get(pos) == Cell::Fruit {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// Relocate the randomly placed fruit to a fixed cell
    fn force_fruit(state: &mut GameState, pos: Position) {
        for old in fruit_cells(state) {
            state.grid.set(old, Cell::Empty);
        }
        state.grid.set(pos, Cell::Fruit);
    }

    /// The set of SnakeBody cells must equal the body queue exactly
    fn assert_grid_matches_body(state: &GameState) {
        let body: Vec<Position> = state.snake.body().collect();
        for y in 0..state.grid.height() {
            for x in 0..state.grid.width() {
                let pos = Position::new(x as i32, y as i32);
                let on_grid = state.grid.get(pos) == Cell::SnakeBody;
                let in_body = body.contains(&pos);
                assert_eq!(on_grid, in_body, "grid/body mismatch at {:?}", pos);
            }
        }
    }

    #[test]
    fn test_reset_initial_state() {
        let mut engine = GameEngine::new(GameConfig::default());
        let state = engine.reset();

        assert!(state.snake.is_paused());
        assert_eq!(state.score, 0);
        assert_eq!(state.frames, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(13, 13));
        assert_eq!(state.snake.heading(), Heading::Left);
        assert_eq!(fruit_cells(&state).len(), 1);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_paused_frames_change_nothing() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        let input = InputSnapshot::new();

        for _ in 0..10 {
            assert_eq!(engine.frame(&mut state, &input), FrameOutcome::Paused);
        }
        assert_eq!(state.frames, 0);
        assert_eq!(state.snake.head(), Position::new(13, 13));
    }

    #[test]
    fn test_advance_only_on_fifth_frame() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        unpause(&mut state);
        force_fruit(&mut state, Position::new(25, 0));
        let input = InputSnapshot::new();

        for _ in 0..4 {
            assert_eq!(engine.frame(&mut state, &input), FrameOutcome::Waiting);
            assert_eq!(state.snake.head(), Position::new(13, 13));
        }

        assert_eq!(
            engine.frame(&mut state, &input),
            FrameOutcome::Advanced { ate_fruit: false }
        );
        assert_eq!(state.snake.head(), Position::new(12, 13));
    }

    #[test]
    fn test_first_advance_vacates_tail() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        unpause(&mut state);
        force_fruit(&mut state, Position::new(25, 0));
        let input = InputSnapshot::new();

        for _ in 0..5 {
            engine.frame(&mut state, &input);
        }

        assert_eq!(state.snake.head(), Position::new(12, 13));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.grid.get(Position::new(13, 13)), Cell::Empty);
        assert_eq!(state.grid.get(Position::new(12, 13)), Cell::SnakeBody);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        unpause(&mut state);
        force_fruit(&mut state, Position::new(11, 13));
        let input = InputSnapshot::new();

        // First advance: (13,13) -> (12,13), no fruit
        for _ in 0..5 {
            engine.frame(&mut state, &input);
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);

        // Second advance lands on the fruit
        let mut last = FrameOutcome::Waiting;
        for _ in 0..5 {
            last = engine.frame(&mut state, &input);
        }
        assert_eq!(last, FrameOutcome::Advanced { ate_fruit: true });
        assert_eq!(state.snake.head(), Position::new(11, 13));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);

        // A replacement fruit exists, somewhere else
        let fruits = fruit_cells(&state);
        assert_eq!(fruits.len(), 1);
        assert_ne!(fruits[0], Position::new(11, 13));
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = GameEngine::new(GameConfig::default());

        // Length-3 snake on (10..=12, 13), head at (12,13), heading right
        let mut grid = Grid::new(26, 26);
        let mut snake = Snake::new(Heading::Right, Position::new(10, 13));
        snake.insert_head(Position::new(11, 13));
        snake.insert_head(Position::new(12, 13));
        for pos in snake.body() {
            grid.set(pos, Cell::SnakeBody);
        }
        let mut state = GameState::new(grid, snake);
        unpause(&mut state);

        let input = InputSnapshot {
            left: true,
            ..InputSnapshot::new()
        };
        let mut last = FrameOutcome::Waiting;
        for _ in 0..5 {
            last = engine.frame(&mut state, &input);
        }

        assert_eq!(last, FrameOutcome::Advanced { ate_fruit: false });
        assert_eq!(state.snake.heading(), Heading::Right);
        assert_eq!(state.snake.head(), Position::new(13, 13));
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_heading_priority_first_legal_key_wins() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        unpause(&mut state);
        force_fruit(&mut state, Position::new(25, 0));

        // Heading is Left; Up, Right and Down are all held. Right is a
        // reversal, so Up (first legal in priority order) wins.
        let input = InputSnapshot {
            up: true,
            right: true,
            down: true,
            ..InputSnapshot::new()
        };
        for _ in 0..5 {
            engine.frame(&mut state, &input);
        }

        assert_eq!(state.snake.heading(), Heading::Up);
        assert_eq!(state.snake.head(), Position::new(13, 12));
    }

    #[test]
    fn test_reversed_key_falls_through_to_next() {
        let mut engine = GameEngine::new(GameConfig::default());

        let mut grid = Grid::new(26, 26);
        let snake = Snake::new(Heading::Right, Position::new(5, 5));
        grid.set(Position::new(5, 5), Cell::SnakeBody);
        let mut state = GameState::new(grid, snake);
        unpause(&mut state);

        // Left is held but reverses the current heading, so Up applies
        let input = InputSnapshot {
            left: true,
            up: true,
            ..InputSnapshot::new()
        };
        for _ in 0..5 {
            engine.frame(&mut state, &input);
        }

        assert_eq!(state.snake.heading(), Heading::Up);
        assert_eq!(state.snake.head(), Position::new(5, 4));
    }

    #[test]
    fn test_wall_exit_restarts_fresh() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        unpause(&mut state);
        force_fruit(&mut state, Position::new(9, 9));
        let input = InputSnapshot::new();

        // Center (5,5) heading left: 5 advances reach x=0, the 6th leaves
        // the board
        let mut last = FrameOutcome::Waiting;
        for _ in 0..6 * 5 {
            last = engine.frame(&mut state, &input);
        }

        assert_eq!(last, FrameOutcome::Restarted { final_score: 0 });
        assert!(state.snake.is_paused());
        assert_eq!(state.score, 0);
        assert_eq!(state.frames, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.heading(), Heading::Left);
        assert_eq!(fruit_cells(&state).len(), 1);
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_self_collision_restarts_fresh() {
        let mut engine = GameEngine::new(GameConfig::small());

        // Hook shape: head (5,5) heading down, body curling back under it
        let mut grid = Grid::new(10, 10);
        let mut snake = Snake::new(Heading::Down, Position::new(6, 6));
        snake.insert_head(Position::new(5, 6));
        snake.insert_head(Position::new(4, 6));
        snake.insert_head(Position::new(4, 5));
        snake.insert_head(Position::new(5, 5));
        for pos in snake.body() {
            grid.set(pos, Cell::SnakeBody);
        }
        let mut state = GameState::new(grid, snake);
        unpause(&mut state);
        let input = InputSnapshot::new();

        let mut last = FrameOutcome::Waiting;
        for _ in 0..5 {
            last = engine.frame(&mut state, &input);
        }

        assert_eq!(last, FrameOutcome::Restarted { final_score: 0 });
        assert!(state.snake.is_paused());
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_full_board_goes_fruitless() {
        let mut engine = GameEngine::new(GameConfig::new(2, 2));

        // Snake fills all but one cell; the last cell holds the fruit
        let mut grid = Grid::new(2, 2);
        let mut snake = Snake::new(Heading::Right, Position::new(1, 1));
        snake.insert_head(Position::new(0, 1));
        snake.insert_head(Position::new(0, 0));
        for pos in snake.body() {
            grid.set(pos, Cell::SnakeBody);
        }
        grid.set(Position::new(1, 0), Cell::Fruit);
        let mut state = GameState::new(grid, snake);
        unpause(&mut state);
        let input = InputSnapshot::new();

        let mut last = FrameOutcome::Waiting;
        for _ in 0..5 {
            last = engine.frame(&mut state, &input);
        }

        assert_eq!(last, FrameOutcome::Advanced { ate_fruit: true });
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert!(fruit_cells(&state).is_empty());
        assert_grid_matches_body(&state);
    }

    #[test]
    fn test_invariants_hold_across_scripted_run() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = engine.reset();
        unpause(&mut state);

        // Wander the board for a while; whatever the RNG does with fruit,
        // the grid must mirror the body and hold at most one fruit
        let script = [
            InputSnapshot {
                down: true,
                ..InputSnapshot::new()
            },
            InputSnapshot {
                right: true,
                ..InputSnapshot::new()
            },
            InputSnapshot {
                up: true,
                ..InputSnapshot::new()
            },
            InputSnapshot {
                left: true,
                ..InputSnapshot::new()
            },
        ];

        for frame in 0..120 {
            let input = script[(frame / 10) % script.len()];
            engine.frame(&mut state, &input);
            assert_grid_matches_body(&state);
            assert!(fruit_cells(&state).len() <= 1);
        }
    }

    #[test]
    fn test_pause_mid_run_freezes_simulation() {
        let mut engine = GameEngine::new(GameConfig::default());
        let mut state = engine.reset();
        unpause(&mut state);
        let input = InputSnapshot::new();

        for _ in 0..5 {
            engine.frame(&mut state, &input);
        }
        let head = state.snake.head();
        let frames = state.frames;

        // Pause key pressed and held: one toggle, then the simulation sits
        let paused_input = InputSnapshot {
            pause: true,
            ..InputSnapshot::new()
        };
        for _ in 0..10 {
            assert_eq!(engine.frame(&mut state, &paused_input), FrameOutcome::Paused);
        }
        assert_eq!(state.snake.head(), head);
        assert_eq!(state.frames, frames);

        // Release and press again: simulation resumes
        engine.frame(&mut state, &input);
        assert_eq!(
            engine.frame(&mut state, &paused_input),
            FrameOutcome::Waiting
        );
    }
}
