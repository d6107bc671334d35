use std::cmp::max;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GameConfig, SPEEDUP_PER_POINT_MS};
use crate::food::place_food;
use crate::render::Snapshot;
use crate::snake::{Cell, Direction, Snake, SnakeSegment};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    HitWall,
    HitSelf,
    /// The snake covers every square, so no food can be placed.
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver(GameOverReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameStatus {
    pub score: u32,
    pub tick_interval: Duration,
    pub phase: Phase,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game is already over ({0:?}), reset to play again")]
    GameOver(GameOverReason),
}

/// The whole simulation: snake, food, score and tick speed.
///
/// Only [`advance`](GameState::advance) and
/// [`set_direction`](GameState::set_direction) mutate a running game;
/// [`reset`](GameState::reset) replaces everything at once.
pub struct GameState<R = StdRng> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    tick_interval_ms: u64,
    phase: Phase,
}

impl GameState<StdRng> {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        GameState::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        GameState::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Builds a game from `config`, which must pass [`GameConfig::validate`].
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let snake = Snake::new(config.start_cell, config.start_length, Direction::Right);
        let mut state = GameState {
            rng,
            snake,
            food: None,
            score: 0,
            tick_interval_ms: config.start_speed_ms,
            phase: Phase::Playing,
            config,
        };
        state.place_food();
        Ok(state)
    }

    /// Starts a fresh game from `config`, discarding the current one. An
    /// invalid config is rejected and the running game is left as it was.
    pub fn reset(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.start(config);
        Ok(())
    }

    /// Same as [`reset`](GameState::reset) with the configuration already in use.
    pub fn restart(&mut self) {
        self.start(self.config.clone());
    }

    fn start(&mut self, config: GameConfig) {
        self.snake = Snake::new(config.start_cell, config.start_length, Direction::Right);
        self.score = 0;
        self.tick_interval_ms = config.start_speed_ms;
        self.phase = Phase::Playing;
        self.food = None;
        self.config = config;
        self.place_food();
        info!(start = %self.config.start_cell, food = ?self.food, "new game");
    }

    /// Turns the snake. Reversing onto itself is ignored, as is any turn
    /// once the game is over. Returns whether the direction changed.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        self.snake.set_direction(direction)
    }

    /// Runs one tick. Fails without touching anything if the game is over.
    pub fn advance(&mut self) -> Result<GameStatus, GameError> {
        if let Phase::GameOver(reason) = self.phase {
            warn!(?reason, "advance called on a finished game");
            return Err(GameError::GameOver(reason));
        }

        let head = self.snake.step();

        if self.food == Some(head) {
            self.eat();
        } else if !self.config.contains(head) {
            self.end(GameOverReason::HitWall);
        } else if self.snake.bites_itself() {
            self.end(GameOverReason::HitSelf);
        }

        Ok(self.status())
    }

    fn eat(&mut self) {
        self.snake.grow();
        self.score += 1;

        // The speedup grows with the running score rather than being a flat step.
        let speedup = u64::from(self.score) * SPEEDUP_PER_POINT_MS;
        self.tick_interval_ms = max(
            self.config.speed_floor_ms,
            self.tick_interval_ms.saturating_sub(speedup),
        );

        debug!(score = self.score, interval_ms = self.tick_interval_ms, "food eaten");
        self.place_food();
    }

    fn place_food(&mut self) {
        self.food = place_food(&mut self.rng, &self.config, &self.snake);
        if self.food.is_none() {
            self.end(GameOverReason::BoardFull);
        }
    }

    fn end(&mut self, reason: GameOverReason) {
        info!(?reason, score = self.score, "game over");
        self.phase = Phase::GameOver(reason);
    }
}

impl<R> GameState<R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn segments(&self) -> &[SnakeSegment] {
        self.snake.segments()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn status(&self) -> GameStatus {
        GameStatus { score: self.score, tick_interval: self.tick_interval(), phase: self.phase }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
            segments: self.snake.segments(),
            food: self.food,
            score: self.score,
            tick_interval: self.tick_interval(),
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_by_ten() -> GameConfig {
        GameConfig { grid_width: 10, grid_height: 10, ..GameConfig::default() }
    }

    fn game() -> GameState {
        GameState::seeded(ten_by_ten(), 42).unwrap()
    }

    /// Puts the food somewhere the snake will not reach during a test.
    fn park_food(state: &mut GameState, cell: Cell) {
        state.food = Some(cell);
    }

    #[test]
    fn reset_starts_a_single_segment_heading_right() {
        let state = game();
        assert_eq!(state.segments().len(), 1);
        assert_eq!(state.snake().head(), Cell::new(5, 5));
        assert!(state.segments()[0].is_head);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.tick_interval(), Duration::from_millis(400));
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.snake().target_length(), 3);

        let food = state.food().unwrap();
        assert!(state.config().contains(food));
        assert_ne!(food, Cell::new(5, 5));
    }

    #[test]
    fn advance_moves_head_one_square() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 9));

        let status = state.advance().unwrap();
        assert_eq!(state.snake().head(), Cell::new(6, 5));
        assert!(!status.is_over());
        assert_eq!(state.segments().len(), 2);

        state.advance().unwrap();
        state.advance().unwrap();
        let cells: Vec<Cell> = state.segments().iter().map(|s| s.cell).collect();
        assert_eq!(cells, vec![Cell::new(6, 5), Cell::new(7, 5), Cell::new(8, 5)]);
    }

    #[test]
    fn turn_is_reflected_in_next_advance() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 9));

        assert!(state.set_direction(Direction::Up));
        state.advance().unwrap();
        assert_eq!(state.snake().head(), Cell::new(5, 4));

        assert!(!state.set_direction(Direction::Down));
        state.advance().unwrap();
        assert_eq!(state.snake().head(), Cell::new(5, 3));
    }

    #[test]
    fn eating_grows_scores_and_speeds_up() {
        let mut state = game();
        park_food(&mut state, Cell::new(6, 5));

        let status = state.advance().unwrap();
        assert_eq!(status.score, 1);
        assert_eq!(state.snake().target_length(), 4);
        assert_eq!(status.tick_interval, Duration::from_millis(398));
        assert!(!status.is_over());

        let food = state.food().unwrap();
        assert!(!state.snake().occupies(food));
        assert!(state.config().contains(food));

        park_food(&mut state, Cell::new(7, 5));
        let status = state.advance().unwrap();
        assert_eq!(status.score, 2);
        // 398 - 2 * 2
        assert_eq!(status.tick_interval, Duration::from_millis(394));
    }

    #[test]
    fn speed_never_drops_below_floor() {
        let config = GameConfig { start_speed_ms: 103, ..ten_by_ten() };
        let mut state = GameState::seeded(config, 5).unwrap();
        park_food(&mut state, Cell::new(6, 5));
        state.advance().unwrap();
        assert_eq!(state.tick_interval(), Duration::from_millis(101));

        park_food(&mut state, Cell::new(7, 5));
        state.advance().unwrap();
        assert_eq!(state.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn hitting_the_wall_ends_the_game_without_scoring() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 0));

        for _ in 0..4 {
            state.advance().unwrap();
        }
        assert_eq!(state.snake().head(), Cell::new(9, 5));
        assert!(!state.is_over());

        let status = state.advance().unwrap();
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::HitWall));
        assert_eq!(status.score, 0);
        assert_eq!(state.snake().head(), Cell::new(10, 5));
    }

    #[test]
    fn hitting_the_top_wall_ends_the_game() {
        let mut state = game();
        park_food(&mut state, Cell::new(9, 9));
        state.set_direction(Direction::Up);

        for _ in 0..5 {
            state.advance().unwrap();
        }
        assert_eq!(state.snake().head(), Cell::new(5, 0));

        let status = state.advance().unwrap();
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::HitWall));
    }

    #[test]
    fn looping_into_the_body_ends_the_game() {
        let config = GameConfig { start_length: 5, ..ten_by_ten() };
        let mut state = GameState::seeded(config, 9).unwrap();
        park_food(&mut state, Cell::new(0, 0));

        state.set_direction(Direction::Down);
        state.advance().unwrap();
        state.advance().unwrap();
        state.set_direction(Direction::Left);
        state.advance().unwrap();
        state.set_direction(Direction::Up);
        state.advance().unwrap();
        assert!(!state.is_over());

        state.set_direction(Direction::Right);
        let status = state.advance().unwrap();
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::HitSelf));
    }

    #[test]
    fn advance_after_game_over_is_rejected_and_changes_nothing() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 0));
        for _ in 0..5 {
            state.advance().unwrap();
        }
        assert!(state.is_over());

        let segments = state.segments().to_vec();
        let food = state.food();
        let status = state.status();

        assert_eq!(state.advance(), Err(GameError::GameOver(GameOverReason::HitWall)));
        assert_eq!(state.segments(), &segments[..]);
        assert_eq!(state.food(), food);
        assert_eq!(state.status(), status);

        assert!(!state.set_direction(Direction::Up));
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn reset_after_game_over_starts_again() {
        let mut state = game();
        park_food(&mut state, Cell::new(6, 5));
        state.advance().unwrap();
        state.set_direction(Direction::Up);
        for _ in 0..6 {
            let _ = state.advance();
        }
        assert!(state.is_over());

        state.restart();
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.segments().len(), 1);
        assert_eq!(state.snake().head(), Cell::new(5, 5));
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.tick_interval(), Duration::from_millis(400));
    }

    #[test]
    fn eating_the_last_free_square_ends_the_game() {
        // 3x1 board: start (0,0), food must land on (1,0) or (2,0).
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            start_length: 3,
            start_cell: Cell::new(0, 0),
            ..GameConfig::default()
        };
        let mut state = GameState::seeded(config, 11).unwrap();
        park_food(&mut state, Cell::new(1, 0));
        state.advance().unwrap();
        assert_eq!(state.food(), Some(Cell::new(2, 0)));

        let status = state.advance().unwrap();
        assert_eq!(status.score, 2);
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::BoardFull));
        assert_eq!(state.food(), None);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let state = game();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.grid_width, 10);
        assert_eq!(snapshot.grid_height, 10);
        assert_eq!(snapshot.segments, state.segments());
        assert_eq!(snapshot.food, state.food());
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.phase, Phase::Playing);
    }

    #[test]
    fn hitting_the_left_wall_ends_the_game() {
        let mut state = game();
        park_food(&mut state, Cell::new(9, 9));

        state.set_direction(Direction::Up);
        state.advance().unwrap();
        state.set_direction(Direction::Left);
        for _ in 0..5 {
            state.advance().unwrap();
        }
        assert_eq!(state.snake().head(), Cell::new(0, 4));
        assert!(!state.is_over());

        let status = state.advance().unwrap();
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::HitWall));
        assert_eq!(status.score, 0);
        assert_eq!(state.snake().head(), Cell::new(-1, 4));
    }

    #[test]
    fn hitting_the_bottom_wall_ends_the_game() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 0));
        state.set_direction(Direction::Down);

        for _ in 0..4 {
            state.advance().unwrap();
        }
        assert_eq!(state.snake().head(), Cell::new(5, 9));

        let status = state.advance().unwrap();
        assert_eq!(status.phase, Phase::GameOver(GameOverReason::HitWall));
        assert_eq!(status.score, 0);
        assert_eq!(state.snake().head(), Cell::new(5, 10));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let no_length = GameConfig { start_length: 0, ..ten_by_ten() };
        assert_eq!(GameState::seeded(no_length, 1).err(), Some(ConfigError::ZeroStartLength));

        let no_width = GameConfig { grid_width: 0, ..ten_by_ten() };
        assert!(matches!(GameState::seeded(no_width, 1), Err(ConfigError::EmptyGrid { .. })));
    }

    #[test]
    fn reset_with_invalid_config_keeps_the_running_game() {
        let mut state = game();
        park_food(&mut state, Cell::new(0, 9));
        state.advance().unwrap();

        let no_width = GameConfig { grid_width: 0, ..ten_by_ten() };
        assert!(matches!(state.reset(no_width), Err(ConfigError::EmptyGrid { .. })));

        let no_length = GameConfig { start_length: 0, ..ten_by_ten() };
        assert_eq!(state.reset(no_length), Err(ConfigError::ZeroStartLength));

        assert_eq!(state.config(), &ten_by_ten());
        assert_eq!(state.snake().head(), Cell::new(6, 5));
        assert_eq!(state.food(), Some(Cell::new(0, 9)));
        state.advance().unwrap();
        assert_eq!(state.snake().head(), Cell::new(7, 5));
    }
}
