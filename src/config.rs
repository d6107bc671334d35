use std::time::Duration;

use thiserror::Error;

use crate::snake::Cell;

pub const DEFAULT_SQUARE_SIZE: u16 = 2;
pub const DEFAULT_START_LENGTH: usize = 3;
pub const DEFAULT_START_SPEED_MS: u64 = 400;
pub const DEFAULT_SPEED_FLOOR_MS: u64 = 100;
pub const DEFAULT_GRID_WIDTH: u16 = 20;
pub const DEFAULT_GRID_HEIGHT: u16 = 20;
pub const DEFAULT_START_CELL: Cell = Cell::new(5, 5);

/// Milliseconds shaved off the tick interval per point of score when food is eaten.
pub const SPEEDUP_PER_POINT_MS: u64 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1 squares, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("square size must be at least 1")]
    ZeroSquareSize,
    #[error("start length must be at least 1")]
    ZeroStartLength,
    #[error("start speed {start_ms}ms is faster than the speed floor {floor_ms}ms")]
    StartBelowFloor { start_ms: u64, floor_ms: u64 },
    #[error("speed floor must be at least 1ms")]
    ZeroSpeedFloor,
    #[error("start cell {cell} lies outside the {width}x{height} grid")]
    StartOutsideGrid { cell: Cell, width: u16, height: u16 },
}

/// Everything a new game is set up from. Supplied again on every reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Width of one square in presentation units (terminal columns).
    pub square_size: u16,
    pub start_length: usize,
    pub start_speed_ms: u64,
    pub speed_floor_ms: u64,
    pub grid_width: u16,
    pub grid_height: u16,
    pub start_cell: Cell,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            square_size: DEFAULT_SQUARE_SIZE,
            start_length: DEFAULT_START_LENGTH,
            start_speed_ms: DEFAULT_START_SPEED_MS,
            speed_floor_ms: DEFAULT_SPEED_FLOOR_MS,
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            start_cell: DEFAULT_START_CELL,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid { width: self.grid_width, height: self.grid_height });
        }
        if self.square_size == 0 {
            return Err(ConfigError::ZeroSquareSize);
        }
        if self.start_length == 0 {
            return Err(ConfigError::ZeroStartLength);
        }
        if self.speed_floor_ms == 0 {
            return Err(ConfigError::ZeroSpeedFloor);
        }
        if self.start_speed_ms < self.speed_floor_ms {
            return Err(ConfigError::StartBelowFloor {
                start_ms: self.start_speed_ms,
                floor_ms: self.speed_floor_ms,
            });
        }
        if !self.contains(self.start_cell) {
            return Err(ConfigError::StartOutsideGrid {
                cell: self.start_cell,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.grid_width)
            && cell.y < i32::from(self.grid_height)
    }

    pub fn start_speed(&self) -> Duration {
        Duration::from_millis(self.start_speed_ms)
    }
}
