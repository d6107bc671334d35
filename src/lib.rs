//! Classic snake on a checkerboard grid, played in the terminal.
//!
//! The simulation lives in [`state::GameState`] and knows nothing about
//! drawing or timing; [`game::SnakeGame`] drives it from the keyboard and a
//! [`clock::TickTimer`] and hands read-only [`render::Snapshot`]s to a
//! [`render::Renderer`].

pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod render;
pub mod snake;
pub mod state;
pub mod term;

pub use config::{ConfigError, GameConfig};
pub use snake::{Cell, Direction, SnakeSegment};
pub use state::{GameError, GameOverReason, GameState, GameStatus, Phase};
