use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::snake::{Cell, Snake};

/// Random draws before falling back to picking among the free cells directly.
const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Picks a uniformly random cell of the grid not occupied by the snake.
///
/// Draws at random first, which is quick while the board is mostly empty. If
/// every draw lands on the snake, the free cells are enumerated and one is
/// chosen from them. Returns `None` only when the snake covers the whole grid.
pub fn place_food<R: Rng>(rng: &mut R, config: &GameConfig, snake: &Snake) -> Option<Cell> {
    let (max_x, max_y) = (i32::from(config.grid_width), i32::from(config.grid_height));

    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let cell = Cell::new(rng.gen_range(0..max_x), rng.gen_range(0..max_y));
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    debug!("random food draws exhausted, scanning free cells");
    let free: Vec<Cell> = (0..max_y)
        .flat_map(|y| (0..max_x).map(move |x| Cell::new(x, y)))
        .filter(|cell| !snake.occupies(*cell))
        .collect();
    free.choose(rng).copied()
}
