use std::fmt;

use Direction::*;

/// A position on the play field, in grid squares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Top-left corner of this cell in presentation units.
    pub fn to_presentation(self, square_size: u16) -> (i64, i64) {
        let size = i64::from(square_size);
        (i64::from(self.x) * size, i64::from(self.y) * size)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SnakeSegment {
    pub cell: Cell,
    pub is_head: bool,
}

/// The snake body, stored oldest segment first. The last segment is the head.
#[derive(Clone, Debug)]
pub struct Snake {
    segments: Vec<SnakeSegment>,
    target_length: usize,
    direction: Direction,
}

impl Snake {
    pub fn new(start: Cell, target_length: usize, direction: Direction) -> Self {
        let segments = vec![SnakeSegment { cell: start, is_head: true }];
        Snake { segments, target_length, direction }
    }

    pub fn segments(&self) -> &[SnakeSegment] {
        &self.segments
    }

    pub fn head(&self) -> Cell {
        // A snake is never empty: `step` always pushes after trimming.
        self.segments[self.segments.len() - 1].cell
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes the direction of travel unless `new_direction` would reverse
    /// the snake onto itself. Returns whether the direction actually changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() || new_direction == self.direction {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// Moves the snake one square and returns the new head cell.
    pub fn step(&mut self) -> Cell {
        let old_head = self.head();

        while self.segments.len() >= self.target_length {
            self.segments.remove(0);
        }

        for segment in self.segments.iter_mut() {
            segment.is_head = false;
        }

        let new_head = old_head.offset(self.direction);
        self.segments.push(SnakeSegment { cell: new_head, is_head: true });
        new_head
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.iter().any(|s| s.cell == cell)
    }

    /// True when the head shares its cell with any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        let body_len = self.segments.len() - 1;
        self.segments[..body_len].iter().any(|s| s.cell == head)
    }
}
