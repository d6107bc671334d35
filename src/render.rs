use std::time::Duration;

use crate::snake::{Cell, SnakeSegment};
use crate::state::Phase;

/// Read-only view of a game, everything a renderer may look at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub grid_width: u16,
    pub grid_height: u16,
    pub segments: &'a [SnakeSegment],
    pub food: Option<Cell>,
    pub score: u32,
    pub tick_interval: Duration,
    pub phase: Phase,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Square {
    Empty(Shade),
    Body,
    Head,
    Food,
}

/// Checkerboard colouring; the top-left square is light.
pub fn shade(x: u16, y: u16) -> Shade {
    if (x + y) % 2 == 0 {
        Shade::Light
    } else {
        Shade::Dark
    }
}

impl Snapshot<'_> {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Row-major contents of every square on the grid. Segments outside the
    /// grid (a head that ran into the wall) are skipped.
    pub fn squares(&self) -> Vec<Square> {
        let (w, h) = (self.grid_width as usize, self.grid_height as usize);
        let mut squares: Vec<Square> = (0..h)
            .flat_map(|y| (0..w).map(move |x| Square::Empty(shade(x as u16, y as u16))))
            .collect();

        let mut put = |cell: Cell, square: Square| {
            if cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < w && (cell.y as usize) < h {
                squares[cell.y as usize * w + cell.x as usize] = square;
            }
        };

        if let Some(food) = self.food {
            put(food, Square::Food);
        }
        for segment in self.segments {
            put(segment.cell, if segment.is_head { Square::Head } else { Square::Body });
        }

        squares
    }

    pub fn status_line(&self) -> String {
        format!("Score: {} - Game speed: {}", self.score, self.tick_interval.as_millis())
    }
}

/// Something that can draw a whole frame from a snapshot.
pub trait Renderer {
    fn draw(&mut self, frame: &Snapshot<'_>) -> anyhow::Result<()>;

    /// Shows a message on top of the last frame until the next `draw`.
    fn show_message(&mut self, lines: &[&str]) -> anyhow::Result<()>;

    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Plain-text renderer, one character per square.
#[derive(Default)]
pub struct TextRenderer {
    lines: Vec<String>,
    message: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        TextRenderer::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn message(&self) -> &[String] {
        &self.message
    }

    pub fn render(frame: &Snapshot<'_>) -> String {
        let mut renderer = TextRenderer::new();
        renderer.fill(frame);
        renderer.lines.join("\n")
    }

    fn fill(&mut self, frame: &Snapshot<'_>) {
        let width = frame.grid_width as usize;
        let dead = frame.is_over();
        let squares = frame.squares();

        self.lines.clear();
        self.lines.push(frame.status_line());
        for row in squares.chunks(width) {
            let line = row
                .iter()
                .map(|square| match square {
                    Square::Empty(Shade::Light) => '.',
                    Square::Empty(Shade::Dark) => ' ',
                    Square::Body => 'o',
                    Square::Head if dead => 'X',
                    Square::Head => '@',
                    Square::Food => '*',
                })
                .collect();
            self.lines.push(line);
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &Snapshot<'_>) -> anyhow::Result<()> {
        self.message.clear();
        self.fill(frame);
        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> anyhow::Result<()> {
        self.message = lines.iter().map(|line| line.to_string()).collect();
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.lines.clear();
        self.message.clear();
        Ok(())
    }
}
