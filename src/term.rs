use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::config::GameConfig;
use crate::render::{shade, Renderer, Shade, Snapshot, Square};
use crate::snake::Cell;

const LIGHT_SQUARE: Color = Color::Rgb { r: 224, g: 255, b: 255 };
const DARK_SQUARE: Color = Color::White;
const SNAKE_BODY: Color = Color::Cyan;
const SNAKE_HEAD: Color = Color::DarkCyan;
const FOOD: Color = Color::Rgb { r: 255, g: 69, b: 0 };
const BORDER: Color = Color::Grey;

const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Owns the terminal: raw mode, key polling and drawing the board.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    square_size: u16,
    grid: (u16, u16),
    origin: (u16, u16),
}

impl TermManager {
    /// Fails if the terminal is too small to hold the configured grid.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;

        // Border on every side, one status line above.
        let board_w = u32::from(config.grid_width) * u32::from(config.square_size) + 2;
        let board_h = u32::from(config.grid_height) + 3;
        if board_w > u32::from(width) || board_h > u32::from(height) {
            bail!(
                "terminal is {}x{} but the {}x{} grid needs at least {}x{}",
                width,
                height,
                config.grid_width,
                config.grid_height,
                board_w,
                board_h
            );
        }

        let origin = ((width - board_w as u16) / 2, (height - board_h as u16) / 2);
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            square_size: config.square_size,
            grid: (config.grid_width, config.grid_height),
            origin,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
        .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for a key press; `None` waits indefinitely.
    pub fn poll_key(&self, timeout: Option<Duration>) -> Result<Option<KeyEvent>> {
        let timeout = match timeout {
            Some(t) => t,
            None => return self.read_key_blocking().map(Some),
        };

        if poll(timeout)? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<()> {
        let width = self.grid.0 * self.square_size + 2;
        let height = self.grid.1 + 2;
        let (left, top) = (self.origin.0, self.origin.1 + 1);

        let horizontal: String = (0..width)
            .map(|x| if x == 0 || x == width - 1 { '+' } else { '-' })
            .collect();

        queue!(self.stdout, ResetColor, SetForegroundColor(BORDER))?;
        queue!(self.stdout, cursor::MoveTo(left, top), Print(&horizontal))?;
        queue!(self.stdout, cursor::MoveTo(left, top + height - 1), Print(&horizontal))?;
        for y in 1..height - 1 {
            queue!(self.stdout, cursor::MoveTo(left, top + y), Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(left + width - 1, top + y), Print('|'))?;
        }
        Ok(())
    }

    fn draw_square(&mut self, x: u16, y: u16, square: Square, dead: bool) -> Result<()> {
        let (background, foreground, ch) = match square {
            Square::Empty(Shade::Light) => (LIGHT_SQUARE, LIGHT_SQUARE, ' '),
            Square::Empty(Shade::Dark) => (DARK_SQUARE, DARK_SQUARE, ' '),
            Square::Body => (SNAKE_BODY, SNAKE_BODY, ' '),
            Square::Head if dead => (SNAKE_HEAD, Color::White, DEAD_SNAKE_CHAR),
            Square::Head => (SNAKE_HEAD, SNAKE_HEAD, ' '),
            Square::Food => (shade_color(x, y), FOOD, FOOD_CHAR),
        };

        let (offset, _) = Cell::new(i32::from(x), i32::from(y)).to_presentation(self.square_size);
        let column = self.origin.0 + 1 + offset as u16;
        let row = self.origin.1 + 2 + y;
        let glyph = format!("{ch: ^width$}", ch = ch, width = self.square_size as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(column, row),
            SetBackgroundColor(background),
            SetForegroundColor(foreground),
            Print(glyph)
        )?;
        Ok(())
    }
}

impl Renderer for TermManager {
    fn draw(&mut self, frame: &Snapshot<'_>) -> Result<()> {
        let dead = frame.is_over();
        let squares = frame.squares();
        let width = frame.grid_width.max(1) as usize;

        let (left, top) = self.origin;
        queue!(self.stdout, ResetColor, cursor::MoveTo(left, top))?;
        queue!(self.stdout, terminal::Clear(ClearType::CurrentLine), Print(frame.status_line()))?;
        self.draw_borders()?;

        for (i, square) in squares.into_iter().enumerate() {
            self.draw_square((i % width) as u16, (i / width) as u16, square, dead)?;
        }

        queue!(self.stdout, ResetColor)?;
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, ResetColor, terminal::Clear(ClearType::All))
            .context("Error clearing")?;
        Ok(())
    }

    /// Centered box of lines over whatever is on screen.
    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        queue!(self.stdout, SetBackgroundColor(Color::Black), SetForegroundColor(Color::White))?;
        let blank = " ".repeat(msg_width as usize);
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1), Print(&blank))?;
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), Print(padded_line))?;
        }
        let bottom = top_left.1 + msg_height - 1;
        queue!(self.stdout, cursor::MoveTo(top_left.0, bottom), Print(&blank))?;
        queue!(self.stdout, ResetColor)?;

        self.flush()
    }
}

fn shade_color(x: u16, y: u16) -> Color {
    match shade(x, y) {
        Shade::Light => LIGHT_SQUARE,
        Shade::Dark => DARK_SQUARE,
    }
}
