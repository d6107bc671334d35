use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};

use crate::clock::TickTimer;
use crate::input::InputEvent;
use crate::render::{Renderer, TextRenderer};
use crate::snake::Direction;
use crate::state::{GameOverReason, GameState, Phase};
use crate::term::TermManager;

/// Wires a display, the tick timer and the game state together.
///
/// Everything except the terminal loop takes the current time as an
/// argument, so the controller can be driven with any [`Renderer`].
pub struct SnakeGame<D> {
    display: D,
    state: GameState,
    timer: TickTimer,
    paused: bool,
}

impl<D: Renderer> SnakeGame<D> {
    pub fn new(display: D, state: GameState, now: Instant) -> Self {
        let timer = TickTimer::new(state.tick_interval(), now);
        SnakeGame { display, state, timer, paused: false }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// How long input may be waited for before the next tick is due.
    pub fn wait(&self, now: Instant) -> Option<Duration> {
        if self.paused {
            None
        } else {
            self.timer.time_until_tick(now)
        }
    }

    /// Applies one input event. Returns false once the player quits.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Result<bool> {
        match event {
            InputEvent::Quit => return Ok(false),
            InputEvent::Reset => self.start_new_game(now)?,
            InputEvent::Pause => self.toggle_pause(now)?,
            InputEvent::Turn(dir) => self.turn(dir, now)?,
        }
        Ok(true)
    }

    /// Advances the game if the timer says a tick is due.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if !self.paused && self.timer.is_due(now) {
            self.step(now)?;
        }
        Ok(())
    }

    pub fn start_new_game(&mut self, now: Instant) -> Result<()> {
        self.state.restart();
        self.paused = false;
        self.timer.restart(self.state.config().start_speed(), now);

        self.display.clear()?;
        self.display.draw(&self.state.snapshot())?;
        if self.state.is_over() {
            self.game_over()?;
        }
        Ok(())
    }

    /// A turn that actually changes direction moves the snake right away.
    fn turn(&mut self, direction: Direction, now: Instant) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        if self.state.set_direction(direction) {
            debug!(?direction, "turned");
            self.step(now)?;
        }
        Ok(())
    }

    fn step(&mut self, now: Instant) -> Result<()> {
        let status = match self.state.advance() {
            Ok(status) => status,
            Err(_) => {
                self.timer.disable();
                return Ok(());
            }
        };

        self.timer.set_interval(status.tick_interval);
        self.timer.reschedule(now);
        self.display.draw(&self.state.snapshot())?;

        if status.is_over() {
            self.game_over()?;
        }
        Ok(())
    }

    fn game_over(&mut self) -> Result<()> {
        self.timer.disable();
        debug!("final board:\n{}", TextRenderer::render(&self.state.snapshot()));

        let headline = match self.state.phase() {
            Phase::GameOver(GameOverReason::BoardFull) => "You won!",
            _ => "You died! Better luck next time!",
        };
        self.display.show_message(&[
            headline,
            &*format!("Score: {}", self.state.score()),
            "",
            "To start a new game, press Esc.",
        ])
    }

    fn toggle_pause(&mut self, now: Instant) -> Result<()> {
        if self.state.is_over() {
            return Ok(());
        }

        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");

        if self.paused {
            self.timer.disable();
            self.display.show_message(&["Paused", "Space to resume", "or Q to quit"])
        } else {
            self.timer.enable(now);
            self.display.draw(&self.state.snapshot())
        }
    }
}

impl SnakeGame<TermManager> {
    /// Runs until the player quits. The terminal is restored even on error.
    pub fn run(&mut self) -> Result<()> {
        self.display.setup()?;
        let res = self.main_loop();
        self.display.restore()?;
        res
    }

    fn main_loop(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }
        self.start_new_game(Instant::now())?;

        loop {
            if let Some(key) = self.display.poll_key(self.wait(Instant::now()))? {
                if let Some(event) = InputEvent::from_key_event(&key) {
                    if !self.handle(event, Instant::now())? {
                        return Ok(());
                    }
                }
            }

            self.tick(Instant::now())?;
        }
    }

    /// Returns false if the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool> {
        self.display.clear()?;
        self.display.show_message(&[
            "Arrow keys or WASD to move",
            "Space to pause",
            "Esc to start over",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.display.read_key_blocking()?;
        Ok(InputEvent::from_key_event(&key) != Some(InputEvent::Quit))
    }
}
