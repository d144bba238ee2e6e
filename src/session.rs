use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::board::Board;
use crate::clock::{Clock, SystemClock};
use crate::schedule::OneShot;
use crate::settings::GridSize;
use crate::timer::ElapsedTimer;

/// How long a cell stays highlighted after being selected
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Highlight shown on the most recently selected cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub value: u32,
    pub outcome: Outcome,
}

/// Final figures of a completed table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub grid_size: GridSize,
    pub mistakes: u32,
    pub elapsed: Duration,
}

/// A table in progress
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub board: Board,
    pub current_target: u32,
    pub mistakes: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing(Round),
    Result(GameResult),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Playing,
    Result,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Playing(_) => PhaseKind::Playing,
            Phase::Result(_) => PhaseKind::Result,
        }
    }
}

/// What a single cell selection did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not playing, a value off the board, or a wrong first selection before
    /// the clock started
    Ignored,
    Correct { next_target: u32 },
    Incorrect { mistakes: u32 },
    Completed(GameResult),
}

/// Everything the presentation layer needs to draw one frame
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub grid_size: GridSize,
    pub board: Vec<u32>,
    pub current_target: Option<u32>,
    pub mistakes: u32,
    pub elapsed: Duration,
    pub feedback: Option<Feedback>,
    pub result: Option<GameResult>,
}

/// One play-through of a Schulte table: idle, playing, then a result
#[derive(Debug)]
pub struct GameSession<C: Clock + Clone = SystemClock, R: Rng = StdRng> {
    clock: C,
    rng: R,
    timer: ElapsedTimer<C>,
    phase: Phase,
    grid_size: GridSize,
    feedback: Option<(Feedback, OneShot)>,
}

impl GameSession<SystemClock, StdRng> {
    pub fn new(grid_size: GridSize) -> Self {
        Self::with_parts(SystemClock::new(), StdRng::from_entropy(), grid_size)
    }
}

impl<C: Clock + Clone, R: Rng> GameSession<C, R> {
    pub fn with_parts(clock: C, rng: R, grid_size: GridSize) -> Self {
        Self {
            timer: ElapsedTimer::with_clock(clock.clone()),
            clock,
            rng,
            phase: Phase::Idle,
            grid_size,
            feedback: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn timer(&self) -> &ElapsedTimer<C> {
        &self.timer
    }

    /// Grid size of the current table, or of the next one while idle
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Changes the size used by the next `start`; only honored while idle.
    pub fn set_grid_size(&mut self, size: GridSize) {
        if self.phase == Phase::Idle {
            self.grid_size = size;
        }
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.map(|(fb, _)| fb)
    }

    pub fn current_target(&self) -> Option<u32> {
        match &self.phase {
            Phase::Playing(round) => Some(round.current_target),
            _ => None,
        }
    }

    pub fn mistakes(&self) -> u32 {
        match &self.phase {
            Phase::Idle => 0,
            Phase::Playing(round) => round.mistakes,
            Phase::Result(result) => result.mistakes,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        match &self.phase {
            Phase::Playing(round) => Some(&round.board),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<GameResult> {
        match &self.phase {
            Phase::Result(result) => Some(*result),
            _ => None,
        }
    }

    /// Deals a fresh table. Only valid from idle; returns whether it started.
    pub fn start(&mut self, grid_size: GridSize) -> bool {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase.kind(), "start ignored outside idle");
            return false;
        }
        self.timer.reset();
        self.grid_size = grid_size;
        self.feedback = None;
        self.phase = Phase::Playing(Round {
            board: Board::generate(grid_size, &mut self.rng),
            current_target: 1,
            mistakes: 0,
        });
        info!(grid_size = grid_size.get(), "table dealt");
        true
    }

    /// Handles the selection of the cell holding `value`.
    pub fn click(&mut self, value: u32) -> ClickOutcome {
        let Phase::Playing(round) = &mut self.phase else {
            debug!(value, "click ignored outside play");
            return ClickOutcome::Ignored;
        };
        if !round.board.contains(value) {
            debug!(value, "click on a value not on the board");
            return ClickOutcome::Ignored;
        }

        // The first correct selection starts the clock and counts as a match.
        if !self.timer.is_running() && value == 1 && round.current_target == 1 {
            self.timer.start();
        }

        if value == round.current_target {
            let now = self.clock.now();
            self.feedback = Some((
                Feedback {
                    value,
                    outcome: Outcome::Correct,
                },
                OneShot::after(now, FEEDBACK_DURATION),
            ));
            if round.current_target == round.board.last_number() {
                self.timer.stop();
                let result = GameResult {
                    grid_size: self.grid_size,
                    mistakes: round.mistakes,
                    elapsed: self.timer.elapsed(),
                };
                info!(
                    mistakes = result.mistakes,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "table completed"
                );
                self.phase = Phase::Result(result);
                return ClickOutcome::Completed(result);
            }
            round.current_target += 1;
            return ClickOutcome::Correct {
                next_target: round.current_target,
            };
        }

        // A wrong selection before the clock runs is not a mistake.
        if !self.timer.is_running() {
            return ClickOutcome::Ignored;
        }
        round.mistakes += 1;
        let now = self.clock.now();
        self.feedback = Some((
            Feedback {
                value,
                outcome: Outcome::Incorrect,
            },
            OneShot::after(now, FEEDBACK_DURATION),
        ));
        ClickOutcome::Incorrect {
            mistakes: round.mistakes,
        }
    }

    /// Abandons the current table without a result.
    pub fn give_up(&mut self) -> bool {
        if self.phase.kind() != PhaseKind::Playing {
            debug!(phase = ?self.phase.kind(), "give up ignored outside play");
            return false;
        }
        self.timer.stop();
        self.feedback = None;
        self.phase = Phase::Idle;
        info!("table abandoned");
        true
    }

    /// Leaves the result screen; the result is discarded.
    pub fn play_again(&mut self) -> bool {
        if self.phase.kind() != PhaseKind::Result {
            debug!(phase = ?self.phase.kind(), "play again ignored outside result");
            return false;
        }
        self.timer.reset();
        self.feedback = None;
        self.phase = Phase::Idle;
        true
    }

    /// Advances scheduled work: the timer's display sample and the feedback
    /// expiry. Returns true when anything visible changed.
    pub fn on_tick(&mut self) -> bool {
        let mut changed = self.timer.on_tick();
        let now = self.clock.now();
        if let Some((_, expiry)) = self.feedback {
            if expiry.is_due(now) {
                self.feedback = None;
                changed = true;
            }
        }
        changed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase.kind(),
            grid_size: self.grid_size,
            board: self
                .board()
                .map(|b| b.cells().to_vec())
                .unwrap_or_default(),
            current_target: self.current_target(),
            mistakes: self.mistakes(),
            elapsed: match &self.phase {
                Phase::Result(result) => result.elapsed,
                _ => self.timer.displayed(),
            },
            feedback: self.feedback(),
            result: self.result(),
        }
    }
}
