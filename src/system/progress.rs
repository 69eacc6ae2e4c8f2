// src/system/progress.rs

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TICK: Duration = Duration::from_millis(200);
const DEFAULT_STEP: u8 = 10;
const COMPLETE: u8 = 100;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Terminal Error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("Invalid progress template: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    Completed,
    /// A key was pressed before the animation reached 100%.
    Cancelled,
}

/// A short foreground animation shown before lesson commands run.
pub trait ProgressIndicator {
    fn run(&self) -> Result<ProgressOutcome, ProgressError>;
}

/// Tick-driven percent counter backing the terminal animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickProgress {
    percent: u8,
    step: u8,
}

impl Default for TickProgress {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl TickProgress {
    /// A zero step would never finish, so it is raised to 1.
    pub fn new(step: u8) -> Self {
        Self {
            percent: 0,
            step: step.max(1),
        }
    }

    /// Advances by one step, never past 100. Returns the new percentage.
    pub fn tick(&mut self) -> u8 {
        self.percent = self.percent.saturating_add(self.step).min(COMPLETE);
        self.percent
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= COMPLETE
    }
}

/// Renders `TickProgress` with indicatif; any key press ends the animation early.
#[derive(Debug, Clone)]
pub struct TerminalProgress {
    tick: Duration,
    step: u8,
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            step: DEFAULT_STEP,
        }
    }
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn wait_for_key(&self) -> Result<bool, ProgressError> {
        if event::poll(self.tick)? {
            if let Event::Key(key) = event::read()? {
                return Ok(key.kind == KeyEventKind::Press);
            }
        }
        Ok(false)
    }
}

impl ProgressIndicator for TerminalProgress {
    fn run(&self) -> Result<ProgressOutcome, ProgressError> {
        if !std::io::stdout().is_terminal() {
            log::debug!("stdout is not a terminal, skipping progress animation.");
            return Ok(ProgressOutcome::Completed);
        }

        let bar = ProgressBar::new(u64::from(COMPLETE));
        bar.set_style(
            ProgressStyle::with_template("  {bar:40.cyan/magenta} {pos:>3}%  {msg}")?
                .progress_chars("█▓░"),
        );
        bar.set_message(t!("progress.hint"));

        terminal::enable_raw_mode()?;
        let _raw_mode = scopeguard::guard((), |_| {
            if let Err(e) = terminal::disable_raw_mode() {
                log::warn!("Failed to restore terminal mode: {}", e);
            }
        });

        let mut state = TickProgress::new(self.step);
        while !state.is_complete() {
            if self.wait_for_key()? {
                bar.abandon();
                log::debug!("Progress animation cancelled at {}%.", state.percent());
                return Ok(ProgressOutcome::Cancelled);
            }
            bar.set_position(u64::from(state.tick()));
        }
        bar.finish_and_clear();
        Ok(ProgressOutcome::Completed)
    }
}

/// Used when no animation is wanted (tests, `--yes`, piped output).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressIndicator for NoProgress {
    fn run(&self) -> Result<ProgressOutcome, ProgressError> {
        Ok(ProgressOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_progress_reaches_completion_in_ten_steps() {
        let mut state = TickProgress::default();
        let mut ticks = 0;
        while !state.is_complete() {
            state.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 10);
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn test_tick_progress_saturates_at_hundred() {
        let mut state = TickProgress::new(30);
        assert_eq!(state.tick(), 30);
        assert_eq!(state.tick(), 60);
        assert_eq!(state.tick(), 90);
        assert_eq!(state.tick(), 100);
        assert_eq!(state.tick(), 100);
        assert!(state.is_complete());
    }

    #[test]
    fn test_zero_step_still_progresses() {
        let mut state = TickProgress::new(0);
        assert_eq!(state.tick(), 1);
    }

    #[test]
    fn test_no_progress_completes_immediately() {
        assert_eq!(NoProgress.run().unwrap(), ProgressOutcome::Completed);
    }
}
