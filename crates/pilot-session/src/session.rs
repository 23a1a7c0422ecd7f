//! The session controller: one level, one run at a time.

use crate::error::{guarded, RunError, RunStage};
use crate::outcome::{RunOutcome, RunStatus};
use pilot_eval::{Executor, Halt, LogEntry, Step, Steps};
use pilot_parser::ParseResult;
use pilot_types::ast::Command;
use pilot_types::{AgentState, ConfigError, Diagnostics, SourceFile, World, WorldConfig};
use sha2::{Digest, Sha256};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// File name learner source is reported under.
pub const SOURCE_NAME: &str = "main.pilot";

/// The program a new learner starts from.
pub const STARTER_PROGRAM: &str = "\
// Guide the rocket to the star!
// Commands:
// move() - step forward
// turnRight() - turn right
// turnLeft() - turn left
// repeat(n, [command1, command2]) - repeat n times

move();
turnRight();
move();
";

/// SHA-256 of `source`, hex encoded.
pub fn source_hash(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// Owns a level and runs learner programs on it.
///
/// At most one run is in flight at a time. While a [`RunHandle`] is alive,
/// [`Session::run_program`] and [`Session::start`] refuse new runs and
/// return `None`.
#[derive(Debug)]
pub struct Session {
    config: WorldConfig,
    world: World,
    running: AtomicBool,
}

impl Default for Session {
    /// The reference level.
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
            world: World::reference(),
            running: AtomicBool::new(false),
        }
    }
}

impl Session {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let world = config.validate()?;
        Ok(Self {
            config,
            world,
            running: AtomicBool::new(false),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Pause between steps when a run is played.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.config.step_delay_ms)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Parse and run `source` to completion, without pacing.
    pub fn run_program(&self, source: &str) -> Option<RunOutcome> {
        self.start(source).map(RunHandle::finish)
    }

    /// Parse `source` and return a handle that performs the run step by
    /// step. Every run starts from the level's starting state.
    pub fn start(&self, source: &str) -> Option<RunHandle<'_>> {
        let Some(guard) = RunGuard::acquire(&self.running) else {
            tracing::warn!("run refused: another run is in progress");
            return None;
        };

        let hash = source_hash(source);
        let span = tracing::info_span!("run", source_hash = %&hash[..12]);
        let mut handle = RunHandle {
            session: self,
            _guard: guard,
            span: span.clone(),
            source_hash: hash,
            delay: self.step_delay(),
            diagnostics: Diagnostics::empty(),
            log: Vec::new(),
            final_state: self.world.start,
            steps: None,
            halt: None,
            status: None,
        };

        let source_file = SourceFile::new(SOURCE_NAME, source);
        let mode = self.config.parse_mode;
        let parsed = span.in_scope(|| {
            guarded(RunStage::Parse, || pilot_parser::parse(&source_file, mode))
        });
        match parsed {
            Ok(ParseResult {
                program: Some(program),
                diagnostics,
            }) => {
                span.in_scope(|| {
                    tracing::debug!(
                        statements = program.len(),
                        actions = program.commands().map(Command::primitive_count).sum::<u64>(),
                        warnings = diagnostics.total_warnings,
                        "program parsed"
                    )
                });
                handle.diagnostics = diagnostics;
                handle.steps = Some(Executor::new(&program, &self.world).steps());
            }
            Ok(ParseResult {
                program: None,
                diagnostics,
            }) => {
                handle.log = diagnostics
                    .iter_sorted()
                    .into_iter()
                    .filter(|d| d.is_error())
                    .map(|d| LogEntry::SyntaxError {
                        line: d.span.line,
                        message: d.message.clone(),
                    })
                    .collect();
                handle.diagnostics = diagnostics;
                handle.status = Some(RunStatus::SyntaxErrors);
            }
            Err(err) => handle.record_fault(err),
        }
        Some(handle)
    }
}

/// Holds the session's run flag; clears it on drop, including during
/// unwinding.
#[derive(Debug)]
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| RunGuard(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A run in progress.
///
/// Steps are produced on demand by [`RunHandle::next_step`], or paced by
/// [`RunHandle::play`]. Dropping the handle ends the run and frees the
/// session.
#[derive(Debug)]
pub struct RunHandle<'s> {
    session: &'s Session,
    _guard: RunGuard<'s>,
    span: tracing::Span,
    source_hash: String,
    delay: Duration,
    diagnostics: Diagnostics,
    log: Vec<LogEntry>,
    final_state: AgentState,
    /// `None` once no further steps will be produced.
    steps: Option<Steps>,
    halt: Option<Halt>,
    /// Set when the run ended outside the executor (rejected, faulted,
    /// cancelled).
    status: Option<RunStatus>,
}

impl RunHandle<'_> {
    /// Override the pause used by [`RunHandle::play`].
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Log entries produced so far.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// The rocket's state after the latest step.
    pub fn agent(&self) -> AgentState {
        self.final_state
    }

    pub fn is_done(&self) -> bool {
        self.steps.is_none()
    }

    /// Perform the next primitive action.
    pub fn next_step(&mut self) -> Option<Step> {
        self.advance(Iterator::next)
    }

    /// Pull one step out of the executor with `pull`, inside the fault
    /// boundary.
    fn advance<F>(&mut self, pull: F) -> Option<Step>
    where
        F: FnOnce(&mut Steps) -> Option<Step>,
    {
        let span = self.span.clone();
        let _enter = span.enter();
        let steps = self.steps.as_mut()?;
        match guarded(RunStage::Execute, || pull(steps)) {
            Ok(Some(step)) => {
                tracing::debug!(index = step.index, line = step.line, entry = %step.entry, "step");
                self.final_state = step.snapshot;
                self.log.push(step.entry.clone());
                Some(step)
            }
            Ok(None) => {
                self.halt = steps.halt();
                self.steps = None;
                None
            }
            Err(err) => {
                self.record_fault(err);
                None
            }
        }
    }

    /// Hand each remaining step to `on_step`, pausing between steps.
    /// Returning `ControlFlow::Break` from the callback cancels the run.
    pub fn play<F>(&mut self, mut on_step: F)
    where
        F: FnMut(&Step) -> ControlFlow<()>,
    {
        let mut first = true;
        while let Some(step) = self.next_step() {
            if !first && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            first = false;
            if on_step(&step).is_break() {
                self.cancel();
                break;
            }
        }
    }

    /// Stop producing steps. A run that already ended keeps its status;
    /// otherwise it is marked aborted and counts as neither won nor lost.
    pub fn cancel(&mut self) {
        if self.status.is_none() && self.steps.take().is_some() {
            self.span.in_scope(|| tracing::info!(steps = self.log.len(), "run cancelled"));
            self.status = Some(RunStatus::Aborted);
        }
    }

    /// Run any remaining steps and produce the outcome.
    pub fn finish(mut self) -> RunOutcome {
        while self.next_step().is_some() {}

        let status = self.status.unwrap_or(match self.halt {
            None => RunStatus::Completed,
            Some(Halt::OutOfBounds { .. }) => RunStatus::OutOfBounds,
            Some(Halt::StepLimit { .. }) => RunStatus::StepLimit,
        });
        let executed = matches!(
            status,
            RunStatus::Completed | RunStatus::OutOfBounds | RunStatus::StepLimit
        );
        let won = executed && self.session.world.is_goal(&self.final_state);
        self.span.in_scope(|| {
            tracing::info!(?status, won, entries = self.log.len(), "run finished")
        });

        RunOutcome {
            final_state: self.final_state,
            log: self.log,
            won,
            status,
            diagnostics: self.diagnostics,
            source_hash: self.source_hash,
        }
    }

    pub(crate) fn record_fault(&mut self, err: RunError) {
        self.span
            .in_scope(|| tracing::warn!(error = %err, "fault caught at session boundary"));
        self.log.push(LogEntry::ExecutionError {
            message: err.to_string(),
        });
        self.steps = None;
        self.status = Some(RunStatus::Fault);
    }
}
