//! The executor: a cursor over the program that performs one primitive
//! action per `next()`.

use crate::log::LogEntry;
use pilot_types::ast::{Command, Primitive, Program};
use pilot_types::{AgentState, Position, Turn, World};
use serde::Serialize;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Why a run stopped before the program was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Halt {
    /// A `move()` would have left the grid.
    OutOfBounds { from: Position, attempted: Position },
    /// The step budget ran out.
    StepLimit { limit: u64 },
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { from, attempted } => {
                write!(f, "out of bounds moving from {from} to {attempted}")
            }
            Self::StepLimit { limit } => write!(f, "step limit of {limit} exhausted"),
        }
    }
}

/// One primitive action and the rocket's state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// 0-based position of this step in the run.
    pub index: u64,
    /// Source line of the statement that produced the action.
    pub line: u32,
    pub snapshot: AgentState,
    pub entry: LogEntry,
}

/// Everything a drained run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub final_state: AgentState,
    pub log: Vec<LogEntry>,
    pub halt: Option<Halt>,
    pub steps: Vec<Step>,
}

/// Runs one program in one world.
///
/// The executor itself holds no run state; every call to [`Executor::steps`]
/// starts again from the world's starting [`AgentState`].
#[derive(Debug, Clone)]
pub struct Executor {
    program: Arc<Program>,
    world: World,
}

impl Executor {
    pub fn new(program: &Program, world: &World) -> Self {
        Self {
            program: Arc::new(program.clone()),
            world: world.clone(),
        }
    }

    /// A fresh lazy run from the starting state.
    pub fn steps(&self) -> Steps {
        Steps {
            program: Arc::clone(&self.program),
            world: self.world.clone(),
            agent: self.world.start,
            stmt: 0,
            iteration: 0,
            body_pos: 0,
            taken: 0,
            index: 0,
            halt: None,
        }
    }

    /// Run to completion.
    pub fn run(&self) -> ExecutionReport {
        let mut steps = self.steps();
        let collected: Vec<Step> = steps.by_ref().collect();
        ExecutionReport {
            final_state: steps.agent(),
            log: collected.iter().map(|s| s.entry.clone()).collect(),
            halt: steps.halt(),
            steps: collected,
        }
    }
}

/// Lazy iterator over the steps of one run.
///
/// Yields nothing further once the program is exhausted or the run halts.
/// Owns everything it needs, so it can outlive the [`Executor`].
#[derive(Debug, Clone)]
pub struct Steps {
    program: Arc<Program>,
    world: World,
    agent: AgentState,
    /// Index of the statement being executed.
    stmt: usize,
    /// Completed iterations of the current `repeat`.
    iteration: u32,
    /// Next body entry of the current `repeat` iteration.
    body_pos: usize,
    /// Primitives performed so far, charged against `world.max_steps`.
    taken: u64,
    index: u64,
    halt: Option<Halt>,
}

impl Steps {
    /// The rocket's current state.
    pub fn agent(&self) -> AgentState {
        self.agent
    }

    /// Why the run stopped early, if it did.
    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    pub fn steps_taken(&self) -> u64 {
        self.taken
    }

    /// Advance the cursor to the next primitive to perform.
    fn next_primitive(&mut self) -> Option<(Primitive, u32)> {
        let program = Arc::clone(&self.program);
        loop {
            let stmt = program.statements.get(self.stmt)?;
            let line = stmt.line();
            match &stmt.command {
                Command::Repeat(repeat) => {
                    if repeat.body.is_empty() || self.iteration >= repeat.count {
                        self.next_statement();
                        continue;
                    }
                    let primitive = repeat.body[self.body_pos];
                    self.body_pos += 1;
                    if self.body_pos == repeat.body.len() {
                        self.body_pos = 0;
                        self.iteration += 1;
                    }
                    return Some((primitive, line));
                }
                command => {
                    self.next_statement();
                    if let Some(primitive) = command.as_primitive() {
                        return Some((primitive, line));
                    }
                }
            }
        }
    }

    fn next_statement(&mut self) {
        self.stmt += 1;
        self.iteration = 0;
        self.body_pos = 0;
    }

    /// Perform one primitive, updating the agent or recording a halt.
    fn perform(&mut self, primitive: Primitive) -> LogEntry {
        match primitive {
            Primitive::Move => {
                let from = self.agent.position;
                let attempted = from.step(self.agent.heading);
                if self.world.grid.contains(attempted) {
                    self.agent.position = attempted;
                    LogEntry::Moved { to: attempted }
                } else {
                    self.halt = Some(Halt::OutOfBounds { from, attempted });
                    LogEntry::Blocked { from, attempted }
                }
            }
            Primitive::TurnRight => self.turn(Turn::Right),
            Primitive::TurnLeft => self.turn(Turn::Left),
        }
    }

    fn turn(&mut self, turn: Turn) -> LogEntry {
        self.agent.heading = self.agent.heading.turned(turn);
        LogEntry::Turned {
            turn,
            heading: self.agent.heading,
        }
    }
}

impl Iterator for Steps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.halt.is_some() {
            return None;
        }
        let (primitive, line) = self.next_primitive()?;

        let entry = if self.taken >= self.world.max_steps {
            let limit = self.world.max_steps;
            self.halt = Some(Halt::StepLimit { limit });
            LogEntry::StepLimitExceeded { limit }
        } else {
            self.taken += 1;
            self.perform(primitive)
        };
        if let Some(halt) = &self.halt {
            tracing::debug!(line, %halt, steps = self.taken, "run halted");
        }

        let step = Step {
            index: self.index,
            line,
            snapshot: self.agent,
            entry,
        };
        self.index += 1;
        Some(step)
    }
}

impl FusedIterator for Steps {}
