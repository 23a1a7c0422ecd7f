//! The run log: one entry per primitive action, plus terminal entries
//! added by the session.

use pilot_types::{Heading, Position, Turn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of a run's execution trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LogEntry {
    /// The rocket stepped onto `to`.
    Moved { to: Position },
    /// The rocket rotated and now faces `heading`.
    Turned { turn: Turn, heading: Heading },
    /// A step from `from` would have left the grid. Ends the run.
    Blocked { from: Position, attempted: Position },
    /// The run used up its step budget.
    StepLimitExceeded { limit: u64 },
    /// An internal fault was caught at the session boundary.
    ExecutionError { message: String },
    /// A line rejected in strict mode.
    SyntaxError { line: u32, message: String },
}

impl LogEntry {
    /// `true` for entries that end a run without it completing normally.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Moved { .. } | Self::Turned { .. })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved { to } => write!(f, "Moved to {to}"),
            Self::Turned { turn, heading } => write!(f, "Turned {turn}, now facing {heading}"),
            Self::Blocked { from, attempted } => write!(
                f,
                "Cannot move from {from} to {attempted}: outside the grid. Run stopped."
            ),
            Self::StepLimitExceeded { limit } => {
                write!(f, "Step limit of {limit} reached. Run stopped.")
            }
            Self::ExecutionError { message } => write!(f, "Execution error: {message}"),
            Self::SyntaxError { line, message } => write!(f, "Syntax error on line {line}: {message}"),
        }
    }
}
