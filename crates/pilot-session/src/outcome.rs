//! The result of one run.

use pilot_eval::LogEntry;
use pilot_types::{AgentState, Diagnostics};
use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// Every command ran.
    Completed,
    /// A move would have left the grid.
    OutOfBounds,
    /// The step budget ran out.
    StepLimit,
    /// Strict mode rejected the program; nothing ran.
    SyntaxErrors,
    /// An internal fault was caught.
    Fault,
    /// The run was cancelled through its handle.
    Aborted,
}

/// What the learner is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Won,
    Lost,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub final_state: AgentState,
    pub log: Vec<LogEntry>,
    /// The rocket ended on the target. Always `false` for faulted,
    /// rejected or aborted runs.
    pub won: bool,
    pub status: RunStatus,
    pub diagnostics: Diagnostics,
    /// SHA-256 of the source text, hex encoded.
    pub source_hash: String,
}

impl RunOutcome {
    pub fn verdict(&self) -> Verdict {
        if self.status == RunStatus::Aborted {
            Verdict::Aborted
        } else if self.won {
            Verdict::Won
        } else {
            Verdict::Lost
        }
    }
}
