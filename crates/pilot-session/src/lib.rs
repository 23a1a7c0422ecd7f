//! Pilot session controller.
//!
//! ```text
//! Source → Lexer → Parser → Executor (lazy steps) → RunOutcome
//! ```
//!
//! A [`Session`] owns one level and runs learner programs on it, one at a
//! time. Runs are either driven to completion with [`Session::run_program`]
//! or stepped and paced through a [`RunHandle`]. Internal faults are caught
//! here and reported as log entries; they never reach the caller.

mod error;
mod outcome;
mod render;
mod session;

pub use error::{in_fault_boundary, install_panic_hook, RunError, RunStage};
pub use outcome::{RunOutcome, RunStatus, Verdict};
pub use render::render_grid;
pub use session::{source_hash, RunHandle, Session, SOURCE_NAME, STARTER_PROGRAM};

pub use pilot_eval::{LogEntry, Step};
pub use pilot_types::{ConfigError, ParseMode, WorldConfig};
