//! Pilot executor.
//!
//! Runs a parsed [`pilot_types::ast::Program`] against a [`pilot_types::World`].
//! Execution is lazy: [`Executor::steps`] yields one [`Step`] per primitive
//! action, carrying the rocket's state after that action and the log entry
//! describing it. Callers decide how fast to consume the steps.

pub mod executor;
pub mod log;

pub use executor::{ExecutionReport, Executor, Halt, Step, Steps};
pub use log::LogEntry;
