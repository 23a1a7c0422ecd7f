//! Shared types for Pilot.
//!
//! This crate defines the command AST, the grid world model, world
//! configuration, source spans and diagnostics used by every stage of the
//! Pilot pipeline.

mod error;
mod span;
pub mod ast;
pub mod config;
pub mod world;

pub use config::{ConfigError, ParseMode, WorldConfig};
pub use error::{Diagnostic, Diagnostics, ErrorCategory, ErrorCode, Severity, MAX_DIAGNOSTICS};
pub use span::{SourceFile, Span};
pub use world::{AgentState, Grid, Heading, Position, Turn, World};
