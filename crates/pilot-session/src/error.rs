//! Faults caught at the session boundary.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, catch_unwind, AssertUnwindSafe};

thread_local! {
    /// Set while this thread is inside [`guarded`].
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// Pipeline stage a fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Parse,
    Execute,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "parser"),
            Self::Execute => write!(f, "executor"),
        }
    }
}

/// An internal fault. Never returned to callers of the session; it is
/// turned into an `ExecutionError` log entry instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("{stage} panicked: {message}")]
    Panicked { stage: RunStage, message: String },
}

impl RunError {
    fn from_panic(stage: RunStage, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        RunError::Panicked { stage, message }
    }
}

/// Run `f`, converting a panic into a [`RunError`].
pub(crate) fn guarded<T>(stage: RunStage, f: impl FnOnce() -> T) -> Result<T, RunError> {
    let outer = GUARDED.with(|g| g.replace(true));
    let result = catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|g| g.set(outer));
    result.map_err(|payload| RunError::from_panic(stage, payload))
}

/// Whether the current thread is running inside the session's fault
/// boundary.
pub fn in_fault_boundary() -> bool {
    GUARDED.with(Cell::get)
}

/// Replace the process panic hook so panics caught by the session are
/// logged at debug level instead of printed to stderr. Panics anywhere
/// else still go to the previous hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if in_fault_boundary() {
            tracing::debug!(%info, "panic caught at session boundary");
        } else {
            previous(info);
        }
    }));
}
