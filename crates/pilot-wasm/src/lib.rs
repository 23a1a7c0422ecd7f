//! Pilot runtime as a WASM module for browser environments.
//!
//! This crate exposes the Pilot session via `wasm-bindgen`. Every call is
//! self-contained: it builds a session from the given configuration, runs,
//! and returns JSON. The page animates the returned steps at its own pace.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run_program, default_source } from 'pilot-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(run_program(default_source(), ""));
//! // { verdict: "lost", outcome: { final_state: ..., log: [...] }, steps: [...] }
//! ```

use pilot_session::{RunOutcome, Session, Step, Verdict, WorldConfig, SOURCE_NAME, STARTER_PROGRAM};
use pilot_types::{ParseMode, SourceFile};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
#[serde(untagged)]
enum RunResponse {
    Finished {
        verdict: Verdict,
        outcome: RunOutcome,
        steps: Vec<Step>,
    },
    Rejected {
        error: String,
    },
}

fn run_response(source: &str, config_json: &str) -> RunResponse {
    let config = if config_json.trim().is_empty() {
        Ok(WorldConfig::default())
    } else {
        WorldConfig::from_json(config_json)
    };
    let session = match config.and_then(Session::new) {
        Ok(session) => session,
        Err(e) => {
            return RunResponse::Rejected {
                error: e.to_string(),
            }
        }
    };
    let Some(mut handle) = session.start(source) else {
        return RunResponse::Rejected {
            error: "a run is already in progress".to_string(),
        };
    };
    let mut steps = Vec::new();
    while let Some(step) = handle.next_step() {
        steps.push(step);
    }
    let outcome = handle.finish();
    RunResponse::Finished {
        verdict: outcome.verdict(),
        outcome,
        steps,
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(r#"{{"error":"Serialization error: {}"}}"#, e)
    })
}

/// Run a Pilot program.
///
/// `config_json` is a `WorldConfig` document; pass an empty string for the
/// reference level. Returns a JSON string:
/// ```json
/// {
///   "verdict": "won",
///   "outcome": { "final_state": { ... }, "log": [ ... ], "won": true, "status": "completed", ... },
///   "steps": [ { "index": 0, "line": 2, "snapshot": { ... }, "entry": { ... } } ]
/// }
/// ```
///
/// An invalid configuration yields `{ "error": "..." }`.
#[wasm_bindgen]
pub fn run_program(source: &str, config_json: &str) -> String {
    to_json(&run_response(source, config_json))
}

/// Check a Pilot program without running it.
///
/// Returns the diagnostics as JSON. Findings are warnings: the program
/// would still run with the offending lines skipped.
#[wasm_bindgen]
pub fn check(source: &str) -> String {
    let source_file = SourceFile::new(SOURCE_NAME, source);
    let result = pilot_parser::parse(&source_file, ParseMode::Permissive);
    to_json(&result.diagnostics)
}

/// The starter program shown in the editor.
#[wasm_bindgen]
pub fn default_source() -> String {
    STARTER_PROGRAM.to_string()
}

/// Return the runtime version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
