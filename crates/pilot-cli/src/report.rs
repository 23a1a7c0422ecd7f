//! Terminal formatting for diagnostics, steps and outcomes.

use pilot_session::{RunOutcome, RunStatus, Step, Verdict};
use pilot_types::{Diagnostic, Diagnostics, Severity};

/// Render a diagnostic with its source line and a caret underline:
///
/// ```text
/// warning[E200]: unknown command 'moveForward'
///  --> main.pilot:2:1
///   |
/// 2 | moveForward();
///   | ^^^^^^^^^^^
///   = help: available commands: ...
/// ```
pub fn format_diagnostic(d: &Diagnostic) -> String {
    let label = match d.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let line_no = d.span.line.to_string();
    let gutter = " ".repeat(line_no.len());
    let pad = " ".repeat(d.span.start_col.saturating_sub(1) as usize);
    let width = (d.span.end_col + 1).saturating_sub(d.span.start_col).max(1) as usize;

    let mut out = format!("{label}[{}]: {}\n", d.code, d.message);
    out.push_str(&format!("{gutter}--> {}:{}:{}\n", d.file, d.span.line, d.span.start_col));
    out.push_str(&format!("{gutter} |\n"));
    out.push_str(&format!("{line_no} | {}\n", d.source_line));
    out.push_str(&format!("{gutter} | {pad}{}\n", "^".repeat(width)));
    if let Some(help) = &d.suggestion {
        out.push_str(&format!("{gutter} = help: {help}\n"));
    }
    out
}

/// One-line summary: `"2 warnings"`, `"1 error, 3 warnings"`, `"no problems"`.
pub fn summarize(diagnostics: &Diagnostics) -> String {
    let mut parts = Vec::new();
    if diagnostics.total_errors > 0 {
        parts.push(plural(diagnostics.total_errors, "error"));
    }
    if diagnostics.total_warnings > 0 {
        parts.push(plural(diagnostics.total_warnings, "warning"));
    }
    if parts.is_empty() {
        "no problems".to_string()
    } else {
        parts.join(", ")
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

pub fn format_step(step: &Step) -> String {
    format!("{:>4}. [line {}] {}", step.index + 1, step.line, step.entry)
}

pub fn format_outcome(outcome: &RunOutcome) -> String {
    let headline = match outcome.verdict() {
        Verdict::Won => "The rocket reached the star!",
        Verdict::Aborted => "Run cancelled.",
        Verdict::Lost => match outcome.status {
            RunStatus::SyntaxErrors => "The program has errors and was not run.",
            RunStatus::Fault => "Something went wrong while running the program.",
            _ => "The rocket did not reach the star. Try again!",
        },
    };
    format!("{headline}\nRocket at {}", outcome.final_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_session::{LogEntry, Session};
    use pilot_types::{ErrorCode, Span};

    #[test]
    fn test_format_diagnostic() {
        let d = Diagnostic::new(
            "main.pilot",
            ErrorCode::UNKNOWN_COMMAND,
            Severity::Warning,
            "unknown command 'moveForward'",
            Span::new(2, 1, 11),
            "moveForward();",
        )
        .with_suggestion("available commands: move()");
        assert_eq!(
            format_diagnostic(&d),
            "warning[E200]: unknown command 'moveForward'\n \
             --> main.pilot:2:1\n  \
             |\n\
             2 | moveForward();\n  \
             | ^^^^^^^^^^^\n  \
             = help: available commands: move()\n"
        );
    }

    #[test]
    fn test_caret_is_offset_to_column() {
        let d = Diagnostic::new(
            "main.pilot",
            ErrorCode::UNEXPECTED_CHARACTER,
            Severity::Error,
            "unexpected character '-'",
            Span::new(1, 6, 6),
            "move(-1);",
        );
        let text = format_diagnostic(&d);
        assert!(text.starts_with("error[E100]"));
        assert!(text.contains("\n  |      ^\n"), "{text}");
    }

    #[test]
    fn test_summarize() {
        let session = Session::default();
        let outcome = session.run_program("fly();\njump();\nmove();").unwrap();
        assert_eq!(summarize(&outcome.diagnostics), "2 warnings");
        assert_eq!(summarize(&Diagnostics::empty()), "no problems");
    }

    #[test]
    fn test_format_step_and_outcome() {
        let session = Session::default();
        let mut handle = session.start("move();").unwrap();
        let step = handle.next_step().unwrap();
        assert_eq!(format_step(&step), "   1. [line 1] Moved to (0, 4)");
        let outcome = handle.finish();
        assert_eq!(
            format_outcome(&outcome),
            "The rocket did not reach the star. Try again!\nRocket at (0, 4) facing up"
        );
        assert_eq!(outcome.log, vec![step.entry]);
        assert!(matches!(outcome.log[0], LogEntry::Moved { .. }));
    }
}
