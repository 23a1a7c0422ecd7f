use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics stored before the rest are only counted.
pub const MAX_DIAGNOSTICS: usize = 20;

/// Diagnostic severity.
///
/// Permissive parsing reports every finding as a `Warning` (the offending
/// line is dropped and the run goes on); strict parsing reports `Error`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

/// Numeric diagnostic code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical (E100–E199) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);

    // ── Syntax (E200–E299) ──
    pub const UNKNOWN_COMMAND: Self = Self(200);
    pub const MALFORMED_REPEAT: Self = Self(201);
    pub const UNKNOWN_REPEAT_ENTRY: Self = Self(202);
    pub const REPEAT_COUNT_OUT_OF_RANGE: Self = Self(203);
    pub const NESTED_REPEAT: Self = Self(204);
    pub const TRAILING_TOKENS: Self = Self(205);
    pub const MISSING_SEMICOLON: Self = Self(206);
    pub const UNEXPECTED_TOKEN: Self = Self(207);

    /// Get the category for this code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Syntax => write!(f, "syntax"),
        }
    }
}

/// A structured finding about learner source.
///
/// The presentation layer renders these directly; it never parses the
/// message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source file name.
    pub file: String,
    pub code: ErrorCode,
    pub severity: Severity,
    /// Derived from `code`.
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, verbatim.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        severity: Severity,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Collected diagnostics for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }

    /// Record a diagnostic, routed by its severity. At most
    /// [`MAX_DIAGNOSTICS`] of each kind are stored; all are counted.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => {
                if self.errors.len() < MAX_DIAGNOSTICS {
                    self.errors.push(diagnostic);
                }
                self.total_errors += 1;
            }
            Severity::Warning => {
                if self.warnings.len() < MAX_DIAGNOSTICS {
                    self.warnings.push(diagnostic);
                }
                self.total_warnings += 1;
            }
        }
    }

    /// Move every diagnostic from `other` into `self`.
    pub fn extend(&mut self, other: Diagnostics) {
        let dropped_errors = other.total_errors - other.errors.len();
        let dropped_warnings = other.total_warnings - other.warnings.len();
        for d in other.errors.into_iter().chain(other.warnings) {
            self.push(d);
        }
        self.total_errors += dropped_errors;
        self.total_warnings += dropped_warnings;
    }

    /// Iterate over all stored diagnostics in source order.
    pub fn iter_sorted(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self.errors.iter().chain(&self.warnings).collect();
        all.sort_by_key(|d| (d.span.line, d.span.start_col));
        all
    }
}
