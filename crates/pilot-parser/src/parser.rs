//! Core parser infrastructure: token cursor, diagnostics, line recovery.

use pilot_lexer::token::{Token, TokenKind};
use pilot_types::ast::Program;
use pilot_types::{Diagnostic, Diagnostics, ErrorCode, ParseMode, Severity, SourceFile, Span};

/// Example shown to learners whose `repeat` line did not parse.
pub(crate) const REPEAT_EXAMPLE: &str = "repeat(3, [\"move()\", \"turnRight()\"]);";

/// The Pilot parser.
///
/// Consumes a token stream produced by the lexer and builds a [`Program`].
/// Lines that fail to parse are reported and skipped.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for diagnostic context.
    source_file: &'src SourceFile,
    /// Severity for everything this parser reports.
    severity: Severity,
    diagnostics: Diagnostics,
}

/// Result of parsing.
///
/// `program` is `None` only when errors (not warnings) were recorded.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<Program>,
    pub diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Create a permissive parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            severity: Severity::Warning,
            diagnostics: Diagnostics::empty(),
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.severity = match mode {
            ParseMode::Permissive => Severity::Warning,
            ParseMode::Strict => Severity::Error,
        };
        self
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing. Past the end this is
    /// the final `Eof`.
    pub(crate) fn peek(&self) -> Token {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => token.clone(),
            None => Token::new(TokenKind::Eof, Span::point(1, 1)),
        }
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// `true` at a `Newline` or `Eof`.
    pub(crate) fn at_line_end(&self) -> bool {
        self.peek_kind().is_line_end()
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        &self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────────

    /// Report at a specific span.
    pub(crate) fn report(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.report_with_suggestion(code, message, span, None::<String>);
    }

    pub(crate) fn report_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: Option<impl Into<String>>,
    ) {
        let source_line = self.source_file.line(span.line).unwrap_or("").to_string();
        let mut diagnostic = Diagnostic::new(
            &self.source_file.name,
            code,
            self.severity,
            message,
            span,
            source_line,
        );
        if let Some(s) = suggestion {
            diagnostic = diagnostic.with_suggestion(s);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report an unexpected current token. Tokens the lexer already
    /// flagged (`Unknown`) are not reported twice.
    pub(crate) fn unexpected(&mut self, code: ErrorCode, expected: &str) {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Unknown(_)) {
            return;
        }
        self.report(
            code,
            format!("expected {expected}, got '{}'", token.kind),
            token.span,
        );
    }

    /// The source text a span covers.
    pub(crate) fn source_text(&self, span: Span) -> String {
        let line = self.source_file.line(span.line).unwrap_or("");
        let start = span.start_col.saturating_sub(1) as usize;
        let len = (span.end_col + 1).saturating_sub(span.start_col) as usize;
        line.chars().skip(start).take(len).collect()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip the rest of the current line, including its newline.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
        self.eat(&TokenKind::Newline);
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Program`].
    pub fn parse(mut self) -> ParseResult {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            if let Some(stmt) = self.parse_line() {
                statements.push(stmt);
            }
            self.synchronize();
        }
        let program = if self.diagnostics.has_errors() {
            None
        } else {
            Some(Program::new(statements))
        };
        ParseResult {
            program,
            diagnostics: self.diagnostics,
        }
    }
}
