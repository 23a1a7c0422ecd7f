//! Core Pilot lexer: converts source text to a token stream.
//!
//! Features:
//! - Four keywords, identifiers, unsigned integer literals
//! - String literals delimited by `"` or `'` (raw, no escapes); an
//!   unmatched opening quote may be closed by the other kind
//! - Single-line comments stripped (`//`)
//! - Newline tokens, since statements are line-delimited
//! - Error recovery: bad characters become [`TokenKind::Unknown`] so the
//!   parser can drop just the affected line

use pilot_types::{Diagnostic, Diagnostics, ErrorCode, ParseMode, Severity, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The Pilot lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Source file for diagnostics.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, counted in chars).
    col: u32,
    /// Severity for everything this lexer reports.
    severity: Severity,
    diagnostics: Diagnostics,
}

/// Result of lexing: tokens + any diagnostics collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

impl<'src> Lexer<'src> {
    /// Create a permissive lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            severity: Severity::Warning,
            diagnostics: Diagnostics::empty(),
        }
    }

    /// Report findings as errors under [`ParseMode::Strict`].
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.severity = match mode {
            ParseMode::Permissive => Severity::Warning,
            ParseMode::Strict => Severity::Error,
        };
        self
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        LexResult {
            tokens,
            diagnostics: self.diagnostics,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    /// Span from a start column to the last consumed character on `line`.
    fn span_from(&self, line: u32, start_col: u32) -> Span {
        Span::new(line, start_col, self.col.saturating_sub(1).max(start_col))
    }

    fn emit(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.line).unwrap_or("").to_string();
        let diagnostic = Diagnostic::new(
            &self.source_file.name,
            code,
            self.severity,
            message,
            span,
            source_line,
        );
        self.diagnostics.push(diagnostic);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces, tabs and carriage returns. Newlines are tokens.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Skip a `// ...` comment up to, not including, the newline.
    fn skip_comment(&mut self) -> bool {
        if self.peek() == Some('/') && self.peek_at(1) == Some('/') {
            while !matches!(self.peek(), None | Some('\n')) {
                self.advance();
            }
            true
        } else {
            false
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if !self.skip_comment() {
                break;
            }
        }

        if self.at_end() {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        let start_line = self.line;
        let start_col = self.col;
        let start_pos = self.pos;
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        let kind = match ch {
            '\n' => {
                return Token::new(TokenKind::Newline, Span::point(start_line, start_col));
            }
            '"' | '\'' => return self.scan_string(ch, start_line, start_col),
            '0'..='9' => {
                while matches!(self.peek(), Some('0'..='9')) {
                    self.advance();
                }
                TokenKind::IntegerLit(self.source[start_pos..self.pos].to_string())
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                    self.advance();
                }
                let text = &self.source[start_pos..self.pos];
                TokenKind::from_keyword(text)
                    .unwrap_or_else(|| TokenKind::Identifier(text.to_string()))
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            other => {
                let span = self.span_from(start_line, start_col);
                self.emit(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{other}'"),
                    span,
                );
                TokenKind::Unknown(other)
            }
        };

        Token::new(kind, self.span_from(start_line, start_col))
    }

    /// Scan a string literal after its opening `quote`. Strings may not
    /// span lines. If the line ends before the matching quote, the string
    /// closes at the first quote of the other kind instead, so
    /// `'move()"` is the literal `move()`.
    fn scan_string(&mut self, quote: char, start_line: u32, start_col: u32) -> Token {
        let content_start = self.pos;
        // Byte offset and column of the first quote of the other kind.
        let mut other_quote: Option<(usize, u32)> = None;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    if let Some((pos, col)) = other_quote {
                        let content = self.source[content_start..pos].to_string();
                        self.pos = pos + 1;
                        self.col = col + 1;
                        return Token::new(
                            TokenKind::StringLiteral(content),
                            self.span_from(start_line, start_col),
                        );
                    }
                    let content = self.source[content_start..self.pos].to_string();
                    let span = self.span_from(start_line, start_col);
                    self.emit(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    return Token::new(TokenKind::StringLiteral(content), span);
                }
                Some(c) if c == quote => {
                    let content = self.source[content_start..self.pos].to_string();
                    self.advance();
                    return Token::new(
                        TokenKind::StringLiteral(content),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(c) => {
                    if other_quote.is_none() && matches!(c, '"' | '\'') {
                        other_quote = Some((self.pos, self.col));
                    }
                    self.advance();
                }
            }
        }
    }
}
