//! Statement parsing.
//!
//! ```text
//! line      ::= primitive ";" | repeat
//! primitive ::= ("move" | "turnRight" | "turnLeft") "(" ")"
//! repeat    ::= "repeat" "(" INT "," "[" [ entry { "," entry } ] "]" ")" ";"
//! entry     ::= primitive | STRING    (STRING holds one or more comma-separated calls)
//! ```
//!
//! A `repeat` entry is never itself a `repeat`: bodies are one level deep.

use crate::parser::{Parser, REPEAT_EXAMPLE};
use pilot_lexer::token::{Token, TokenKind};
use pilot_types::ast::{Command, Primitive, Repeat, Statement};
use pilot_types::{ErrorCode, Span};

impl<'src> Parser<'src> {
    /// Parse one line. Returns `None` when the line is dropped; the cursor
    /// is left somewhere on that line for [`Parser::synchronize`].
    pub(crate) fn parse_line(&mut self) -> Option<Statement> {
        let start = self.current_span();
        let command = match self.peek_kind() {
            kind if kind.as_primitive().is_some() => self.parse_primitive_stmt()?,
            TokenKind::Repeat => self.parse_repeat_stmt()?,
            TokenKind::Identifier(name) => {
                let span = self.current_span();
                self.report_with_suggestion(
                    ErrorCode::UNKNOWN_COMMAND,
                    format!("unknown command '{name}'"),
                    span,
                    Some("available commands: move(), turnRight(), turnLeft(), repeat(n, [...])"),
                );
                return None;
            }
            _ => {
                self.unexpected(ErrorCode::UNEXPECTED_TOKEN, "a command");
                return None;
            }
        };
        self.expect_line_end()?;
        Some(Statement::new(command, start.merge(self.previous_span())))
    }

    /// `move();`, `turnRight();`, `turnLeft();`
    fn parse_primitive_stmt(&mut self) -> Option<Command> {
        let primitive = self.parse_primitive_call()?;
        self.expect_semicolon()?;
        Some(primitive.into())
    }

    /// `name()` without the semicolon.
    fn parse_primitive_call(&mut self) -> Option<Primitive> {
        let Some(primitive) = self.advance().kind.as_primitive() else {
            return None;
        };
        if !self.eat(&TokenKind::LParen) {
            self.unexpected(ErrorCode::UNEXPECTED_TOKEN, "'('");
            return None;
        }
        if !self.eat(&TokenKind::RParen) {
            self.unexpected(ErrorCode::UNEXPECTED_TOKEN, "')'");
            return None;
        }
        Some(primitive)
    }

    fn expect_semicolon(&mut self) -> Option<()> {
        if self.eat(&TokenKind::Semicolon) {
            return Some(());
        }
        if self.at_line_end() {
            let span = self.previous_span();
            self.report_with_suggestion(
                ErrorCode::MISSING_SEMICOLON,
                "missing ';' at end of statement",
                span,
                Some("end every command with ';'"),
            );
        } else {
            self.unexpected(ErrorCode::UNEXPECTED_TOKEN, "';'");
        }
        None
    }

    /// A statement must be the only thing on its line.
    fn expect_line_end(&mut self) -> Option<()> {
        if self.at_line_end() {
            return Some(());
        }
        let span = self.current_span();
        self.report_with_suggestion(
            ErrorCode::TRAILING_TOKENS,
            format!("unexpected '{}' after statement", self.peek_kind()),
            span,
            Some("put each command on its own line"),
        );
        None
    }

    // ── repeat ────────────────────────────────────────────────────────────────

    /// `repeat(count, [entries]);`
    fn parse_repeat_stmt(&mut self) -> Option<Command> {
        self.advance(); // eat `repeat`
        self.expect_repeat(&TokenKind::LParen, "'(' after repeat")?;
        let count = self.parse_repeat_count()?;
        self.expect_repeat(&TokenKind::Comma, "',' after the repeat count")?;
        self.expect_repeat(&TokenKind::LBracket, "'[' to open the command list")?;
        let body = self.parse_repeat_body()?;
        self.expect_repeat(&TokenKind::RParen, "')' to close repeat")?;
        self.expect_semicolon()?;
        Some(Command::Repeat(Repeat { count, body }))
    }

    fn expect_repeat(&mut self, kind: &TokenKind, expected: &str) -> Option<()> {
        if self.eat(kind) {
            return Some(());
        }
        self.malformed_repeat(expected);
        None
    }

    fn malformed_repeat(&mut self, expected: &str) {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Unknown(_)) {
            return;
        }
        self.report_with_suggestion(
            ErrorCode::MALFORMED_REPEAT,
            format!("malformed repeat: expected {expected}, got '{}'", token.kind),
            token.span,
            Some(REPEAT_EXAMPLE),
        );
    }

    fn parse_repeat_count(&mut self) -> Option<u32> {
        let token = self.peek();
        let TokenKind::IntegerLit(digits) = &token.kind else {
            self.malformed_repeat("a repeat count");
            return None;
        };
        self.advance();
        match digits.parse::<u32>() {
            Ok(count) => Some(count),
            Err(_) => {
                self.report(
                    ErrorCode::REPEAT_COUNT_OUT_OF_RANGE,
                    format!("repeat count {digits} is too large (maximum {})", u32::MAX),
                    token.span,
                );
                None
            }
        }
    }

    /// Entries up to and including the closing `]`. Unrecognised entries
    /// are reported and left out of the body; they do not drop the line.
    fn parse_repeat_body(&mut self) -> Option<Vec<Primitive>> {
        let mut body = Vec::new();
        loop {
            let entry = self.collect_entry()?;
            self.classify_entry(&entry, &mut body);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            if self.eat(&TokenKind::RBracket) {
                return Some(body);
            }
            self.malformed_repeat("']' to close the command list");
            return None;
        }
    }

    /// Gather the tokens of one entry: everything up to a `,` or `]` that
    /// is not nested inside parentheses or brackets.
    fn collect_entry(&mut self) -> Option<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Comma | TokenKind::RBracket if depth == 0 => return Some(tokens),
                kind if kind.is_line_end() => {
                    self.malformed_repeat("']' to close the command list");
                    return None;
                }
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            tokens.push(self.advance());
        }
    }

    /// Map an entry to primitives, or report why it was left out.
    ///
    /// A quoted entry is split on `,` first, so `"move(), turnLeft()"`
    /// contributes two primitives. Empty pieces are ignored.
    fn classify_entry(&mut self, entry: &[Token], body: &mut Vec<Primitive>) {
        let (Some(first), Some(last)) = (entry.first(), entry.last()) else {
            return;
        };
        let span = first.span.merge(last.span);
        match entry {
            [Token {
                kind: TokenKind::StringLiteral(text),
                ..
            }] => {
                for piece in text.split(',').map(strip_quotes).filter(|p| !p.is_empty()) {
                    match Primitive::from_call_text(piece) {
                        Some(primitive) => body.push(primitive),
                        None => self.unknown_entry(piece, span),
                    }
                }
                return;
            }
            [call, open, close]
                if open.kind == TokenKind::LParen && close.kind == TokenKind::RParen =>
            {
                if let Some(primitive) = call.kind.as_primitive() {
                    body.push(primitive);
                    return;
                }
            }
            _ => {}
        }
        if entry.iter().any(|t| matches!(t.kind, TokenKind::Unknown(_))) {
            return;
        }
        if first.kind == TokenKind::Repeat {
            self.report_with_suggestion(
                ErrorCode::NESTED_REPEAT,
                "repeat cannot be used inside another repeat; entry left out",
                span,
                Some("list the repeated commands directly in the outer repeat"),
            );
        } else {
            let text = self.source_text(span);
            self.unknown_entry(&text, span);
        }
    }

    fn unknown_entry(&mut self, text: &str, span: Span) {
        self.report_with_suggestion(
            ErrorCode::UNKNOWN_REPEAT_ENTRY,
            format!("'{text}' is not a command; entry left out of the repeat body"),
            span,
            Some("use \"move()\", \"turnRight()\" or \"turnLeft()\""),
        );
    }
}

/// Trim an entry's text and drop any quote characters left inside it.
fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}
