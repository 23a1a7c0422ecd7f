//! Token types for the Pilot lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the command language and
//! [`Token`], which pairs a kind with a source [`Span`].

use pilot_types::ast::Primitive;
use pilot_types::Span;
use std::fmt;

/// The four reserved words.
pub const ALL_KEYWORDS: &[&str] = &["move", "turnRight", "turnLeft", "repeat"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Pilot lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Keywords ─────────────────────────────────────────────

    /// `move`
    Move,
    /// `turnRight`
    TurnRight,
    /// `turnLeft`
    TurnLeft,
    /// `repeat`
    Repeat,

    // ── Literals ─────────────────────────────────────────────

    /// Any other word, e.g. `moveForward`.
    Identifier(String),
    /// Unsigned decimal digits, kept as written so the parser can
    /// range-check them.
    IntegerLit(String),
    /// `"..."` or `'...'`, raw content without the quotes.
    StringLiteral(String),

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,

    // ── Special ──────────────────────────────────────────────

    /// A character outside the language. A diagnostic has been recorded.
    Unknown(char),
    /// Line break. Statements are line-delimited.
    Newline,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a reserved word.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "move" => TokenKind::Move,
            "turnRight" => TokenKind::TurnRight,
            "turnLeft" => TokenKind::TurnLeft,
            "repeat" => TokenKind::Repeat,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Move | TokenKind::TurnRight | TokenKind::TurnLeft | TokenKind::Repeat
        )
    }

    /// The primitive a keyword names, if any.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TokenKind::Move => Some(Primitive::Move),
            TokenKind::TurnRight => Some(Primitive::TurnRight),
            TokenKind::TurnLeft => Some(Primitive::TurnLeft),
            _ => None,
        }
    }

    /// `true` for tokens that end a line.
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Move => write!(f, "move"),
            TokenKind::TurnRight => write!(f, "turnRight"),
            TokenKind::TurnLeft => write!(f, "turnLeft"),
            TokenKind::Repeat => write!(f, "repeat"),
            TokenKind::Identifier(name) => write!(f, "{name}"),
            TokenKind::IntegerLit(digits) => write!(f, "{digits}"),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Unknown(ch) => write!(f, "{ch}"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
