//! Pilot parser: converts a token stream into a [`Program`].
//!
//! Parsing is line-oriented. Each non-blank line holds at most one
//! statement; a line that does not form a valid statement is dropped and
//! reported, and parsing continues on the next line.

mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser};

use pilot_lexer::Lexer;
use pilot_types::ast::Program;
use pilot_types::{ParseMode, SourceFile};

/// Lex and parse `source_file` in one go, merging lexer and parser
/// diagnostics.
pub fn parse(source_file: &SourceFile, mode: ParseMode) -> ParseResult {
    let lexed = Lexer::new(source_file).with_mode(mode).lex();
    let mut result = Parser::new(lexed.tokens, source_file)
        .with_mode(mode)
        .parse();
    result.diagnostics.extend(lexed.diagnostics);
    if result.diagnostics.has_errors() {
        result.program = None;
    }
    result
}

/// Parse learner source permissively, discarding diagnostics.
///
/// Never fails: unrecognised lines are simply absent from the program.
pub fn parse_permissive(source: &str) -> Program {
    let sf = SourceFile::new("main.pilot", source);
    parse(&sf, ParseMode::Permissive)
        .program
        .unwrap_or_default()
}
