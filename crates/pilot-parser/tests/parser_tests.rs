//! Parser tests for Pilot.
//!
//! Covers: primitive statements, repeat in quoted and bare form, comments
//! and blank lines, permissive dropping of unrecognised lines and repeat
//! entries, strict mode, spans, pretty-printing, and determinism.

use pilot_lexer::Lexer;
use pilot_parser::{parse, parse_permissive, ParseResult, Parser};
use pilot_types::ast::{Command, Primitive, Program, Repeat};
use pilot_types::{ErrorCode, ParseMode, Severity, SourceFile, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse_with(source: &str, mode: ParseMode) -> ParseResult {
    let sf = SourceFile::new("test.pilot", source);
    parse(&sf, mode)
}

/// Parse permissively and return just the commands.
fn commands(source: &str) -> Vec<Command> {
    parse_permissive(source).commands().cloned().collect()
}

/// Parse permissively and return the warning codes in source order.
fn warning_codes(source: &str) -> Vec<ErrorCode> {
    let result = parse_with(source, ParseMode::Permissive);
    result
        .diagnostics
        .iter_sorted()
        .iter()
        .map(|d| d.code)
        .collect()
}

fn repeat(count: u32, body: &[Primitive]) -> Command {
    Command::Repeat(Repeat {
        count,
        body: body.to_vec(),
    })
}

// ─────────────────────────────────────────────────────────────────────
// Primitive statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_primitives() {
    assert_eq!(
        commands("move();\nturnRight();\nturnLeft();"),
        vec![Command::Move, Command::TurnRight, Command::TurnLeft]
    );
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(
        commands("   move();   \n\tturnLeft();\t"),
        vec![Command::Move, Command::TurnLeft]
    );
}

#[test]
fn test_reference_starter_program() {
    let source = "// Guide the rocket to the star!\n\
                  // move() - step forward\n\
                  \n\
                  move();\n\
                  turnRight();\n\
                  move();";
    assert_eq!(
        commands(source),
        vec![Command::Move, Command::TurnRight, Command::Move]
    );
    assert!(warning_codes(source).is_empty());
}

#[test]
fn test_blank_and_comment_only_source() {
    assert!(parse_permissive("").is_empty());
    assert!(parse_permissive("\n\n   \n// nothing here\n").is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// repeat
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_repeat_double_quoted() {
    assert_eq!(
        commands(r#"repeat(5, ["move()"]);"#),
        vec![repeat(5, &[Primitive::Move])]
    );
}

#[test]
fn test_repeat_single_quoted_and_bare_mix() {
    assert_eq!(
        commands(r#"repeat(2, ['move()', turnRight(), "turnLeft()"]);"#),
        vec![repeat(
            2,
            &[Primitive::Move, Primitive::TurnRight, Primitive::TurnLeft]
        )]
    );
}

#[test]
fn test_repeat_entry_whitespace_inside_quotes() {
    assert_eq!(
        commands(r#"repeat(1, [" move() "]);"#),
        vec![repeat(1, &[Primitive::Move])]
    );
}

#[test]
fn test_repeat_zero_count() {
    assert_eq!(
        commands(r#"repeat(0, ["move()"]);"#),
        vec![repeat(0, &[Primitive::Move])]
    );
}

#[test]
fn test_repeat_empty_body() {
    assert_eq!(commands("repeat(3, []);"), vec![repeat(3, &[])]);
}

#[test]
fn test_repeat_unknown_entry_is_dropped() {
    let source = r#"repeat(2, ["move()", "fly()", "turnLeft()"]);"#;
    assert_eq!(
        commands(source),
        vec![repeat(2, &[Primitive::Move, Primitive::TurnLeft])]
    );
    assert_eq!(warning_codes(source), vec![ErrorCode::UNKNOWN_REPEAT_ENTRY]);
}

#[test]
fn test_repeat_entry_with_semicolon_is_dropped() {
    let source = r#"repeat(2, ["move();"]);"#;
    assert_eq!(commands(source), vec![repeat(2, &[])]);
    assert_eq!(warning_codes(source), vec![ErrorCode::UNKNOWN_REPEAT_ENTRY]);
}

#[test]
fn test_repeat_trailing_comma_is_harmless() {
    let source = r#"repeat(2, ["move()",]);"#;
    assert_eq!(commands(source), vec![repeat(2, &[Primitive::Move])]);
    assert!(warning_codes(source).is_empty());
}

#[test]
fn test_repeat_entry_with_mismatched_quotes() {
    let source = r#"repeat(2, ['move()"]);"#;
    assert_eq!(commands(source), vec![repeat(2, &[Primitive::Move])]);
    assert!(warning_codes(source).is_empty());
}

#[test]
fn test_repeat_mismatched_quotes_among_entries() {
    assert_eq!(
        commands(r#"repeat(3, ["turnLeft()', 'move()"]);"#),
        vec![repeat(3, &[Primitive::TurnLeft, Primitive::Move])]
    );
}

#[test]
fn test_repeat_quoted_entry_with_commas_is_split() {
    let source = r#"repeat(2, ["move(), turnRight()"]);"#;
    assert_eq!(
        commands(source),
        vec![repeat(2, &[Primitive::Move, Primitive::TurnRight])]
    );
    assert!(warning_codes(source).is_empty());
}

#[test]
fn test_repeat_split_entry_reports_unknown_piece() {
    let source = r#"repeat(1, ["move(), fly(), turnLeft()"]);"#;
    assert_eq!(
        commands(source),
        vec![repeat(1, &[Primitive::Move, Primitive::TurnLeft])]
    );
    let result = parse_with(source, ParseMode::Permissive);
    let d = &result.diagnostics.warnings[0];
    assert_eq!(d.code, ErrorCode::UNKNOWN_REPEAT_ENTRY);
    assert!(d.message.contains("'fly()'"), "{}", d.message);
    assert_eq!(result.diagnostics.total_warnings, 1);
}

#[test]
fn test_nested_repeat_is_left_out() {
    let source = r#"repeat(2, [repeat(2, ["move()"]), "turnLeft()"]);"#;
    assert_eq!(commands(source), vec![repeat(2, &[Primitive::TurnLeft])]);
    assert_eq!(warning_codes(source), vec![ErrorCode::NESTED_REPEAT]);
}

#[test]
fn test_repeat_count_too_large() {
    let source = r#"repeat(99999999999, ["move()"]);
move();"#;
    assert_eq!(commands(source), vec![Command::Move]);
    assert_eq!(
        warning_codes(source),
        vec![ErrorCode::REPEAT_COUNT_OUT_OF_RANGE]
    );
}

#[test]
fn test_malformed_repeat_lines_are_skipped() {
    for source in [
        "repeat;",
        "repeat(;",
        "repeat(three, [move()]);",
        r#"repeat(3 ["move()"]);"#,
        r#"repeat(3, "move()");"#,
        r#"repeat(3, ["move()");"#,
        r#"repeat(3, ["move()"];"#,
    ] {
        assert!(commands(source).is_empty(), "{source} should be skipped");
        assert_eq!(
            warning_codes(source),
            vec![ErrorCode::MALFORMED_REPEAT],
            "{source}"
        );
    }
}

#[test]
fn test_repeat_missing_semicolon() {
    let source = r#"repeat(3, ["move()"])"#;
    assert!(commands(source).is_empty());
    assert_eq!(warning_codes(source), vec![ErrorCode::MISSING_SEMICOLON]);
}

#[test]
fn test_negative_count_is_skipped() {
    let source = r#"repeat(-2, ["move()"]);"#;
    assert!(commands(source).is_empty());
    // Only the lexer reports the '-'.
    assert_eq!(warning_codes(source), vec![ErrorCode::UNEXPECTED_CHARACTER]);
}

// ─────────────────────────────────────────────────────────────────────
// Unrecognised lines
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_command_is_skipped() {
    let source = "move();\nmoveForward();\nturnLeft();";
    assert_eq!(commands(source), vec![Command::Move, Command::TurnLeft]);
    let result = parse_with(source, ParseMode::Permissive);
    let d = &result.diagnostics.warnings[0];
    assert_eq!(d.code, ErrorCode::UNKNOWN_COMMAND);
    assert_eq!(d.severity, Severity::Warning);
    assert_eq!(d.span.line, 2);
    assert_eq!(d.source_line, "moveForward();");
    assert!(d.message.contains("moveForward"));
}

#[test]
fn test_missing_semicolon_is_skipped() {
    let source = "move()\nturnRight();";
    assert_eq!(commands(source), vec![Command::TurnRight]);
    assert_eq!(warning_codes(source), vec![ErrorCode::MISSING_SEMICOLON]);
}

#[test]
fn test_arguments_to_primitive_are_rejected() {
    let source = "move(2);";
    assert!(commands(source).is_empty());
    assert_eq!(warning_codes(source), vec![ErrorCode::UNEXPECTED_TOKEN]);
}

#[test]
fn test_two_statements_on_one_line_drop_the_line() {
    let source = "move(); move();\nturnLeft();";
    assert_eq!(commands(source), vec![Command::TurnLeft]);
    assert_eq!(warning_codes(source), vec![ErrorCode::TRAILING_TOKENS]);
}

#[test]
fn test_trailing_comment_is_allowed() {
    assert_eq!(
        commands("move(); // go\nrepeat(2, [turnLeft()]); // spin"),
        vec![Command::Move, repeat(2, &[Primitive::TurnLeft])]
    );
}

#[test]
fn test_stray_tokens_are_skipped() {
    let source = "42\n\"move()\"\n);\nmove();";
    assert_eq!(commands(source), vec![Command::Move]);
    assert_eq!(
        warning_codes(source),
        vec![
            ErrorCode::UNEXPECTED_TOKEN,
            ErrorCode::UNEXPECTED_TOKEN,
            ErrorCode::UNEXPECTED_TOKEN
        ]
    );
}

#[test]
fn test_unknown_character_reported_once() {
    let source = "mo#ve();\nmove();";
    assert_eq!(commands(source), vec![Command::Move]);
    let codes = warning_codes(source);
    assert_eq!(codes[0], ErrorCode::UNKNOWN_COMMAND);
    assert_eq!(
        codes
            .iter()
            .filter(|c| **c == ErrorCode::UNEXPECTED_CHARACTER)
            .count(),
        1
    );
}

// ─────────────────────────────────────────────────────────────────────
// Strict mode
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_strict_mode_rejects_program() {
    let result = parse_with("move();\nmoveForward();", ParseMode::Strict);
    assert!(result.program.is_none());
    assert_eq!(result.diagnostics.total_errors, 1);
    assert_eq!(result.diagnostics.errors[0].severity, Severity::Error);
}

#[test]
fn test_strict_mode_accepts_clean_program() {
    let result = parse_with("move();\nrepeat(2, [move()]);", ParseMode::Strict);
    let program = result.program.expect("clean program should parse");
    assert_eq!(program.len(), 2);
    assert!(!result.diagnostics.has_errors());
}

#[test]
fn test_strict_mode_lexer_error_rejects_program() {
    let result = parse_with("move(); @", ParseMode::Strict);
    assert!(result.program.is_none());
    assert!(result.diagnostics.has_errors());
}

#[test]
fn test_permissive_mode_always_yields_program() {
    let result = parse_with("garbage ### ((\nrepeat(", ParseMode::Permissive);
    assert!(result.program.is_some());
    assert!(result.diagnostics.has_warnings());
    assert!(!result.diagnostics.has_errors());
}

// ─────────────────────────────────────────────────────────────────────
// Spans & structure
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_statement_spans_record_lines() {
    let program = parse_permissive("// intro\n\n  move();\nrepeat(2, [turnLeft()]);");
    assert_eq!(program.statements[0].line(), 3);
    assert_eq!(program.statements[0].span, Span::new(3, 3, 9));
    assert_eq!(program.statements[1].line(), 4);
    assert_eq!(program.statements[1].span, Span::new(4, 1, 24));
}

#[test]
fn test_entry_diagnostic_quotes_source_text() {
    let result = parse_with(r#"repeat(2, [jump(), "move()"]);"#, ParseMode::Permissive);
    let d = &result.diagnostics.warnings[0];
    assert_eq!(d.code, ErrorCode::UNKNOWN_REPEAT_ENTRY);
    assert_eq!(d.span, Span::new(1, 12, 17));
    assert!(d.message.contains("'jump()'"), "{}", d.message);
}

#[test]
fn test_parser_can_be_driven_directly() {
    let sf = SourceFile::new("direct.pilot", "turnLeft();");
    let tokens = Lexer::new(&sf).lex().tokens;
    let result = Parser::new(tokens, &sf).parse();
    assert_eq!(
        result.program,
        Some(Program::new(vec![pilot_types::ast::Statement::new(
            Command::TurnLeft,
            Span::new(1, 1, 11)
        )]))
    );
}

#[test]
fn test_pretty_print_reparses_to_same_commands() {
    let source = "move();\n  repeat(3, ['move()', turnRight()]);\n// c\nturnLeft();";
    let program = parse_permissive(source);
    let printed = program.to_string();
    assert_eq!(
        printed,
        "move();\nrepeat(3, [move(), turnRight()]);\nturnLeft();\n"
    );
    let reparsed: Vec<Command> = parse_permissive(&printed).commands().cloned().collect();
    assert_eq!(reparsed, commands(source));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parsing_is_idempotent() {
    let source = "move();\nrepeat(4, [\"move()\", turnLeft()]);\nfly();\nturnRight();";
    let first = parse_permissive(source);
    for i in 0..100 {
        assert_eq!(first, parse_permissive(source), "Determinism failure at iteration {i}");
    }
}
