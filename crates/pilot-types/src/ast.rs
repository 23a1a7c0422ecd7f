//! Command AST for the Pilot language.
//!
//! A program is a flat list of statements, one per source line. The only
//! compound construct is `repeat`, whose body holds [`Primitive`]s and
//! therefore cannot contain another `repeat`.

use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three zero-argument actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    Move,
    TurnRight,
    TurnLeft,
}

impl Primitive {
    pub const ALL: [Primitive; 3] = [Primitive::Move, Primitive::TurnRight, Primitive::TurnLeft];

    /// The callee name as written in source.
    pub fn name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::TurnRight => "turnRight",
            Self::TurnLeft => "turnLeft",
        }
    }

    /// Look up a primitive by its call text, e.g. `"turnLeft()"`.
    pub fn from_call_text(text: &str) -> Option<Primitive> {
        let name = text.strip_suffix("()")?;
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.name())
    }
}

/// `repeat(count, [body...])`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub count: u32,
    pub body: Vec<Primitive>,
}

/// A single executable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    Move,
    TurnRight,
    TurnLeft,
    Repeat(Repeat),
}

impl Command {
    /// Returns the primitive for `Move`/`TurnRight`/`TurnLeft`, `None` for `Repeat`.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Move => Some(Primitive::Move),
            Self::TurnRight => Some(Primitive::TurnRight),
            Self::TurnLeft => Some(Primitive::TurnLeft),
            Self::Repeat(_) => None,
        }
    }

    /// Number of primitive actions this command performs if nothing halts it.
    pub fn primitive_count(&self) -> u64 {
        match self {
            Self::Repeat(r) => u64::from(r.count) * r.body.len() as u64,
            _ => 1,
        }
    }
}

impl From<Primitive> for Command {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Move => Command::Move,
            Primitive::TurnRight => Command::TurnRight,
            Primitive::TurnLeft => Command::TurnLeft,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeat(r) => {
                write!(f, "repeat({}, [", r.count)?;
                for (i, p) in r.body.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, "]);")
            }
            other => match other.as_primitive() {
                Some(p) => write!(f, "{p};"),
                None => Ok(()),
            },
        }
    }
}

/// A command plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub command: Command,
    pub span: Span,
}

impl Statement {
    pub fn new(command: Command, span: Span) -> Self {
        Self { command, span }
    }

    /// 1-based source line.
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

/// A parsed program: statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// The commands without their spans.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.statements.iter().map(|s| &s.command)
    }
}

/// Canonical source form, one statement per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{}", stmt.command)?;
        }
        Ok(())
    }
}
