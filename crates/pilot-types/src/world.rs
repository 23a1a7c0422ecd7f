//! The grid world the rocket moves in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell, 0-indexed. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `heading`. May be off-grid.
    pub fn step(self, heading: Heading) -> Position {
        let (dx, dy) = heading.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Right,
    Left,
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "right"),
            Self::Left => write!(f, "left"),
        }
    }
}

/// Facing direction. Ordinals run clockwise from `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Heading for an ordinal, taken mod 4.
    pub fn from_ordinal(ordinal: u8) -> Heading {
        Self::ALL[usize::from(ordinal % 4)]
    }

    /// Rotate a quarter turn clockwise.
    pub fn turn_right(self) -> Heading {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Rotate a quarter turn counter-clockwise.
    pub fn turn_left(self) -> Heading {
        Self::from_ordinal(self.ordinal() + 3)
    }

    pub fn turned(self, turn: Turn) -> Heading {
        match turn {
            Turn::Right => self.turn_right(),
            Turn::Left => self.turn_left(),
        }
    }

    /// Unit displacement `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Arrow glyph used by the board renderers.
    pub fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Right => '→',
            Self::Down => '↓',
            Self::Left => '←',
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

/// Square grid of `size × size` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: u32,
}

impl Grid {
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// `true` iff both coordinates lie in `[0, size)`.
    pub fn contains(&self, pos: Position) -> bool {
        let n = i64::from(self.size);
        (0..n).contains(&i64::from(pos.x)) && (0..n).contains(&i64::from(pos.y))
    }
}

/// The rocket: where it is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AgentState {
    pub position: Position,
    pub heading: Heading,
}

impl AgentState {
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {}", self.position, self.heading)
    }
}

/// A validated world: everything a run needs besides the program.
///
/// Built with [`crate::WorldConfig::validate`]; the start and target cells
/// are guaranteed to lie on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct World {
    pub grid: Grid,
    pub start: AgentState,
    pub target: Position,
    /// Primitive actions a single run may perform before it is halted.
    pub max_steps: u64,
}

impl World {
    /// The reference level: 6×6 grid, rocket bottom-left facing up,
    /// star top-right.
    pub fn reference() -> World {
        World {
            grid: Grid::new(6),
            start: AgentState::new(Position::new(0, 5), Heading::Up),
            target: Position::new(5, 0),
            max_steps: crate::config::DEFAULT_MAX_STEPS,
        }
    }

    /// `true` when `agent` stands on the target cell. Heading is ignored.
    pub fn is_goal(&self, agent: &AgentState) -> bool {
        agent.position == self.target
    }
}

impl Default for World {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_right_cycles_clockwise() {
        assert_eq!(Heading::Up.turn_right(), Heading::Right);
        assert_eq!(Heading::Right.turn_right(), Heading::Down);
        assert_eq!(Heading::Down.turn_right(), Heading::Left);
        assert_eq!(Heading::Left.turn_right(), Heading::Up);
    }

    #[test]
    fn test_turn_left_cycles_counter_clockwise() {
        assert_eq!(Heading::Up.turn_left(), Heading::Left);
        assert_eq!(Heading::Left.turn_left(), Heading::Down);
        assert_eq!(Heading::Down.turn_left(), Heading::Right);
        assert_eq!(Heading::Right.turn_left(), Heading::Up);
    }

    #[test]
    fn test_turns_are_inverse() {
        for h in Heading::ALL {
            assert_eq!(h.turn_right().turn_left(), h);
            assert_eq!(h.turn_left().turn_right(), h);
        }
    }

    #[test]
    fn test_four_turns_restore_heading() {
        for h in Heading::ALL {
            let mut cur = h;
            for _ in 0..4 {
                cur = cur.turned(Turn::Right);
            }
            assert_eq!(cur, h);
        }
    }

    #[test]
    fn test_from_ordinal_wraps() {
        assert_eq!(Heading::from_ordinal(0), Heading::Up);
        assert_eq!(Heading::from_ordinal(5), Heading::Right);
        assert_eq!(Heading::Left.ordinal(), 3);
    }

    #[test]
    fn test_deltas() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Heading::Up), Position::new(2, 1));
        assert_eq!(origin.step(Heading::Right), Position::new(3, 2));
        assert_eq!(origin.step(Heading::Down), Position::new(2, 3));
        assert_eq!(origin.step(Heading::Left), Position::new(1, 2));
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(6);
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(5, 5)));
        assert!(!grid.contains(Position::new(6, 0)));
        assert!(!grid.contains(Position::new(0, 6)));
        assert!(!grid.contains(Position::new(-1, 3)));
        assert!(!grid.contains(Position::new(3, -1)));
    }

    #[test]
    fn test_reference_world() {
        let world = World::reference();
        assert_eq!(world.grid.size, 6);
        assert_eq!(world.start.position, Position::new(0, 5));
        assert_eq!(world.start.heading, Heading::Up);
        assert_eq!(world.target, Position::new(5, 0));
    }

    #[test]
    fn test_goal_ignores_heading() {
        let world = World::reference();
        for h in Heading::ALL {
            assert!(world.is_goal(&AgentState::new(Position::new(5, 0), h)));
        }
        assert!(!world.is_goal(&world.start));
    }

    #[test]
    fn test_display() {
        let agent = AgentState::new(Position::new(1, 4), Heading::Right);
        assert_eq!(agent.to_string(), "(1, 4) facing right");
    }

    #[test]
    fn test_heading_json() {
        assert_eq!(serde_json::to_string(&Heading::Down).unwrap(), "\"down\"");
        let h: Heading = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(h, Heading::Left);
    }
}
