//! Text rendering of the board.

use pilot_types::{AgentState, Position, World};

/// Render the board row by row, top row first. The rocket is drawn as its
/// heading arrow, the target as `*` and empty cells as `.`; cells are
/// separated by a space.
pub fn render_grid(world: &World, agent: &AgentState) -> String {
    let size = world.grid.size as i32;
    let mut out = String::new();
    for y in 0..size {
        let row: Vec<String> = (0..size)
            .map(|x| {
                let cell = Position::new(x, y);
                if cell == agent.position {
                    agent.heading.arrow()
                } else if cell == world.target {
                    '*'
                } else {
                    '.'
                }
                .to_string()
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_types::{Grid, Heading};

    #[test]
    fn test_reference_board() {
        let world = World::reference();
        let board = render_grid(&world, &world.start);
        assert_eq!(
            board,
            ". . . . . *\n\
             . . . . . .\n\
             . . . . . .\n\
             . . . . . .\n\
             . . . . . .\n\
             ↑ . . . . .\n"
        );
    }

    #[test]
    fn test_rocket_on_target_hides_star() {
        let world = World {
            grid: Grid::new(2),
            start: AgentState::new(Position::new(0, 0), Heading::Up),
            target: Position::new(1, 1),
            max_steps: 10,
        };
        let agent = AgentState::new(Position::new(1, 1), Heading::Left);
        assert_eq!(render_grid(&world, &agent), ". .\n. ←\n");
    }
}
