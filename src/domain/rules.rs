/// Rule queries: pure functions over (position, input, cell, inventory).
///
/// This module owns the game constants and answers two questions:
///   1. Where does this frame's input try to take the player? (`target`)
///   2. What happens when the player enters a given cell? (`enter`)
///
/// No mutation here. `sim::step` applies the answers to the world.

use crate::domain::cell::Cell;
use crate::domain::entity::{FrameInput, MoveDir};
use crate::domain::grid::Pos;
use crate::error::{GameError, Result};

/// Constants for one run: maze shape, special-cell counts, score deltas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationParameters {
    pub width: usize,
    pub height: usize,
    pub key_count: usize,
    pub trap_count: usize,
    pub required_keys: u32,
    pub key_score: i64,
    pub trap_score: i64,
    pub level_score: i64,
    /// Samples allowed per special cell before giving up.
    pub max_placement_attempts: usize,
    /// Whole-maze generations tried on a level transition.
    pub generation_attempts: usize,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        // 800x600 window, 40px cells -> 20x15, rounded down to odd.
        GenerationParameters {
            width: 19,
            height: 15,
            key_count: 3,
            trap_count: 5,
            required_keys: 3,
            key_score: 50,
            trap_score: -20,
            level_score: 100,
            max_placement_attempts: 10_000,
            generation_attempts: 3,
        }
    }
}

impl GenerationParameters {
    /// Number of odd interior coordinates, i.e. maze nodes after carving.
    pub fn odd_interior_cells(&self) -> usize {
        (self.width / 2) * (self.height / 2)
    }

    pub fn exit_pos(&self) -> Pos {
        Pos::new(self.width - 2, self.height - 2)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> { Err(GameError::InvalidParameters { reason }) };

        if self.width < 3 || self.height < 3 {
            return invalid(format!("maze {}x{} is too small", self.width, self.height));
        }
        if self.width % 2 == 0 || self.height % 2 == 0 {
            return invalid(format!("maze {}x{} must have odd dimensions", self.width, self.height));
        }
        // start + exit + keys + traps must all fit on distinct nodes
        let needed = 2 + self.key_count + self.trap_count;
        if needed > self.odd_interior_cells() {
            return invalid(format!(
                "{} keys and {} traps do not fit in a {}x{} maze",
                self.key_count, self.trap_count, self.width, self.height,
            ));
        }
        if self.required_keys as usize > self.key_count {
            return invalid(format!(
                "{} keys required but only {} placed",
                self.required_keys, self.key_count,
            ));
        }
        if self.max_placement_attempts == 0 || self.generation_attempts == 0 {
            return invalid("retry bounds must be at least 1".into());
        }
        Ok(())
    }
}

/// What fired when the player entered a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interaction {
    None,
    KeyCollected,
    Trapped,
    LevelAdvanced,
    ExitLocked,
}

/// Resolve this frame's target. Every held direction is applied on its own;
/// a direction that would leave the grid is dropped. Returns `None` when the
/// held directions produce no displacement (nothing held, or opposites).
pub fn target(pos: Pos, input: FrameInput, width: usize, height: usize) -> Option<Pos> {
    let mut next = pos;
    for dir in MoveDir::ALL {
        if !input.is_held(dir) {
            continue;
        }
        match dir {
            MoveDir::Left if pos.x > 0 => next.x -= 1,
            MoveDir::Right if pos.x + 1 < width => next.x += 1,
            MoveDir::Up if pos.y > 0 => next.y -= 1,
            MoveDir::Down if pos.y + 1 < height => next.y += 1,
            _ => {}
        }
    }
    if next == pos { None } else { Some(next) }
}

/// Entry rule for a cell. `None` means the move is rejected (wall).
pub fn enter(cell: Cell, keys_collected: u32, required_keys: u32) -> Option<Interaction> {
    if !cell.is_walkable() {
        return None;
    }
    match cell {
        Cell::Wall | Cell::Path => Some(Interaction::None),
        Cell::Key => Some(Interaction::KeyCollected),
        Cell::Trap => Some(Interaction::Trapped),
        Cell::Exit if keys_collected >= required_keys => Some(Interaction::LevelAdvanced),
        Cell::Exit => Some(Interaction::ExitLocked),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(dirs: &[MoveDir]) -> FrameInput {
        let mut input = FrameInput::default();
        for &d in dirs {
            input.set(d, true);
        }
        input
    }

    // ── Targets ──

    #[test]
    fn single_direction_targets() {
        let p = Pos::new(3, 3);
        assert_eq!(target(p, held(&[MoveDir::Left]), 7, 7), Some(Pos::new(2, 3)));
        assert_eq!(target(p, held(&[MoveDir::Right]), 7, 7), Some(Pos::new(4, 3)));
        assert_eq!(target(p, held(&[MoveDir::Up]), 7, 7), Some(Pos::new(3, 2)));
        assert_eq!(target(p, held(&[MoveDir::Down]), 7, 7), Some(Pos::new(3, 4)));
    }

    #[test]
    fn combined_directions_move_diagonally() {
        let p = Pos::new(3, 3);
        let t = target(p, held(&[MoveDir::Right, MoveDir::Down]), 7, 7);
        assert_eq!(t, Some(Pos::new(4, 4)));
    }

    #[test]
    fn opposite_directions_cancel() {
        let p = Pos::new(3, 3);
        assert_eq!(target(p, held(&[MoveDir::Left, MoveDir::Right]), 7, 7), None);
        assert_eq!(target(p, FrameInput::default(), 7, 7), None);
    }

    #[test]
    fn edge_directions_are_dropped() {
        // at the top-left corner only Right/Down can apply
        let p = Pos::new(0, 0);
        assert_eq!(target(p, held(&[MoveDir::Left]), 5, 5), None);
        assert_eq!(target(p, held(&[MoveDir::Up]), 5, 5), None);
        assert_eq!(
            target(p, held(&[MoveDir::Up, MoveDir::Right]), 5, 5),
            Some(Pos::new(1, 0)),
        );
        let q = Pos::new(4, 4);
        assert_eq!(target(q, held(&[MoveDir::Right, MoveDir::Down]), 5, 5), None);
    }

    // ── Entry rules ──

    #[test]
    fn entry_rules_by_cell() {
        assert_eq!(enter(Cell::Wall, 0, 3), None);
        assert_eq!(enter(Cell::Path, 0, 3), Some(Interaction::None));
        assert_eq!(enter(Cell::Key, 2, 3), Some(Interaction::KeyCollected));
        assert_eq!(enter(Cell::Trap, 3, 3), Some(Interaction::Trapped));
    }

    #[test]
    fn exit_gate() {
        assert_eq!(enter(Cell::Exit, 0, 3), Some(Interaction::ExitLocked));
        assert_eq!(enter(Cell::Exit, 2, 3), Some(Interaction::ExitLocked));
        assert_eq!(enter(Cell::Exit, 3, 3), Some(Interaction::LevelAdvanced));
        assert_eq!(enter(Cell::Exit, 4, 3), Some(Interaction::LevelAdvanced));
    }

    // ── Parameters ──

    #[test]
    fn default_parameters_are_valid() {
        let p = GenerationParameters::default();
        p.validate().unwrap();
        assert_eq!(p.odd_interior_cells(), 9 * 7);
        assert_eq!(p.exit_pos(), Pos::new(17, 13));
    }

    #[test]
    fn even_dimensions_rejected() {
        let p = GenerationParameters { width: 20, ..Default::default() };
        assert!(matches!(p.validate(), Err(GameError::InvalidParameters { .. })));
    }

    #[test]
    fn overcrowded_maze_rejected() {
        // 5x5 has 4 nodes: start + exit + 3 keys + 5 traps cannot fit
        let p = GenerationParameters { width: 5, height: 5, ..Default::default() };
        assert!(p.validate().is_err());

        let p = GenerationParameters {
            width: 5,
            height: 5,
            key_count: 1,
            trap_count: 1,
            required_keys: 1,
            ..Default::default()
        };
        p.validate().unwrap();
    }

    #[test]
    fn unreachable_key_requirement_rejected() {
        let p = GenerationParameters { required_keys: 4, ..Default::default() };
        assert!(p.validate().is_err());
    }
}
