/// Entities: the player token and the per-frame input that drives it.

use crate::domain::grid::Pos;

/// Movement direction (continuous while key held)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Left, MoveDir::Right, MoveDir::Up, MoveDir::Down];
}

/// Frame input: the held state of all four directions, sampled once per tick.
/// Several directions may be held at once; each one adjusts the target
/// independently before the combined move is validated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl FrameInput {
    /// Input with exactly one direction held.
    pub fn single(dir: MoveDir) -> Self {
        let mut input = FrameInput::default();
        input.set(dir, true);
        input
    }

    pub fn set(&mut self, dir: MoveDir, held: bool) {
        match dir {
            MoveDir::Left => self.left = held,
            MoveDir::Right => self.right = held,
            MoveDir::Up => self.up = held,
            MoveDir::Down => self.down = held,
        }
    }

    pub fn is_held(&self, dir: MoveDir) -> bool {
        match dir {
            MoveDir::Left => self.left,
            MoveDir::Right => self.right,
            MoveDir::Up => self.up,
            MoveDir::Down => self.down,
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// Everything about the player that survives between frames.
///
/// `score` is signed: traps can push it below zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub pos: Pos,
    pub keys_collected: u32,
    pub level: u32,
    pub score: i64,
}

impl PlayerState {
    pub fn new() -> Self {
        PlayerState {
            pos: Pos::START,
            keys_collected: 0,
            level: 1,
            score: 0,
        }
    }

    /// Back to the start cell, e.g. after a trap.
    pub fn respawn(&mut self) {
        self.pos = Pos::START;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player() {
        let p = PlayerState::new();
        assert_eq!(p.pos, Pos::START);
        assert_eq!(p.keys_collected, 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.score, 0);
    }

    #[test]
    fn frame_input_single_direction() {
        for dir in MoveDir::ALL {
            let input = FrameInput::single(dir);
            assert!(input.is_held(dir));
            assert!(!input.is_idle());
            let others = MoveDir::ALL.iter().filter(|&&d| d != dir);
            for &d in others {
                assert!(!input.is_held(d));
            }
        }
        assert!(FrameInput::default().is_idle());
    }
}
