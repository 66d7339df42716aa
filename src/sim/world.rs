/// WorldState: the complete snapshot of a running game.
///
/// Owns the current maze, the player, the run's parameters and the random
/// source. Only `sim::step` mutates it during play; the renderer reads it.
///
/// The maze is replaced wholesale on level change. Nothing carries over from
/// the old maze.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::cell::Cell;
use crate::domain::entity::PlayerState;
use crate::domain::grid::{Maze, Pos};
use crate::domain::rules::GenerationParameters;
use crate::error::Result;
use crate::sim::generator;

pub struct WorldState {
    pub maze: Maze,
    pub player: PlayerState,
    pub params: GenerationParameters,
    pub rng: StdRng,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

// ── Construction ──

impl WorldState {
    /// Start a new run at level 1. `seed` makes the whole run reproducible.
    pub fn new(params: GenerationParameters, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut world = WorldState {
            maze: Maze::new(params.width, params.height),
            player: PlayerState::new(),
            params,
            rng,
            message: String::new(),
            message_timer: 0,
        };
        world.maze = world.generate_maze()?;
        Ok(world)
    }

    /// Build around an existing maze. Used by tests to script exact layouts.
    #[cfg(test)]
    pub fn with_maze(params: GenerationParameters, maze: Maze, seed: u64) -> Self {
        WorldState {
            maze,
            player: PlayerState::new(),
            params,
            rng: StdRng::seed_from_u64(seed),
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Cell query / mutation API ──

impl WorldState {
    /// Cell at `pos`, out of bounds reads as wall.
    #[inline]
    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.maze.cell_at(pos)
    }

    /// Overwrite a cell. Callers pass coordinates they already validated;
    /// anything else is a broken contract, not a runtime condition.
    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        if let Err(e) = self.maze.set(pos, cell) {
            panic!("set_cell precondition violated: {e}");
        }
    }
}

// ── Maze generation ──

impl WorldState {
    /// Generate a fresh maze, retrying whole generations up to
    /// `params.generation_attempts` times. Returns the last error on failure.
    pub fn generate_maze(&mut self) -> Result<Maze> {
        let attempts = self.params.generation_attempts.max(1);
        let mut attempt = 1;
        loop {
            match generator::generate(&self.params, &mut self.rng) {
                Ok(maze) => return Ok(maze),
                Err(e) if attempt < attempts => {
                    warn!("maze generation attempt {attempt}/{attempts} failed: {e}");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Regenerate the current level: new maze, keys and position reset,
    /// level and score untouched. On failure the old maze stays in place.
    pub fn restart_level(&mut self) -> Result<()> {
        let maze = self.generate_maze()?;
        self.maze = maze;
        self.player.keys_collected = 0;
        self.player.respawn();
        info!("level {} restarted", self.player.level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_starts_at_level_one() {
        let w = WorldState::new(GenerationParameters::default(), Some(3)).unwrap();
        assert_eq!(w.player, PlayerState::new());
        assert_eq!(w.cell_at(Pos::START), Cell::Path);
        assert_eq!(w.maze.count(Cell::Key), 3);
    }

    #[test]
    fn seeded_worlds_match() {
        let a = WorldState::new(GenerationParameters::default(), Some(11)).unwrap();
        let b = WorldState::new(GenerationParameters::default(), Some(11)).unwrap();
        assert_eq!(a.maze, b.maze);
    }

    #[test]
    fn invalid_parameters_fail_construction() {
        let params = GenerationParameters { height: 4, ..Default::default() };
        assert!(WorldState::new(params, Some(0)).is_err());
    }

    #[test]
    fn restart_keeps_level_and_score() {
        let mut w = WorldState::new(GenerationParameters::default(), Some(5)).unwrap();
        w.player.level = 4;
        w.player.score = 310;
        w.player.keys_collected = 2;
        w.player.pos = Pos::new(3, 1);
        let before = w.maze.clone();

        w.restart_level().unwrap();
        assert_eq!(w.player.level, 4);
        assert_eq!(w.player.score, 310);
        assert_eq!(w.player.keys_collected, 0);
        assert_eq!(w.player.pos, Pos::START);
        assert_ne!(w.maze, before);
    }

    #[test]
    #[should_panic(expected = "precondition")]
    fn set_cell_out_of_bounds_panics() {
        let mut w = WorldState::new(GenerationParameters::default(), Some(0)).unwrap();
        w.set_cell(Pos::new(100, 0), Cell::Path);
    }
}
