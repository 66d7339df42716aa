/// Error taxonomy shared by the grid, the generator and the driver.

use thiserror::Error;

use crate::domain::grid::Pos;

/// Which special cell the generator was trying to place.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpecialKind {
    Key,
    Trap,
}

impl std::fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecialKind::Key => f.write_str("key"),
            SpecialKind::Trap => f.write_str("trap"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("coordinate ({}, {}) outside {width}x{height} maze", pos.x, pos.y)]
    OutOfBounds { pos: Pos, width: usize, height: usize },

    #[error("could not place {kind} cell: {placed}/{wanted} placed after {attempts} samples")]
    PlacementExhausted {
        kind: SpecialKind,
        placed: usize,
        wanted: usize,
        attempts: usize,
    },

    #[error("exit at ({}, {}) was never carved", pos.x, pos.y)]
    ExitUnreachable { pos: Pos },

    #[error("invalid generation parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
