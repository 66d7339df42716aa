//! Pure game data and rules: no I/O, no randomness.

pub mod cell;
pub mod entity;
pub mod grid;
pub mod rules;
