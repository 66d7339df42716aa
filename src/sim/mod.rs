//! World state and the per-tick simulation, including maze generation.

pub mod event;
pub mod generator;
pub mod step;
pub mod world;
