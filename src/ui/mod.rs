//! Terminal presentation: rendering, keyboard and gamepad input, sound.

pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sound;
