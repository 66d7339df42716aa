/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and messages.

use crate::domain::grid::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    Moved { to: Pos },
    KeyCollected { at: Pos, keys: u32 },
    Trapped { at: Pos },
    ExitLocked { keys: u32, required: u32 },
    LevelAdvanced { level: u32 },
    GenerationFailed,
}
