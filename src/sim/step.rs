/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Message timer
///   2. Target resolution (all held directions combined, bounds-clipped)
///   3. Wall check (rejected moves change nothing)
///   4. Entry rule for the target cell (path / key / trap / exit)
///
/// Every transition is a function of (player state, entered cell). Nothing
/// here reads the clock or touches I/O; the caller turns the emitted
/// events into sound and the renderer reads the world afterwards.

use log::{error, info};

use crate::domain::cell::Cell;
use crate::domain::entity::{FrameInput, MoveDir};
use crate::domain::grid::Pos;
use crate::domain::rules::{self, Interaction};
use super::event::GameEvent;
use super::world::WorldState;

const MESSAGE_TICKS: u32 = 20;

/// Result of one move attempt, as reported to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub interaction: Interaction,
    pub score: i64,
    pub level: u32,
    pub keys_collected: u32,
    pub position: Pos,
}

impl MoveOutcome {
    fn snapshot(world: &WorldState, accepted: bool, interaction: Interaction) -> Self {
        MoveOutcome {
            accepted,
            interaction,
            score: world.player.score,
            level: world.player.level,
            keys_collected: world.player.keys_collected,
            position: world.player.pos,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Apply one frame of held input. Returns `None` when the input produces no
/// displacement (nothing held, or only opposite/edge-clipped directions).
pub fn step(world: &mut WorldState, input: FrameInput, events: &mut Vec<GameEvent>) -> Option<MoveOutcome> {
    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 { world.message.clear(); }
    }

    if input.is_idle() {
        return None;
    }
    let target = rules::target(world.player.pos, input, world.maze.width(), world.maze.height())?;
    Some(resolve_move(world, target, events))
}

/// Single-direction move. A direction that would leave the grid is rejected
/// like a wall.
#[cfg_attr(not(test), allow(dead_code))]
pub fn attempt_move(world: &mut WorldState, dir: MoveDir) -> MoveOutcome {
    let mut events = Vec::new();
    match step(world, FrameInput::single(dir), &mut events) {
        Some(outcome) => outcome,
        None => MoveOutcome::snapshot(world, false, Interaction::None),
    }
}

// ══════════════════════════════════════════════════════════════
// Resolution
// ══════════════════════════════════════════════════════════════

fn resolve_move(world: &mut WorldState, target: Pos, events: &mut Vec<GameEvent>) -> MoveOutcome {
    let cell = world.cell_at(target);
    let required = world.params.required_keys;

    let interaction = match rules::enter(cell, world.player.keys_collected, required) {
        Some(i) => i,
        None => return MoveOutcome::snapshot(world, false, Interaction::None),
    };

    world.player.pos = target;
    events.push(GameEvent::Moved { to: target });

    let fired = match interaction {
        Interaction::None => Interaction::None,
        Interaction::KeyCollected => {
            collect_key(world, target, events);
            Interaction::KeyCollected
        }
        Interaction::Trapped => {
            spring_trap(world, target, events);
            Interaction::Trapped
        }
        Interaction::ExitLocked => {
            let keys = world.player.keys_collected;
            events.push(GameEvent::ExitLocked { keys, required });
            world.set_message(&format!("Exit sealed: {keys}/{required} keys"), MESSAGE_TICKS);
            Interaction::ExitLocked
        }
        Interaction::LevelAdvanced => advance_level(world, events),
    };

    MoveOutcome::snapshot(world, true, fired)
}

fn collect_key(world: &mut WorldState, at: Pos, events: &mut Vec<GameEvent>) {
    world.set_cell(at, Cell::Path);
    world.player.keys_collected += 1;
    world.player.score += world.params.key_score;
    let keys = world.player.keys_collected;
    events.push(GameEvent::KeyCollected { at, keys });
    if keys == world.params.required_keys {
        world.set_message("All keys found! The exit is open", MESSAGE_TICKS);
    }
}

/// The trap stays armed: entering it again fires again.
fn spring_trap(world: &mut WorldState, at: Pos, events: &mut Vec<GameEvent>) {
    world.player.score += world.params.trap_score;
    world.player.respawn();
    events.push(GameEvent::Trapped { at });
}

/// Swap in a new maze and bump the level. If every generation attempt fails
/// the transition is abandoned and the player simply stands on the exit.
fn advance_level(world: &mut WorldState, events: &mut Vec<GameEvent>) -> Interaction {
    match world.generate_maze() {
        Ok(maze) => {
            world.maze = maze;
            world.player.level += 1;
            world.player.score += world.params.level_score;
            world.player.keys_collected = 0;
            world.player.respawn();
            let level = world.player.level;
            info!("advanced to level {level}, score {}", world.player.score);
            events.push(GameEvent::LevelAdvanced { level });
            world.set_message(&format!("Level {level}"), MESSAGE_TICKS);
            Interaction::LevelAdvanced
        }
        Err(e) => {
            error!("level transition aborted: {e}");
            events.push(GameEvent::GenerationFailed);
            world.set_message("The labyrinth refuses to shift. Try again", MESSAGE_TICKS);
            Interaction::None
        }
    }
}
