/// Keyboard state tracker.
///
/// Movement is level-triggered: a direction counts for every tick its key is
/// held, and all held directions are sampled together into one `FrameInput`.
/// A direction pressed since the last tick counts once even if it was
/// released before the tick came.
/// Commands (restart, quit) are edge-triggered on the initial press.
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::{FrameInput, MoveDir};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn keys_for(dir: MoveDir) -> &'static [KeyCode] {
    match dir {
        MoveDir::Left => KEYS_LEFT,
        MoveDir::Right => KEYS_RIGHT,
        MoveDir::Up => KEYS_UP,
        MoveDir::Down => KEYS_DOWN,
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Directions freshly pressed since the last `take_frame_input()`.
    /// Survives drains so short taps reach the next tick.
    pending: FrameInput,

    /// Ctrl+C seen during the most recent drain.
    interrupted: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            pending: FrameInput::default(),
            interrupted: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.interrupted = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.interrupted = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Enhancement not confirmed; rely on timeout-based expiry
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                    if let Some(dir) = MoveDir::ALL.into_iter().find(|&d| keys_for(d).contains(&key.code)) {
                        self.pending.set(dir, true);
                    }
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active.get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Directions for this tick: everything held now plus anything pressed
    /// since the previous call. Call once per simulation tick.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let mut input = std::mem::take(&mut self.pending);
        for dir in MoveDir::ALL {
            if self.any_held(keys_for(dir)) {
                input.set(dir, true);
            }
        }
        input
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_pressed(KEYS_RESTART)
    }

    pub fn quit_requested(&self) -> bool {
        self.interrupted || self.any_pressed(KEYS_QUIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn held_arrows_and_wasd_combine() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.apply(press(KeyCode::Right), now);
        kb.apply(press(KeyCode::Char('s')), now);
        let input = kb.take_frame_input();
        assert!(input.right && input.down);
        assert!(!input.left && !input.up);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.apply(press(KeyCode::Char('r')), now);
        assert!(kb.restart_pressed());
        kb.fresh_presses.clear();
        kb.apply(press(KeyCode::Char('r')), now);
        assert!(!kb.restart_pressed());
    }

    #[test]
    fn release_honored_only_when_enabled() {
        let mut kb = InputState::new();
        let now = Instant::now();
        kb.apply(press(KeyCode::Left), now);
        let mut release = press(KeyCode::Left);
        release.kind = KeyEventKind::Release;

        kb.apply(release, now);
        kb.fresh_presses.clear();
        assert!(kb.take_frame_input().left);
        // still held on the following tick: the release was ignored
        assert!(kb.take_frame_input().left);

        kb.honor_release = true;
        kb.apply(release, now);
        kb.fresh_presses.clear();
        assert!(!kb.take_frame_input().left);
    }

    #[test]
    fn tap_between_ticks_moves_once() {
        let mut kb = InputState::new();
        kb.honor_release = true;
        let now = Instant::now();
        kb.apply(press(KeyCode::Char('d')), now);
        let mut release = press(KeyCode::Char('d'));
        release.kind = KeyEventKind::Release;
        kb.apply(release, now);
        // a later drain forgets the edge before the tick samples input
        kb.fresh_presses.clear();

        let input = kb.take_frame_input();
        assert!(input.right);
        assert!(!input.left && !input.up && !input.down);
        assert!(kb.take_frame_input().is_idle());
    }

    #[test]
    fn ctrl_c_and_escape_quit() {
        let mut kb = InputState::new();
        kb.apply(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(kb.quit_requested());

        let mut kb = InputState::new();
        kb.apply(press(KeyCode::Esc), Instant::now());
        assert!(kb.quit_requested());
        assert!(kb.take_frame_input().is_idle());
    }
}
