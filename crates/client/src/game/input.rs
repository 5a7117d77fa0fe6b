use std::time::{Duration, Instant};

use bitflags::bitflags;
use crossterm::event::KeyCode;

use drift::MotionInput;

/// How long a press counts as held on terminals that never report releases.
/// Long enough to bridge the initial auto-repeat delay.
const HOLD_WINDOW: Duration = Duration::from_millis(300);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionalKeys: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl DirectionalKeys {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('w') => Some(Self::UP),
            KeyCode::Down | KeyCode::Char('s') => Some(Self::DOWN),
            KeyCode::Left | KeyCode::Char('a') => Some(Self::LEFT),
            KeyCode::Right | KeyCode::Char('d') => Some(Self::RIGHT),
            _ => None,
        }
    }

    pub fn motion(self) -> MotionInput {
        MotionInput::from_keys(
            self.contains(Self::UP),
            self.contains(Self::DOWN),
            self.contains(Self::LEFT),
            self.contains(Self::RIGHT),
        )
    }
}

/// Held-key state built from terminal key events.
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_press: [Option<Instant>; 4],
    reports_release: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, keys: DirectionalKeys, now: Instant) {
        for index in Self::slots(keys) {
            self.last_press[index] = Some(now);
        }
    }

    pub fn release(&mut self, keys: DirectionalKeys) {
        self.reports_release = true;
        for index in Self::slots(keys) {
            self.last_press[index] = None;
        }
    }

    pub fn held_at(&self, now: Instant) -> DirectionalKeys {
        let mut held = DirectionalKeys::empty();
        for (index, key) in DirectionalKeys::all().iter().enumerate() {
            let Some(pressed) = self.last_press[index] else {
                continue;
            };
            if self.reports_release || now.saturating_duration_since(pressed) <= HOLD_WINDOW {
                held |= key;
            }
        }
        held
    }

    fn slots(keys: DirectionalKeys) -> impl Iterator<Item = usize> {
        DirectionalKeys::all()
            .iter()
            .enumerate()
            .filter(move |(_, key)| keys.contains(*key))
            .map(|(index, _)| index)
    }
}
