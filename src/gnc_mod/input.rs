use std::collections::VecDeque;

use super::mode::AutopilotMode;

// ---------------------------------------------------------------------------
// Discrete commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ToggleIgnition,
    SelectMode(AutopilotMode),
    Restart,
    TogglePause,
    ToggleAirbrakes,
    RunTests,
}

/// Keyboard surface, named after DOM `KeyboardEvent.code` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Digit(u8),
    KeyR,
    KeyP,
    KeyA,
    KeyT,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Key> {
        let key = match code {
            "Space" => Key::Space,
            "KeyR" => Key::KeyR,
            "KeyP" => Key::KeyP,
            "KeyA" => Key::KeyA,
            "KeyT" => Key::KeyT,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => {
                let digit = code.strip_prefix("Digit")?.parse::<u8>().ok()?;
                Key::Digit(digit)
            }
        };
        Some(key)
    }

    /// Discrete command bound to a key press, if any.
    pub fn event(self) -> Option<InputEvent> {
        match self {
            Key::Space => Some(InputEvent::ToggleIgnition),
            Key::Digit(d) => AutopilotMode::from_digit(d).map(InputEvent::SelectMode),
            Key::KeyR => Some(InputEvent::Restart),
            Key::KeyP => Some(InputEvent::TogglePause),
            Key::KeyA => Some(InputEvent::ToggleAirbrakes),
            Key::KeyT => Some(InputEvent::RunTests),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Continuous holds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldControls {
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl HeldControls {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::ArrowUp => self.thrust_up = pressed,
            Key::ArrowDown => self.thrust_down = pressed,
            Key::ArrowLeft => self.rotate_left = pressed,
            Key::ArrowRight => self.rotate_right = pressed,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Bounded per-tick event queue
// ---------------------------------------------------------------------------

/// Events buffered between ticks, drained in arrival order. The owner clears
/// the queue after every tick, so anything not consumed that tick is lost.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns false (and drops the event) when the queue is full.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= self.capacity {
            log::warn!("input queue full ({}), dropping {:?}", self.capacity, event);
            return false;
        }
        self.events.push_back(event);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Everything the operator did since the last tick.
#[derive(Debug, Clone)]
pub struct InputFrame {
    pub queue: InputQueue,
    pub held: HeldControls,
}

impl InputFrame {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: InputQueue::new(capacity),
            held: HeldControls::default(),
        }
    }

    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.held.set(key, true);
            if let Some(ev) = key.event() {
                self.queue.push(ev);
            }
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.held.set(key, false);
        }
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn codes_map_to_events() {
        assert_eq!(Key::from_code("Space").and_then(Key::event), Some(InputEvent::ToggleIgnition));
        assert_eq!(
            Key::from_code("Digit3").and_then(Key::event),
            Some(InputEvent::SelectMode(AutopilotMode::Hover))
        );
        assert_eq!(Key::from_code("Digit9").and_then(Key::event), None);
        assert_eq!(Key::from_code("KeyT").and_then(Key::event), Some(InputEvent::RunTests));
        assert_eq!(Key::from_code("ArrowUp").and_then(Key::event), None);
        assert_eq!(Key::from_code("KeyZ"), None);
    }

    #[test]
    fn queue_is_bounded_and_ordered() {
        let mut q = InputQueue::new(2);
        assert!(q.push(InputEvent::ToggleIgnition));
        assert!(q.push(InputEvent::Restart));
        assert!(!q.push(InputEvent::TogglePause));
        let seen: Vec<_> = q.iter().copied().collect();
        assert_eq!(seen, vec![InputEvent::ToggleIgnition, InputEvent::Restart]);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn holds_follow_key_state() {
        let mut f = InputFrame::new(4);
        f.key_down("ArrowLeft");
        f.key_down("ArrowUp");
        assert!(f.held.rotate_left && f.held.thrust_up);
        assert!(f.queue.is_empty());
        f.key_up("ArrowLeft");
        assert!(!f.held.rotate_left);
        f.key_down("Digit4");
        assert_eq!(f.queue.len(), 1);
    }
}
