use fugit::{MillisDurationU32, TimerInstantU32};

use super::Key;

/// Millisecond timestamp.
pub type Instant = TimerInstantU32<1000>;

#[derive(Copy, Clone, Debug, PartialEq)]
enum State {
    Idle,
    Pressed(Key),
    Releasing { key: Key, since: Instant },
}

/// Release-and-settle debouncer.
///
/// Feed the raw [crate::Keypad::poll_key] result together with the current time. A key is
/// reported once, after it has been released and no key activity was seen for the settle time.
/// Contact bounce during release restarts the wait and keeps the originally pressed key.
#[derive(Clone, Debug)]
pub struct Debouncer {
    settle: MillisDurationU32,
    state: State,
}

impl Debouncer {
    pub fn new(settle: MillisDurationU32) -> Self {
        Self {
            settle,
            state: State::Idle,
        }
    }

    /// Advance the state machine.
    ///
    /// # Args
    /// * `now` - The current time.
    /// * `key` - The key currently read from the keypad.
    ///
    /// # Returns
    /// The debounced key press, if one completed.
    pub fn update(&mut self, now: Instant, key: Option<Key>) -> Option<Key> {
        match (self.state, key) {
            (State::Idle, Some(key)) => {
                self.state = State::Pressed(key);
            }
            (State::Pressed(key), None) => {
                self.state = State::Releasing { key, since: now };
            }
            (State::Releasing { key, .. }, Some(_)) => {
                self.state = State::Pressed(key);
            }
            (State::Releasing { key, since }, None) => {
                let settled = now
                    .checked_duration_since(since)
                    .is_some_and(|quiet| quiet >= self.settle);
                if settled {
                    self.state = State::Idle;
                    return Some(key);
                }
            }
            (State::Idle, None) | (State::Pressed(_), Some(_)) => {}
        }
        None
    }
}
