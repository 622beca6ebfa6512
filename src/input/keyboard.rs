use tracing::trace;

use crate::game::{Direction, InputController};

/// Steering fed by key presses.
///
/// Holds at most one pending direction; a newer press before the next tick
/// replaces the older one.
#[derive(Debug, Default)]
pub struct KeyboardController {
    pending: Option<Direction>,
}

impl KeyboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        trace!(?direction, "direction buffered");
        self.pending = Some(direction);
    }
}

impl InputController for KeyboardController {
    fn update_direction(&mut self) -> Option<Direction> {
        self.pending.take()
    }
}
