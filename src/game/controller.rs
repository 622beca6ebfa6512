use std::collections::VecDeque;

use super::direction::Direction;

/// Source of steering decisions, polled once at the start of every tick.
///
/// Implementations buffer whatever arrived since the previous poll and hand
/// back at most one direction.
pub trait InputController {
    fn update_direction(&mut self) -> Option<Direction>;
}

impl<C: InputController + ?Sized> InputController for Box<C> {
    fn update_direction(&mut self) -> Option<Direction> {
        (**self).update_direction()
    }
}

/// Never steers; the snake keeps its heading
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputController for NoInput {
    fn update_direction(&mut self) -> Option<Direction> {
        None
    }
}

/// Replays a fixed list of per-tick decisions, then stops steering
#[derive(Debug, Default, Clone)]
pub struct ScriptedController {
    script: VecDeque<Option<Direction>>,
}

impl ScriptedController {
    pub fn new(script: impl IntoIterator<Item = Option<Direction>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Queue the decision for one more tick
    pub fn push(&mut self, direction: Option<Direction>) {
        self.script.push_back(direction);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputController for ScriptedController {
    fn update_direction(&mut self) -> Option<Direction> {
        self.script.pop_front().flatten()
    }
}
