//! Player health
//!
//! A clamped counter in `0..=max`. Damage and healing never push it
//! outside that range, and `damage` reports the exact call that emptied
//! the bar so the session can flip to game over once and only once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Start at full.
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Overwrite both values, clamping `current` into the new range.
    /// Returns true only when the call took the bar from positive to
    /// zero, like [`Health::damage`].
    pub fn set(&mut self, current: i32, max: i32) -> bool {
        let was_alive = self.current > 0;
        self.max = max.max(1);
        self.current = current.clamp(0, self.max);
        was_alive && self.current == 0
    }

    /// Apply damage, clamped at zero. Returns true only on the call that
    /// took the bar from positive to zero. Negative amounts are ignored.
    pub fn damage(&mut self, amount: i32) -> bool {
        let amount = amount.max(0);
        let was_alive = self.current > 0;
        self.current = (self.current - amount).max(0);
        was_alive && self.current == 0
    }

    /// Restore health, clamped at max. Returns how much was actually
    /// restored. Negative amounts are ignored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}
