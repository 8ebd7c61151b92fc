//! Delayed actions
//!
//! Quiz pacing and tint flashes need "do this in a few seconds" timers
//! that die with their owner. The queue ties every task to an entity id,
//! so ending a battle or rebuilding a realm can cancel everything that
//! belonged to an entity in one call. Fired actions are returned to the
//! session, which re-checks them against current state before acting;
//! a timer that outlived its purpose fizzles instead of corrupting.

use crate::entities::EntityId;

/// What a timer does when it fires. A closed set on purpose: every
/// variant has a known liveness check in the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DelayedAction {
    /// Move the battle against `foe` past its answered question.
    AdvanceQuiz { foe: EntityId },
    /// Revert `entity`'s answer-feedback tint to its resting color.
    ClearTint { entity: EntityId },
}

impl DelayedAction {
    /// The entity this action lives and dies with.
    pub fn owner(&self) -> &EntityId {
        match self {
            DelayedAction::AdvanceQuiz { foe } => foe,
            DelayedAction::ClearTint { entity } => entity,
        }
    }
}

struct Scheduled {
    fire_at: f32,
    seq: u64,
    action: DelayedAction,
}

/// Session-clock timer queue.
#[derive(Default)]
pub struct DelayQueue {
    tasks: Vec<Scheduled>,
    now: f32,
    next_seq: u64,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run `action` after `delay` seconds of session time.
    pub fn schedule(&mut self, delay: f32, action: DelayedAction) {
        let fire_at = self.now + delay.max(0.0);
        self.next_seq += 1;
        self.tasks.push(Scheduled {
            fire_at,
            seq: self.next_seq,
            action,
        });
    }

    /// Drop every task owned by `owner`. Returns how many died.
    pub fn cancel_owned(&mut self, owner: &EntityId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.action.owner() != owner);
        let cancelled = before - self.tasks.len();
        if cancelled > 0 {
            log::debug!("cancelled {} task(s) owned by {}", cancelled, owner);
        }
        cancelled
    }

    /// Drop everything. Used on realm rebuild and teardown.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Advance the clock and return everything that came due, in firing
    /// order (schedule order breaks ties).
    pub fn tick(&mut self, dt: f32) -> Vec<DelayedAction> {
        self.now += dt.max(0.0);
        let now = self.now;

        let mut due = Vec::new();
        let mut remaining = Vec::new();
        for task in self.tasks.drain(..) {
            if task.fire_at <= now {
                due.push(task);
            } else {
                remaining.push(task);
            }
        }
        self.tasks = remaining;

        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foe(index: usize) -> EntityId {
        EntityId::foe(0, index)
    }

    #[test]
    fn test_fires_after_delay_accumulates() {
        let mut queue = DelayQueue::new();
        queue.schedule(3.0, DelayedAction::AdvanceQuiz { foe: foe(0) });

        assert!(queue.tick(1.0).is_empty());
        assert!(queue.tick(1.5).is_empty());
        let fired = queue.tick(0.6);
        assert_eq!(fired, vec![DelayedAction::AdvanceQuiz { foe: foe(0) }]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fires_in_due_order_with_stable_ties() {
        let mut queue = DelayQueue::new();
        queue.schedule(2.0, DelayedAction::AdvanceQuiz { foe: foe(0) });
        queue.schedule(1.0, DelayedAction::ClearTint { entity: foe(1) });
        queue.schedule(2.0, DelayedAction::ClearTint { entity: foe(2) });

        let fired = queue.tick(5.0);
        assert_eq!(
            fired,
            vec![
                DelayedAction::ClearTint { entity: foe(1) },
                DelayedAction::AdvanceQuiz { foe: foe(0) },
                DelayedAction::ClearTint { entity: foe(2) },
            ]
        );
    }

    #[test]
    fn test_cancel_owned_leaves_other_owners() {
        let mut queue = DelayQueue::new();
        queue.schedule(1.0, DelayedAction::AdvanceQuiz { foe: foe(0) });
        queue.schedule(1.0, DelayedAction::ClearTint { entity: foe(0) });
        queue.schedule(1.0, DelayedAction::ClearTint { entity: foe(1) });

        assert_eq!(queue.cancel_owned(&foe(0)), 2);
        let fired = queue.tick(2.0);
        assert_eq!(fired, vec![DelayedAction::ClearTint { entity: foe(1) }]);
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut queue = DelayQueue::new();
        queue.schedule(0.0, DelayedAction::ClearTint { entity: foe(0) });
        assert_eq!(queue.tick(0.0).len(), 1);
    }

    #[test]
    fn test_cancel_all() {
        let mut queue = DelayQueue::new();
        queue.schedule(1.0, DelayedAction::AdvanceQuiz { foe: foe(0) });
        queue.schedule(2.0, DelayedAction::ClearTint { entity: foe(1) });
        queue.cancel_all();
        assert!(queue.tick(10.0).is_empty());
    }
}
