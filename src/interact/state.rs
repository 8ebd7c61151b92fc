//! Interaction states
//!
//! Each resident carries one of these in its `Awareness` component. The
//! proximity scan moves residents between them; battles and dialogues
//! move them out of the locked states when they end.

use crate::entities::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractState {
    /// Not aware of the player.
    #[default]
    Idle,
    /// Player inside the enter radius. Leaves again past the exit
    /// radius, which sits further out so the boundary cannot flicker.
    Engaging,
    /// Locked into a quiz battle. Proximity no longer applies.
    Battle,
    /// Locked into a conversation. Proximity no longer applies.
    Dialogue,
    /// Beaten. Terminal until the realm rebuilds.
    Defeated,
}

impl InteractState {
    /// States the proximity scan is allowed to touch.
    pub fn scannable(&self) -> bool {
        matches!(self, InteractState::Idle | InteractState::Engaging)
    }
}

/// A state change decided by one scan pass. Collected first, then applied
/// and narrated by the session, so the scan itself never re-enters the
/// world mid-iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Idle became Engaging.
    Notice(EntityId),
    /// Engaging fell back to Idle.
    Withdraw(EntityId),
    /// An engaging foe crossed its engage radius; a battle starts.
    OpenBattle(EntityId),
}
