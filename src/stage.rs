//! Stage seam
//!
//! The simulation never owns renderer state. It asks a [`Stage`] for
//! avatars, keeps the returned [`RenderHandle`]s, and pushes position and
//! tint updates through them. The handle is opaque on purpose: nothing in
//! the game can reach scene internals, so a realm rebuild only has to
//! release handles to guarantee no orphaned visuals.
//!
//! [`HeadlessStage`] is the in-memory stage used by tests and the demo
//! binary. Clones share one avatar table, so a test can hand a stage to
//! the session and keep a probe for assertions. It can also be told to
//! refuse creation, which is how degraded-stage behavior gets exercised.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::math::Vec3;

/// Opaque avatar handle minted by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Coarse avatar coloring. Interaction feedback pushes these; the stage
/// decides what they actually look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tint {
    #[default]
    Neutral,
    /// A foe has noticed the player.
    Alerted,
    Correct,
    Incorrect,
    Defeated,
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("stage refused to create avatar '{0}'")]
    CreateFailed(String),
    #[error("unknown render handle {0:?}")]
    UnknownHandle(RenderHandle),
}

/// What the simulation needs from a renderer, and nothing more.
pub trait Stage {
    fn create_avatar(&mut self, label: &str, position: Vec3)
        -> Result<RenderHandle, StageError>;
    fn release(&mut self, handle: RenderHandle) -> Result<(), StageError>;
    fn set_position(&mut self, handle: RenderHandle, position: Vec3) -> Result<(), StageError>;
    fn set_tint(&mut self, handle: RenderHandle, tint: Tint) -> Result<(), StageError>;
}

struct AvatarRecord {
    label: String,
    position: Vec3,
    tint: Tint,
}

#[derive(Default)]
struct StageTable {
    next_handle: u64,
    avatars: HashMap<RenderHandle, AvatarRecord>,
    refuse_creates: bool,
}

/// Renderer-free stage. Remembers every live avatar so tests can assert
/// the exact visual population after registry rebuilds.
#[derive(Clone, Default)]
pub struct HeadlessStage {
    table: Rc<RefCell<StageTable>>,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `create_avatar` fail. Models a stage that lost
    /// its context mid-session.
    pub fn refuse_creates(&self, refuse: bool) {
        self.table.borrow_mut().refuse_creates = refuse;
    }

    pub fn live_count(&self) -> usize {
        self.table.borrow().avatars.len()
    }

    /// Labels of all live avatars, sorted for stable assertions.
    pub fn labels(&self) -> Vec<String> {
        let table = self.table.borrow();
        let mut labels: Vec<String> = table.avatars.values().map(|a| a.label.clone()).collect();
        labels.sort();
        labels
    }

    pub fn position_of(&self, handle: RenderHandle) -> Option<Vec3> {
        self.table.borrow().avatars.get(&handle).map(|a| a.position)
    }

    pub fn tint_of(&self, handle: RenderHandle) -> Option<Tint> {
        self.table.borrow().avatars.get(&handle).map(|a| a.tint)
    }
}

impl Stage for HeadlessStage {
    fn create_avatar(
        &mut self,
        label: &str,
        position: Vec3,
    ) -> Result<RenderHandle, StageError> {
        let mut table = self.table.borrow_mut();
        if table.refuse_creates {
            return Err(StageError::CreateFailed(label.to_string()));
        }
        table.next_handle += 1;
        let handle = RenderHandle(table.next_handle);
        table.avatars.insert(
            handle,
            AvatarRecord {
                label: label.to_string(),
                position,
                tint: Tint::Neutral,
            },
        );
        Ok(handle)
    }

    fn release(&mut self, handle: RenderHandle) -> Result<(), StageError> {
        self.table
            .borrow_mut()
            .avatars
            .remove(&handle)
            .map(|_| ())
            .ok_or(StageError::UnknownHandle(handle))
    }

    fn set_position(&mut self, handle: RenderHandle, position: Vec3) -> Result<(), StageError> {
        let mut table = self.table.borrow_mut();
        let avatar = table
            .avatars
            .get_mut(&handle)
            .ok_or(StageError::UnknownHandle(handle))?;
        avatar.position = position;
        Ok(())
    }

    fn set_tint(&mut self, handle: RenderHandle, tint: Tint) -> Result<(), StageError> {
        let mut table = self.table.borrow_mut();
        let avatar = table
            .avatars
            .get_mut(&handle)
            .ok_or(StageError::UnknownHandle(handle))?;
        avatar.tint = tint;
        Ok(())
    }
}
