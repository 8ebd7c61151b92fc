//! Entity components
//!
//! Realm residents live in a `hecs` world as bundles of these components.
//! Every resident carries an [`Identity`]; foes and NPCs are told apart
//! by which of [`Foe`] or [`Npc`] they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interact::InteractState;
use crate::math::Vec3;
use crate::stage::RenderHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Npc,
    Foe,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Npc => "npc",
            EntityKind::Foe => "foe",
        }
    }
}

/// Stable, deterministic id for a realm resident. The same realm always
/// mints the same ids, so anything keyed on them (defeat records, event
/// payloads in logs) survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    kind: EntityKind,
    realm: usize,
    index: usize,
}

impl EntityId {
    pub fn npc(realm: usize, index: usize) -> Self {
        Self {
            kind: EntityKind::Npc,
            realm,
            index,
        }
    }

    pub fn foe(realm: usize, index: usize) -> Self {
        Self {
            kind: EntityKind::Foe,
            realm,
            index,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn realm(&self) -> usize {
        self.realm
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.kind.as_str(), self.realm, self.index)
    }
}

/// World-space location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

/// Display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Name(pub String);

/// The resident's stable id, attached as a component so queries can
/// report who they found.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity(pub EntityId);

/// Interaction state for the proximity machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Awareness {
    pub state: InteractState,
}

/// Link to the stage avatar. Every registered resident has one; a
/// refused avatar means the resident was never created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar(pub RenderHandle);

/// Conversation partner.
#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    /// Dialogue script id in the data catalog.
    pub script: String,
}

/// Quiz opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct Foe {
    /// Quiz bank id in the data catalog.
    pub quiz: String,
    /// Set for the rest of the realm session once beaten.
    pub defeated: bool,
}
