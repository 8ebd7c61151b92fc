//! Realm residents

pub mod components;
pub mod registry;

pub use components::{Avatar, Awareness, EntityId, EntityKind, Foe, Identity, Name, Npc, Position};
pub use registry::{grid_position, EntityRegistry, RebuildReport, GRID_COLUMNS};
