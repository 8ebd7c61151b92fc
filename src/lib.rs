//! Palmdrift - coordination core for a vaporwave walking sim
//!
//! Wander neon-soaked realms, talk to the locals, and settle
//! disputes with trivia instead of violence. This crate is the
//! headless simulation: world state, the event bus the UI rides
//! on, and the rules that tie them together.

pub mod audio;
pub mod bus;
pub mod config;
pub mod data;
pub mod dialogue;
pub mod entities;
pub mod game;
pub mod health;
pub mod interact;
pub mod items;
pub mod loader;
pub mod math;
pub mod player;
pub mod quiz;
pub mod stage;

// Re-export commonly used types
pub use bus::{EventBus, GameEvent, Topic};
pub use config::GameConfig;
pub use data::DataManager;
pub use game::{Game, GamePhase, PauseSource};
pub use math::Vec3;
pub use player::InputSample;
pub use stage::{HeadlessStage, RenderHandle, Stage, Tint};
