//! Data loading and external game content
//!
//! This module handles loading game content from external RON files,
//! allowing for data-driven realms and easy editing.

pub mod dialogues;
pub mod loader;
pub mod quizzes;
pub mod realms;

pub use dialogues::{DialogueCatalog, DialogueNode, DialogueResponse, DialogueScript};
pub use loader::{export_default_data, DataManager};
pub use quizzes::{Question, QuizBank, QuizCatalog};
pub use realms::{FoeTemplate, NpcTemplate, RealmCatalog, RealmDef};
