//! Bus topics and payloads
//!
//! Every payload that crosses the bus is a variant of [`GameEvent`], and
//! every wire topic is a [`Topic`] variant. The dotted channel names of the
//! UI contract ("player.position", "quiz.start", ...) survive only as the
//! `Display` form used in logs; subscribing to a misspelled topic is
//! unrepresentable.

use std::fmt;

use crate::dialogue::DialogueTurn;
use crate::entities::EntityId;
use crate::game::PauseSource;
use crate::math::Vec3;
use crate::quiz::PosedQuestion;

/// A named channel on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    PlayerPosition,
    RealmChange,
    NpcInteract,
    FoeInteract,
    FoeEngaging,
    FoeDisengaged,
    FoeDefeated,
    QuizStart,
    QuizNextQuestion,
    QuizAnswerResult,
    QuizEnd,
    DialogueStart,
    DialogueResponse,
    DialogueEnd,
    InventoryItemAdded,
    InventoryItemRemoved,
    InventoryItemSelected,
    InventoryItemEquipped,
    InventoryItemUnequipped,
    HealthChanged,
    LoaderStart,
    LoaderProgress,
    LoaderError,
    LoaderComplete,
    GamePaused,
    GameResumed,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::PlayerPosition => "player.position",
            Topic::RealmChange => "realm.change",
            Topic::NpcInteract => "npc.interact",
            Topic::FoeInteract => "foe.interact",
            Topic::FoeEngaging => "foe.engaging",
            Topic::FoeDisengaged => "foe.disengaged",
            Topic::FoeDefeated => "foe.defeated",
            Topic::QuizStart => "quiz.start",
            Topic::QuizNextQuestion => "quiz.nextQuestion",
            Topic::QuizAnswerResult => "quiz.answerResult",
            Topic::QuizEnd => "quiz.end",
            Topic::DialogueStart => "dialogue.start",
            Topic::DialogueResponse => "dialogue.response",
            Topic::DialogueEnd => "dialogue.end",
            Topic::InventoryItemAdded => "inventory.itemAdded",
            Topic::InventoryItemRemoved => "inventory.itemRemoved",
            Topic::InventoryItemSelected => "inventory.itemSelected",
            Topic::InventoryItemEquipped => "inventory.itemEquipped",
            Topic::InventoryItemUnequipped => "inventory.itemUnequipped",
            Topic::HealthChanged => "health.changed",
            Topic::LoaderStart => "loader.start",
            Topic::LoaderProgress => "loader.progress",
            Topic::LoaderError => "loader.error",
            Topic::LoaderComplete => "loader.complete",
            Topic::GamePaused => "game.paused",
            Topic::GameResumed => "game.resumed",
        };
        write!(f, "{}", name)
    }
}

/// A published payload. One variant per topic.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player position and facing, published once per simulated frame.
    PlayerMoved { position: Vec3, yaw: f32 },
    /// The registry was rebuilt for a new realm.
    RealmChanged { realm: usize, name: String },
    /// A talk press was accepted; dialogue follows.
    NpcInteract { npc: EntityId },
    /// A foe crossed its engage radius; a quiz battle follows.
    FoeInteract { foe: EntityId },
    FoeEngaging { foe: EntityId },
    FoeDisengaged { foe: EntityId },
    FoeDefeated { foe: EntityId },
    /// Battle opened; carries the first question.
    QuizStarted { foe: EntityId, question: PosedQuestion },
    QuizNextQuestion { foe: EntityId, question: PosedQuestion },
    /// Emitted for every submitted answer, right or wrong; always carries
    /// the correct option and its explanation so the UI can show both.
    QuizAnswerResult {
        foe: EntityId,
        correct: bool,
        correct_option: usize,
        explanation: String,
    },
    QuizEnded {
        foe: EntityId,
        score: u32,
        max_score: u32,
        defeated: bool,
    },
    DialogueStarted { npc: EntityId, turn: DialogueTurn },
    /// A response was chosen; `next` is the follow-up turn, or `None` when
    /// the choice ends the conversation (a `DialogueEnded` follows).
    DialogueResponded {
        npc: EntityId,
        choice: usize,
        next: Option<DialogueTurn>,
    },
    DialogueEnded { npc: EntityId },
    /// `count` is the slot's stack size after the merge.
    ItemAdded { id: String, count: u32 },
    /// `remaining` is 0 when the slot was destroyed.
    ItemRemoved { id: String, remaining: u32 },
    ItemSelected { index: usize, id: String },
    ItemEquipped { id: String },
    ItemUnequipped { id: String },
    HealthChanged { current: i32, max: i32 },
    LoaderStarted { total: usize },
    LoaderProgress {
        done: usize,
        failed: usize,
        total: usize,
        fraction: f32,
    },
    LoaderError { task: String, message: String },
    LoaderCompleted { forced: bool },
    GamePaused { source: PauseSource },
    GameResumed { source: PauseSource },
}

impl GameEvent {
    /// The channel this payload travels on.
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::PlayerMoved { .. } => Topic::PlayerPosition,
            GameEvent::RealmChanged { .. } => Topic::RealmChange,
            GameEvent::NpcInteract { .. } => Topic::NpcInteract,
            GameEvent::FoeInteract { .. } => Topic::FoeInteract,
            GameEvent::FoeEngaging { .. } => Topic::FoeEngaging,
            GameEvent::FoeDisengaged { .. } => Topic::FoeDisengaged,
            GameEvent::FoeDefeated { .. } => Topic::FoeDefeated,
            GameEvent::QuizStarted { .. } => Topic::QuizStart,
            GameEvent::QuizNextQuestion { .. } => Topic::QuizNextQuestion,
            GameEvent::QuizAnswerResult { .. } => Topic::QuizAnswerResult,
            GameEvent::QuizEnded { .. } => Topic::QuizEnd,
            GameEvent::DialogueStarted { .. } => Topic::DialogueStart,
            GameEvent::DialogueResponded { .. } => Topic::DialogueResponse,
            GameEvent::DialogueEnded { .. } => Topic::DialogueEnd,
            GameEvent::ItemAdded { .. } => Topic::InventoryItemAdded,
            GameEvent::ItemRemoved { .. } => Topic::InventoryItemRemoved,
            GameEvent::ItemSelected { .. } => Topic::InventoryItemSelected,
            GameEvent::ItemEquipped { .. } => Topic::InventoryItemEquipped,
            GameEvent::ItemUnequipped { .. } => Topic::InventoryItemUnequipped,
            GameEvent::HealthChanged { .. } => Topic::HealthChanged,
            GameEvent::LoaderStarted { .. } => Topic::LoaderStart,
            GameEvent::LoaderProgress { .. } => Topic::LoaderProgress,
            GameEvent::LoaderError { .. } => Topic::LoaderError,
            GameEvent::LoaderCompleted { .. } => Topic::LoaderComplete,
            GameEvent::GamePaused { .. } => Topic::GamePaused,
            GameEvent::GameResumed { .. } => Topic::GameResumed,
        }
    }
}
