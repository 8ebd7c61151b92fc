//! Quiz battles

pub mod battle;

pub use battle::{AnswerFeedback, BattleError, BattleOutcome, BattleStep, PosedQuestion, QuizBattle};
