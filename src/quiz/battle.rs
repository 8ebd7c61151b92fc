//! Quiz battle state machine
//!
//! A battle is a fixed set of questions asked one at a time. Each answer
//! locks the current question until the session advances the battle (the
//! advance is delayed a few seconds so the player can read the feedback).
//! The foe is defeated when the player answers a strict majority
//! correctly; a tie is a loss.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::data::quizzes::Question;
use crate::entities::EntityId;

#[derive(Debug, Error, PartialEq)]
pub enum BattleError {
    #[error("answer already submitted for this question")]
    AlreadyAnswered,
    #[error("no answer pending")]
    NotAwaitingAdvance,
    #[error("quiz already finished")]
    Finished,
}

/// A question as shown to the player. Never carries the answer key, so
/// nothing downstream of the bus can leak it.
#[derive(Debug, Clone, PartialEq)]
pub struct PosedQuestion {
    /// 0-based position within this battle.
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

/// What the player learns right after answering.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: String,
}

/// Result of advancing past an answered question.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleStep {
    Next(PosedQuestion),
    Finished(BattleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOutcome {
    pub score: u32,
    pub max_score: u32,
    pub defeated: bool,
}

/// One in-flight battle against one foe.
#[derive(Debug, Clone)]
pub struct QuizBattle {
    foe: EntityId,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    awaiting_advance: bool,
}

impl QuizBattle {
    /// Start a battle drawing `draw` questions from `questions`, asked in
    /// shuffled order. A bank smaller than the draw is used whole.
    pub fn start(
        foe: EntityId,
        mut questions: Vec<Question>,
        draw: usize,
        rng: &mut impl Rng,
    ) -> Self {
        questions.shuffle(rng);
        questions.truncate(draw.min(questions.len()));
        Self {
            foe,
            questions,
            current: 0,
            score: 0,
            awaiting_advance: false,
        }
    }

    pub fn foe(&self) -> &EntityId {
        &self.foe
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// The question currently posed, if the battle is still running.
    pub fn current_question(&self) -> Option<PosedQuestion> {
        self.questions.get(self.current).map(|q| PosedQuestion {
            index: self.current,
            total: self.questions.len(),
            prompt: q.prompt.clone(),
            options: q.options.clone(),
        })
    }

    /// Submit an answer for the current question. An out-of-range choice
    /// counts as wrong rather than erroring, so a garbled input can never
    /// wedge a battle.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerFeedback, BattleError> {
        if self.is_finished() {
            return Err(BattleError::Finished);
        }
        if self.awaiting_advance {
            return Err(BattleError::AlreadyAnswered);
        }
        let question = &self.questions[self.current];
        let correct = choice == question.answer;
        if correct {
            self.score += 1;
        }
        self.awaiting_advance = true;
        Ok(AnswerFeedback {
            correct,
            correct_option: question.answer,
            explanation: question.explanation.clone(),
        })
    }

    /// Move past an answered question to the next one, or to the outcome
    /// when that was the last.
    pub fn advance(&mut self) -> Result<BattleStep, BattleError> {
        if self.is_finished() {
            return Err(BattleError::Finished);
        }
        if !self.awaiting_advance {
            return Err(BattleError::NotAwaitingAdvance);
        }
        self.awaiting_advance = false;
        self.current += 1;
        match self.current_question() {
            Some(question) => Ok(BattleStep::Next(question)),
            None => Ok(BattleStep::Finished(self.outcome())),
        }
    }

    /// Strict majority wins. `score * 2 > max` avoids float comparison
    /// and makes the tie-loses rule explicit.
    pub fn outcome(&self) -> BattleOutcome {
        let max_score = self.max_score();
        BattleOutcome {
            score: self.score,
            max_score,
            defeated: self.score * 2 > max_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(prompt: &str, answer: usize) -> Question {
        Question {
            prompt: prompt.to_string(),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer,
            explanation: format!("because {}", prompt),
        }
    }

    fn test_foe() -> EntityId {
        EntityId::foe(1, 0)
    }

    fn battle_with(n: usize) -> QuizBattle {
        let questions = (0..n).map(|i| question(&format!("q{}", i), 0)).collect();
        let mut rng = StdRng::seed_from_u64(7);
        QuizBattle::start(test_foe(), questions, n, &mut rng)
    }

    fn play(battle: &mut QuizBattle, answers: &[usize]) -> BattleOutcome {
        for &choice in answers {
            battle.answer(choice).unwrap();
            match battle.advance().unwrap() {
                BattleStep::Next(_) => {}
                BattleStep::Finished(outcome) => return outcome,
            }
        }
        panic!("battle did not finish");
    }

    #[test]
    fn test_majority_defeats_foe() {
        let mut battle = battle_with(3);
        let outcome = play(&mut battle, &[0, 0, 2]);
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.max_score, 3);
        assert!(outcome.defeated);
    }

    #[test]
    fn test_tie_is_a_loss() {
        let mut battle = battle_with(4);
        let outcome = play(&mut battle, &[0, 0, 1, 1]);
        assert_eq!(outcome.score, 2);
        assert!(!outcome.defeated);
    }

    #[test]
    fn test_empty_battle_is_finished_and_lost() {
        let battle = battle_with(0);
        assert!(battle.is_finished());
        assert!(!battle.outcome().defeated);
        assert_eq!(battle.current_question(), None);
    }

    #[test]
    fn test_draw_takes_a_subset_of_a_larger_bank() {
        let questions: Vec<Question> = (0..10).map(|i| question(&format!("q{}", i), 0)).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let battle = QuizBattle::start(test_foe(), questions, 3, &mut rng);
        assert_eq!(battle.max_score(), 3);
        assert_eq!(battle.current_question().unwrap().total, 3);
    }

    #[test]
    fn test_feedback_carries_key_and_explanation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut battle = QuizBattle::start(test_foe(), vec![question("solo", 2)], 1, &mut rng);
        let feedback = battle.answer(0).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_option, 2);
        assert_eq!(feedback.explanation, "because solo");
    }

    #[test]
    fn test_out_of_range_choice_counts_as_wrong() {
        let mut battle = battle_with(1);
        let feedback = battle.answer(99).unwrap();
        assert!(!feedback.correct);
        assert_eq!(battle.score(), 0);
    }

    #[test]
    fn test_double_answer_rejected_until_advance() {
        let mut battle = battle_with(2);
        battle.answer(0).unwrap();
        assert_eq!(battle.answer(0), Err(BattleError::AlreadyAnswered));
        assert!(matches!(battle.advance(), Ok(BattleStep::Next(_))));
        assert!(battle.answer(0).is_ok());
    }

    #[test]
    fn test_advance_without_answer_rejected() {
        let mut battle = battle_with(1);
        assert_eq!(battle.advance(), Err(BattleError::NotAwaitingAdvance));
    }

    #[test]
    fn test_posed_question_hides_answer_key() {
        let mut battle = battle_with(3);
        let posed = battle.current_question().unwrap();
        assert_eq!(posed.total, 3);
        assert_eq!(posed.options.len(), 3);
        battle.answer(1).unwrap();
        // Shuffle keeps every question exactly once.
        let mut seen = vec![posed.prompt];
        while let Ok(BattleStep::Next(next)) = battle.advance() {
            seen.push(next.prompt);
            battle.answer(1).unwrap();
        }
        seen.sort();
        assert_eq!(seen, vec!["q0", "q1", "q2"]);
    }
}
