//! Quiz banks for data-driven battles
//!
//! Each foe references a bank by id; a battle draws its questions from
//! that bank.

use serde::{Deserialize, Serialize};

/// One multiple-choice question. `answer` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: usize,
    /// Shown with every answer result, right or wrong.
    pub explanation: String,
}

/// A themed set of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizBank {
    pub id: String,
    pub topic: String,
    pub questions: Vec<Question>,
}

/// Collection of quiz banks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizCatalog {
    pub banks: Vec<QuizBank>,
}

impl QuizCatalog {
    /// Find a bank by ID
    pub fn find(&self, id: &str) -> Option<&QuizBank> {
        self.banks.iter().find(|b| b.id == id)
    }

    /// Check every bank is answerable: no empty banks, no answer key
    /// pointing outside its options.
    pub fn validate(&self) -> Result<(), String> {
        for bank in &self.banks {
            if bank.questions.is_empty() {
                return Err(format!("quiz bank '{}' has no questions", bank.id));
            }
            for (i, question) in bank.questions.iter().enumerate() {
                if question.options.len() < 2 {
                    return Err(format!(
                        "quiz bank '{}' question {} needs at least 2 options",
                        bank.id, i
                    ));
                }
                if question.answer >= question.options.len() {
                    return Err(format!(
                        "quiz bank '{}' question {} answer {} out of range",
                        bank.id, i, question.answer
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Create default quiz banks (hardcoded fallback)
pub fn default_quiz_banks() -> QuizCatalog {
    fn q(prompt: &str, options: &[&str], answer: usize, explanation: &str) -> Question {
        Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
            explanation: explanation.to_string(),
        }
    }

    QuizCatalog {
        banks: vec![
            QuizBank {
                id: "synth-basics".to_string(),
                topic: "Synthesizers".to_string(),
                questions: vec![
                    q(
                        "Which waveform sounds the brightest?",
                        &["Sine", "Triangle", "Sawtooth"],
                        2,
                        "A sawtooth carries every harmonic, so it cuts through the mix.",
                    ),
                    q(
                        "What does the filter cutoff knob remove?",
                        &["Low frequencies", "High frequencies", "The beat"],
                        1,
                        "A low-pass filter rolls off everything above the cutoff.",
                    ),
                    q(
                        "LFO stands for...",
                        &[
                            "Low Frequency Oscillator",
                            "Loud Fuzz Output",
                            "Linear Fade Operator",
                        ],
                        0,
                        "An LFO wobbles too slowly to hear, so it modulates instead.",
                    ),
                ],
            },
            QuizBank {
                id: "arcade-lore".to_string(),
                topic: "Arcade History".to_string(),
                questions: vec![
                    q(
                        "Pac-Man's ghosts scatter to the corners when...",
                        &[
                            "A power pellet is eaten",
                            "Their scatter timer fires",
                            "The maze resets",
                        ],
                        1,
                        "Each ghost alternates chase and scatter on a fixed timer.",
                    ),
                    q(
                        "What year did Space Invaders land in arcades?",
                        &["1972", "1978", "1984"],
                        1,
                        "1978, and it famously swallowed Japan's 100-yen coins.",
                    ),
                    q(
                        "The kill screen in Donkey Kong appears on level...",
                        &["22", "99", "256"],
                        0,
                        "An overflow in the bonus timer ends level 22 in seconds.",
                    ),
                    q(
                        "A 'continue' screen exists mostly to...",
                        &[
                            "Rest your thumbs",
                            "Collect another credit",
                            "Save your score",
                        ],
                        1,
                        "Ten seconds of countdown is very good at selling one more coin.",
                    ),
                ],
            },
            QuizBank {
                id: "mall-history".to_string(),
                topic: "Mall Culture".to_string(),
                questions: vec![
                    q(
                        "The fountain in a mall atrium is traditionally for...",
                        &["Cooling the air", "Throwing coins", "Fire code"],
                        1,
                        "Wish coins. Maintenance nets them out every Sunday night.",
                    ),
                    q(
                        "Muzak was originally piped into malls to...",
                        &[
                            "Keep shoppers calm and browsing",
                            "Cover the air conditioning noise",
                            "Advertise records",
                        ],
                        0,
                        "Background music was engineered to slow people down.",
                    ),
                    q(
                        "A directory map's red dot tells you...",
                        &["Where the exit is", "You are here", "Where the sale is"],
                        1,
                        "YOU ARE HERE. The most honest sign in the building.",
                    ),
                ],
            },
        ],
    }
}
