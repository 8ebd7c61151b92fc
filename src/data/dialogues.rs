//! Dialogue scripts for NPCs
//!
//! Node 0 is the entry point of every script. Responses jump by node
//! index; `next: None` ends the conversation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueResponse {
    pub text: String,
    pub next: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub line: String,
    pub responses: Vec<DialogueResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub id: String,
    pub nodes: Vec<DialogueNode>,
}

/// Collection of dialogue scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueCatalog {
    pub scripts: Vec<DialogueScript>,
}

impl DialogueCatalog {
    /// Find a script by ID
    pub fn find(&self, id: &str) -> Option<&DialogueScript> {
        self.scripts.iter().find(|s| s.id == id)
    }

    /// Run every script through the dialogue validator.
    pub fn validate(&self) -> Result<(), String> {
        for script in &self.scripts {
            crate::dialogue::validate(script).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// Create default dialogue scripts (hardcoded fallback)
pub fn default_dialogue_scripts() -> DialogueCatalog {
    fn node(line: &str, responses: &[(&str, Option<usize>)]) -> DialogueNode {
        DialogueNode {
            line: line.to_string(),
            responses: responses
                .iter()
                .map(|(text, next)| DialogueResponse {
                    text: text.to_string(),
                    next: *next,
                })
                .collect(),
        }
    }

    DialogueCatalog {
        scripts: vec![
            DialogueScript {
                id: "beach-greeter".to_string(),
                nodes: vec![
                    node(
                        "Welcome to the shore. The water is a screensaver.",
                        &[
                            ("Is it always sunset here?", Some(1)),
                            ("Just passing through.", None),
                        ],
                    ),
                    node(
                        "Always. Somebody set the sky once and lost the remote.",
                        &[("Who?", Some(2)), ("Beautiful either way.", None)],
                    ),
                    node(
                        "Management. You never see them. You only see the palms sway.",
                        &[("I'll keep an eye out.", None)],
                    ),
                ],
            },
            DialogueScript {
                id: "plaza-poet".to_string(),
                nodes: vec![
                    node(
                        "I write poems about escalators. Want one?",
                        &[("Go ahead.", Some(1)), ("Maybe later.", None)],
                    ),
                    node(
                        "'Rising slow, going nowhere, humming all the way.' That's the whole poem.",
                        &[
                            ("That's the whole mall.", Some(2)),
                            ("Moving. Literally.", None),
                        ],
                    ),
                    node("You get it. Take the poem, it's yours now.", &[]),
                ],
            },
            DialogueScript {
                id: "arcade-clerk".to_string(),
                nodes: vec![
                    node(
                        "Tokens are free tonight. Everything in here runs on attract mode.",
                        &[
                            ("Which cabinet is best?", Some(1)),
                            ("Thanks, I'll wander.", None),
                        ],
                    ),
                    node(
                        "The one in the corner. Nobody has beaten its quiz since the 90s.",
                        &[("I'll try my luck.", None)],
                    ),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let catalog = default_dialogue_scripts();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.scripts.len(), 3);
        assert!(catalog.find("plaza-poet").is_some());
    }

    #[test]
    fn test_validate_reports_dangling_jump() {
        let mut catalog = default_dialogue_scripts();
        catalog.scripts[0].nodes[0].responses[0].next = Some(42);
        assert!(catalog.validate().is_err());
    }
}
