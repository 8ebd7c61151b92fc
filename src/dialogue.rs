//! NPC dialogue
//!
//! Scripts are small graphs of numbered nodes. Node 0 is the entry; every
//! response either jumps to another node or ends the conversation. A
//! script is validated before a session starts so a dangling jump shows
//! up as a refusal to talk, not a crash three choices in.

use thiserror::Error;

use crate::data::dialogues::DialogueScript;
use crate::entities::EntityId;

#[derive(Debug, Error, PartialEq)]
pub enum DialogueError {
    #[error("dialogue script '{0}' has no nodes")]
    EmptyScript(String),
    #[error("script '{script}' node {node} choice {choice} jumps to missing node {target}")]
    BadLink {
        script: String,
        node: usize,
        choice: usize,
        target: usize,
    },
    #[error("node {node} has no choice {choice}")]
    BadChoice { node: usize, choice: usize },
}

/// One conversational beat as shown to the player. `responses` may be
/// empty, which marks a terminal line.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueTurn {
    pub line: String,
    pub responses: Vec<String>,
}

/// Check every jump in `script` resolves.
pub fn validate(script: &DialogueScript) -> Result<(), DialogueError> {
    if script.nodes.is_empty() {
        return Err(DialogueError::EmptyScript(script.id.clone()));
    }
    for (node_index, node) in script.nodes.iter().enumerate() {
        for (choice, response) in node.responses.iter().enumerate() {
            if let Some(target) = response.next {
                if target >= script.nodes.len() {
                    return Err(DialogueError::BadLink {
                        script: script.id.clone(),
                        node: node_index,
                        choice,
                        target,
                    });
                }
            }
        }
    }
    Ok(())
}

/// A conversation in progress with one NPC.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    script: DialogueScript,
    npc: EntityId,
    node: usize,
}

impl DialogueSession {
    /// Validate and open `script` at its entry node.
    pub fn start(npc: EntityId, script: DialogueScript) -> Result<Self, DialogueError> {
        validate(&script)?;
        Ok(Self {
            script,
            npc,
            node: 0,
        })
    }

    pub fn npc(&self) -> &EntityId {
        &self.npc
    }

    pub fn turn(&self) -> DialogueTurn {
        let node = &self.script.nodes[self.node];
        DialogueTurn {
            line: node.line.clone(),
            responses: node.responses.iter().map(|r| r.text.clone()).collect(),
        }
    }

    /// A terminal turn has nothing to pick; the session ends on the next
    /// talk press instead of a response.
    pub fn is_terminal(&self) -> bool {
        self.script.nodes[self.node].responses.is_empty()
    }

    /// Pick response `choice` on the current node. Returns the follow-up
    /// turn, or `None` when the choice ends the conversation.
    pub fn respond(&mut self, choice: usize) -> Result<Option<DialogueTurn>, DialogueError> {
        let node = &self.script.nodes[self.node];
        let response = node.responses.get(choice).ok_or(DialogueError::BadChoice {
            node: self.node,
            choice,
        })?;
        match response.next {
            Some(target) => {
                self.node = target;
                Ok(Some(self.turn()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dialogues::{DialogueNode, DialogueResponse};

    fn two_node_script() -> DialogueScript {
        DialogueScript {
            id: "beach-greeter".into(),
            nodes: vec![
                DialogueNode {
                    line: "The tide never comes in here.".into(),
                    responses: vec![
                        DialogueResponse {
                            text: "Why not?".into(),
                            next: Some(1),
                        },
                        DialogueResponse {
                            text: "See you around.".into(),
                            next: None,
                        },
                    ],
                },
                DialogueNode {
                    line: "Nobody rendered the moon.".into(),
                    responses: vec![DialogueResponse {
                        text: "Huh.".into(),
                        next: None,
                    }],
                },
            ],
        }
    }

    fn npc() -> EntityId {
        EntityId::npc(0, 0)
    }

    #[test]
    fn test_validate_catches_dangling_jump() {
        let mut script = two_node_script();
        script.nodes[0].responses[0].next = Some(9);
        let err = validate(&script).unwrap_err();
        assert_eq!(
            err,
            DialogueError::BadLink {
                script: "beach-greeter".into(),
                node: 0,
                choice: 0,
                target: 9,
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_script() {
        let script = DialogueScript {
            id: "hollow".into(),
            nodes: vec![],
        };
        assert_eq!(
            validate(&script),
            Err(DialogueError::EmptyScript("hollow".into()))
        );
    }

    #[test]
    fn test_walk_through_and_out() {
        let mut session = DialogueSession::start(npc(), two_node_script()).unwrap();
        assert_eq!(session.turn().line, "The tide never comes in here.");

        let next = session.respond(0).unwrap().unwrap();
        assert_eq!(next.line, "Nobody rendered the moon.");

        assert_eq!(session.respond(0).unwrap(), None);
    }

    #[test]
    fn test_bad_choice_leaves_session_in_place() {
        let mut session = DialogueSession::start(npc(), two_node_script()).unwrap();
        assert_eq!(
            session.respond(5),
            Err(DialogueError::BadChoice { node: 0, choice: 5 })
        );
        assert_eq!(session.turn().line, "The tide never comes in here.");
    }
}
