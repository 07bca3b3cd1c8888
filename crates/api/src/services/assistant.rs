//! Conversational assistant proxy.
//!
//! Stateless: the client ships the whole role-tagged history with every
//! message, we forward it to the model under a fixed persona, and return the
//! single text reply.

use serde::Deserialize;

use crate::error::AppError;
use crate::gemini::{Content, GeminiClient};

/// Fixed persona for the assistant.
const PERSONA: &str = "You are a helpful and friendly assistant for the \"Mandi\" platform. \
                       Your goal is to help Indian farmers and buyers. \
                       Keep your responses concise and clear.";

/// One prior turn of the conversation, as the client stores it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    /// Who spoke: `farmer` maps to the model's `user` role, anything else to
    /// `model`.
    pub from: String,
    /// What they said.
    pub text: String,
}

/// Reply to `message` given the prior `history`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an empty message and a Gemini error for
/// upstream failures.
pub async fn reply(
    gemini: &GeminiClient,
    history: &[ChatTurn],
    message: &str,
) -> Result<String, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty.".into()));
    }

    let contents = contents_from_history(history, message);
    let system = Content::system_text(PERSONA);

    Ok(gemini.generate(contents, Some(system)).await?)
}

/// Map the client-side history plus the new message into model turns.
#[must_use]
pub fn contents_from_history(history: &[ChatTurn], message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| {
            if turn.from == "farmer" {
                Content::user_text(turn.text.clone())
            } else {
                Content::model_text(turn.text.clone())
            }
        })
        .collect();
    contents.push(Content::user_text(message));
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(from: &str, text: &str) -> ChatTurn {
        ChatTurn {
            from: from.to_owned(),
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_history_roles_map_to_model_roles() {
        let history = [turn("farmer", "mera tamatar kab bechna chahiye?"), turn("bot", "Abhi rates acche hain.")];
        let contents = contents_from_history(&history, "aur pyaaz?");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[2].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_unknown_senders_map_to_model() {
        let contents = contents_from_history(&[turn("assistant", "hello")], "hi");
        assert_eq!(contents[0].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_empty_history_still_carries_the_message() {
        let contents = contents_from_history(&[], "kya bhav hai?");
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
    }
}
