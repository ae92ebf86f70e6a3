use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api_connection::connection::{ChatModel, ProviderError};
use crate::api_connection::endpoints::ChatMessage;
use crate::menu::{ChatTurn, ConversationReply, Role};
use crate::prompts::{FORMAT_REMINDER, SYSTEM_PROMPT};
use crate::reply_normalizer::normalize_traced;
use crate::reply_schema::format_instructions;

/// Drives one conversation turn: prompt the model, then recover its reply.
///
/// Holds no per-request state, so one instance is shared by all requests.
#[derive(Clone)]
pub struct ConversationDriver {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    format_instructions: String,
}

impl ConversationDriver {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system_prompt: SYSTEM_PROMPT.to_string(),
            format_instructions: format_instructions(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Builds the full message list for the model.
    ///
    /// Model turns are replayed as assistant messages with their stored JSON
    /// untouched. The format reminder sits right before the new user message.
    pub fn build_messages(&self, user_input: &str, history: &[ChatTurn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(history.iter().map(|turn| match turn.role {
            Role::User => ChatMessage::user(turn.content.as_str()),
            Role::Model => ChatMessage::assistant(turn.content.as_str()),
        }));
        messages.push(ChatMessage::system(format!(
            "{}\n{}",
            FORMAT_REMINDER, self.format_instructions
        )));
        messages.push(ChatMessage::user(user_input));
        messages
    }

    /// Runs one turn. Provider failures are returned as errors; unusable model
    /// output comes back as [`ConversationReply::Empty`].
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn converse(
        &self,
        user_input: &str,
        history: &[ChatTurn],
    ) -> Result<ConversationReply, ProviderError> {
        let messages = self.build_messages(user_input, history);
        let raw = self.model.complete(messages).await?;
        let (reply, recovery) = normalize_traced(&raw);
        debug!(?recovery, "normalized model reply");
        Ok(reply)
    }
}
