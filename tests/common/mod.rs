#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use menu_chat::api_connection::connection::{ChatModel, ProviderError};
use menu_chat::api_connection::endpoints::ChatMessage;
use menu_chat::conversation::ConversationDriver;

/// Canned model: returns a fixed text (or a provider failure) and records
/// every prompt it was sent.
pub struct StubModel {
    reply: Option<String>,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Some(text.to_string()), prompts: Mutex::new(Vec::new()) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, prompts: Mutex::new(Vec::new()) })
    }

    pub fn last_prompt(&self) -> Vec<ChatMessage> {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(messages);
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::Api {
                status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                error_body: "quota exceeded".to_string(),
            }),
        }
    }
}

pub fn driver_for(model: Arc<StubModel>) -> ConversationDriver {
    ConversationDriver::new(model)
}

pub const FLAT_SUGGESTION: &str = r#"{
  "type": "suggestion",
  "message": "鶏肉を使った献立をご提案します。",
  "menus": [
    {
      "reason": "さっぱりした副菜と汁物で鶏肉の旨みが引き立ちます。",
      "main_dish": {"name": "鶏の照り焼き", "description": "甘辛いタレで焼いた鶏もも肉"},
      "side_dish": {"name": "ほうれん草のおひたし", "description": "だしを効かせた定番の副菜"},
      "soup": {"name": "豆腐とわかめの味噌汁", "description": "やさしい味わいの味噌汁"}
    }
  ]
}"#;
