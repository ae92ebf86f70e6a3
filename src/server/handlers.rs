use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::AppState;
use crate::menu::{ChatTurn, ConversationReply, Question, Suggestion};
use crate::prompts::GREETING;

const RETRY_OPTION: &str = "もう一度試す";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatRequest {
    pub history: Vec<ChatTurn>,
    pub message: String,
}

/// Body of a successful `/chat` turn. Only the populated branch is sent,
/// its own `type` field tells the client which one it is.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChatResponse {
    Question(Question),
    Suggestion(Suggestion),
}

fn chat_failure(detail: &str) -> ChatResponse {
    ChatResponse::Question(Question::new(
        format!("申し訳ありません、エラーが発生しました。もう一度お試しください。(詳細: {})", detail),
        vec![RETRY_OPTION.to_string()],
    ))
}

fn start_failure(detail: &str) -> Question {
    Question::new(format!("エージェントの起動に失敗しました。(詳細: {})", detail), Vec::new())
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Welcome to Dinner Suggestion AI Agent!",
    }))
}

pub async fn start_conversation(State(state): State<AppState>) -> Json<Question> {
    match state.driver.converse(GREETING, &[]).await {
        Ok(ConversationReply::Question(question)) => Json(question),
        Ok(other) => {
            warn!(empty = other.is_empty(), "initial reply was not a question");
            Json(start_failure("Initial response is not a question."))
        }
        Err(e) => {
            error!(error = %e, "failed to start conversation");
            Json(start_failure(&e.to_string()))
        }
    }
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected chat request body");
            return Json(chat_failure(&rejection.body_text()));
        }
    };

    match state.driver.converse(&request.message, &request.history).await {
        Ok(ConversationReply::Question(question)) => Json(ChatResponse::Question(question)),
        Ok(ConversationReply::Suggestion(suggestion)) => Json(ChatResponse::Suggestion(suggestion)),
        Ok(ConversationReply::Empty) => Json(chat_failure("AI response is empty.")),
        Err(e) => {
            error!(error = %e, "chat turn failed");
            Json(chat_failure(&e.to_string()))
        }
    }
}
