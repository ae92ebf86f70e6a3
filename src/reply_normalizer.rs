//! Recovers a [`ConversationReply`] from raw model output.
//!
//! The model is asked for nested JSON but does not always comply. Recovery
//! runs in order, each step only when the previous one produced nothing:
//!
//! 1. take the body of the first markdown code fence, if any
//! 2. parse it as the nested `{"question": .., "suggestion": ..}` layout
//! 3. parse it as a flat object discriminated by its `type` field
//! 4. give up with [`ConversationReply::Empty`]
//!
//! Nothing here returns an error or panics.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::menu::{ConversationReply, Question, Suggestion};

/// Why a candidate object was rejected during recovery. Only ever logged.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object has no string `type` field")]
    MissingType,
    #[error("unknown reply type `{0}`")]
    UnknownType(String),
    #[error("suggestion has no menus")]
    NoMenus,
    #[error("object carries neither a question nor a suggestion")]
    NoBranch,
    #[error("`{0}` is not a JSON object")]
    NotAnObject(&'static str),
}

/// Which step produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Nested,
    Flat,
    Failed,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    // Greedy body: first `{` to the last `}` before a closing fence.
    FENCE.get_or_init(|| Regex::new(r"(?s)```(json)?\s*(\{.*\})\s*```").expect("fence pattern compiles"))
}

/// Returns the JSON body of the first fenced block, or the trimmed input when
/// there is no fence.
pub fn extract_json_text(raw: &str) -> &str {
    match fence_regex().captures(raw).and_then(|caps| caps.get(2)) {
        Some(body) => {
            debug!("extracted JSON from markdown fence");
            body.as_str()
        }
        None => raw.trim(),
    }
}

fn validate_suggestion(suggestion: Suggestion) -> Result<Suggestion, ValidationFailure> {
    if suggestion.menus.is_empty() {
        return Err(ValidationFailure::NoMenus);
    }
    Ok(suggestion)
}

fn require_object<'a>(value: &'a Value, what: &'static str) -> Result<&'a serde_json::Map<String, Value>, ValidationFailure> {
    value.as_object().ok_or(ValidationFailure::NotAnObject(what))
}

// serde's derived visitors also accept arrays positionally, so every
// struct-shaped position is checked to be an object before `from_value`.
fn question_from_value(value: &Value) -> Result<Question, ValidationFailure> {
    require_object(value, "question")?;
    Ok(serde_json::from_value(value.clone())?)
}

fn suggestion_from_value(value: &Value) -> Result<Suggestion, ValidationFailure> {
    let object = require_object(value, "suggestion")?;
    if let Some(menus) = object.get("menus").and_then(Value::as_array) {
        for menu in menus {
            let menu = require_object(menu, "menu set")?;
            for role in ["main_dish", "side_dish", "soup"] {
                if let Some(dish) = menu.get(role) {
                    require_object(dish, "dish")?;
                }
            }
        }
    }
    Ok(serde_json::from_value(value.clone())?)
}

/// Reads an optional branch; `null` counts as absent.
fn branch<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn parse_nested(text: &str) -> Result<ConversationReply, ValidationFailure> {
    let value: Value = serde_json::from_str(text)?;
    let object = require_object(&value, "reply")?;
    let question = branch(object, "question").map(question_from_value).transpose()?;
    let suggestion = branch(object, "suggestion").map(suggestion_from_value).transpose()?;
    match (question, suggestion) {
        (Some(question), Some(suggestion)) => match validate_suggestion(suggestion) {
            Ok(suggestion) => {
                warn!("model returned both a question and a suggestion, keeping the suggestion");
                Ok(ConversationReply::Suggestion(suggestion))
            }
            Err(_) => Ok(ConversationReply::Question(question)),
        },
        (None, Some(suggestion)) => Ok(ConversationReply::Suggestion(validate_suggestion(suggestion)?)),
        (Some(question), None) => Ok(ConversationReply::Question(question)),
        (None, None) => Err(ValidationFailure::NoBranch),
    }
}

fn parse_flat(text: &str) -> Result<ConversationReply, ValidationFailure> {
    let value: Value = serde_json::from_str(text)?;
    let kind = require_object(&value, "reply")?
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ValidationFailure::MissingType)?
        .to_string();
    match kind.as_str() {
        "question" => Ok(ConversationReply::Question(question_from_value(&value)?)),
        "suggestion" => Ok(ConversationReply::Suggestion(validate_suggestion(suggestion_from_value(&value)?)?)),
        _ => Err(ValidationFailure::UnknownType(kind)),
    }
}

/// Like [`normalize`], also reporting which step produced the reply.
pub fn normalize_traced(raw: &str) -> (ConversationReply, Recovery) {
    let text = extract_json_text(raw);

    match parse_nested(text) {
        Ok(reply) => {
            debug!("parsed reply in nested form");
            return (reply, Recovery::Nested);
        }
        Err(e) => debug!(error = %e, "nested parse failed, trying flat form"),
    }

    match parse_flat(text) {
        Ok(reply) => {
            debug!("parsed reply in flat form");
            (reply, Recovery::Flat)
        }
        Err(e) => {
            warn!(error = %e, "could not recover a reply from model output");
            (ConversationReply::Empty, Recovery::Failed)
        }
    }
}

/// Recovers a reply from raw model output. Total: malformed input yields
/// [`ConversationReply::Empty`].
pub fn normalize(raw: &str) -> ConversationReply {
    normalize_traced(raw).0
}
