use serde::{Deserialize, Serialize};

/// Who authored a turn in the conversation history.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of caller-supplied history.
///
/// For `Role::Model` turns, `content` holds the serialized reply JSON the
/// model produced on that turn, not a rendering of it. It is replayed to the
/// model verbatim so it keeps seeing its own structured output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: Role::Model, content: content.into() }
    }
}

/// Wire tag of a [`Question`]. Optional on input, always written on output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionTag {
    #[default]
    #[serde(rename = "question")]
    Question,
}

/// Wire tag of a [`Suggestion`]. Optional on input, always written on output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuggestionTag {
    #[default]
    #[serde(rename = "suggestion")]
    Suggestion,
}

fn default_free_text_allowed() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    #[serde(rename = "type", default)]
    pub kind: QuestionTag,
    pub message: String,
    pub options: Vec<String>,
    #[serde(default = "default_free_text_allowed")]
    pub free_text_allowed: bool,
}

impl Question {
    pub fn new(message: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind: QuestionTag::Question,
            message: message.into(),
            options,
            free_text_allowed: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Dish {
    pub name: String,
    pub description: String,
}

/// A main dish, a side dish and a soup, plus why they go together.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MenuSet {
    pub reason: String,
    pub main_dish: Dish,
    pub side_dish: Dish,
    pub soup: Dish,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Suggestion {
    #[serde(rename = "type", default)]
    pub kind: SuggestionTag,
    pub message: String,
    pub menus: Vec<MenuSet>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>, menus: Vec<MenuSet>) -> Self {
        Self {
            kind: SuggestionTag::Suggestion,
            message: message.into(),
            menus,
        }
    }
}

/// Result of one conversation turn.
///
/// `Empty` means the model output could not be recovered. Callers treat it as
/// an unsuccessful but recoverable turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationReply {
    Question(Question),
    Suggestion(Suggestion),
    Empty,
}

impl ConversationReply {
    pub fn is_empty(&self) -> bool {
        matches!(self, ConversationReply::Empty)
    }

    pub fn question(&self) -> Option<&Question> {
        match self {
            ConversationReply::Question(q) => Some(q),
            _ => None,
        }
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            ConversationReply::Suggestion(s) => Some(s),
            _ => None,
        }
    }

    /// Serializes the reply in the nested `{"question": ..., "suggestion": ...}`
    /// form the model is instructed to produce. This is what a client stores
    /// as the `content` of a `model` history turn.
    pub fn to_nested_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&NestedReply::from(self))
    }
}

/// Nested wire form of a reply, the layout the format instructions ask for.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NestedReply {
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub suggestion: Option<Suggestion>,
}

impl From<&ConversationReply> for NestedReply {
    fn from(reply: &ConversationReply) -> Self {
        match reply {
            ConversationReply::Question(q) => NestedReply { question: Some(q.clone()), suggestion: None },
            ConversationReply::Suggestion(s) => NestedReply { question: None, suggestion: Some(s.clone()) },
            ConversationReply::Empty => NestedReply::default(),
        }
    }
}
