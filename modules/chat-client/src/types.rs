use serde::{Deserialize, Serialize};

/// Model name reported for canned replies.
pub const MOCK_MODEL: &str = "mock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

/// A finished reply and the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
}

impl ChatCompletion {
    /// Canned reply used when no real model could answer.
    pub fn mock(messages: &[Message]) -> Self {
        let asked = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.trim())
            .filter(|c| !c.is_empty());

        let content = match asked {
            Some(question) => format!(
                "The assistant is offline right now, so here is a canned reply. \
                 You asked: \"{question}\". \
                 Try searching the resource catalog for it in the meantime."
            ),
            None => "The assistant is offline right now. \
                     Try searching the resource catalog in the meantime."
                .to_string(),
        };

        Self {
            content,
            model: MOCK_MODEL.to_string(),
        }
    }
}

/// Requested model first, then the configured ones; duplicates and blanks dropped.
pub fn candidate_models(requested: Option<&str>, configured: &[String]) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    let requested = requested.map(str::trim).filter(|m| !m.is_empty());
    for model in requested
        .into_iter()
        .chain(configured.iter().map(|m| m.trim()))
    {
        if !model.is_empty() && !models.iter().any(|m| m == model) {
            models.push(model.to_string());
        }
    }
    models
}
