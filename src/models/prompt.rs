use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStatus {
    Idle,
    Processing,
    Success,
    Error,
}

/// One requested variation: the user's free-text description plus where it
/// sits in the generation lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDescriptor {
    pub id: String,
    pub text: String,
    pub status: PromptStatus,
}

impl PromptDescriptor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            status: PromptStatus::Idle,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    /// Descriptors with only whitespace never enter the pipeline.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
