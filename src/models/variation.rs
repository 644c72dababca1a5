use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetStatus {
    Generating,
    Completed,
    Error,
}

/// One decoded model output, ready for display as a data URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
}

impl GeneratedImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
        }
    }
}

/// The batch of images generated for one prompt. Images stay empty while
/// the set is generating and stay empty on error: a failed batch keeps no
/// partial results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationSet {
    pub id: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub status: SetStatus,
    pub images: Vec<GeneratedImage>,
}

impl VariationSet {
    pub fn generating(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            created_at: Utc::now(),
            status: SetStatus::Generating,
            images: Vec::new(),
        }
    }
}
