use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_MODEL_ID: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_id: Option<String>,
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model_id: None,
            base_url: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        let model_id = env::var("GEMINI_MODEL_ID").ok();
        let base_url = env::var("GEMINI_BASE_URL").ok();

        GeminiConfig {
            api_key,
            model_id,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

/// Output-shape parameters accepted by the model. The app pins these to
/// square 1K, but the endpoint accepts every listed value, so they stay
/// configurable rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            aspect_ratio: AspectRatio::Square,
            image_size: ImageSize::OneK,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_config_serializes_to_wire_strings() {
        let config = GenerationConfig::new()
            .with_aspect_ratio(AspectRatio::Wide)
            .with_image_size(ImageSize::TwoK);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["aspectRatio"], "16:9");
        assert_eq!(json["imageSize"], "2K");
    }

    #[test]
    fn default_config_is_square_one_k() {
        let config = GenerationConfig::default();
        assert_eq!(config.aspect_ratio.as_str(), "1:1");
        assert_eq!(config.image_size.as_str(), "1K");
    }

    #[test]
    fn gemini_config_falls_back_to_defaults() {
        let config = GeminiConfig::new();
        assert_eq!(config.model_id(), DEFAULT_MODEL_ID);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);

        let config = GeminiConfig::new()
            .with_model("gemini-2.5-flash-image")
            .with_base_url("http://localhost:9090/v1beta");
        assert_eq!(config.model_id(), "gemini-2.5-flash-image");
        assert_eq!(config.base_url(), "http://localhost:9090/v1beta");
    }
}
