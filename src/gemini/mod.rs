pub mod credentials;
pub mod image_client;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{GeminiConfig, GenerationConfig},
    encoder::EncodedImage,
    error::Result,
    models::GeneratedImage,
};

pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use image_client::ImageClient;

/// One sketch-plus-instruction generation call. The orchestrator works
/// against this seam so runs can be driven without a live endpoint.
#[async_trait]
pub trait VariationService: Send + Sync {
    async fn generate(
        &self,
        source: &EncodedImage,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedImage>;
}

#[async_trait]
impl VariationService for ImageClient {
    async fn generate(
        &self,
        source: &EncodedImage,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedImage> {
        ImageClient::generate(self, source, instruction, config).await
    }
}

/// Entry point for talking to Gemini. Picks static credentials when the
/// config carries a key, otherwise re-reads the environment per call.
#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let credentials: Arc<dyn CredentialProvider> = match &config.api_key {
            Some(key) => Arc::new(StaticCredentials::new(key.clone())),
            None => Arc::new(EnvCredentials),
        };
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(
        config: GeminiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let http = reqwest::Client::new();
        Self {
            image_client: ImageClient::new(http, config, credentials),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
