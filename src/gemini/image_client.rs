use std::sync::Arc;

use reqwest::StatusCode;

use crate::{
    config::{GeminiConfig, GenerationConfig},
    encoder::EncodedImage,
    error::{Result, SketchvarError},
    gemini::credentials::CredentialProvider,
    models::{
        Content, GenerateContentRequest, GenerateContentResponse, GeneratedImage, InlineData,
        Part, RequestGenerationConfig,
    },
};

/// Issues one `generateContent` request per desired image and decodes the
/// response into a displayable data URI.
#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    config: GeminiConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl ImageClient {
    pub fn new(
        http: reqwest::Client,
        config: GeminiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    /// Sends the encoded sketch plus one instruction and awaits exactly one
    /// response. No retry at this layer; a failed call is the caller's to
    /// re-issue.
    pub async fn generate(
        &self,
        source: &EncodedImage,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<GeneratedImage> {
        if source.data.is_empty() {
            return Err(SketchvarError::Validation(
                "source image payload is empty".into(),
            ));
        }
        if instruction.trim().is_empty() {
            return Err(SketchvarError::Validation(
                "instruction text is empty".into(),
            ));
        }

        // Resolved per call so a key swapped mid-session takes effect on
        // the next request.
        let api_key = self
            .credentials
            .api_key()
            .ok_or_else(|| SketchvarError::Auth("no API key available".into()))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: Some(source.mime_type.clone()),
                            data: source.data.clone(),
                        },
                    },
                    Part::Text {
                        text: instruction.to_string(),
                    },
                ],
            }],
            generation_config: Some(RequestGenerationConfig {
                image_config: *config,
            }),
        };

        let model_id = self.config.model_id();
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url(),
            model_id
        );

        log::info!("Generating variation with model: {}", model_id);
        log::debug!(
            "Request: {} byte source ({}), instruction {:?}",
            source.data.len(),
            source.mime_type,
            instruction
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                SketchvarError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini rejected credentials ({}): {}", status, body);
            return Err(SketchvarError::Auth(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {}: {}", status, body);
            return Err(SketchvarError::Transport(format!("{}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SketchvarError::Serialization(e.to_string()))?;

        extract_image(&parsed)
    }
}

/// Pulls the first inline-image part out of a response. A response with no
/// parts is `NoContent`; parts but no image is `NoImage`. If several parts
/// carry images only the first is used.
fn extract_image(response: &GenerateContentResponse) -> Result<GeneratedImage> {
    let parts = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    if parts.is_empty() {
        return Err(SketchvarError::NoContent);
    }

    for part in parts {
        if let Part::InlineData { inline_data } = part {
            if inline_data.data.is_empty() {
                continue;
            }
            let mime = inline_data.mime_type.as_deref().unwrap_or("image/png");
            return Ok(GeneratedImage::new(format!(
                "data:{};base64,{}",
                mime, inline_data.data
            )));
        }
    }

    Err(SketchvarError::NoImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::credentials::StaticCredentials;

    fn client_with_key(key: Option<&str>) -> ImageClient {
        let credentials: Arc<dyn CredentialProvider> = match key {
            Some(k) => Arc::new(StaticCredentials::new(k)),
            None => Arc::new(NoCredentials),
        };
        ImageClient::new(reqwest::Client::new(), GeminiConfig::new(), credentials)
    }

    struct NoCredentials;
    impl CredentialProvider for NoCredentials {
        fn api_key(&self) -> Option<String> {
            None
        }
    }

    fn response_from(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn empty_instruction_fails_validation_before_any_io() {
        let client = client_with_key(Some("key"));
        let source = EncodedImage {
            data: "aGVsbG8=".into(),
            mime_type: "image/png".into(),
        };

        let err = client
            .generate(&source, "   ", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SketchvarError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_auth_before_any_io() {
        let client = client_with_key(None);
        let source = EncodedImage {
            data: "aGVsbG8=".into(),
            mime_type: "image/png".into(),
        };

        let err = client
            .generate(&source, "add a cloak", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SketchvarError::Auth(_)));
    }

    #[test]
    fn no_candidates_is_no_content() {
        let response = response_from("{}");
        assert!(matches!(
            extract_image(&response),
            Err(SketchvarError::NoContent)
        ));
    }

    #[test]
    fn empty_parts_is_no_content() {
        let response = response_from(r#"{"candidates":[{"content":{"parts":[]}}]}"#);
        assert!(matches!(
            extract_image(&response),
            Err(SketchvarError::NoContent)
        ));
    }

    #[test]
    fn text_only_parts_are_no_image() {
        let response = response_from(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"I could not draw that"},
                {"text":"sorry"}
            ]}}]}"#,
        );
        assert!(matches!(
            extract_image(&response),
            Err(SketchvarError::NoImage)
        ));
    }

    #[test]
    fn first_image_part_wins() {
        let response = response_from(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"two options"},
                {"inlineData":{"mimeType":"image/jpeg","data":"Rkly"}},
                {"inlineData":{"mimeType":"image/png","data":"U05E"}}
            ]}}]}"#,
        );

        let image = extract_image(&response).unwrap();
        assert_eq!(image.url, "data:image/jpeg;base64,Rkly");
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let response = response_from(
            r#"{"candidates":[{"content":{"parts":[
                {"inlineData":{"data":"QUJD"}}
            ]}}]}"#,
        );

        let image = extract_image(&response).unwrap();
        assert_eq!(image.url, "data:image/png;base64,QUJD");
    }
}
