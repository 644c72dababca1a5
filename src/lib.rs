pub mod config;
pub mod encoder;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;

pub use config::{AspectRatio, GeminiConfig, GenerationConfig, ImageSize};
pub use encoder::{EncodedImage, SourceHandle, SourceImage};
pub use error::{Result, SketchvarError};
pub use gemini::{
    CredentialProvider, EnvCredentials, GeminiClient, ImageClient, StaticCredentials,
    VariationService,
};
pub use models::{
    GeneratedImage, PromptDescriptor, PromptStatus, SessionState, SessionUpdate, SetStatus,
    VariationSet,
};
pub use orchestrator::{Orchestrator, DEFAULT_BATCH_SIZE, STYLE_PREAMBLE};
