//! Drives one generation run: validate, encode once, then one batch of
//! parallel calls per prompt, processed sequentially across prompts.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::{
    config::GenerationConfig,
    encoder::SourceHandle,
    error::Result,
    gemini::VariationService,
    models::{PromptDescriptor, PromptStatus, SessionState, SessionUpdate, VariationSet},
};

/// Fixed instruction prefix. Without it the model is free to restyle the
/// character instead of varying it.
pub const STYLE_PREAMBLE: &str = "Using the same exact visual style, ";

/// Independent samples per prompt, not a pipeline.
pub const DEFAULT_BATCH_SIZE: usize = 3;

pub struct Orchestrator {
    service: Arc<dyn VariationService>,
    batch_size: usize,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn VariationService>) -> Self {
        Self {
            service,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Starts a run and returns its updates as a stream. The caller folds
    /// each update into its own [`SessionState`]; the orchestrator never
    /// touches caller state directly. Prompts are processed one at a time,
    /// so outstanding requests never exceed the batch size; failures in one
    /// prompt's batch do not stop the prompts after it.
    pub fn run(
        &self,
        source: SourceHandle,
        prompts: Vec<PromptDescriptor>,
        config: GenerationConfig,
    ) -> ReceiverStream<SessionUpdate> {
        let (tx, rx) = mpsc::channel(32);
        let service = Arc::clone(&self.service);
        let batch_size = self.batch_size;

        tokio::spawn(async move {
            drive_run(service, batch_size, source, prompts, config, tx).await;
        });

        ReceiverStream::new(rx)
    }

    /// Convenience wrapper: runs against a caller-owned session, applying
    /// every update as it arrives.
    pub async fn run_session(
        &self,
        state: &mut SessionState,
        source: SourceHandle,
        config: GenerationConfig,
    ) {
        state.clear_error();
        let mut updates = self.run(source, state.prompts.clone(), config);
        while let Some(update) = updates.next().await {
            state.apply(update);
        }
    }
}

async fn drive_run(
    service: Arc<dyn VariationService>,
    batch_size: usize,
    source: SourceHandle,
    prompts: Vec<PromptDescriptor>,
    config: GenerationConfig,
    tx: mpsc::Sender<SessionUpdate>,
) {
    // Encode once; every batch reuses the same payload.
    let encoded = match source.encode().await {
        Ok(encoded) => encoded,
        Err(e) => {
            log::error!("Failed to encode source image: {}", e);
            let _ = tx
                .send(SessionUpdate::RunFailed {
                    message: format!("Failed to process image: {}", e),
                })
                .await;
            return;
        }
    };

    let valid: Vec<PromptDescriptor> = prompts.into_iter().filter(|p| p.has_text()).collect();
    if valid.is_empty() {
        let _ = tx
            .send(SessionUpdate::RunFailed {
                message: "Describe at least one character variation.".into(),
            })
            .await;
        return;
    }

    log::info!(
        "Starting generation run: {} prompt(s), {} calls per prompt",
        valid.len(),
        batch_size
    );

    for prompt in valid {
        if tx
            .send(SessionUpdate::PromptStatus {
                id: prompt.id.clone(),
                status: PromptStatus::Processing,
            })
            .await
            .is_err()
        {
            return;
        }

        let set = VariationSet::generating(prompt.text.clone());
        let set_id = set.id.clone();
        if tx.send(SessionUpdate::SetStarted { set }).await.is_err() {
            return;
        }

        let instruction = format!("{}{}", STYLE_PREAMBLE, prompt.text);

        // Identical inputs on purpose: the batch is independent samples of
        // the same request.
        let calls = (0..batch_size).map(|_| service.generate(&encoded, &instruction, &config));
        let settled: Vec<Result<_>> = join_all(calls).await;

        let batch: Result<Vec<_>> = settled.into_iter().collect();
        let (set_update, prompt_status) = match batch {
            Ok(images) => {
                log::info!("Prompt {:?}: {} image(s) generated", prompt.text, images.len());
                (
                    SessionUpdate::SetCompleted { id: set_id, images },
                    PromptStatus::Success,
                )
            }
            Err(e) => {
                // One failed call fails the whole batch; the good results
                // are discarded rather than shown as a partial set.
                log::error!("Prompt {:?}: batch failed: {}", prompt.text, e);
                (
                    SessionUpdate::SetFailed { id: set_id },
                    PromptStatus::Error,
                )
            }
        };

        if tx.send(set_update).await.is_err() {
            return;
        }
        if tx
            .send(SessionUpdate::PromptStatus {
                id: prompt.id,
                status: prompt_status,
            })
            .await
            .is_err()
        {
            return;
        }
    }

    let _ = tx.send(SessionUpdate::RunFinished).await;
}
