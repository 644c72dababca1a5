use serde::{Deserialize, Serialize};

use crate::models::{
    GeneratedImage, PromptDescriptor, PromptStatus, SetStatus, VariationSet,
};

/// One step of an in-flight generation run. The orchestrator emits these in
/// order; the caller folds them into its [`SessionState`] with
/// [`SessionState::apply`]. Every update replaces whole values, so a caller
/// observing state between updates never sees a half-written set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionUpdate {
    PromptStatus { id: String, status: PromptStatus },
    SetStarted { set: VariationSet },
    SetCompleted { id: String, images: Vec<GeneratedImage> },
    SetFailed { id: String },
    RunFailed { message: String },
    RunFinished,
}

/// The session's visible state: the prompt list, the variation sets (newest
/// first), and at most one run-level error message. Owned by the caller and
/// handed to the orchestrator by reference, never read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub prompts: Vec<PromptDescriptor>,
    pub sets: Vec<VariationSet>,
    pub global_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Starts with a single empty prompt, mirroring the one-row editor the
    /// front end opens with.
    pub fn new() -> Self {
        Self {
            prompts: vec![PromptDescriptor::empty()],
            sets: Vec::new(),
            global_error: None,
        }
    }

    pub fn add_prompt(&mut self) {
        self.prompts.push(PromptDescriptor::empty());
    }

    /// Editing a prompt's text resets it to idle so stale success/error
    /// badges never describe text the user has since changed.
    pub fn update_prompt_text(&mut self, id: &str, text: impl Into<String>) {
        let text = text.into();
        self.prompts = self
            .prompts
            .iter()
            .map(|p| {
                if p.id == id {
                    PromptDescriptor {
                        id: p.id.clone(),
                        text: text.clone(),
                        status: PromptStatus::Idle,
                    }
                } else {
                    p.clone()
                }
            })
            .collect();
    }

    /// The prompt list is never empty: removing the last descriptor clears
    /// it in place instead.
    pub fn remove_prompt(&mut self, id: &str) {
        if self.prompts.len() <= 1 {
            self.update_prompt_text(id, "");
            return;
        }
        self.prompts.retain(|p| p.id != id);
    }

    pub fn clear_error(&mut self) {
        self.global_error = None;
    }

    /// Folds one orchestrator update into the state. Updates naming a
    /// prompt or set that is no longer present are dropped silently; the
    /// caller may have removed the row between status transitions.
    pub fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::PromptStatus { id, status } => {
                self.prompts = self
                    .prompts
                    .iter()
                    .map(|p| {
                        if p.id == id {
                            PromptDescriptor {
                                status,
                                ..p.clone()
                            }
                        } else {
                            p.clone()
                        }
                    })
                    .collect();
            }
            SessionUpdate::SetStarted { set } => {
                self.sets.insert(0, set);
            }
            SessionUpdate::SetCompleted { id, images } => {
                self.sets = self
                    .sets
                    .iter()
                    .map(|s| {
                        if s.id == id {
                            VariationSet {
                                status: SetStatus::Completed,
                                images: images.clone(),
                                ..s.clone()
                            }
                        } else {
                            s.clone()
                        }
                    })
                    .collect();
            }
            SessionUpdate::SetFailed { id } => {
                self.sets = self
                    .sets
                    .iter()
                    .map(|s| {
                        if s.id == id {
                            VariationSet {
                                status: SetStatus::Error,
                                images: Vec::new(),
                                ..s.clone()
                            }
                        } else {
                            s.clone()
                        }
                    })
                    .collect();
            }
            SessionUpdate::RunFailed { message } => {
                self.global_error = Some(message);
            }
            SessionUpdate::RunFinished => {}
        }
    }
}
