//! Form session: the state behind the generator form and its two actions.
//!
//! # Invariants
//! - At most one generation or export is in flight (`BusyGuard`); a second
//!   trigger while busy is rejected without touching state.
//! - Starting a generation clears the previous result and error first, so a
//!   failure never leaves a stale script on display.
//! - The session lock is never held across the model call or the render.
//! - An issued generation runs to its stored outcome even if the caller goes away.
//! - `last_error` holds one message and survives until the next user action.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::form::attachments::{Attachment, AttachmentSet, Preview, PreviewHandle, UploadedFile};
use crate::layout::PageConfig;
use crate::llm_client::GenerativeModel;
use crate::render::{self, ExportedPdf};
use crate::script::generator::generate_script;
use crate::script::models::GeneratedScript;

/// The displayed result of the last successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptResult {
    pub script: GeneratedScript,
    pub generated_at: DateTime<Utc>,
}

/// Serializable view of the form.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub attachments: Vec<Attachment>,
    pub busy: bool,
    pub has_script: bool,
    pub generated_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct FormState {
    attachments: AttachmentSet,
    result: Option<ScriptResult>,
    last_error: Option<String>,
    /// Bumped on reset so an in-flight generation cannot repopulate a torn-down form.
    epoch: u64,
}

/// Clears the busy flag when dropped.
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Default)]
pub struct FormSession {
    state: Mutex<FormState>,
    busy: AtomicBool,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Result<BusyGuard<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { flag: &self.busy })
            .map_err(|_| AppError::Busy)
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        FormSnapshot {
            attachments: state.attachments.iter().cloned().collect(),
            busy: self.is_busy(),
            has_script: state.result.is_some(),
            generated_at: state.result.as_ref().map(|r| r.generated_at),
            last_error: state.last_error.clone(),
        }
    }

    pub async fn current(&self) -> Option<ScriptResult> {
        self.state.lock().await.result.clone()
    }

    pub async fn preview(&self, handle: PreviewHandle) -> Option<Preview> {
        self.state.lock().await.attachments.preview(handle).cloned()
    }

    /// Appends uploaded files in order. Inputs are disabled while busy.
    pub async fn add_attachments(&self, files: Vec<UploadedFile>) -> Result<Vec<Attachment>, AppError> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        let mut state = self.state.lock().await;
        state.last_error = None;
        let handles: Vec<PreviewHandle> = files.into_iter().map(|f| state.attachments.add(f)).collect();
        debug!(added = handles.len(), total = state.attachments.len(), "Attachments added");
        Ok(state
            .attachments
            .iter()
            .filter(|a| handles.contains(&a.preview))
            .cloned()
            .collect())
    }

    /// Swaps the whole attachment list for `files`.
    pub async fn replace_attachments(&self, files: Vec<UploadedFile>) -> Result<Vec<Attachment>, AppError> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        let mut state = self.state.lock().await;
        state.last_error = None;
        state.attachments.replace_all(files);
        Ok(state.attachments.iter().cloned().collect())
    }

    pub async fn remove_attachment(&self, handle: PreviewHandle) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state.last_error = None;
        if state.attachments.remove(handle) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Attachment {handle} not found")))
        }
    }

    /// Returns how many attachments were removed.
    pub async fn clear_attachments(&self) -> usize {
        let mut state = self.state.lock().await;
        state.last_error = None;
        state.attachments.clear()
    }

    /// Runs one generation from `topic` and the current attachments.
    ///
    /// The work runs on its own task, so the outcome is stored even if the
    /// caller is dropped before the model answers.
    pub async fn generate(
        self: &Arc<Self>,
        model: Arc<dyn GenerativeModel>,
        topic: &str,
    ) -> Result<GeneratedScript, AppError> {
        let session = Arc::clone(self);
        let topic = topic.to_string();
        tokio::spawn(async move { session.run_generation(model.as_ref(), &topic).await })
            .await
            .map_err(anyhow::Error::from)?
    }

    async fn run_generation(
        &self,
        model: &dyn GenerativeModel,
        topic: &str,
    ) -> Result<GeneratedScript, AppError> {
        let _guard = self.try_begin()?;

        let (inline_parts, epoch) = {
            let mut state = self.state.lock().await;
            if topic.trim().is_empty() && state.attachments.is_empty() {
                let err = AppError::InputMissing;
                state.last_error = Some(err.user_message());
                return Err(err);
            }
            state.result = None;
            state.last_error = None;
            (state.attachments.to_inline_data(), state.epoch)
        };

        let outcome = generate_script(model, topic, &inline_parts).await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            info!("Form was reset during generation; discarding outcome");
            return outcome.map_err(AppError::from);
        }
        match outcome {
            Ok(script) => {
                state.result = Some(ScriptResult {
                    script: script.clone(),
                    generated_at: Utc::now(),
                });
                Ok(script)
            }
            Err(e) => {
                error!("Error generating script: {e}");
                let err = AppError::from(e);
                state.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Renders the current script to PDF. No partial document is ever returned.
    pub async fn export_pdf(&self, config: &PageConfig) -> Result<ExportedPdf, AppError> {
        let _guard = self.try_begin()?;

        let script = {
            let mut state = self.state.lock().await;
            let result = state
                .result
                .as_ref()
                .ok_or_else(|| AppError::NotFound("No script has been generated".to_string()))?;
            let script = result.script.clone();
            state.last_error = None;
            script
        };

        match render::export_pdf(script, config.clone()).await {
            Ok(exported) => Ok(exported),
            Err(e) => {
                error!("Error generating PDF: {e}");
                let err = AppError::from(e);
                self.state.lock().await.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Navigating away: releases every attachment and forgets result and error.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let released = state.attachments.clear();
        state.result = None;
        state.last_error = None;
        state.epoch += 1;
        info!(released, "Form reset");
    }
}
