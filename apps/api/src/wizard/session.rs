//! The single form a user is filling in.
//!
//! Owns the form state, the step navigator, persistence, the completion client
//! and the result presenter. Every HTTP handler goes through here.
//!
//! Invariants:
//! - The form lock is never held across a network call; submit works on a snapshot.
//! - A failed submit or translation leaves the form exactly as it was.
//! - At most one generation or translation runs at a time (see `InFlight`).
//! - A resume generated from a form that was reset meanwhile is never presented.
//! - Snapshots reach the saver in the order the edits were made.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::assembler::assemble_prompt;
use crate::layout::FontFamily;
use crate::llm_client::{CompletionClient, ConfigurationError};
use crate::models::form::{FieldUpdate, FormState, ProjectField, ResumeFormat};
use crate::models::resume::GenerationResult;
use crate::presenter::export::ExportedDocument;
use crate::presenter::{RenderedResult, ResultPresenter};
use crate::store::{DebouncedSaver, FormStore};
use crate::wizard::inflight::InFlight;
use crate::wizard::navigator::{StepNavigator, StepStatus};
use crate::wizard::steps::StepDescriptor;

/// Navigator state as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub steps: &'static [StepDescriptor],
    pub current_step: usize,
    pub statuses: Vec<StepStatus>,
    pub is_last_step: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationExport {
    pub markdown: String,
    pub document: ExportedDocument,
}

pub struct FormSession {
    form: Mutex<FormState>,
    navigator: Mutex<StepNavigator>,
    store: FormStore,
    saver: DebouncedSaver,
    completion: Result<CompletionClient, ConfigurationError>,
    presenter: ResultPresenter,
    in_flight: InFlight,
    /// Bumped by every reset.
    epoch: AtomicU64,
}

impl FormSession {
    /// Restores any saved form and starts the debounced writer.
    pub async fn open(
        store: FormStore,
        saver: DebouncedSaver,
        completion: Result<CompletionClient, ConfigurationError>,
        presenter: ResultPresenter,
    ) -> Self {
        let form = store.load().await;
        Self {
            form: Mutex::new(form),
            navigator: Mutex::new(StepNavigator::default()),
            store,
            saver,
            completion,
            presenter,
            in_flight: InFlight::default(),
            epoch: AtomicU64::new(0),
        }
    }

    pub async fn form(&self) -> FormState {
        self.form.lock().await.clone()
    }

    // ── Field edits ────────────────────────────────────────────────────────

    pub async fn update_field(&self, update: FieldUpdate) -> FormState {
        self.edit(|form| form.apply(update)).await.1
    }

    pub async fn add_project(&self) -> (usize, FormState) {
        self.edit(FormState::add_project).await
    }

    pub async fn update_project(
        &self,
        index: usize,
        field: ProjectField,
        value: String,
    ) -> Result<FormState, AppError> {
        self.try_edit(|form| {
            if form.update_project(index, field, value) {
                Ok(())
            } else {
                Err(project_not_found(index))
            }
        })
        .await
        .map(|((), form)| form)
    }

    pub async fn remove_project(&self, index: usize) -> Result<FormState, AppError> {
        self.try_edit(|form| form.remove_project(index).map(|_| ()).ok_or_else(|| project_not_found(index)))
            .await
            .map(|((), form)| form)
    }

    /// Applies `edit` under the form lock and schedules a save.
    async fn edit<T>(&self, edit: impl FnOnce(&mut FormState) -> T) -> (T, FormState) {
        let mut form = self.form.lock().await;
        let value = edit(&mut form);
        let snapshot = form.clone();
        self.saver.schedule(snapshot.clone());
        (value, snapshot)
    }

    /// Like `edit`, but a rejected edit schedules nothing.
    async fn try_edit<T>(
        &self,
        edit: impl FnOnce(&mut FormState) -> Result<T, AppError>,
    ) -> Result<(T, FormState), AppError> {
        let mut form = self.form.lock().await;
        let value = edit(&mut form)?;
        let snapshot = form.clone();
        self.saver.schedule(snapshot.clone());
        Ok((value, snapshot))
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    pub async fn wizard(&self) -> WizardView {
        let navigator = self.navigator.lock().await;
        WizardView {
            steps: navigator.steps(),
            current_step: navigator.current(),
            statuses: navigator.step_statuses(),
            is_last_step: navigator.is_last_step(),
            busy: self.in_flight.is_busy(),
        }
    }

    /// Saves the form, then moves one step forward (clamped).
    pub async fn next(&self) -> WizardView {
        self.save_now().await;
        let index = self.navigator.lock().await.next();
        info!("Moved to step {index}");
        self.wizard().await
    }

    /// Saves the form, then moves one step back (clamped).
    pub async fn prev(&self) -> WizardView {
        self.save_now().await;
        let index = self.navigator.lock().await.prev();
        info!("Moved to step {index}");
        self.wizard().await
    }

    /// Writes the current form immediately. The write goes through the saver
    /// task so it never races a debounced one.
    async fn save_now(&self) {
        {
            let form = self.form.lock().await;
            self.saver.schedule(form.clone());
        }
        self.saver.flush().await;
    }

    // ── Generation ─────────────────────────────────────────────────────────

    /// Builds the prompt from the current form, generates a resume and
    /// presents it. Only allowed on the last step; does not move the navigator.
    pub async fn submit(&self) -> Result<RenderedResult, AppError> {
        if !self.navigator.lock().await.is_last_step() {
            return Err(AppError::Validation(
                "The resume can only be generated from the last step".to_string(),
            ));
        }
        let completion = self.completion_client()?;

        let epoch = self.epoch.load(Ordering::Acquire);
        let snapshot = self.form().await;
        if snapshot.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Job description cannot be empty".to_string(),
            ));
        }

        let _guard = self.in_flight.try_acquire().ok_or(AppError::Busy)?;

        let prompt = assemble_prompt(&snapshot);
        let markdown = completion.complete(&prompt).await?;

        let result = GenerationResult::new(markdown);
        {
            // Held so a reset cannot slip in between the check and the replace.
            let _form = self.form.lock().await;
            if self.epoch.load(Ordering::Acquire) != epoch {
                warn!("Discarding resume {}: form was reset during generation", result.id);
                return Err(AppError::Conflict(
                    "The form was reset while the resume was being generated".to_string(),
                ));
            }
            info!("Generated resume {} ({} chars)", result.id, result.markdown.len());
            self.presenter.replace(result).await;
        }
        self.save_now().await;

        self.presenter
            .render()
            .await
            .ok_or_else(|| AppError::NotFound("No generated resume".to_string()))
    }

    pub async fn result(&self) -> Result<RenderedResult, AppError> {
        self.presenter.render().await.ok_or_else(no_result)
    }

    pub async fn copy_result(&self) -> Result<(), AppError> {
        if self.presenter.copy_to_clipboard().await? {
            Ok(())
        } else {
            Err(no_result())
        }
    }

    pub async fn export_result(&self) -> Result<ExportedDocument, AppError> {
        let font = self.export_font().await;
        self.presenter.export(font).await?.ok_or_else(no_result)
    }

    /// Translates the current result and exports the translation.
    pub async fn translate_and_export(&self) -> Result<TranslationExport, AppError> {
        let completion = self.completion_client()?;
        if self.presenter.current().await.is_none() {
            return Err(no_result());
        }
        let _guard = self.in_flight.try_acquire().ok_or(AppError::Busy)?;

        let markdown = match self.presenter.translate(completion).await {
            Ok(Some(markdown)) => markdown,
            Ok(None) => return Err(no_result()),
            Err(e) => {
                warn!("Translation failed, keeping original result: {e}");
                return Err(e.into());
            }
        };

        let font = self.export_font().await;
        let document = self
            .presenter
            .export_markdown(&markdown, font, "translated")
            .await?;
        Ok(TranslationExport { markdown, document })
    }

    async fn export_font(&self) -> FontFamily {
        match self.form.lock().await.config.format {
            ResumeFormat::Ats => FontFamily::Serif,
            ResumeFormat::Creative | ResumeFormat::Technical => FontFamily::Sans,
        }
    }

    fn completion_client(&self) -> Result<&CompletionClient, AppError> {
        self.completion
            .as_ref()
            .map_err(|e| AppError::Configuration(e.clone()))
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// Erases the saved form and starts over with an empty one.
    pub async fn reset(&self) -> FormState {
        {
            let mut form = self.form.lock().await;
            self.epoch.fetch_add(1, Ordering::AcqRel);
            self.saver.discard().await;
            self.store.clear().await;
            *form = FormState::default();
            self.presenter.clear().await;
        }
        self.navigator.lock().await.reset();
        info!("Form reset");
        FormState::default()
    }

    /// Writes any pending debounced save. Called on shutdown.
    pub async fn flush(&self) {
        self.saver.flush().await;
    }
}

fn project_not_found(index: usize) -> AppError {
    AppError::Validation(format!("No project at index {index}"))
}

fn no_result() -> AppError {
    AppError::NotFound("No resume has been generated yet".to_string())
}
