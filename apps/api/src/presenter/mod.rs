//! Holds the latest generated resume and the actions a user
//! can take on it.
//!
//! Each action is independent: a failing copy or export never touches the
//! result or the form. Renderer, clipboard and exporter are injected.

pub mod clipboard;
pub mod export;
pub mod markdown;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::layout::FontFamily;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::resume::GenerationResult;

use self::clipboard::{Clipboard, ClipboardError};
use self::export::{DocumentExporter, ExportError, ExportedDocument};
use self::markdown::MarkdownRenderer;

/// A result as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResult {
    pub result: GenerationResult,
    pub html: String,
    pub translation: Option<RenderedTranslation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTranslation {
    pub markdown: String,
    pub html: String,
}

#[derive(Default)]
struct Slot {
    result: Option<GenerationResult>,
    translation: Option<String>,
}

pub struct ResultPresenter {
    slot: RwLock<Slot>,
    renderer: Arc<dyn MarkdownRenderer>,
    clipboard: Arc<dyn Clipboard>,
    exporter: Arc<dyn DocumentExporter>,
}

impl ResultPresenter {
    pub fn new(
        renderer: Arc<dyn MarkdownRenderer>,
        clipboard: Arc<dyn Clipboard>,
        exporter: Arc<dyn DocumentExporter>,
    ) -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
            renderer,
            clipboard,
            exporter,
        }
    }

    /// Replaces the current result and drops any translation of the old one.
    pub async fn replace(&self, result: GenerationResult) {
        let mut slot = self.slot.write().await;
        slot.result = Some(result);
        slot.translation = None;
    }

    pub async fn clear(&self) {
        *self.slot.write().await = Slot::default();
    }

    pub async fn current(&self) -> Option<GenerationResult> {
        self.slot.read().await.result.clone()
    }

    pub async fn render(&self) -> Option<RenderedResult> {
        let slot = self.slot.read().await;
        let result = slot.result.clone()?;
        let html = self.renderer.render(&result.markdown);
        let translation = slot.translation.as_ref().map(|markdown| RenderedTranslation {
            html: self.renderer.render(markdown),
            markdown: markdown.clone(),
        });
        Some(RenderedResult {
            result,
            html,
            translation,
        })
    }

    /// Copies the current markdown. `Ok(false)` when there is nothing to copy.
    pub async fn copy_to_clipboard(&self) -> Result<bool, ClipboardError> {
        let Some(result) = self.current().await else {
            return Ok(false);
        };
        self.clipboard.copy(&result.markdown).await?;
        info!("Copied result {} to clipboard", result.id);
        Ok(true)
    }

    /// Exports the current result. `Ok(None)` when there is nothing to export.
    pub async fn export(&self, font: FontFamily) -> Result<Option<ExportedDocument>, ExportError> {
        let Some(result) = self.current().await else {
            return Ok(None);
        };
        self.exporter
            .export(&result.markdown, font, "original")
            .await
            .map(Some)
    }

    /// Translates the current result and keeps the translation next to it.
    ///
    /// On failure the original stays displayed and no translation is stored.
    /// Returns `Ok(None)` when there is no result. If a new result lands while
    /// the call is in flight, the stale translation is discarded.
    pub async fn translate(&self, completion: &CompletionClient) -> Result<Option<String>, LlmError> {
        let Some(result) = self.current().await else {
            return Ok(None);
        };
        let translated = completion.translate(&result.markdown).await?;

        let mut slot = self.slot.write().await;
        if slot.result.as_ref().map(|r| r.id) == Some(result.id) {
            slot.translation = Some(translated.clone());
        }
        Ok(Some(translated))
    }

    pub async fn export_markdown(
        &self,
        markdown: &str,
        font: FontFamily,
        label: &str,
    ) -> Result<ExportedDocument, ExportError> {
        self.exporter.export(markdown, font, label).await
    }
}
