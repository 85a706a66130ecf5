//! Export pipeline: flatten the final card to an image, then share it or fall
//! back to a file download.
//!
//! Both collaborators are traits so the pipeline can run against the browser
//! (`web` module) or against in-memory fakes in tests. The pipeline never
//! touches editor state; a failure leaves the composition as it was.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ExportSettings;
use crate::error::ErrorCode;
use crate::render::Scene;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("could not render the postcard: {0}")]
    Rasterize(String),
    #[error("could not share the postcard: {0}")]
    Share(String),
    #[error("could not save the postcard: {0}")]
    Download(String),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rasterize(_) => "E_EXPORT_RASTERIZE",
            Self::Share(_) => "E_EXPORT_SHARE",
            Self::Download(_) => "E_EXPORT_DOWNLOAD",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

/// Why a share attempt did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// The user dismissed the share sheet.
    #[error("share cancelled")]
    Cancelled,
    #[error("share failed: {0}")]
    Failed(String),
}

/// An encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl RasterImage {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self { mime_type: mime_type.into(), data }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Text and filename attached to a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMeta {
    pub filename: String,
    pub title: String,
    pub text: String,
}

impl From<&ExportSettings> for ShareMeta {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            filename: settings.filename.clone(),
            title: settings.share_title.clone(),
            text: settings.share_text.clone(),
        }
    }
}

/// How an export finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ExportOutcome {
    Shared,
    /// Saved as a file. `share_error` is set when sharing was attempted and
    /// failed before the download fallback.
    Downloaded {
        filename: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        share_error: Option<String>,
    },
    Cancelled,
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Flattens a composed scene into an encoded image.
#[async_trait::async_trait(?Send)]
pub trait Rasterizer {
    async fn rasterize(&self, scene: &Scene) -> Result<RasterImage, ExportError>;
}

/// Hands a finished image to the user.
#[async_trait::async_trait(?Send)]
pub trait ShareTarget {
    /// Whether the platform can share this image natively.
    fn can_share(&self, image: &RasterImage, meta: &ShareMeta) -> bool;

    async fn share(&self, image: &RasterImage, meta: &ShareMeta) -> Result<(), ShareError>;

    /// Save the image as a file named `filename`.
    ///
    /// # Errors
    ///
    /// [`ExportError::Download`] when the platform refuses the download.
    fn download(&self, image: &RasterImage, filename: &str) -> Result<(), ExportError>;
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct ExportPipeline {
    meta: ShareMeta,
}

impl ExportPipeline {
    #[must_use]
    pub fn new(settings: &ExportSettings) -> Self {
        Self { meta: ShareMeta::from(settings) }
    }

    /// Rasterize `scene`, then share it when the platform can, otherwise
    /// download it. A failed share (other than a user cancel) also falls back
    /// to download, and the failure is kept on the outcome.
    ///
    /// # Errors
    ///
    /// [`ExportError::Rasterize`] when rendering fails or yields no bytes,
    /// [`ExportError::Download`] when the fallback download fails.
    pub async fn run(
        &self,
        scene: &Scene,
        rasterizer: &dyn Rasterizer,
        target: &dyn ShareTarget,
    ) -> Result<ExportOutcome, ExportError> {
        let image = rasterizer.rasterize(scene).await?;
        if image.is_empty() {
            warn!("rasterizer returned an empty image");
            return Err(ExportError::Rasterize("empty image".into()));
        }

        let mut share_error = None;
        if target.can_share(&image, &self.meta) {
            match target.share(&image, &self.meta).await {
                Ok(()) => {
                    info!(bytes = image.data.len(), "postcard shared");
                    return Ok(ExportOutcome::Shared);
                }
                Err(ShareError::Cancelled) => {
                    info!("share cancelled by user");
                    return Ok(ExportOutcome::Cancelled);
                }
                Err(ShareError::Failed(reason)) => {
                    warn!(%reason, "share failed; falling back to download");
                    share_error = Some(reason);
                }
            }
        }

        target.download(&image, &self.meta.filename)?;
        info!(filename = %self.meta.filename, bytes = image.data.len(), "postcard downloaded");
        Ok(ExportOutcome::Downloaded { filename: self.meta.filename.clone(), share_error })
    }
}
