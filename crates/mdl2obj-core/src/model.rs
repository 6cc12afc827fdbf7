//! Collaborator boundary between the conversion pipeline and whatever
//! actually understands studio models.
//!
//! The loader returns an owned [`StudioModel`]; the pipeline passes it by
//! reference to the exporter. Nothing here keeps "the current model" in
//! shared state.

use std::path::Path;

use snafu::ResultExt;

use crate::studio::{LoadError, ReadSnafu, StudioModel};

/// Text produced by an exporter for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedModel {
    /// OBJ mesh text, without any `mtllib` line.
    pub mesh: String,
    /// MTL material text; `None` for the single-output call shape.
    pub material: Option<String>,
}

/// Loads a model file into memory.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    /// Error returned when a model cannot be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the model at `path`.
    async fn load(&self, path: &Path) -> Result<StudioModel, Self::Error>;
}

/// Serializes a loaded model as OBJ (and optionally MTL) text.
#[async_trait::async_trait]
pub trait ModelExporter: Send + Sync {
    /// Error returned when export fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Export `model`.
    ///
    /// `material_file_name` is the file name the mesh will reference through
    /// `mtllib`. When it is `None` no material text is produced.
    async fn write_model(
        &self,
        model: &StudioModel,
        material_file_name: Option<&str>,
    ) -> Result<ExportedModel, Self::Error>;
}

/// Default loader: reads the file and validates the studio header.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudioLoader;

#[async_trait::async_trait]
impl ModelLoader for StudioLoader {
    type Error = LoadError;

    async fn load(&self, path: &Path) -> Result<StudioModel, LoadError> {
        let bytes = tokio::fs::read(path).await.context(ReadSnafu {
            path: path.display().to_string(),
        })?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        StudioModel::from_bytes(path, &bytes)
    }
}
