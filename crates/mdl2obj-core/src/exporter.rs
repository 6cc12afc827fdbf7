//! Exporter backed by an external converter program.
//!
//! The program is invoked as `<program> export <model> <scratch>/export.obj`,
//! the command shape of the `assimp` command-line tool. It is expected to
//! write `export.obj` and, next to it, `export.mtl`. The scratch stem is
//! always `export`; the pipeline picks the real output names. Both files are
//! read back into memory and the scratch directory is removed when the call
//! returns.

use std::{
    io,
    path::{Path, PathBuf},
};

use snafu::prelude::*;
use tokio::process::Command;

use crate::{
    model::{ExportedModel, ModelExporter},
    studio::StudioModel,
};

const SCRATCH_STEM: &str = "export";

/// Errors from running the external converter.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ExportError {
    /// The scratch directory could not be created.
    #[snafu(display("Failed to create scratch directory for export: {source}"))]
    Scratch {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The converter could not be started.
    #[snafu(display(
        "Failed to run exporter '{program}': {source}. \
         Install it or point --exporter / MDL2OBJ_EXPORTER at a converter."
    ))]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The converter ran but reported failure.
    #[snafu(display("Exporter '{program}' failed ({status}) on {model}: {stderr}"))]
    ToolFailed {
        /// Program that failed.
        program: String,
        /// Model being converted.
        model: String,
        /// Rendered exit status.
        status: String,
        /// Trimmed stderr of the program.
        stderr: String,
    },

    /// The converter exited successfully without producing a mesh.
    #[snafu(display("Exporter '{program}' produced no mesh for {model}"))]
    MissingMesh {
        /// Program that ran.
        program: String,
        /// Model being converted.
        model: String,
    },

    /// A produced file could not be read back.
    #[snafu(display("Failed to read exporter output {path}: {source}"))]
    ReadOutput {
        /// Output file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// [`ModelExporter`] that shells out to a converter program.
#[derive(Debug, Clone)]
pub struct ExternalToolExporter {
    program: PathBuf,
}

impl ExternalToolExporter {
    /// Program used when none is configured.
    pub const DEFAULT_PROGRAM: &'static str = "assimp";

    /// Create an exporter that runs `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this exporter runs.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ExternalToolExporter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

/// Drop every `mtllib` statement; the pipeline writes its own.
pub fn strip_mtllib(mesh: &str) -> String {
    mesh.split_inclusive('\n')
        .filter(|line| {
            let mut words = line.split_whitespace();
            words.next() != Some("mtllib")
        })
        .collect()
}

async fn read_optional(path: &Path) -> Result<Option<String>, ExportError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(ReadOutputSnafu {
            path: path.display().to_string(),
        }),
    }
}

#[async_trait::async_trait]
impl ModelExporter for ExternalToolExporter {
    type Error = ExportError;

    async fn write_model(
        &self,
        model: &StudioModel,
        material_file_name: Option<&str>,
    ) -> Result<ExportedModel, ExportError> {
        let scratch = tempfile::tempdir().context(ScratchSnafu)?;
        let mesh_path = scratch.path().join(format!("{SCRATCH_STEM}.obj"));
        let material_path = scratch.path().join(format!("{SCRATCH_STEM}.mtl"));
        let program = self.program.display().to_string();
        let model_shown = model.path().display().to_string();

        log::debug!("running {program} export {model_shown}");
        let output = Command::new(&self.program)
            .arg("export")
            .arg(model.path())
            .arg(&mesh_path)
            .output()
            .await
            .context(SpawnSnafu {
                program: program.clone(),
            })?;

        if !output.stdout.is_empty() {
            log::debug!("{program}: {}", String::from_utf8_lossy(&output.stdout).trim());
        }

        ensure!(
            output.status.success(),
            ToolFailedSnafu {
                program,
                model: model_shown,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        let mesh = read_optional(&mesh_path)
            .await?
            .context(MissingMeshSnafu {
                program: program.clone(),
                model: model_shown.clone(),
            })?;

        let material = match material_file_name {
            None => None,
            Some(name) => match read_optional(&material_path).await? {
                Some(text) => Some(text),
                None => {
                    log::warn!(
                        "{program} wrote no material library for {model_shown}; {name} will be empty"
                    );
                    Some(String::new())
                }
            },
        };

        Ok(ExportedModel {
            mesh: strip_mtllib(&mesh),
            material,
        })
    }
}
