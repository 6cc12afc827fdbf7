//! Single-model conversion pipeline.
//!
//! Order matters: the output path is validated (and the material path
//! derived) before the model is loaded, so a bad output name never causes a
//! load or a partial write.

use std::path::{Path, PathBuf};

use snafu::{IntoError, prelude::*};

use crate::{
    model::{ModelExporter, ModelLoader},
    naming::{NamingError, material_path_for},
    storage::{StorageError, write_text_atomic},
};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Mesh path used when no output path is given.
pub const LEGACY_OUTPUT: &str = "test.obj";

/// Errors from [`convert_model`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertError {
    /// The output path cannot carry a sibling material file.
    #[snafu(display("{source}"))]
    Naming {
        /// Naming failure.
        source: NamingError,
    },

    /// The loader failed.
    #[snafu(display("{source}"))]
    Load {
        /// Loader error, passed through unchanged.
        source: BoxedError,
    },

    /// The exporter failed.
    #[snafu(display("{source}"))]
    Export {
        /// Exporter error, passed through unchanged.
        source: BoxedError,
    },

    /// Writing the mesh or material failed.
    #[snafu(display("{source}"))]
    Write {
        /// Storage error.
        source: StorageError,
    },
}

/// What to convert and where to put it.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Model file to load.
    pub input: PathBuf,
    /// Mesh output path. `None` selects the legacy mesh-only mode writing
    /// [`LEGACY_OUTPUT`].
    pub output: Option<PathBuf>,
}

impl ConversionRequest {
    /// Request converting `input` into `output` plus its sibling material.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: Some(output.into()),
        }
    }

    /// Request the legacy mesh-only conversion of `input`.
    pub fn mesh_only(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
        }
    }
}

/// Files written by a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Internal name from the model header.
    pub model_name: String,
    /// Path of the written OBJ mesh.
    pub mesh_path: PathBuf,
    /// Path of the written MTL file, if any.
    pub material_path: Option<PathBuf>,
}

/// Output locations resolved before any I/O happens.
struct OutputPlan {
    mesh_path: PathBuf,
    material: Option<(PathBuf, String)>,
}

fn plan_outputs(output: Option<&Path>) -> Result<OutputPlan, NamingError> {
    let Some(mesh) = output else {
        return Ok(OutputPlan {
            mesh_path: PathBuf::from(LEGACY_OUTPUT),
            material: None,
        });
    };

    let material_path = material_path_for(mesh)?;
    // material_path_for only succeeds for a non-empty UTF-8 file name.
    let file_name = material_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(OutputPlan {
        mesh_path: mesh.to_path_buf(),
        material: Some((material_path, file_name)),
    })
}

/// Mesh text as written to disk: `mtllib` first when a material exists.
pub fn mesh_file_contents(mesh: &str, material_file_name: Option<&str>) -> String {
    match material_file_name {
        Some(name) => format!("mtllib {name}\n{mesh}"),
        None => mesh.to_string(),
    }
}

/// Load `request.input`, export it and write the mesh and material files.
///
/// # Errors
///
/// - [`ConvertError::Naming`] before any I/O if the output path is unusable.
/// - [`ConvertError::Load`] / [`ConvertError::Export`] with the
///   collaborator's error as the source.
/// - [`ConvertError::Write`] if either file cannot be written. The mesh is
///   written before the material.
pub async fn convert_model<L, E>(
    loader: &L,
    exporter: &E,
    request: &ConversionRequest,
) -> Result<ConversionReport, ConvertError>
where
    L: ModelLoader + ?Sized,
    E: ModelExporter + ?Sized,
{
    let plan = plan_outputs(request.output.as_deref()).context(NamingSnafu)?;
    let material_name = plan.material.as_ref().map(|(_, name)| name.as_str());

    let model = loader
        .load(&request.input)
        .await
        .map_err(|e| LoadSnafu.into_error(Box::new(e) as BoxedError))?;
    log::info!(
        "loaded {} (internal name '{}')",
        request.input.display(),
        model.name()
    );

    let exported = exporter
        .write_model(&model, material_name)
        .await
        .map_err(|e| ExportSnafu.into_error(Box::new(e) as BoxedError))?;

    let mesh_text = mesh_file_contents(&exported.mesh, material_name);
    write_text_atomic(&plan.mesh_path, &mesh_text)
        .await
        .context(WriteSnafu)?;

    let mut material_path = None;
    if let Some((path, _)) = plan.material {
        let text = exported.material.unwrap_or_default();
        write_text_atomic(&path, &text).await.context(WriteSnafu)?;
        material_path = Some(path);
    }

    Ok(ConversionReport {
        model_name: model.name().to_string(),
        mesh_path: plan.mesh_path,
        material_path,
    })
}
