//! Core pieces of the `mdl2obj` studio-model converter.
//!
//! This crate owns everything around the actual geometry conversion:
//!
//! - Sibling-file naming: deriving the material (`.mtl`) path that sits next
//!   to a mesh (`.obj`) path, with strict extension validation (`naming`).
//! - The collaborator boundary: an owned `StudioModel` returned by a
//!   `ModelLoader` and handed explicitly to a `ModelExporter` (`model`,
//!   `studio`).
//! - An exporter that drives an external converter program (`exporter`).
//! - Atomic text-file writes with guaranteed cleanup (`storage`).
//! - The single-model pipeline that validates before touching the
//!   filesystem (`convert`) and batch discovery (`batch`).
//!
//! The CLI crate depends on this one and only adds argument parsing,
//! logging setup and exit codes.
#![deny(missing_docs)]

pub mod batch;
pub mod convert;
pub mod exporter;
pub mod model;
pub mod naming;
pub mod storage;
pub mod studio;

pub use convert::{ConversionReport, ConversionRequest, ConvertError, convert_model};
pub use exporter::{ExportError, ExternalToolExporter};
pub use model::{ExportedModel, ModelExporter, ModelLoader, StudioLoader};
pub use naming::{NamingError, derive_sibling_path, material_path_for};
pub use studio::{LoadError, StudioHeader, StudioModel};
