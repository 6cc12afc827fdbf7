//! Studio model header check and the owned model value.
//!
//! Only the fixed-size prefix of the file is decoded here. It is enough to
//! reject files that are not studio models before the exporter is run, and
//! it gives us the model's internal name for reporting.

use std::path::{Path, PathBuf};

use snafu::prelude::*;

/// Magic bytes at the start of every studio model.
pub const STUDIO_IDENT: [u8; 4] = *b"IDST";

/// The only studio format version this tool accepts.
pub const STUDIO_VERSION: i32 = 10;

/// Size of the header prefix read by [`StudioHeader::parse`].
pub const HEADER_LEN: usize = 4 + 4 + NAME_LEN + 4;

const NAME_LEN: usize = 64;

/// Errors raised while loading a model file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    /// The file could not be read.
    #[snafu(display("Failed to read model file {path}: {source}"))]
    Read {
        /// The model path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is shorter than the fixed header.
    #[snafu(display("Model file {path} is truncated: {len} bytes, header needs {HEADER_LEN}"))]
    Truncated {
        /// The model path.
        path: String,
        /// Actual file length.
        len: usize,
    },

    /// The ident is not `IDST`.
    #[snafu(display("{path} is not a studio model (ident {ident:?})"))]
    BadMagic {
        /// The model path.
        path: String,
        /// The four bytes found instead.
        ident: [u8; 4],
    },

    /// The header declares a version other than 10.
    #[snafu(display("{path} has unsupported studio version {version} (expected {STUDIO_VERSION})"))]
    UnsupportedVersion {
        /// The model path.
        path: String,
        /// Version found in the header.
        version: i32,
    },
}

/// Decoded fixed header of a studio model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioHeader {
    /// Format version (always [`STUDIO_VERSION`] once validated).
    pub version: i32,
    /// Internal model name, NUL padding stripped.
    pub name: String,
    /// File length the header claims.
    pub declared_len: i32,
}

fn read_i32_le(bytes: &[u8], offset: usize) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_le_bytes(buf)
}

impl StudioHeader {
    /// Decode and validate the header at the start of `bytes`.
    ///
    /// `path` is used only for error messages.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, LoadError> {
        let shown = path.display().to_string();
        ensure!(
            bytes.len() >= HEADER_LEN,
            TruncatedSnafu {
                path: shown,
                len: bytes.len(),
            }
        );

        let mut ident = [0u8; 4];
        ident.copy_from_slice(&bytes[..4]);
        ensure!(ident == STUDIO_IDENT, BadMagicSnafu { path: shown, ident });

        let version = read_i32_le(bytes, 4);
        ensure!(
            version == STUDIO_VERSION,
            UnsupportedVersionSnafu {
                path: shown,
                version,
            }
        );

        let raw_name = &bytes[8..8 + NAME_LEN];
        let end = raw_name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        let name = String::from_utf8_lossy(&raw_name[..end]).into_owned();

        let declared_len = read_i32_le(bytes, 8 + NAME_LEN);

        Ok(Self {
            version,
            name,
            declared_len,
        })
    }
}

/// A loaded studio model, owned by the caller and passed explicitly to the
/// exporter.
///
/// Only the validated header is kept. Exporters read the model body from
/// [`StudioModel::path`].
#[derive(Debug, Clone)]
pub struct StudioModel {
    path: PathBuf,
    header: StudioHeader,
}

impl StudioModel {
    /// Validate `bytes` as a studio model read from `path`.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, LoadError> {
        let path = path.into();
        let header = StudioHeader::parse(&path, bytes)?;
        if usize::try_from(header.declared_len).ok() != Some(bytes.len()) {
            log::debug!(
                "{}: header declares {} bytes, file has {}",
                path.display(),
                header.declared_len,
                bytes.len()
            );
        }
        Ok(Self { path, header })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decoded header.
    pub fn header(&self) -> &StudioHeader {
        &self.header
    }

    /// Internal model name from the header.
    pub fn name(&self) -> &str {
        &self.header.name
    }
}
