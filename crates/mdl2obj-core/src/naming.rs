//! Sibling-file naming.
//!
//! A converted model is written as two files that share a base name: the
//! mesh (`model.obj`) and its material library (`model.mtl`). This module
//! derives the second path from the first.
//!
//! Validation is intentionally narrow: the mesh path must end in an extension
//! of exactly three characters. Longer extensions such as `.jpeg` are valid
//! file names but are rejected here, matching the behaviour existing scripts
//! rely on.

use std::path::{Path, PathBuf};

use snafu::prelude::*;

/// Extension used for the material library written next to a mesh.
pub const MATERIAL_EXTENSION: &str = "mtl";

/// Number of characters an extension must have, excluding the dot.
pub const EXTENSION_CHARS: usize = 3;

/// Errors produced while deriving a sibling path.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum NamingError {
    /// The file name has no `.` at all.
    #[snafu(display("Output path '{path}' has no extension; expected something like 'model.obj'"))]
    NoExtension {
        /// The rejected path.
        path: String,
    },

    /// The file name starts with its only usable dot, so there is no base name.
    #[snafu(display("Output path '{path}' is only an extension; it needs a base name before the dot"))]
    ExtensionOnly {
        /// The rejected path.
        path: String,
    },

    /// The extension after the last dot is not exactly three characters.
    #[snafu(display(
        "Output path '{path}' has a {len}-character extension; exactly 3 characters are required"
    ))]
    ExtensionLengthMismatch {
        /// The rejected path.
        path: String,
        /// Number of characters found after the last dot.
        len: usize,
    },

    /// The replacement extension is not exactly three characters.
    #[snafu(display("Replacement extension '{extension}' must be exactly 3 characters, got {len}"))]
    ReplacementLength {
        /// The rejected replacement.
        extension: String,
        /// Its length in characters.
        len: usize,
    },

    /// The path cannot be represented as UTF-8 text.
    #[snafu(display("Output path '{path}' is not valid UTF-8"))]
    NonUtf8Path {
        /// Lossy rendering of the rejected path.
        path: String,
    },
}

/// Byte offset where the final path component begins.
fn file_name_start(path: &str) -> usize {
    path.rfind(['/', '\\']).map_or(0, |i| i + 1)
}

/// Replace the three-character extension of `path` with `new_extension`.
///
/// Only the final component of `path` is inspected; directory names may
/// contain dots freely. The dot and everything before it are preserved, so
/// the result has the same length as the input.
///
/// # Errors
///
/// - [`NamingError::ReplacementLength`] if `new_extension` is not 3 characters.
/// - [`NamingError::NoExtension`] if the file name contains no `.`.
/// - [`NamingError::ExtensionOnly`] if the last `.` is the first character of
///   the file name (for example `.obj`).
/// - [`NamingError::ExtensionLengthMismatch`] if the extension is not exactly
///   3 characters (for example `.ob` or `.jpeg`).
pub fn derive_sibling_path(path: &str, new_extension: &str) -> Result<String, NamingError> {
    let replacement_len = new_extension.chars().count();
    ensure!(
        replacement_len == EXTENSION_CHARS,
        ReplacementLengthSnafu {
            extension: new_extension,
            len: replacement_len,
        }
    );

    let name_start = file_name_start(path);
    let file_name = &path[name_start..];

    let dot = file_name.rfind('.').context(NoExtensionSnafu { path })?;
    ensure!(dot != 0, ExtensionOnlySnafu { path });

    let ext_len = file_name[dot + 1..].chars().count();
    ensure!(
        ext_len == EXTENSION_CHARS,
        ExtensionLengthMismatchSnafu { path, len: ext_len }
    );

    let base = &path[..name_start + dot + 1];
    Ok(format!("{base}{new_extension}"))
}

/// Path of the material library that accompanies the mesh at `mesh`.
pub fn material_path_for(mesh: &Path) -> Result<PathBuf, NamingError> {
    let text = mesh.to_str().context(NonUtf8PathSnafu {
        path: mesh.display().to_string(),
    })?;
    derive_sibling_path(text, MATERIAL_EXTENSION).map(PathBuf::from)
}

/// Make a name safe for use as a model/shader path.
///
/// Anything other than alphanumerics (Unicode letters and digits, not just
/// ASCII), `_`, `-`, `:` and path separators is replaced with `_`, and the
/// result is lower-cased.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':' | '/' | '\\') {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_three_char_extension() {
        assert_eq!(
            derive_sibling_path("model.obj", "mtl"),
            Ok("model.mtl".to_string())
        );
    }

    #[test]
    fn single_char_base_name_is_accepted() {
        assert_eq!(derive_sibling_path("a.obj", "mtl"), Ok("a.mtl".to_string()));
    }

    #[test]
    fn result_keeps_everything_but_the_extension() {
        for (path, ext) in [
            ("out/dir/model.obj", "mtl"),
            ("C:\\maps\\barney.xyz", "abc"),
            ("weird.name.obj", "mtl"),
            ("./relative.OBJ", "MTL"),
        ] {
            let derived = derive_sibling_path(path, ext).unwrap();
            assert_eq!(derived.len(), path.len());
            assert_eq!(&derived[..path.len() - 3], &path[..path.len() - 3]);
            assert!(derived.ends_with(ext));
        }
    }

    #[test]
    fn reapplying_same_extension_is_idempotent() {
        let once = derive_sibling_path("model.obj", "mtl").unwrap();
        let twice = derive_sibling_path(&once, "mtl").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn extension_only_is_rejected() {
        assert_eq!(
            derive_sibling_path(".obj", "mtl"),
            Err(NamingError::ExtensionOnly {
                path: ".obj".to_string()
            })
        );
        assert!(matches!(
            derive_sibling_path("out/.obj", "mtl"),
            Err(NamingError::ExtensionOnly { .. })
        ));
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert_eq!(
            derive_sibling_path("model", "mtl"),
            Err(NamingError::NoExtension {
                path: "model".to_string()
            })
        );
    }

    #[test]
    fn dots_in_directories_do_not_count() {
        assert!(matches!(
            derive_sibling_path("models.v2/barney", "mtl"),
            Err(NamingError::NoExtension { .. })
        ));
        assert_eq!(
            derive_sibling_path("models.v2/barney.obj", "mtl"),
            Ok("models.v2/barney.mtl".to_string())
        );
    }

    #[test]
    fn wrong_extension_length_is_rejected() {
        assert_eq!(
            derive_sibling_path("model.jpeg", "mtl"),
            Err(NamingError::ExtensionLengthMismatch {
                path: "model.jpeg".to_string(),
                len: 4
            })
        );
        assert_eq!(
            derive_sibling_path("model.ob", "mtl"),
            Err(NamingError::ExtensionLengthMismatch {
                path: "model.ob".to_string(),
                len: 2
            })
        );
        assert!(matches!(
            derive_sibling_path("model.", "mtl"),
            Err(NamingError::ExtensionLengthMismatch { len: 0, .. })
        ));
    }

    #[test]
    fn extension_length_counts_characters() {
        assert_eq!(
            derive_sibling_path("modèle.öbj", "mtl"),
            Ok("modèle.mtl".to_string())
        );
    }

    #[test]
    fn replacement_must_be_three_chars() {
        assert!(matches!(
            derive_sibling_path("model.obj", "mt"),
            Err(NamingError::ReplacementLength { len: 2, .. })
        ));
    }

    #[test]
    fn material_path_for_paths() {
        let p = material_path_for(Path::new("out/scientist.obj")).unwrap();
        assert_eq!(p, PathBuf::from("out/scientist.mtl"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_mesh_path_is_rejected() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let mesh = Path::new(OsStr::from_bytes(b"out/\xffmodel.obj"));
        assert!(matches!(
            material_path_for(mesh),
            Err(NamingError::NonUtf8Path { path }) if path.starts_with("out/") && path.ends_with("model.obj")
        ));
    }

    #[test]
    fn sanitize_replaces_and_lowercases() {
        assert_eq!(sanitize_name("Props/Barrel (Big)!"), "props/barrel__big__");
        assert_eq!(sanitize_name("a-b_c:d\\e"), "a-b_c:d\\e");
    }

    #[test]
    fn sanitize_keeps_non_ascii_letters() {
        assert_eq!(sanitize_name("Modèle Été"), "modèle_été");
    }
}
