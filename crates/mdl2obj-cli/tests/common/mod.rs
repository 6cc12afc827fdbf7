#![allow(dead_code)]

use std::path::{Path, PathBuf};

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Mesh text the stub exporter produces once its own `mtllib` line is removed.
pub const STUB_MESH: &str = "o stub\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl skin\nf 1 2 3\n";

/// Material text the stub exporter produces.
pub const STUB_MATERIAL: &str = "newmtl skin\nKd 1 1 1\nmap_Kd skin.tga\n";

/// Bytes of a minimal studio model (valid header, zeroed body).
pub fn studio_bytes(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"IDST");
    out.extend_from_slice(&10i32.to_le_bytes());
    let mut raw_name = [0u8; 64];
    raw_name[..name.len()].copy_from_slice(name.as_bytes());
    out.extend_from_slice(&raw_name);
    out.extend_from_slice(&96i32.to_le_bytes());
    out.resize(96, 0);
    out
}

pub fn write_model(path: &Path, name: &str) -> TestResult {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, studio_bytes(name))?;
    Ok(())
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> TestResult<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}"))?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}

/// Converter stand-in: `stub export <model> <mesh.obj>` writes a fixed mesh
/// (with its own `mtllib` line) and a fixed `.mtl` next to it.
#[cfg(unix)]
pub fn stub_exporter(dir: &Path) -> TestResult<PathBuf> {
    let mesh = format!("mtllib export.mtl\n{STUB_MESH}");
    let body = format!(
        "[ \"$1\" = export ] || exit 64\n\
         printf '%s' '{mesh}' > \"$3\"\n\
         printf '%s' '{STUB_MATERIAL}' > \"${{3%.obj}}.mtl\"\n"
    );
    write_script(dir, "stub-exporter", &body)
}

/// Converter stand-in that always fails.
#[cfg(unix)]
pub fn failing_exporter(dir: &Path) -> TestResult<PathBuf> {
    write_script(dir, "broken-exporter", "echo 'cannot read model' >&2\nexit 3\n")
}
