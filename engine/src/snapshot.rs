//! Frame fingerprints for deterministic headless runs.
//!
//! A snapshot is the raw RGBA bytes of one frame plus a small JSON sidecar holding its
//! SHA-256, so two runs can be compared without decoding any image format.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::surface::SurfaceSize;

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    pub hash: String,
}

impl SnapshotRecord {
    pub fn of_frame(size: SurfaceSize, rgba: &[u8]) -> Self {
        Self {
            version: 1,
            width: size.width,
            height: size.height,
            hash_alg: "sha256".to_string(),
            hash: rgba_sha256_hex(rgba),
        }
    }
}

/// Writes `rgba` to `path` and the record to `path` with a `.json` extension.
pub fn write_snapshot(
    path: impl AsRef<Path>,
    size: SurfaceSize,
    rgba: &[u8],
) -> io::Result<SnapshotRecord> {
    let path = path.as_ref();
    if rgba.len() != size.rgba_len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "frame has {} bytes, expected {} for {}x{}",
                rgba.len(),
                size.rgba_len(),
                size.width,
                size.height
            ),
        ));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let record = SnapshotRecord::of_frame(size, rgba);
    fs::write(path, rgba)?;
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path.with_extension("json"), json)?;
    Ok(record)
}

pub fn load_snapshot_record(path: impl AsRef<Path>) -> io::Result<SnapshotRecord> {
    let path = path.as_ref();
    let bytes = fs::read(path.with_extension("json"))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing snapshot record {}: {e}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        let a = rgba_sha256_hex(&[0, 0, 0, 255]);
        assert_eq!(a, rgba_sha256_hex(&[0, 0, 0, 255]));
        assert_ne!(a, rgba_sha256_hex(&[0, 0, 1, 255]));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn write_rejects_mismatched_frame_length() {
        let dir = std::env::temp_dir().join("engine_snapshot_mismatch");
        let err = write_snapshot(dir.join("f.rgba"), SurfaceSize::new(2, 2), &[0u8; 3])
            .expect_err("short frame must be rejected");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
