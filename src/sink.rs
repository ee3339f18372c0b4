//! Output writing and evidence hashing.
//!
//! The sink only ever creates new files at the destination. The original
//! encrypted input is opened strictly read-only everywhere in the pipeline
//! and is never touched here.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::HASH_CHUNK_SIZE;
use crate::error::DecryptError;

/// Writes the recovered database and returns `(bytes_written, sha256_hex)`.
pub fn write(recovered: &[u8], dest: &Path) -> Result<(u64, String), DecryptError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(dest)?);
    writer.write_all(recovered)?;
    writer.flush()?;

    Ok((recovered.len() as u64, hash_bytes(recovered)))
}

/// SHA-256 of an in-memory buffer, rendered as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Streaming SHA-256 of a file, for the input side of the custody record.
pub fn hash_file(path: &Path) -> Result<String, DecryptError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut chunk = [0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Constant-time comparison of two hex-rendered hashes.
pub fn hashes_match(a: &str, b: &str) -> bool {
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
