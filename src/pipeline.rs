//! The decryption pipeline: a fail-fast composition of the engine stages.
//!
//! Each stage is a pure function of its inputs, run in strict forward order:
//! key loading and format detection feed header resolution, which feeds key
//! derivation, authenticated decryption, decompression, and finally the
//! output sink. The first typed failure stops the run. The input file is only
//! ever opened read-only; recovered bytes go to a new path.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::compression;
use crate::config::{SNIFF_LEN, SQLITE_MAGIC};
use crate::crypto::{aes, derive};
use crate::error::DecryptError;
use crate::format::{self, ContainerVariant};
use crate::header;
use crate::keyfile::KeyMaterial;
use crate::report::DecryptionReport;
use crate::sink;

/// Decrypts one backup container into a recovered database file.
pub fn decrypt_backup(
    input: &Path,
    key_path: &Path,
    output: &Path,
) -> Result<DecryptionReport, DecryptError> {
    let material = KeyMaterial::load(key_path)?;
    let data = fs::read(input)?;

    let variant = format::detect(input, &data[..data.len().min(SNIFF_LEN)])?;
    info!(%variant, len = data.len(), "container classified");

    let recovered = decrypt_bytes(&data, &material, variant)?;

    let sqlite_signature = recovered.starts_with(SQLITE_MAGIC);
    if !sqlite_signature {
        warn!("recovered bytes do not start with the SQLite signature");
    }

    let input_hash = sink::hash_bytes(&data);
    let (bytes_written, output_hash) = sink::write(&recovered, output)?;
    info!(bytes = bytes_written, "recovered database written");

    Ok(DecryptionReport {
        variant,
        input_path: input.to_path_buf(),
        input_hash,
        output_path: output.to_path_buf(),
        output_hash,
        bytes_written,
        sqlite_signature,
    })
}

/// In-memory pipeline core: resolve, derive, decrypt, inflate.
pub fn decrypt_bytes(
    data: &[u8],
    material: &KeyMaterial,
    variant: ContainerVariant,
) -> Result<Vec<u8>, DecryptError> {
    let layout = header::resolve(data, variant, material)?;
    debug!(
        start = layout.ciphertext_start,
        end = layout.ciphertext_end,
        "header resolved"
    );

    let key = derive::derive(material, &layout, variant)?;
    let payload = aes::decrypt(key.as_bytes(), layout.iv(data), layout.ciphertext(data), layout.tag(data))?;
    info!(payload = payload.len(), "ciphertext authenticated");

    compression::inflate(&payload)
}
