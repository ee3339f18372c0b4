//! crypt15: structured header fields.

use crate::config::{GCM_TAG_LEN, V15_CIPHER_NONCE_LEN, V15_DERIVATION_NONCE_LEN, V15_HEADER_VERSION};
use crate::error::DecryptError;
use crate::format::ContainerVariant;
use crate::header::HeaderLayout;

fn unsupported(reason: String) -> DecryptError {
    DecryptError::UnsupportedFormat { reason }
}

fn truncated() -> DecryptError {
    unsupported("crypt15 header truncated".to_owned())
}

/// Parses the crypt15 structured header.
///
/// Fields are read in order: a version byte, a length-prefixed derivation
/// nonce, a length-prefixed cipher nonce. Offsets are never assumed from
/// magic constants, so a revision that changes a field length fails loudly
/// here instead of yielding misaligned spans downstream.
pub fn resolve(data: &[u8]) -> Result<HeaderLayout, DecryptError> {
    let mut pos = 0usize;

    let version = *data.get(pos).ok_or_else(truncated)?;
    pos += 1;
    if version != V15_HEADER_VERSION {
        return Err(unsupported(format!("unknown crypt15 header version {version:#04x}")));
    }

    let derivation_len = *data.get(pos).ok_or_else(truncated)? as usize;
    pos += 1;
    if derivation_len != V15_DERIVATION_NONCE_LEN {
        return Err(unsupported(format!(
            "unexpected derivation nonce length {derivation_len}"
        )));
    }
    let derivation = data.get(pos..pos + derivation_len).ok_or_else(truncated)?;
    pos += derivation_len;

    let cipher_len = *data.get(pos).ok_or_else(truncated)? as usize;
    pos += 1;
    if cipher_len != V15_CIPHER_NONCE_LEN {
        return Err(unsupported(format!("unexpected cipher nonce length {cipher_len}")));
    }
    let iv_offset = pos;
    pos += cipher_len;

    if data.len() < pos + GCM_TAG_LEN {
        return Err(unsupported(format!(
            "crypt15 container too small for its declared fields: {} bytes",
            data.len()
        )));
    }

    let mut derivation_nonce = [0u8; V15_DERIVATION_NONCE_LEN];
    derivation_nonce.copy_from_slice(derivation);

    let tag_offset = data.len() - GCM_TAG_LEN;

    Ok(HeaderLayout {
        variant: ContainerVariant::V15,
        iv_offset,
        iv_len: cipher_len,
        ciphertext_start: pos,
        ciphertext_end: tag_offset,
        tag_offset,
        tag_len: GCM_TAG_LEN,
        derivation_nonce: Some(derivation_nonce),
    })
}
