//! crypt14: variable-length header resolved by bounded offset search.

use std::ops::RangeInclusive;

use tracing::debug;

use crate::config::{AES_KEY_LEN, GCM_TAG_LEN, V14_IV_LEN, V14_IV_OFFSET, V14_SEARCH_WINDOW};
use crate::crypto::aes;
use crate::error::DecryptError;
use crate::format::ContainerVariant;
use crate::header::HeaderLayout;

/// crypt14 search parameters.
#[derive(Debug, Clone)]
pub struct V14Layout {
    pub iv_offset: usize,
    pub iv_len: usize,
    pub search_window: RangeInclusive<usize>,
    pub tag_len: usize,
}

impl Default for V14Layout {
    fn default() -> Self {
        Self {
            iv_offset: V14_IV_OFFSET,
            iv_len: V14_IV_LEN,
            search_window: V14_SEARCH_WINDOW,
            tag_len: GCM_TAG_LEN,
        }
    }
}

/// Resolves the crypt14 layout by trial decryption.
///
/// The declared header-length field is unreliable across sub-versions, so
/// correctness is defined by authentication instead: each candidate offset in
/// the window is tried in ascending order and the first whose tag verifies is
/// accepted. The walk is bounded and deterministic, so the same file always
/// resolves to the same offset. Exhausting the window is a hard failure that
/// reports the searched range; the caller decides whether to widen it.
pub fn resolve(
    data: &[u8],
    key: &[u8; AES_KEY_LEN],
    layout: &V14Layout,
) -> Result<HeaderLayout, DecryptError> {
    if data.len() < layout.iv_offset + layout.iv_len + layout.tag_len {
        return Err(DecryptError::UnsupportedFormat {
            reason: format!("crypt14 container too small for IV and tag: {} bytes", data.len()),
        });
    }

    let iv = &data[layout.iv_offset..layout.iv_offset + layout.iv_len];
    let tag_offset = data.len() - layout.tag_len;
    let tag = &data[tag_offset..];

    for candidate in layout.search_window.clone() {
        if candidate > tag_offset {
            break;
        }

        let ciphertext = &data[candidate..tag_offset];
        if aes::decrypt(key, iv, ciphertext, tag).is_ok() {
            debug!(offset = candidate, "crypt14 ciphertext start authenticated");
            return Ok(HeaderLayout {
                variant: ContainerVariant::V14,
                iv_offset: layout.iv_offset,
                iv_len: layout.iv_len,
                ciphertext_start: candidate,
                ciphertext_end: tag_offset,
                tag_offset,
                tag_len: layout.tag_len,
                derivation_nonce: None,
            });
        }
    }

    Err(DecryptError::HeaderResolution {
        variant: ContainerVariant::V14,
        window_start: *layout.search_window.start(),
        window_end: *layout.search_window.end(),
    })
}
