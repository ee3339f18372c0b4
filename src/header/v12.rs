//! crypt12: fixed byte grid.

use crate::config::{GCM_TAG_LEN, V12_FOOTER_LEN, V12_HEADER_LEN, V12_IV_LEN};
use crate::error::DecryptError;
use crate::format::ContainerVariant;
use crate::header::HeaderLayout;

/// Fixed crypt12 grid parameters.
#[derive(Debug, Clone, Copy)]
pub struct V12Layout {
    pub header_len: usize,
    pub iv_len: usize,
    pub footer_len: usize,
    pub tag_len: usize,
}

impl Default for V12Layout {
    fn default() -> Self {
        Self {
            header_len: V12_HEADER_LEN,
            iv_len: V12_IV_LEN,
            footer_len: V12_FOOTER_LEN,
            tag_len: GCM_TAG_LEN,
        }
    }
}

/// Resolves the fixed crypt12 layout.
///
/// The grid is never searched: a file too small to hold header, IV, and
/// footer is a structural mismatch with the format, not an ambiguity.
pub fn resolve(data: &[u8], layout: &V12Layout) -> Result<HeaderLayout, DecryptError> {
    let min_len = layout.header_len + layout.iv_len + layout.footer_len;
    if data.len() < min_len {
        return Err(DecryptError::UnsupportedFormat {
            reason: format!(
                "crypt12 container needs at least {min_len} bytes, got {}",
                data.len()
            ),
        });
    }

    let iv_offset = layout.header_len;
    let ciphertext_start = iv_offset + layout.iv_len;
    let tag_offset = data.len() - layout.footer_len;

    Ok(HeaderLayout {
        variant: ContainerVariant::V12,
        iv_offset,
        iv_len: layout.iv_len,
        ciphertext_start,
        ciphertext_end: tag_offset,
        tag_offset,
        tag_len: layout.tag_len,
        derivation_nonce: None,
    })
}
