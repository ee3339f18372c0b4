//! Header resolution for the supported container variants.
//!
//! Each variant strategy turns raw container bytes into a [`HeaderLayout`]:
//! the resolved IV, ciphertext, and tag spans for one concrete file. For
//! crypt12 the layout is a fixed grid, for crypt14 it is the result of a
//! bounded offset search, and for crypt15 it is extracted from structured
//! header fields.

pub mod v12;
pub mod v14;
pub mod v15;

use crate::config::V15_DERIVATION_NONCE_LEN;
use crate::error::DecryptError;
use crate::format::ContainerVariant;
use crate::keyfile::KeyMaterial;

/// Resolved byte spans for one concrete container file.
///
/// Derived per file, not declared: for crypt14 these offsets are the outcome
/// of the search, not constants.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    pub variant: ContainerVariant,
    pub iv_offset: usize,
    pub iv_len: usize,
    pub ciphertext_start: usize,
    pub ciphertext_end: usize,
    pub tag_offset: usize,
    pub tag_len: usize,
    /// crypt15 only: the key-derivation nonce carried by the header.
    pub derivation_nonce: Option<[u8; V15_DERIVATION_NONCE_LEN]>,
}

impl HeaderLayout {
    pub fn iv<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.iv_offset..self.iv_offset + self.iv_len]
    }

    pub fn ciphertext<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.ciphertext_start..self.ciphertext_end]
    }

    pub fn tag<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.tag_offset..self.tag_offset + self.tag_len]
    }
}

/// Resolves the header layout for `variant`.
///
/// crypt14 resolution authenticates trial decryptions against the key, which
/// is why key material is part of the contract for every variant.
pub fn resolve(
    data: &[u8],
    variant: ContainerVariant,
    material: &KeyMaterial,
) -> Result<HeaderLayout, DecryptError> {
    match variant {
        ContainerVariant::V12 => v12::resolve(data, &v12::V12Layout::default()),
        ContainerVariant::V14 => v14::resolve(data, &material.aead_key(), &v14::V14Layout::default()),
        ContainerVariant::V15 => v15::resolve(data),
    }
}
