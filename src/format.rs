//! Container variant detection.
//!
//! Classification is conservative: the file extension is the primary signal
//! and a small content prefix the fallback. When neither is decisive the
//! detector refuses instead of picking a variant to try anyway.

use std::fmt;
use std::path::Path;

use crate::config::{SQLITE_MAGIC, V15_CIPHER_NONCE_LEN, V15_DERIVATION_NONCE_LEN, V15_HEADER_VERSION};
use crate::error::DecryptError;

/// Supported encrypted container revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerVariant {
    V12,
    V14,
    V15,
}

impl ContainerVariant {
    pub const ALL: &'static [Self] = &[Self::V12, Self::V14, Self::V15];

    /// The file extension conventionally carried by this variant.
    #[inline]
    pub fn extension(self) -> &'static str {
        match self {
            Self::V12 => "crypt12",
            Self::V14 => "crypt14",
            Self::V15 => "crypt15",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.extension() == ext)
    }
}

impl fmt::Display for ContainerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Classifies an input file from its path and a content prefix.
pub fn detect(path: &Path, prefix: &[u8]) -> Result<ContainerVariant, DecryptError> {
    if let Some(variant) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ContainerVariant::from_extension)
    {
        return Ok(variant);
    }

    sniff(prefix).ok_or_else(|| {
        let reason = if prefix.starts_with(SQLITE_MAGIC) {
            "input is an unencrypted SQLite database; nothing to decrypt".to_owned()
        } else {
            format!("no recognized extension or content signature: {}", path.display())
        };
        DecryptError::UnsupportedFormat { reason }
    })
}

/// Content-prefix heuristics for files without a recognized extension.
///
/// crypt15 opens with its structured header (version byte, then two
/// length-prefixed nonces); crypt14 headers start with three zero bytes.
/// crypt12 has no usable content signature and is recognized by extension
/// only.
fn sniff(prefix: &[u8]) -> Option<ContainerVariant> {
    if prefix.starts_with(SQLITE_MAGIC) {
        return None;
    }

    if prefix.len() > 2 + V15_DERIVATION_NONCE_LEN
        && prefix[0] == V15_HEADER_VERSION
        && prefix[1] as usize == V15_DERIVATION_NONCE_LEN
        && prefix[2 + V15_DERIVATION_NONCE_LEN] as usize == V15_CIPHER_NONCE_LEN
    {
        return Some(ContainerVariant::V15);
    }

    if prefix.starts_with(&[0x00, 0x00, 0x00]) {
        return Some(ContainerVariant::V14);
    }

    None
}
