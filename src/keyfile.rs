//! Key-file loading and AES key extraction.

use std::fmt;
use std::fs;
use std::path::Path;

use secrecy::{ExposeSecret, SecretBox};

use crate::config::{AES_KEY_LEN, KEY_FILE_LEN, KEY_OFFSET};
use crate::error::DecryptError;

/// Byte layout of a key file.
#[derive(Debug, Clone, Copy)]
pub struct KeyfileLayout {
    pub file_len: usize,
    pub key_offset: usize,
}

impl Default for KeyfileLayout {
    fn default() -> Self {
        Self {
            file_len: KEY_FILE_LEN,
            key_offset: KEY_OFFSET,
        }
    }
}

/// Root key material loaded from a key file.
///
/// Holds the complete raw buffer, not just the key window: the crypt15
/// derivation consumes bytes outside it. The buffer is zeroized on drop and
/// `Debug` is redacted, so key material never reaches a log line.
pub struct KeyMaterial {
    raw: SecretBox<Vec<u8>>,
    key_offset: usize,
}

impl KeyMaterial {
    /// Reads and validates a key file.
    pub fn load(path: &Path) -> Result<Self, DecryptError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes, &KeyfileLayout::default())
    }

    /// Validates raw key-file bytes against a layout.
    ///
    /// The length must match exactly; a malformed key file can never decrypt
    /// correctly, so the mismatch is fatal rather than retried.
    pub fn from_bytes(bytes: Vec<u8>, layout: &KeyfileLayout) -> Result<Self, DecryptError> {
        debug_assert!(layout.key_offset + AES_KEY_LEN <= layout.file_len);

        if bytes.len() != layout.file_len {
            return Err(DecryptError::KeyFormat {
                expected: layout.file_len,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            raw: SecretBox::new(Box::new(bytes)),
            key_offset: layout.key_offset,
        })
    }

    /// The 32-byte AES key at the fixed key-window offset.
    pub fn aead_key(&self) -> [u8; AES_KEY_LEN] {
        let raw = self.raw.expose_secret();
        let mut key = [0u8; AES_KEY_LEN];
        key.copy_from_slice(&raw[self.key_offset..self.key_offset + AES_KEY_LEN]);
        key
    }

    /// The complete key-file contents (crypt15 derivation input).
    pub fn raw(&self) -> &[u8] {
        self.raw.expose_secret()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial([... {} bytes ...])", self.raw.expose_secret().len())
    }
}
