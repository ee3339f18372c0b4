//! Typed failure taxonomy for the decryption pipeline.
//!
//! Every stage reports a distinct error kind so a caller can tell a wrong key
//! from a corrupt payload. The pipeline is fail-fast: no stage proceeds past
//! a failed predecessor, and nothing is downgraded to a warning.

use thiserror::Error;

use crate::format::ContainerVariant;

#[derive(Debug, Error)]
pub enum DecryptError {
    /// Key file has the wrong length.
    #[error("key file must be exactly {expected} bytes, got {actual}")]
    KeyFormat { expected: usize, actual: usize },

    /// No supported container variant matches the input, or a fixed-layout
    /// variant is structurally inconsistent with the file size.
    #[error("unsupported container format: {reason}")]
    UnsupportedFormat { reason: String },

    /// The variable-layout offset search exhausted its window without a
    /// verifying candidate. Carries the searched range for diagnostics.
    #[error("no ciphertext offset in {window_start}..={window_end} authenticated for {variant}")]
    HeaderResolution {
        variant: ContainerVariant,
        window_start: usize,
        window_end: usize,
    },

    /// AEAD tag verification failed: wrong key, wrong offset, or tampered
    /// ciphertext. The engine cannot distinguish these causes.
    #[error("authentication failed: wrong key or tampered ciphertext")]
    Authentication,

    /// The tag verified but the compressed payload would not inflate.
    #[error("payload decompression failed")]
    Decompression(#[source] std::io::Error),

    #[error("i/o failure")]
    Io(#[from] std::io::Error),
}
