//! Authenticated AES-256-GCM decryption.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{Aes256Gcm, AesGcm, Key, Nonce};

use crate::config::{AES_KEY_LEN, GCM_TAG_LEN};
use crate::error::DecryptError;

/// AES-256-GCM with the 16-byte IVs used by the crypt12/crypt14 grids.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Decrypts and verifies one AEAD payload.
///
/// This is the single integrity gate of the pipeline. A tag that does not
/// verify means wrong key, wrong offset, or tampered ciphertext, and the
/// engine cannot tell which, so it reports a bare authentication failure.
/// Unauthenticated plaintext is never returned, however plausible the bytes
/// might look.
pub fn decrypt(
    key: &[u8; AES_KEY_LEN],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, DecryptError> {
    if tag.len() != GCM_TAG_LEN {
        return Err(DecryptError::UnsupportedFormat {
            reason: format!("expected a {GCM_TAG_LEN}-byte tag, got {}", tag.len()),
        });
    }

    let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    let result = match iv.len() {
        12 => {
            let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
            cipher.decrypt(Nonce::<U12>::from_slice(iv), sealed.as_ref())
        }
        16 => {
            let cipher = Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key));
            cipher.decrypt(Nonce::<U16>::from_slice(iv), sealed.as_ref())
        }
        n => {
            return Err(DecryptError::UnsupportedFormat {
                reason: format!("unsupported IV length {n}"),
            });
        }
    };

    result.map_err(|_| DecryptError::Authentication)
}
