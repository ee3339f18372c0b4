//! Zlib decompression of the verified payload.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::DecryptError;

/// Inflates the AEAD-verified payload into the recovered database bytes.
///
/// Failure here is a different class from an authentication failure: the key
/// and offsets were right (the tag verified), but the compressed stream
/// itself is truncated or not zlib at all. Keeping the two apart is what lets
/// a caller tell "wrong key" from "right key, corrupt payload".
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>, DecryptError> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut recovered = Vec::new();

    decoder
        .read_to_end(&mut recovered)
        .map_err(DecryptError::Decompression)?;

    Ok(recovered)
}
