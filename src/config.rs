//! Layout and protocol constants for the supported backup formats.
//!
//! Everything the variant strategies need to know about byte layouts lives
//! here as named constants. The strategies receive these values through small
//! layout structs (`KeyfileLayout`, `V12Layout`, `V14Layout`) whose `Default`
//! impls read from this module, so tests can substitute synthetic layouts
//! without touching production values.

use std::ops::RangeInclusive;

/// Exact length of a valid key file in bytes.
///
/// Key files observed in the wild are always 158 bytes. Anything else is
/// rejected before a decryption attempt is made: a malformed key file can
/// never decrypt correctly, so there is nothing to retry.
pub const KEY_FILE_LEN: usize = 158;

/// Offset of the AES key inside the key file.
pub const KEY_OFFSET: usize = 126;

/// AES-256 key length in bytes.
pub const AES_KEY_LEN: usize = 32;

/// GCM authentication tag length in bytes.
pub const GCM_TAG_LEN: usize = 16;

// === crypt12 fixed grid ===

/// Length of the crypt12 header preceding the IV.
pub const V12_HEADER_LEN: usize = 51;

/// crypt12 IV length.
pub const V12_IV_LEN: usize = 16;

/// Trailing crypt12 footer length.
///
/// The first 16 footer bytes carry the GCM tag; the remaining 4 are reserved.
pub const V12_FOOTER_LEN: usize = 20;

// === crypt14 ===

/// Offset of the crypt14 IV.
pub const V14_IV_OFFSET: usize = 67;

/// crypt14 IV length.
pub const V14_IV_LEN: usize = 16;

/// Candidate ciphertext start offsets for crypt14.
///
/// The crypt14 header length varies by sub-version and the declared length
/// field is unreliable, so resolution walks this window in ascending order
/// and accepts the first offset whose authentication tag verifies. The window
/// is small and fixed, which keeps worst-case resolution time predictable.
pub const V14_SEARCH_WINDOW: RangeInclusive<usize> = 185..=195;

// === crypt15 structured header ===

/// Version byte opening a crypt15 structured header.
pub const V15_HEADER_VERSION: u8 = 0x01;

/// Length of the crypt15 key-derivation nonce.
pub const V15_DERIVATION_NONCE_LEN: usize = 32;

/// Length of the crypt15 AEAD nonce.
pub const V15_CIPHER_NONCE_LEN: usize = 12;

/// Fixed context string binding the crypt15 per-file key derivation.
pub const HKDF_INFO: &[u8] = b"backup encryption";

// === recovered artifact ===

/// Signature every well-formed SQLite database starts with.
pub const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Content prefix length read for format sniffing.
pub const SNIFF_LEN: usize = 64;

/// Chunk size for streaming evidence hashes.
pub const HASH_CHUNK_SIZE: usize = 8192;
