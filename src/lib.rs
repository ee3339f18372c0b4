//! msgvault - forensic decryption engine for encrypted messaging-app
//! database backups.
//!
//! Recovers the plaintext SQLite database from `.crypt12`, `.crypt14`, and
//! `.crypt15` containers given the matching 158-byte key file:
//! - container variant detection from extension and content signals
//! - per-variant header resolution, including the bounded offset search
//!   required by the variable-length crypt14 headers
//! - identity (crypt12/14) and HKDF-SHA256 (crypt15) key derivation
//! - AES-256-GCM authenticated decryption
//! - zlib decompression and SHA-256 evidence hashing
//!
//! The input file is opened strictly read-only at every stage; recovered
//! bytes are always written to a new path.

pub mod cli;
pub mod compression;
pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod header;
pub mod keyfile;
pub mod pipeline;
pub mod report;
pub mod sink;
