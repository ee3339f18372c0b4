//! Cryptographic stages: AEAD decryption and per-variant key derivation.

pub mod aes;
pub mod derive;

pub use derive::{DerivedKey, derive};
