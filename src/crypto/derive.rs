//! Per-variant key derivation.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;

use crate::config::{AES_KEY_LEN, HKDF_INFO};
use crate::error::DecryptError;
use crate::format::ContainerVariant;
use crate::header::HeaderLayout;
use crate::keyfile::KeyMaterial;

/// The key actually handed to the AEAD, scoped to one decryption call.
pub struct DerivedKey {
    key: [u8; AES_KEY_LEN],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; AES_KEY_LEN] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([redacted])")
    }
}

/// Derives the AEAD key for one container.
///
/// crypt12 and crypt14 use the extracted key unchanged; the IV comes from
/// the resolved header. crypt15 expands the complete raw key-file contents
/// with HKDF-SHA256, salted by the derivation nonce carried in the header
/// and bound to a fixed protocol context.
pub fn derive(
    material: &KeyMaterial,
    layout: &HeaderLayout,
    variant: ContainerVariant,
) -> Result<DerivedKey, DecryptError> {
    match variant {
        ContainerVariant::V12 | ContainerVariant::V14 => Ok(DerivedKey {
            key: material.aead_key(),
        }),
        ContainerVariant::V15 => {
            let nonce = layout.derivation_nonce.ok_or_else(|| DecryptError::UnsupportedFormat {
                reason: "crypt15 header carries no derivation nonce".to_owned(),
            })?;

            let hk = Hkdf::<Sha256>::new(Some(&nonce), material.raw());
            let mut key = [0u8; AES_KEY_LEN];
            hk.expand(HKDF_INFO, &mut key)
                .map_err(|_| DecryptError::UnsupportedFormat {
                    reason: "HKDF expansion failed".to_owned(),
                })?;

            Ok(DerivedKey { key })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{KEY_FILE_LEN, V15_DERIVATION_NONCE_LEN};
    use crate::keyfile::KeyfileLayout;

    use super::*;

    fn material() -> KeyMaterial {
        let bytes: Vec<u8> = (0..KEY_FILE_LEN).map(|i| (i * 3 % 251) as u8).collect();
        KeyMaterial::from_bytes(bytes, &KeyfileLayout::default()).unwrap()
    }

    fn layout(nonce: Option<[u8; V15_DERIVATION_NONCE_LEN]>) -> HeaderLayout {
        HeaderLayout {
            variant: ContainerVariant::V15,
            iv_offset: 35,
            iv_len: 12,
            ciphertext_start: 47,
            ciphertext_end: 100,
            tag_offset: 100,
            tag_len: 16,
            derivation_nonce: nonce,
        }
    }

    #[test]
    fn test_identity_for_fixed_grid_variants() {
        let material = material();
        let layout = layout(None);

        for variant in [ContainerVariant::V12, ContainerVariant::V14] {
            let derived = derive(&material, &layout, variant).unwrap();
            assert_eq!(*derived.as_bytes(), material.aead_key());
        }
    }

    #[test]
    fn test_crypt15_derivation_is_deterministic() {
        let material = material();
        let layout = layout(Some([0x17u8; V15_DERIVATION_NONCE_LEN]));

        let a = derive(&material, &layout, ContainerVariant::V15).unwrap();
        let b = derive(&material, &layout, ContainerVariant::V15).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_crypt15_key_differs_from_extracted_key() {
        let material = material();
        let layout = layout(Some([0x17u8; V15_DERIVATION_NONCE_LEN]));

        let derived = derive(&material, &layout, ContainerVariant::V15).unwrap();
        assert_ne!(*derived.as_bytes(), material.aead_key());
    }

    #[test]
    fn test_crypt15_nonce_changes_key() {
        let material = material();

        let a = derive(&material, &layout(Some([0x01u8; 32])), ContainerVariant::V15).unwrap();
        let b = derive(&material, &layout(Some([0x02u8; 32])), ContainerVariant::V15).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_crypt15_without_nonce_is_rejected() {
        let material = material();
        let result = derive(&material, &layout(None), ContainerVariant::V15);
        assert!(matches!(result, Err(DecryptError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_debug_redacts_key() {
        let material = material();
        let derived = derive(&material, &layout(None), ContainerVariant::V12).unwrap();
        assert_eq!(format!("{derived:?}"), "DerivedKey([redacted])");
    }
}
