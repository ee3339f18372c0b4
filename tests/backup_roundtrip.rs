//! End-to-end pipeline tests over the public API: synthetic containers for
//! every supported variant, written to disk and decrypted back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{Aes256Gcm, AesGcm, Key, Nonce};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use hkdf::Hkdf;
use sha2::Sha256;
use tempfile::tempdir;

use msgvault::config::{GCM_TAG_LEN, HKDF_INFO, KEY_FILE_LEN, KEY_OFFSET};
use msgvault::error::DecryptError;
use msgvault::format::ContainerVariant;
use msgvault::pipeline::decrypt_backup;
use msgvault::report::CustodyRecord;
use msgvault::sink;

type Gcm16 = AesGcm<Aes256, U16>;

const DB: &[u8] = b"SQLite format 3\0synthetic page data used by the integration suite";

fn keyfile_bytes() -> Vec<u8> {
    (0..KEY_FILE_LEN).map(|i| (i * 13 % 251) as u8).collect()
}

fn aes_key(keyfile: &[u8]) -> [u8; 32] {
    keyfile[KEY_OFFSET..].try_into().expect("key window")
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("compress");
    encoder.finish().expect("finish")
}

fn build_crypt12(keyfile: &[u8], db: &[u8]) -> Vec<u8> {
    let iv = [0x42u8; 16];
    let cipher = Gcm16::new(Key::<Gcm16>::from_slice(&aes_key(keyfile)));
    let mut sealed = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), deflate(db).as_slice())
        .expect("encrypt");
    let tag = sealed.split_off(sealed.len() - GCM_TAG_LEN);

    let mut data = vec![0u8; 51];
    data.extend_from_slice(&iv);
    data.extend_from_slice(&sealed);
    data.extend_from_slice(&tag);
    data.extend_from_slice(&[0u8; 4]);
    data
}

fn build_crypt14(keyfile: &[u8], start: usize, db: &[u8]) -> Vec<u8> {
    let iv = [0x42u8; 16];
    let cipher = Gcm16::new(Key::<Gcm16>::from_slice(&aes_key(keyfile)));
    let sealed = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), deflate(db).as_slice())
        .expect("encrypt");

    let mut data = vec![0u8; start];
    data[67..83].copy_from_slice(&iv);
    data.extend_from_slice(&sealed);
    data
}

fn build_crypt15(keyfile: &[u8], db: &[u8]) -> Vec<u8> {
    let derivation_nonce = [0x17u8; 32];
    let cipher_nonce = [0x23u8; 12];

    let hk = Hkdf::<Sha256>::new(Some(&derivation_nonce), keyfile);
    let mut key = [0u8; 32];
    hk.expand(HKDF_INFO, &mut key).expect("hkdf");

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let sealed = cipher
        .encrypt(Nonce::<U12>::from_slice(&cipher_nonce), deflate(db).as_slice())
        .expect("encrypt");

    let mut data = vec![0x01, 32];
    data.extend_from_slice(&derivation_nonce);
    data.push(12);
    data.extend_from_slice(&cipher_nonce);
    data.extend_from_slice(&sealed);
    data
}

fn write_fixtures(dir: &Path, file_name: &str, container: &[u8]) -> (PathBuf, PathBuf) {
    let key_path = dir.join("key");
    let input = dir.join(file_name);
    fs::write(&key_path, keyfile_bytes()).expect("write key");
    fs::write(&input, container).expect("write container");
    (input, key_path)
}

#[test]
fn crypt12_backup_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let (input, key_path) = write_fixtures(dir.path(), "msgstore.db.crypt12", &build_crypt12(&keyfile_bytes(), DB));
    let output = dir.path().join("msgstore.db");

    let report = decrypt_backup(&input, &key_path, &output).expect("decrypt");

    assert_eq!(report.variant, ContainerVariant::V12);
    assert!(report.sqlite_signature);
    assert_eq!(fs::read(&output).expect("read output"), DB);
}

#[test]
fn crypt14_backup_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let (input, key_path) = write_fixtures(
        dir.path(),
        "msgstore.db.crypt14",
        &build_crypt14(&keyfile_bytes(), 190, DB),
    );
    let output = dir.path().join("msgstore.db");

    let report = decrypt_backup(&input, &key_path, &output).expect("decrypt");

    assert_eq!(report.variant, ContainerVariant::V14);
    assert_eq!(report.output_hash, sink::hash_bytes(DB));
    assert_eq!(fs::read(&output).expect("read output"), DB);
}

#[test]
fn crypt15_backup_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let (input, key_path) = write_fixtures(dir.path(), "msgstore.db.crypt15", &build_crypt15(&keyfile_bytes(), DB));
    let output = dir.path().join("msgstore.db");

    let report = decrypt_backup(&input, &key_path, &output).expect("decrypt");

    assert_eq!(report.variant, ContainerVariant::V15);
    assert_eq!(fs::read(&output).expect("read output"), DB);
}

#[test]
fn reruns_are_idempotent() {
    let dir = tempdir().expect("tempdir");
    let (input, key_path) = write_fixtures(dir.path(), "backup.crypt12", &build_crypt12(&keyfile_bytes(), DB));

    let first = decrypt_backup(&input, &key_path, &dir.path().join("one.db")).expect("first run");
    let second = decrypt_backup(&input, &key_path, &dir.path().join("two.db")).expect("second run");

    assert_eq!(first.input_hash, second.input_hash);
    assert_eq!(first.output_hash, second.output_hash);
    assert_eq!(
        fs::read(dir.path().join("one.db")).expect("one"),
        fs::read(dir.path().join("two.db")).expect("two")
    );
}

#[test]
fn wrong_key_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let (input, _) = write_fixtures(dir.path(), "backup.crypt12", &build_crypt12(&keyfile_bytes(), DB));

    let mut wrong = keyfile_bytes();
    wrong[KEY_OFFSET + 7] ^= 0x80;
    let wrong_path = dir.path().join("wrong-key");
    fs::write(&wrong_path, wrong).expect("write wrong key");

    let result = decrypt_backup(&input, &wrong_path, &dir.path().join("out.db"));
    assert!(matches!(result, Err(DecryptError::Authentication)));
}

#[test]
fn malformed_key_length_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let (input, _) = write_fixtures(dir.path(), "backup.crypt12", &build_crypt12(&keyfile_bytes(), DB));

    for len in [0usize, 157, 159, 10_000] {
        let key_path = dir.path().join(format!("key-{len}"));
        fs::write(&key_path, vec![0u8; len]).expect("write key");

        let result = decrypt_backup(&input, &key_path, &dir.path().join("out.db"));
        assert!(
            matches!(result, Err(DecryptError::KeyFormat { .. })),
            "key length {len} must be rejected"
        );
    }
}

#[test]
fn tampering_is_detected() {
    let dir = tempdir().expect("tempdir");
    let mut container = build_crypt12(&keyfile_bytes(), DB);
    let mid = (container.len() + 67) / 2;
    container[mid] ^= 0x04;

    let (input, key_path) = write_fixtures(dir.path(), "backup.crypt12", &container);

    let result = decrypt_backup(&input, &key_path, &dir.path().join("out.db"));
    assert!(matches!(result, Err(DecryptError::Authentication)));
}

#[test]
fn unrecognized_input_is_unsupported() {
    let dir = tempdir().expect("tempdir");
    let (input, key_path) = write_fixtures(dir.path(), "notes.txt", b"just some text, no container at all");

    let result = decrypt_backup(&input, &key_path, &dir.path().join("out.db"));
    assert!(matches!(result, Err(DecryptError::UnsupportedFormat { .. })));
}

#[test]
fn custody_record_reports_both_hashes() {
    let dir = tempdir().expect("tempdir");
    let container = build_crypt14(&keyfile_bytes(), 190, DB);
    let (input, key_path) = write_fixtures(dir.path(), "msgstore.db.crypt14", &container);
    let output = dir.path().join("msgstore.db");

    let report = decrypt_backup(&input, &key_path, &output).expect("decrypt");
    let line = CustodyRecord::success(&report).to_string();

    assert!(line.contains(&sink::hash_bytes(&container)));
    assert!(line.contains(&sink::hash_bytes(DB)));
    assert!(line.contains("variant=crypt14"));
    assert!(line.contains("outcome=success"));
}
