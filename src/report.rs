//! Custody-facing invocation records.
//!
//! The engine does not persist chain-of-custody state. It hands one record
//! per invocation, success or failure, to whatever custody ledger sits above
//! it; the ledger decides how to store and countersign it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DecryptError;
use crate::format::ContainerVariant;

/// Successful pipeline result.
#[derive(Debug, Clone)]
pub struct DecryptionReport {
    pub variant: ContainerVariant,
    pub input_path: PathBuf,
    pub input_hash: String,
    pub output_path: PathBuf,
    pub output_hash: String,
    pub bytes_written: u64,
    /// Whether the recovered bytes begin with the SQLite signature.
    pub sqlite_signature: bool,
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success,
    Failure(String),
}

/// One custody-ledger entry: both content hashes, the variant, the outcome.
#[derive(Debug, Clone)]
pub struct CustodyRecord {
    pub input_path: PathBuf,
    pub input_hash: String,
    pub output_path: Option<PathBuf>,
    pub output_hash: Option<String>,
    pub variant: Option<ContainerVariant>,
    pub outcome: Outcome,
}

impl CustodyRecord {
    pub fn success(report: &DecryptionReport) -> Self {
        Self {
            input_path: report.input_path.clone(),
            input_hash: report.input_hash.clone(),
            output_path: Some(report.output_path.clone()),
            output_hash: Some(report.output_hash.clone()),
            variant: Some(report.variant),
            outcome: Outcome::Success,
        }
    }

    pub fn failure(
        input: &Path,
        input_hash: String,
        variant: Option<ContainerVariant>,
        error: &DecryptError,
    ) -> Self {
        Self {
            input_path: input.to_path_buf(),
            input_hash,
            output_path: None,
            output_hash: None,
            variant,
            outcome: Outcome::Failure(error.to_string()),
        }
    }
}

impl fmt::Display for CustodyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input={} input_sha256={}", self.input_path.display(), self.input_hash)?;

        match self.variant {
            Some(variant) => write!(f, " variant={variant}")?,
            None => write!(f, " variant=unknown")?,
        }

        if let (Some(path), Some(hash)) = (&self.output_path, &self.output_hash) {
            write!(f, " output={} output_sha256={}", path.display(), hash)?;
        }

        match &self.outcome {
            Outcome::Success => write!(f, " outcome=success"),
            Outcome::Failure(reason) => write!(f, " outcome=failure reason={reason:?}"),
        }
    }
}
