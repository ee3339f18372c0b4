//! Command-line surface.
//!
//! The CLI supplies paths and presents results; no flag alters the
//! decryption algorithm itself. Typed engine errors are wrapped with
//! operator-facing context at this layer only.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::SNIFF_LEN;
use crate::error::DecryptError;
use crate::format::{self, ContainerVariant};
use crate::pipeline;
use crate::report::CustodyRecord;
use crate::sink;

#[derive(Parser)]
#[command(
    name = "msgvault",
    version,
    about = "Decrypt encrypted messaging-app database backups (crypt12/14/15) for forensic analysis."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decrypt an encrypted backup into a SQLite database.
    Decrypt {
        /// Encrypted backup file.
        #[arg(short, long)]
        input: PathBuf,

        /// Key file (158 bytes).
        #[arg(short, long)]
        key: PathBuf,

        /// Output path for the recovered database. Defaults to the input
        /// name with the encryption suffix replaced by .db.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the container variant of a backup without decrypting it.
    Inspect {
        /// Backup file to classify.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Verify a file against an expected SHA-256 hash.
    Verify {
        /// File to hash.
        #[arg(short, long)]
        input: PathBuf,

        /// Expected SHA-256, hex encoded.
        #[arg(short, long)]
        sha256: String,
    },
}

impl Cli {
    #[inline]
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Decrypt { input, key, output } => run_decrypt(&input, &key, output),
            Commands::Inspect { input } => run_inspect(&input),
            Commands::Verify { input, sha256 } => run_verify(&input, &sha256),
        }
    }
}

fn run_decrypt(input: &Path, key: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output(input));
    if output == input {
        anyhow::bail!("refusing to write over the input file: {}", input.display());
    }

    match pipeline::decrypt_backup(input, key, &output) {
        Ok(report) => {
            println!("{}", CustodyRecord::success(&report));
            if !report.sqlite_signature {
                println!("note: recovered bytes do not carry the SQLite signature");
            }
            Ok(())
        }
        Err(error) => {
            let input_hash = sink::hash_file(input).unwrap_or_else(|_| "unavailable".to_owned());
            let variant = classify(input).ok();
            println!("{}", CustodyRecord::failure(input, input_hash, variant, &error));
            Err(error).with_context(|| format!("failed to decrypt {}", input.display()))
        }
    }
}

fn run_inspect(input: &Path) -> Result<()> {
    let size = fs::metadata(input)
        .with_context(|| format!("cannot stat {}", input.display()))?
        .len();
    let variant = classify(input).with_context(|| format!("cannot classify {}", input.display()))?;

    println!("{}: {variant}, {size} bytes", input.display());
    Ok(())
}

fn run_verify(input: &Path, expected: &str) -> Result<()> {
    let actual = sink::hash_file(input)?;

    if sink::hashes_match(&actual, &expected.to_ascii_lowercase()) {
        println!("{}: sha256 verified", input.display());
        Ok(())
    } else {
        anyhow::bail!(
            "{}: sha256 mismatch: expected {expected}, got {actual}",
            input.display()
        )
    }
}

fn classify(path: &Path) -> Result<ContainerVariant, DecryptError> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?.take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;
    format::detect(path, &prefix)
}

/// Derives the default output path: the encryption suffix is replaced by
/// .db (`msgstore.db.crypt14` becomes `msgstore.db`, `backup.crypt12`
/// becomes `backup.db`); anything else gets .db appended. The result never
/// aliases the input.
fn default_output(input: &Path) -> PathBuf {
    let has_crypt_suffix = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ContainerVariant::ALL.iter().any(|v| v.extension() == e));

    if has_crypt_suffix {
        let stem = input
            .file_stem()
            .unwrap_or_else(|| input.as_os_str())
            .to_os_string();

        let candidate = input.with_file_name(&stem);
        if candidate.extension().is_some_and(|e| e == "db") {
            return candidate;
        }

        let mut name = stem;
        name.push(".db");
        return input.with_file_name(name);
    }

    let mut name = input.as_os_str().to_os_string();
    name.push(".db");
    PathBuf::from(name)
}
