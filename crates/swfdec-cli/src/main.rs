//! Command-line interface for decrypting block-encrypted Flash assets.

#![forbid(unsafe_code)]

mod check;
mod pipeline;
mod session;

use std::path::PathBuf;

use aes_inv::InverseCipher;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::session::SessionParams;

/// Flash asset decrypter.
#[derive(Parser)]
#[command(
    name = "swfdec",
    version,
    author,
    about = "Decrypts AES block-encrypted Flash assets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt every file in a directory into an output directory.
    Dir {
        /// Directory holding the encrypted files (created if missing).
        #[arg(long, value_name = "DIR", default_value = "flash")]
        input: PathBuf,
        /// Directory receiving the decrypted files (created if missing).
        #[arg(long, value_name = "DIR", default_value = "flash_decrypted")]
        output: PathBuf,
        /// Worker threads; defaults to the available parallelism.
        #[arg(long)]
        jobs: Option<usize>,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Decrypt a single file.
    File {
        /// Encrypted input file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output path for the decrypted data.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Print the session key that would be used.
    Key {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Check the cipher against known-answer vectors and random reference samples.
    Check {
        /// Number of random samples per key size.
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Where the decryption key comes from.
#[derive(Args, Clone, Debug)]
struct KeyArgs {
    /// Raw AES key as 32, 48 or 64 hex characters; skips session derivation.
    #[arg(long, value_name = "HEX")]
    key_hex: Option<String>,
    /// Key of the session unwrap step (16 bytes as hex).
    #[arg(long, value_name = "HEX", conflicts_with = "key_hex")]
    session_key: Option<String>,
    /// IV of the session unwrap step (16 bytes as hex).
    #[arg(long, value_name = "HEX", conflicts_with = "key_hex")]
    session_iv: Option<String>,
    /// Blob fed through the session unwrap step (16 bytes as hex).
    #[arg(long, value_name = "HEX", conflicts_with = "key_hex")]
    session_blob: Option<String>,
}

impl KeyArgs {
    fn session_params(&self) -> Result<SessionParams> {
        let mut params = SessionParams::default();
        if let Some(hex_str) = &self.session_key {
            params.key = parse_hex16(hex_str, "session key")?;
        }
        if let Some(hex_str) = &self.session_iv {
            params.iv = parse_hex16(hex_str, "session IV")?;
        }
        if let Some(hex_str) = &self.session_blob {
            params.blob = parse_hex16(hex_str, "session blob")?;
        }
        Ok(params)
    }

    /// Key bytes for the inverse cipher.
    fn key_material(&self) -> Result<Vec<u8>> {
        match &self.key_hex {
            Some(hex_str) => {
                let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
                if !matches!(bytes.len(), 16 | 24 | 32) {
                    bail!("AES key must be 16, 24 or 32 bytes (32, 48 or 64 hex characters)");
                }
                Ok(bytes)
            }
            None => Ok(self.session_params()?.key_material()),
        }
    }

    fn cipher(&self) -> Result<InverseCipher> {
        let material = self.key_material()?;
        InverseCipher::new(&material).context("build inverse cipher")
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Dir {
            input,
            output,
            jobs,
            key,
        } => cmd_dir(&input, &output, jobs, &key),
        Commands::File { input, output, key } => cmd_file(&input, &output, &key),
        Commands::Key { key } => cmd_key(&key),
        Commands::Check { samples, seed } => cmd_check(samples, seed),
    }
}

fn cmd_dir(input: &PathBuf, output: &PathBuf, jobs: Option<usize>, key: &KeyArgs) -> Result<()> {
    let cipher = key.cipher()?;
    let jobs = jobs.unwrap_or_else(default_jobs);
    let summary = pipeline::decrypt_dir(&cipher, input, output, jobs)?;
    if summary.failed() > 0 {
        bail!("{} file(s) failed to decrypt", summary.failed());
    }
    Ok(())
}

fn cmd_file(input: &PathBuf, output: &PathBuf, key: &KeyArgs) -> Result<()> {
    let cipher = key.cipher()?;
    let report = pipeline::decrypt_file(&cipher, input, output)?;
    info!(
        "decrypted {} -> {} ({} bytes, {} blocks, {} tail bytes)",
        input.display(),
        output.display(),
        report.bytes,
        report.blocks,
        report.tail
    );
    Ok(())
}

fn cmd_key(key: &KeyArgs) -> Result<()> {
    if key.key_hex.is_none() {
        println!("session: {}", key.session_params()?.session_hex());
    }
    let cipher = key.cipher()?;
    let schedule = cipher.schedule();
    println!("key bytes: {}", schedule.key_len());
    println!("rounds: {}", schedule.rounds());
    Ok(())
}

fn cmd_check(samples: usize, seed: Option<u64>) -> Result<()> {
    check::known_answers()?;
    let mut rng = seeded_rng(seed);
    check::random_samples(&mut rng, samples)?;
    println!("all checks passed");
    Ok(())
}

fn parse_hex16(hex_str: &str, what: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(hex_str.trim()).with_context(|| format!("decode {what} hex"))?;
    if bytes.len() != 16 {
        bail!("{what} must be 16 bytes (32 hex characters)");
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
