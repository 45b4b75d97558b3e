//! File and directory decryption.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use aes_inv::{InverseCipher, BLOCK_LEN};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};

/// Outcome of one decrypted file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    /// Total file size in bytes.
    pub bytes: usize,
    /// Number of 16-byte blocks decrypted.
    pub blocks: usize,
    /// Trailing bytes copied through unchanged.
    pub tail: usize,
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct Summary {
    /// Files decrypted and written.
    pub decrypted: usize,
    /// Files that could not be processed, with the reason.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl Summary {
    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

/// Decrypts `input` and writes the result to `output`.
pub fn decrypt_file(cipher: &InverseCipher, input: &Path, output: &Path) -> Result<FileReport> {
    if !input.is_file() {
        bail!("no such file: {}", input.display());
    }
    let mut data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let blocks = cipher.decrypt_buffer(&mut data);
    fs::write(output, &data).with_context(|| format!("write {}", output.display()))?;
    Ok(FileReport {
        bytes: data.len(),
        blocks,
        tail: data.len() % BLOCK_LEN,
    })
}

/// Decrypts every regular file directly inside `input_dir` into `output_dir`.
///
/// Both directories are created if missing. Files are split across up to
/// `jobs` worker threads sharing `cipher`. A failing file is logged and
/// recorded in the summary; the others still run.
pub fn decrypt_dir(
    cipher: &InverseCipher,
    input_dir: &Path,
    output_dir: &Path,
    jobs: usize,
) -> Result<Summary> {
    ensure_dir(input_dir)?;
    ensure_dir(output_dir)?;

    let files = list_files(input_dir)?;
    info!(
        "decrypting {} file(s) from {} into {}",
        files.len(),
        input_dir.display(),
        output_dir.display()
    );

    let mut summary = Summary::default();
    if files.is_empty() {
        info!("done: nothing to decrypt");
        return Ok(summary);
    }

    let workers = jobs.clamp(1, files.len());
    let per_worker = files.len().div_ceil(workers);
    debug!("using {} worker(s), {} file(s) each", workers, per_worker);

    let results = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(per_worker)
            .map(|batch| {
                scope.spawn(move || {
                    batch
                        .iter()
                        .map(|name| {
                            let input = input_dir.join(name);
                            let output = output_dir.join(name);
                            let result = decrypt_file(cipher, &input, &output);
                            (input, result)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("decryption worker panicked"))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    for (input, result) in results.into_iter().flatten() {
        match result {
            Ok(report) => {
                info!(
                    "decrypted {} ({} blocks, {} tail bytes)",
                    input.display(),
                    report.blocks,
                    report.tail
                );
                summary.decrypted += 1;
            }
            Err(err) => {
                warn!("failed to decrypt {}: {:#}", input.display(), err);
                summary.failures.push((input, err));
            }
        }
    }

    info!(
        "done: {} decrypted, {} failed",
        summary.decrypted,
        summary.failed()
    );
    Ok(summary)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read directory {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if file_type.is_file() {
            names.push(PathBuf::from(entry.file_name()));
        } else {
            debug!("skipping {}", entry.path().display());
        }
    }
    names.sort();
    Ok(names)
}
