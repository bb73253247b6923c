//! Batch scanning of a directory of recorded matches.
//!
//! Each source file becomes one output file of the same stem. Scans run on
//! the blocking pool, at most `max_concurrent_matches` at a time. A match
//! that fails is logged and counted; it never affects the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bombsight_core::config::{BatchConfig, SamplingConfig};
use bombsight_core::replay::EventLogFeed;
use bombsight_core::scanner::MatchScanner;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::EngineError;
use crate::output;

/// Counters for one `scan` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Matches scanned to completion.
    pub scanned: usize,
    /// Matches skipped because their output already existed.
    pub skipped: usize,
    /// Matches that failed.
    pub failed: usize,
    /// Records written across all scanned matches.
    pub records: usize,
}

/// List the files in `dir` with the given extension, sorted by path.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::MissingInput {
            path: dir.to_path_buf(),
        });
    }
    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Output file for `source` inside `output_dir`.
pub fn output_path(output_dir: &Path, source: &Path, extension: &str) -> PathBuf {
    let mut name = source
        .file_stem()
        .unwrap_or(source.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

/// Spelling-independent identity of a file that may not exist yet: its
/// canonical parent directory plus its file name.
fn path_key(path: &Path) -> Result<PathBuf, EngineError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut key = parent.canonicalize()?;
    if let Some(name) = path.file_name() {
        key.push(name);
    }
    Ok(key)
}

/// Scan one recorded match into `dest`. Returns the number of records.
pub fn scan_match(
    source: &Path,
    dest: &Path,
    sampling: &SamplingConfig,
) -> Result<usize, EngineError> {
    let feed = EventLogFeed::open(source)?;
    let scanner = MatchScanner::new(feed, sampling)?;
    output::write_records(scanner, dest)
}

/// Scan every source in `input_dir` that has no output in `output_dir` yet.
pub async fn run_scan(
    input_dir: &Path,
    output_dir: &Path,
    sampling: &SamplingConfig,
    batch: &BatchConfig,
) -> Result<ScanSummary, EngineError> {
    let sources = discover(input_dir, &batch.input_extension)?;
    tokio::fs::create_dir_all(output_dir).await?;

    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        sources = sources.len(),
        max_concurrent = batch.max_concurrent_matches,
        "Starting batch scan"
    );

    let permits = Arc::new(Semaphore::new(
        batch.max_concurrent_matches.min(Semaphore::MAX_PERMITS),
    ));
    let mut tasks = JoinSet::new();
    let mut summary = ScanSummary::default();

    for source in sources {
        let dest = output_path(output_dir, &source, &batch.output_extension);
        if dest.exists() {
            info!(source = %source.display(), "Output exists, skipping");
            summary.skipped = summary.skipped.saturating_add(1);
            continue;
        }

        let permits = Arc::clone(&permits);
        let sampling = sampling.clone();
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| EngineError::Task {
                    message: e.to_string(),
                })?;
            info!(source = %source.display(), "Scanning match");
            let worker_source = source.clone();
            let result =
                tokio::task::spawn_blocking(move || scan_match(&worker_source, &dest, &sampling))
                    .await
                    .map_err(|e| EngineError::Task {
                        message: e.to_string(),
                    })
                    .and_then(|scanned| scanned);
            match &result {
                Ok(records) => info!(source = %source.display(), records, "Match scanned"),
                Err(e) => error!(source = %source.display(), error = %e, "Match failed"),
            }
            result
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(records)) => {
                summary.scanned = summary.scanned.saturating_add(1);
                summary.records = summary.records.saturating_add(records);
            }
            Ok(Err(_logged)) => summary.failed = summary.failed.saturating_add(1),
            Err(e) => {
                error!(error = %e, "Scan task aborted");
                summary.failed = summary.failed.saturating_add(1);
            }
        }
    }

    info!(
        scanned = summary.scanned,
        skipped = summary.skipped,
        failed = summary.failed,
        records = summary.records,
        "Batch scan complete"
    );
    Ok(summary)
}

/// Merge every output file in `input_dir` into `dest`.
pub async fn run_merge(
    input_dir: &Path,
    dest: &Path,
    batch: &BatchConfig,
) -> Result<output::MergeSummary, EngineError> {
    let mut sources = discover(input_dir, &batch.output_extension)?;
    let dest_key = path_key(dest)?;
    sources.retain(|source| !path_key(source).is_ok_and(|key| key == dest_key));
    info!(
        input = %input_dir.display(),
        output = %dest.display(),
        sources = sources.len(),
        "Starting merge"
    );

    let dest = dest.to_path_buf();
    let merged = tokio::task::spawn_blocking(move || output::merge(&sources, &dest))
        .await
        .map_err(|e| EngineError::Task {
            message: e.to_string(),
        })??;

    info!(files = merged.files, rows = merged.rows, "Merge complete");
    Ok(merged)
}
