// Parallel preprocessing: clean every corpus file on a bounded worker pool.
//
// Each file is cleaned on a blocking thread (it's disk + CPU work). At most
// `workers` files are in flight at once. Results come back through a single
// stream consumed by one loop, which is the only thing that touches the
// accumulated document list. Workers never share state.
//
// `buffered` (not `buffer_unordered`) yields results in input order, so with
// a sorted file listing the document order is the same on every run, and so
// is every id derived from it.

use std::fs;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::traits::TextPreprocessor;

/// Documents must have more than this many tokens to enter the corpus.
pub const MIN_TOKENS: usize = 10;

/// A file that survived cleaning and the length filter.
#[derive(Debug, Clone)]
pub struct CleanedDocument {
    pub path: PathBuf,
    pub tokens: Vec<String>,
}

/// What came out of a preprocessing run.
#[derive(Debug, Default)]
pub struct PreprocessOutcome {
    /// Accepted documents, in input order
    pub documents: Vec<CleanedDocument>,
    /// Files whose cleaning failed (read error, bad encoding, empty abstract)
    pub failed: usize,
    /// Files that cleaned fine but were too short
    pub too_short: usize,
}

impl PreprocessOutcome {
    pub fn token_lists(&self) -> Vec<Vec<String>> {
        self.documents.iter().map(|d| d.tokens.clone()).collect()
    }
}

/// Regular, non-hidden files directly under `dir`, sorted by path.
pub fn list_corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Clean `paths` with up to `workers` files in flight.
///
/// Failed files and documents with `MIN_TOKENS` or fewer tokens are dropped.
/// Neither is an error for the run as a whole.
pub async fn clean_files(
    preprocessor: Arc<dyn TextPreprocessor>,
    paths: Vec<PathBuf>,
    workers: usize,
    show_progress: bool,
) -> Result<PreprocessOutcome> {
    let pb = if show_progress {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar().template("  Cleaning [{bar:30}] {pos}/{len} ({eta})")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let total = paths.len();
    let mut results = pin!(stream::iter(paths.into_iter().map(|path| {
        let preprocessor = Arc::clone(&preprocessor);
        async move {
            let task_path = path.clone();
            let result =
                tokio::task::spawn_blocking(move || preprocessor.process_file(&task_path)).await;
            (path, result)
        }
    }))
    .buffered(workers.max(1)));

    let mut outcome = PreprocessOutcome::default();

    while let Some((path, result)) = results.next().await {
        pb.inc(1);
        let tokens = match result {
            Ok(Ok(tokens)) => tokens,
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %format!("{e:#}"), "Failed to clean file, skipping");
                outcome.failed += 1;
                continue;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cleaning task panicked, skipping");
                outcome.failed += 1;
                continue;
            }
        };

        if tokens.len() <= MIN_TOKENS {
            debug!(path = %path.display(), tokens = tokens.len(), "Document too short, skipping");
            outcome.too_short += 1;
            continue;
        }

        outcome.documents.push(CleanedDocument { path, tokens });
    }
    pb.finish_and_clear();

    info!(
        files = total,
        accepted = outcome.documents.len(),
        failed = outcome.failed,
        too_short = outcome.too_short,
        "Preprocessing complete"
    );

    Ok(outcome)
}
