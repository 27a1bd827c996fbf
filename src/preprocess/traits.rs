// Text preprocessor trait.
//
// The pool only needs "path in, tokens out", so that's the seam. Failures are
// plain errors: the pool decides what to do with them (drop and log).

use std::path::Path;

use anyhow::Result;

/// Turns one corpus file into a token sequence.
///
/// Implementations run on blocking worker threads, so they must be
/// shareable across threads.
pub trait TextPreprocessor: Send + Sync {
    /// Read `path` and return its cleaned tokens.
    fn process_file(&self, path: &Path) -> Result<Vec<String>>;

    /// Clean already-loaded text.
    fn process_text(&self, text: &str) -> Result<Vec<String>>;
}
