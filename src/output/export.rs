// JSON export of the visualization sample, for plotting outside the terminal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bucket::SampleMatrix;
use crate::topics::summary::TopicSummary;

#[derive(Debug, Serialize)]
pub struct SampleExport<'a> {
    pub generated_at: DateTime<Utc>,
    pub grouped: bool,
    pub num_topics: usize,
    /// Row-aligned with `rows`
    pub ids: &'a [u32],
    pub rows: &'a [Vec<f64>],
    pub topics: &'a [TopicSummary],
}

impl<'a> SampleExport<'a> {
    pub fn new(matrix: &'a SampleMatrix, topics: &'a [TopicSummary], grouped: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            grouped,
            num_topics: matrix.num_topics,
            ids: &matrix.ids,
            rows: &matrix.rows,
            topics,
        }
    }
}

/// Write the sample matrix and topic summaries to `path` as pretty JSON.
pub fn write_json(
    path: &Path,
    matrix: &SampleMatrix,
    topics: &[TopicSummary],
    grouped: bool,
) -> Result<()> {
    let export = SampleExport::new(matrix, topics, grouped);
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
