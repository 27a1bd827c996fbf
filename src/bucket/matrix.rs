// Sample matrix assembly.
//
// Flattens either the grouped bucket map or a flat arrival-order list into
// one document x topic matrix with a row-aligned id list. The two entry
// points produce different row orders for the same documents, so callers
// pick one explicitly.

use anyhow::Result;
use serde::Serialize;

use super::bucketer::{SampledDocument, TopicBuckets};

/// Row-aligned ids and topic probabilities: `rows[i]` belongs to `ids[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleMatrix {
    pub num_topics: usize,
    pub ids: Vec<u32>,
    pub rows: Vec<Vec<f64>>,
}

impl SampleMatrix {
    fn with_capacity(num_topics: usize, capacity: usize) -> Self {
        Self {
            num_topics,
            ids: Vec::with_capacity(capacity),
            rows: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, doc: &SampledDocument) -> Result<()> {
        if doc.probabilities.len() != self.num_topics {
            anyhow::bail!(
                "Document {} has {} topic probabilities, expected {}",
                doc.id,
                doc.probabilities.len(),
                self.num_topics
            );
        }
        self.ids.push(doc.id);
        self.rows.push(doc.probabilities.clone());
        Ok(())
    }

    /// Assemble grouped by dominant topic.
    ///
    /// Buckets come in ascending topic order, each in insertion order.
    /// Unassigned documents follow the last topic bucket.
    pub fn from_buckets(buckets: &TopicBuckets) -> Result<Self> {
        let mut matrix = Self::with_capacity(buckets.num_topics(), buckets.documents_examined());

        for (_, docs) in buckets.buckets() {
            for doc in docs {
                matrix.push(doc)?;
            }
        }
        for doc in buckets.unassigned() {
            matrix.push(doc)?;
        }

        Ok(matrix)
    }

    /// Assemble in the order the documents appear in `docs`.
    pub fn from_list(docs: &[SampledDocument], num_topics: usize) -> Result<Self> {
        let mut matrix = Self::with_capacity(num_topics, docs.len());
        for doc in docs {
            matrix.push(doc)?;
        }
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One topic's probability across every sampled document (a grid row).
    pub fn topic_row(&self, topic: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.get(topic).copied().unwrap_or(0.0))
            .collect()
    }
}
