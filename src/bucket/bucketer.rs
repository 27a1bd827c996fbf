// Dominant-topic bucketing with early stopping.
//
// Streams the corpus once, asks the topic model for each document's sparse
// distribution, densifies it, and files the document under its dominant
// topic. As soon as every topic bucket holds `min_docs` documents we stop
// pulling from the corpus. For a large corpus that is usually a small
// prefix, which is all a visual sample needs.
//
// Documents whose query comes back empty have no dominant topic. They go to
// a separate `unassigned` list instead of being filed under topic 0.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::corpus::BowDocument;
use crate::topics::traits::TopicModel;

/// One sampled document: its processing-order id and dense topic vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledDocument {
    /// Sequential id, starting at 1, in the order documents were processed
    pub id: u32,
    /// Dense topic distribution, exactly `num_topics` entries
    pub probabilities: Vec<f64>,
}

/// Documents grouped by dominant topic, plus the flat arrival-order log.
#[derive(Debug, Clone)]
pub struct TopicBuckets {
    num_topics: usize,
    min_docs: usize,
    buckets: BTreeMap<usize, Vec<SampledDocument>>,
    unassigned: Vec<SampledDocument>,
    sample: Vec<SampledDocument>,
    /// Topic buckets still holding fewer than `min_docs` documents
    unfilled: usize,
}

impl TopicBuckets {
    pub fn new(num_topics: usize, min_docs: usize) -> Self {
        Self {
            num_topics,
            min_docs,
            buckets: BTreeMap::new(),
            unassigned: Vec::new(),
            sample: Vec::new(),
            unfilled: if min_docs == 0 { 0 } else { num_topics },
        }
    }

    /// File a document under `dominant`, or under `unassigned` when `None`
    /// or out of range.
    ///
    /// The document is also appended to the flat sample log.
    pub fn insert(&mut self, doc: SampledDocument, dominant: Option<usize>) {
        self.sample.push(doc.clone());

        match dominant {
            Some(topic) if topic < self.num_topics => {
                let bucket = self.buckets.entry(topic).or_default();
                bucket.push(doc);
                if bucket.len() == self.min_docs {
                    self.unfilled -= 1;
                }
            }
            Some(topic) => {
                warn!(
                    topic,
                    num_topics = self.num_topics,
                    id = doc.id,
                    "Topic out of range, filing as unassigned"
                );
                self.unassigned.push(doc);
            }
            None => self.unassigned.push(doc),
        }
    }

    /// True once every topic bucket holds at least `min_docs` documents.
    pub fn is_balanced(&self) -> bool {
        self.unfilled == 0
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn min_docs(&self) -> usize {
        self.min_docs
    }

    /// Documents whose dominant topic is `topic` (empty if none yet).
    pub fn bucket(&self, topic: usize) -> &[SampledDocument] {
        self.buckets.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty buckets in ascending topic order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[SampledDocument])> {
        self.buckets.iter().map(|(t, docs)| (*t, docs.as_slice()))
    }

    /// Documents whose model query returned no topics at all.
    pub fn unassigned(&self) -> &[SampledDocument] {
        &self.unassigned
    }

    /// Every processed document, in processing order.
    pub fn sample(&self) -> &[SampledDocument] {
        &self.sample
    }

    pub fn documents_examined(&self) -> usize {
        self.sample.len()
    }

    /// Per-topic document counts, including empty topics.
    pub fn counts(&self) -> Vec<usize> {
        (0..self.num_topics).map(|t| self.bucket(t).len()).collect()
    }
}

/// Bucket documents by dominant topic until every topic has `min_docs`.
///
/// `num_topics` must match the model's topic count; that is the caller's
/// responsibility. Stops pulling from `corpus` right after the document that
/// completes the balance condition. If the corpus runs out first, the partial
/// buckets are returned as-is.
pub fn bucket<'a, I>(
    corpus: I,
    model: &dyn TopicModel,
    num_topics: usize,
    min_docs: usize,
) -> TopicBuckets
where
    I: IntoIterator<Item = &'a BowDocument>,
{
    let mut buckets = TopicBuckets::new(num_topics, min_docs);
    let mut next_id: u32 = 1;

    for doc in corpus {
        let topics = model.document_topics(doc);
        let (probabilities, dominant) = densify(&topics, num_topics);

        if dominant.is_none() {
            debug!(id = next_id, "Document has no topic above threshold");
        }

        buckets.insert(
            SampledDocument {
                id: next_id,
                probabilities,
            },
            dominant,
        );
        next_id += 1;

        if buckets.is_balanced() {
            info!(
                examined = buckets.documents_examined(),
                min_docs, "Every topic bucket reached the minimum, stopping early"
            );
            return buckets;
        }
    }

    info!(
        examined = buckets.documents_examined(),
        min_docs,
        counts = ?buckets.counts(),
        "Corpus exhausted before every bucket was filled"
    );
    buckets
}

/// Expand sparse `(topic, probability)` pairs into a dense vector and pick
/// the dominant topic.
///
/// The first topic to reach the maximum wins: a later equal probability does
/// not replace it. Pairs with an out-of-range topic id are skipped.
pub fn densify(topics: &[(usize, f64)], num_topics: usize) -> (Vec<f64>, Option<usize>) {
    let mut dense = vec![0.0; num_topics];
    let mut best: Option<(usize, f64)> = None;

    for &(topic, probability) in topics {
        if topic >= num_topics {
            warn!(topic, num_topics, "Model returned a topic id out of range, ignoring");
            continue;
        }
        dense[topic] = probability;

        match best {
            Some((_, best_probability)) if probability <= best_probability => {}
            _ => best = Some((topic, probability)),
        }
    }

    (dense, best.map(|(topic, _)| topic))
}
