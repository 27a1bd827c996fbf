// Topic model trait.
//
// The bucketer only needs to ask "what topics is this document about?", so
// that is all the trait exposes. The default implementation is the Gibbs
// sampler in lda.rs, but any model that can answer per-document queries
// (an online variational LDA, a remote service) can be dropped in.

use crate::corpus::BowDocument;

/// Topic probabilities below this value are treated as absent.
pub const MINIMUM_PROBABILITY: f64 = 0.005;

/// A fitted topic model that can be queried one document at a time.
pub trait TopicModel {
    /// Number of latent topics the model was fitted with.
    fn num_topics(&self) -> usize;

    /// Sparse topic distribution for a bag-of-words document.
    ///
    /// Returns `(topic id, probability)` pairs in ascending topic order, with
    /// every probability >= `MINIMUM_PROBABILITY`. Must be deterministic for a
    /// fixed fitted state.
    fn document_topics(&self, doc: &BowDocument) -> Vec<(usize, f64)>;
}
