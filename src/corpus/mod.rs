// Corpus building: token ids, extreme-frequency pruning, bag-of-words.

pub mod dictionary;

pub use dictionary::{Dictionary, PruneParams};

/// Sparse `(token id, count)` pairs, sorted by token id.
pub type BowDocument = Vec<(usize, u32)>;

/// Build a pruned dictionary and the bag-of-words corpus in one go.
///
/// Documents that lose every token to pruning stay in the corpus as empty
/// bags so corpus positions still line up with the input documents.
pub fn build(docs: &[Vec<String>], params: PruneParams) -> (Dictionary, Vec<BowDocument>) {
    let mut dictionary = Dictionary::from_documents(docs);
    dictionary.filter_extremes(params);
    let corpus = docs.iter().map(|doc| dictionary.doc2bow(doc)).collect();
    (dictionary, corpus)
}
