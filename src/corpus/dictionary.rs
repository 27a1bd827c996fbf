// Token dictionary and bag-of-words conversion.
//
// Ids are handed out in order of first appearance across the corpus. Each
// token also tracks its document frequency (how many documents contain it
// at least once), which drives extreme-frequency pruning: tokens that are
// too rare carry no topic signal, and tokens in most documents are
// effectively stop words for this corpus.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::info;

use super::BowDocument;

/// Thresholds for `Dictionary::filter_extremes`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneParams {
    /// Drop tokens appearing in fewer than this many documents
    pub no_below: usize,
    /// Drop tokens appearing in more than this fraction of documents
    pub no_above: f64,
    /// After the two filters, keep at most this many tokens (most frequent first)
    pub keep_n: Option<usize>,
}

impl Default for PruneParams {
    fn default() -> Self {
        Self {
            no_below: 5,
            no_above: 0.5,
            keep_n: Some(100_000),
        }
    }
}

/// Summary numbers for the `corpus` command.
#[derive(Debug, Clone, Serialize)]
pub struct DictionaryStats {
    pub num_docs: usize,
    pub num_tokens: usize,
    pub total_postings: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    /// Document frequency, indexed by token id
    dfs: Vec<usize>,
    num_docs: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary over every document in `docs`.
    pub fn from_documents(docs: &[Vec<String>]) -> Self {
        let mut dictionary = Self::new();
        for doc in docs {
            dictionary.add_document(doc);
        }
        dictionary
    }

    /// Register a document's tokens, assigning ids to unseen ones.
    pub fn add_document(&mut self, tokens: &[String]) {
        self.num_docs += 1;

        let mut seen: HashSet<usize> = HashSet::new();
        for token in tokens {
            let id = match self.token2id.get(token) {
                Some(&id) => id,
                None => {
                    let id = self.id2token.len();
                    self.token2id.insert(token.clone(), id);
                    self.id2token.push(token.clone());
                    self.dfs.push(0);
                    id
                }
            };
            if seen.insert(id) {
                self.dfs[id] += 1;
            }
        }
    }

    /// Remove rare and overly common tokens, then compact the ids.
    ///
    /// Surviving tokens keep their relative order, so ids stay in order of
    /// first appearance.
    pub fn filter_extremes(&mut self, params: PruneParams) {
        let before = self.id2token.len();
        let max_df = params.no_above * self.num_docs as f64;

        let mut keep: Vec<usize> = (0..self.id2token.len())
            .filter(|&id| self.dfs[id] >= params.no_below && self.dfs[id] as f64 <= max_df)
            .collect();

        if let Some(keep_n) = params.keep_n {
            if keep.len() > keep_n {
                // Stable sort: equally frequent tokens keep first-appearance order
                keep.sort_by(|a, b| self.dfs[*b].cmp(&self.dfs[*a]));
                keep.truncate(keep_n);
                keep.sort_unstable();
            }
        }

        let mut token2id = HashMap::with_capacity(keep.len());
        let mut id2token = Vec::with_capacity(keep.len());
        let mut dfs = Vec::with_capacity(keep.len());
        for old_id in keep {
            let token = std::mem::take(&mut self.id2token[old_id]);
            token2id.insert(token.clone(), id2token.len());
            id2token.push(token);
            dfs.push(self.dfs[old_id]);
        }

        self.token2id = token2id;
        self.id2token = id2token;
        self.dfs = dfs;

        info!(
            before,
            after = self.id2token.len(),
            no_below = params.no_below,
            no_above = params.no_above,
            "Pruned extreme-frequency tokens"
        );
    }

    /// Sparse `(token id, count)` representation, sorted by id.
    ///
    /// Tokens not in the dictionary are ignored.
    pub fn doc2bow(&self, tokens: &[String]) -> BowDocument {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(&id) = self.token2id.get(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.token2id.get(token).copied()
    }

    pub fn token(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    pub fn document_frequency(&self, id: usize) -> Option<usize> {
        self.dfs.get(id).copied()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            num_docs: self.num_docs,
            num_tokens: self.id2token.len(),
            total_postings: self.dfs.iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_ids_in_first_appearance_order() {
        let dict = Dictionary::from_documents(&[tokens("beta alpha beta"), tokens("gamma alpha")]);
        assert_eq!(dict.id("beta"), Some(0));
        assert_eq!(dict.id("alpha"), Some(1));
        assert_eq!(dict.id("gamma"), Some(2));
        assert_eq!(dict.document_frequency(1), Some(2));
        assert_eq!(dict.document_frequency(0), Some(1));
    }

    #[test]
    fn test_doc2bow_counts_and_sorts() {
        let dict = Dictionary::from_documents(&[tokens("beta alpha gamma")]);
        let bow = dict.doc2bow(&tokens("gamma beta gamma unknown"));
        assert_eq!(bow, vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn test_keep_n_prefers_frequent() {
        let mut dict = Dictionary::from_documents(&[
            tokens("rare common"),
            tokens("common other"),
            tokens("common other"),
        ]);
        dict.filter_extremes(PruneParams {
            no_below: 1,
            no_above: 1.0,
            keep_n: Some(2),
        });
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.id("common"), Some(0));
        assert_eq!(dict.id("other"), Some(1));
        assert_eq!(dict.id("rare"), None);
    }
}
