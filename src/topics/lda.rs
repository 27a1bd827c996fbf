// Latent Dirichlet Allocation via collapsed Gibbs sampling.
//
// Fitting: every token occurrence gets a topic assignment, initialized at
// random and resampled `passes` times from
//
//   p(z = k) ∝ (n_dk + alpha) * (n_kw + eta) / (n_k + V * eta)
//
// Querying: the fitted topic-word distributions (phi) are held fixed and the
// document's topic mixture (theta) is found by fixed-point iteration,
//
//   theta_k ← (alpha + Σ_w c_w * theta_k phi_kw / Σ_j theta_j phi_jw) / (N + K * alpha)
//
// which uses no randomness, so the same document always gets the same answer.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::traits::{TopicModel, MINIMUM_PROBABILITY};
use crate::corpus::BowDocument;

const INFERENCE_MAX_ITERATIONS: usize = 100;
const INFERENCE_TOLERANCE: f64 = 1e-6;

/// Hyperparameters for `GibbsLda::fit`.
#[derive(Debug, Clone)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Full Gibbs sweeps over the corpus
    pub passes: usize,
    /// Symmetric document-topic prior; `None` means `1 / num_topics`
    pub alpha: Option<f64>,
    /// Symmetric topic-word prior
    pub eta: f64,
    pub seed: u64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            num_topics: 10,
            passes: 20,
            alpha: None,
            eta: 0.01,
            seed: 42,
        }
    }
}

/// A fitted LDA model.
#[derive(Debug, Clone)]
pub struct GibbsLda {
    num_topics: usize,
    alpha: f64,
    /// Topic-word probabilities: `phi[topic][token id]`
    phi: Vec<Vec<f64>>,
}

impl GibbsLda {
    /// Fit `params.num_topics` topics over `corpus`.
    ///
    /// `vocab_size` is the dictionary size; every token id in the corpus must
    /// be below it.
    pub fn fit(corpus: &[BowDocument], vocab_size: usize, params: &LdaParams) -> Result<Self> {
        let k = params.num_topics;
        if k == 0 {
            anyhow::bail!("Cannot fit a topic model with zero topics");
        }
        if params.eta <= 0.0 {
            anyhow::bail!("eta must be positive, got {}", params.eta);
        }
        let alpha = params.alpha.unwrap_or(1.0 / k as f64);
        if alpha <= 0.0 {
            anyhow::bail!("alpha must be positive, got {alpha}");
        }

        // Expand bags back into token occurrences, one topic slot each
        let mut docs: Vec<Vec<usize>> = Vec::with_capacity(corpus.len());
        for (doc_index, bow) in corpus.iter().enumerate() {
            let mut tokens = Vec::new();
            for &(word, count) in bow {
                if word >= vocab_size {
                    anyhow::bail!(
                        "Document {doc_index} uses token id {word} but the vocabulary has {vocab_size} entries"
                    );
                }
                tokens.extend(std::iter::repeat(word).take(count as usize));
            }
            docs.push(tokens);
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut n_dk = vec![vec![0usize; k]; docs.len()];
        let mut n_kw = vec![vec![0usize; vocab_size]; k];
        let mut n_k = vec![0usize; k];
        let mut z: Vec<Vec<usize>> = Vec::with_capacity(docs.len());

        for (d, doc) in docs.iter().enumerate() {
            let mut assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let topic = rng.random_range(0..k);
                n_dk[d][topic] += 1;
                n_kw[topic][w] += 1;
                n_k[topic] += 1;
                assignments.push(topic);
            }
            z.push(assignments);
        }

        let total_tokens: usize = docs.iter().map(Vec::len).sum();
        info!(
            documents = docs.len(),
            tokens = total_tokens,
            vocab_size,
            topics = k,
            passes = params.passes,
            "Fitting LDA"
        );

        let v_eta = vocab_size as f64 * params.eta;
        let mut weights = vec![0.0f64; k];

        for pass in 0..params.passes {
            for (d, doc) in docs.iter().enumerate() {
                for (position, &w) in doc.iter().enumerate() {
                    let old = z[d][position];
                    n_dk[d][old] -= 1;
                    n_kw[old][w] -= 1;
                    n_k[old] -= 1;

                    let mut total = 0.0;
                    for t in 0..k {
                        let weight = (n_dk[d][t] as f64 + alpha) * (n_kw[t][w] as f64 + params.eta)
                            / (n_k[t] as f64 + v_eta);
                        total += weight;
                        weights[t] = total;
                    }

                    // Inverse-CDF draw over the cumulative weights
                    let target = rng.random::<f64>() * total;
                    let new = weights.iter().position(|&c| target < c).unwrap_or(k - 1);

                    z[d][position] = new;
                    n_dk[d][new] += 1;
                    n_kw[new][w] += 1;
                    n_k[new] += 1;
                }
            }
            debug!(pass = pass + 1, of = params.passes, "Gibbs sweep complete");
        }

        let phi = (0..k)
            .map(|t| {
                let denom = n_k[t] as f64 + v_eta;
                n_kw[t]
                    .iter()
                    .map(|&count| (count as f64 + params.eta) / denom)
                    .collect()
            })
            .collect();

        Ok(Self {
            num_topics: k,
            alpha,
            phi,
        })
    }

    /// Build a model directly from topic-word distributions.
    ///
    /// Each row of `phi` is one topic's distribution over token ids.
    pub fn from_topic_word(phi: Vec<Vec<f64>>, alpha: f64) -> Result<Self> {
        if phi.is_empty() {
            anyhow::bail!("Cannot build a topic model with zero topics");
        }
        let vocab_size = phi[0].len();
        if phi.iter().any(|row| row.len() != vocab_size) {
            anyhow::bail!("Topic-word rows must all have {vocab_size} entries");
        }
        Ok(Self {
            num_topics: phi.len(),
            alpha,
            phi,
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.phi.first().map(Vec::len).unwrap_or(0)
    }

    /// Topic-word probabilities, `[topic][token id]`.
    pub fn topic_word(&self) -> &[Vec<f64>] {
        &self.phi
    }

    /// The `n` most probable token ids for `topic`, most probable first.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<(usize, f64)> {
        let Some(row) = self.phi.get(topic) else {
            return Vec::new();
        };
        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }

    /// Dense topic mixture for a document, summing to 1.
    pub fn infer(&self, doc: &BowDocument) -> Vec<f64> {
        let k = self.num_topics;
        let vocab_size = self.vocab_size();
        let mut theta = vec![1.0 / k as f64; k];

        let words: Vec<(usize, f64)> = doc
            .iter()
            .filter(|(w, _)| *w < vocab_size)
            .map(|&(w, c)| (w, c as f64))
            .collect();
        let length: f64 = words.iter().map(|(_, c)| c).sum();
        if length == 0.0 {
            return theta;
        }

        let denom = length + k as f64 * self.alpha;
        let mut expected = vec![0.0f64; k];

        for _ in 0..INFERENCE_MAX_ITERATIONS {
            expected.iter_mut().for_each(|e| *e = 0.0);
            for &(w, count) in &words {
                let norm: f64 = (0..k).map(|t| theta[t] * self.phi[t][w]).sum();
                if norm <= 0.0 {
                    continue;
                }
                for t in 0..k {
                    expected[t] += count * theta[t] * self.phi[t][w] / norm;
                }
            }

            let mut delta = 0.0f64;
            for t in 0..k {
                let next = (expected[t] + self.alpha) / denom;
                delta = delta.max((next - theta[t]).abs());
                theta[t] = next;
            }
            if delta < INFERENCE_TOLERANCE {
                break;
            }
        }

        theta
    }
}

impl TopicModel for GibbsLda {
    fn num_topics(&self) -> usize {
        self.num_topics
    }

    fn document_topics(&self, doc: &BowDocument) -> Vec<(usize, f64)> {
        self.infer(doc)
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p >= MINIMUM_PROBABILITY)
            .collect()
    }
}
