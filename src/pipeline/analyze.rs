// Analysis pipeline: files -> tokens -> corpus -> LDA -> buckets -> sample.
//
// 1. List and clean every file in the input directory (parallel pool)
// 2. Build the pruned dictionary and bag-of-words corpus
// 3. Fit the topic model
// 4. Bucket documents by dominant topic until each topic has `min_docs`
// 5. Assemble the sample matrix in the requested order
//
// Rendering is left to the caller so the whole run can be tested without
// touching stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::bucket::{self, SampleMatrix, TopicBuckets};
use crate::config::Config;
use crate::corpus::{self, BowDocument, Dictionary, PruneParams};
use crate::output::export;
use crate::preprocess::pool::{self, PreprocessOutcome};
use crate::preprocess::traits::TextPreprocessor;
use crate::topics::lda::{GibbsLda, LdaParams};
use crate::topics::summary::{self, TopicSummary};

/// Knobs that shape the output rather than the model.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Group matrix rows by dominant topic (otherwise arrival order)
    pub grouped: bool,
    /// Words shown per topic
    pub top_words: usize,
    /// Write the sample to this JSON file
    pub output: Option<PathBuf>,
    pub show_progress: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            grouped: true,
            top_words: 8,
            output: None,
            show_progress: false,
        }
    }
}

/// Everything a completed run produced.
pub struct AnalysisReport {
    pub files_failed: usize,
    pub files_too_short: usize,
    pub dictionary: Dictionary,
    pub corpus: Vec<BowDocument>,
    pub model: GibbsLda,
    pub topics: Vec<TopicSummary>,
    pub buckets: TopicBuckets,
    pub matrix: SampleMatrix,
}

/// Clean every file in the configured input directory.
pub async fn load_documents(
    config: &Config,
    preprocessor: Arc<dyn TextPreprocessor>,
    show_progress: bool,
) -> Result<PreprocessOutcome> {
    config.require_input_dir()?;
    let files = pool::list_corpus_files(&config.input_dir)?;
    if files.is_empty() {
        anyhow::bail!("No files found in {}", config.input_dir.display());
    }

    info!(files = files.len(), workers = config.workers, "Preprocessing corpus");
    pool::clean_files(preprocessor, files, config.workers, show_progress).await
}

/// Run the full analysis.
pub async fn run(
    config: &Config,
    preprocessor: Arc<dyn TextPreprocessor>,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport> {
    config.validate()?;

    let outcome = load_documents(config, preprocessor, options.show_progress).await?;
    if outcome.documents.is_empty() {
        anyhow::bail!(
            "No documents survived preprocessing ({} failed, {} too short)",
            outcome.failed,
            outcome.too_short
        );
    }

    let (dictionary, corpus) = corpus::build(&outcome.token_lists(), PruneParams::default());
    if dictionary.is_empty() {
        anyhow::bail!(
            "Every token was pruned from {} documents; the corpus is too small \
             (tokens must appear in at least {} documents)",
            outcome.documents.len(),
            PruneParams::default().no_below
        );
    }

    let params = LdaParams {
        num_topics: config.num_topics,
        passes: config.passes,
        seed: config.seed,
        ..Default::default()
    };
    let model = GibbsLda::fit(&corpus, dictionary.len(), &params)?;

    let buckets = bucket::bucket(&corpus, &model, config.num_topics, config.min_docs);
    let matrix = if options.grouped {
        SampleMatrix::from_buckets(&buckets)?
    } else {
        SampleMatrix::from_list(buckets.sample(), config.num_topics)?
    };

    let topics = summary::summarize(&model, &dictionary, options.top_words);

    if let Some(path) = &options.output {
        export::write_json(path, &matrix, &topics, options.grouped)?;
        info!(path = %path.display(), rows = matrix.len(), "Sample written");
    }

    Ok(AnalysisReport {
        files_failed: outcome.failed,
        files_too_short: outcome.too_short,
        dictionary,
        corpus,
        model,
        topics,
        buckets,
        matrix,
    })
}
