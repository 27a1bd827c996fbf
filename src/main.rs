use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use abstracta::config::{Config, Overrides};
use abstracta::pipeline::analyze::{self, AnalyzeOptions};
use abstracta::preprocess::cleaner::AbstractCleaner;
use abstracta::preprocess::traits::TextPreprocessor;

/// Abstracta: topic bucketing for research-abstract corpora.
///
/// Cleans a directory of abstracts, fits an LDA topic model, and shows a
/// topic-balanced sample of documents as a shaded grid.
#[derive(Parser)]
#[command(name = "abstracta", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads the corpus.
#[derive(Args)]
struct CorpusArgs {
    /// Directory of abstract files (default: ./abstracts)
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Number of files cleaned in parallel (default: 4)
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit topics and show a topic-balanced document sample
    Analyze {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of topics (default: 10)
        #[arg(long)]
        topics: Option<usize>,

        /// Gibbs sampling passes over the corpus (default: 20)
        #[arg(long)]
        passes: Option<usize>,

        /// Documents wanted per topic before sampling stops (default: 5)
        #[arg(long)]
        min_docs: Option<usize>,

        /// Seed for the topic model (default: 42)
        #[arg(long)]
        seed: Option<u64>,

        /// Order the grid by arrival instead of grouping by dominant topic
        #[arg(long)]
        arrival_order: bool,

        /// Words shown per topic
        #[arg(long, default_value = "8")]
        top_words: usize,

        /// Also write the sample matrix to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Preprocess the corpus and show dictionary statistics
    Corpus {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Show the cleaned tokens for a single file
    Inspect {
        /// The file to clean
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("abstracta=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            corpus,
            topics,
            passes,
            min_docs,
            seed,
            arrival_order,
            top_words,
            output,
        } => {
            let config = Config::load()?.apply(Overrides {
                input_dir: corpus.input_dir,
                workers: corpus.workers,
                num_topics: topics,
                passes,
                min_docs,
                seed,
            });
            config.validate()?;

            println!(
                "Analyzing {} ({} topics, {} passes, {} per bucket)...",
                config.input_dir.display(),
                config.num_topics,
                config.passes,
                config.min_docs
            );

            let options = AnalyzeOptions {
                grouped: !arrival_order,
                top_words,
                output: output.clone(),
                show_progress: true,
            };
            let report = analyze::run(&config, preprocessor()?, &options).await?;

            println!(
                "  {} documents in corpus, {} tokens in dictionary",
                report.corpus.len(),
                report.dictionary.len()
            );
            if report.files_failed + report.files_too_short > 0 {
                println!(
                    "  {}",
                    format!(
                        "Skipped {} unreadable and {} too-short files",
                        report.files_failed, report.files_too_short
                    )
                    .dimmed()
                );
            }

            abstracta::topics::summary::display(
                &report.topics,
                &report.buckets.counts(),
                config.min_docs,
            );
            abstracta::output::grid::display(&report.matrix, options.grouped);

            println!();
            if report.buckets.is_balanced() {
                println!(
                    "{}",
                    format!(
                        "Sample balanced after {} of {} documents.",
                        report.buckets.documents_examined(),
                        report.corpus.len()
                    )
                    .bold()
                );
            } else {
                println!(
                    "{} corpus ran out before every topic had {} documents.",
                    "Note:".yellow(),
                    config.min_docs
                );
            }
            if !report.buckets.unassigned().is_empty() {
                println!(
                    "  {} documents had no topic above threshold (shown last)",
                    report.buckets.unassigned().len()
                );
            }
            if let Some(path) = output {
                println!("Sample written to {}", path.display());
            }
        }

        Commands::Corpus { corpus } => {
            let config = Config::load()?.apply(Overrides {
                input_dir: corpus.input_dir,
                workers: corpus.workers,
                ..Default::default()
            });
            config.validate()?;

            let outcome = analyze::load_documents(&config, preprocessor()?, true).await?;
            let (dictionary, _) = abstracta::corpus::build(
                &outcome.token_lists(),
                abstracta::corpus::PruneParams::default(),
            );
            let stats = dictionary.stats();

            println!("\n{}", "=== Corpus ===".bold());
            println!("  Documents accepted: {}", outcome.documents.len());
            println!("  Failed to clean:    {}", outcome.failed);
            println!("  Too short:          {}", outcome.too_short);
            println!("  Dictionary tokens:  {}", stats.num_tokens);
            println!("  Token postings:     {}", stats.total_postings);
        }

        Commands::Inspect { file } => {
            info!(path = %file.display(), "Inspecting file");
            let tokens = preprocessor()?.process_file(&file)?;
            println!("{} tokens:", tokens.len());
            println!("{}", tokens.join(" ").dimmed());
        }
    }

    Ok(())
}

fn preprocessor() -> Result<Arc<dyn TextPreprocessor>> {
    Ok(Arc::new(AbstractCleaner::new()?))
}
