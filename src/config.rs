use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_INPUT_DIR: &str = "./abstracts";
pub const DEFAULT_TOPICS: usize = 10;
pub const DEFAULT_PASSES: usize = 20;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_MIN_DOCS: usize = 5;
pub const DEFAULT_SEED: u64 = 42;

/// Pipeline configuration.
///
/// Values come from environment variables (a .env file is loaded at startup
/// via dotenvy), falling back to the defaults above. CLI flags are layered
/// on top with `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one abstract per file
    pub input_dir: PathBuf,
    /// Number of LDA topics
    pub num_topics: usize,
    /// Gibbs sampling sweeps over the corpus
    pub passes: usize,
    /// Files cleaned in parallel
    pub workers: usize,
    /// Target documents per topic bucket before sampling stops
    pub min_docs: usize,
    /// Seed for the topic model's sampler
    pub seed: u64,
}

/// CLI-provided values; `None` keeps whatever the environment said.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub num_topics: Option<usize>,
    pub passes: Option<usize>,
    pub workers: Option<usize>,
    pub min_docs: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            num_topics: DEFAULT_TOPICS,
            passes: DEFAULT_PASSES,
            workers: DEFAULT_WORKERS,
            min_docs: DEFAULT_MIN_DOCS,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default; a variable that is set but doesn't parse
    /// is an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            input_dir: env::var("ABSTRACTA_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            num_topics: env_or("ABSTRACTA_TOPICS", defaults.num_topics)?,
            passes: env_or("ABSTRACTA_PASSES", defaults.passes)?,
            workers: env_or("ABSTRACTA_WORKERS", defaults.workers)?,
            min_docs: env_or("ABSTRACTA_MIN_DOCS", defaults.min_docs)?,
            seed: env_or("ABSTRACTA_SEED", defaults.seed)?,
        })
    }

    /// Layer CLI values over the loaded configuration.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.input_dir {
            self.input_dir = dir;
        }
        self.num_topics = overrides.num_topics.unwrap_or(self.num_topics);
        self.passes = overrides.passes.unwrap_or(self.passes);
        self.workers = overrides.workers.unwrap_or(self.workers);
        self.min_docs = overrides.min_docs.unwrap_or(self.min_docs);
        self.seed = overrides.seed.unwrap_or(self.seed);
        self
    }

    /// Check the settings the topic model and pool can't work without.
    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            anyhow::bail!("Number of topics must be at least 1");
        }
        if self.passes == 0 {
            anyhow::bail!("Number of passes must be at least 1");
        }
        if self.workers == 0 {
            anyhow::bail!("Number of workers must be at least 1");
        }
        self.require_input_dir()
    }

    /// Check that the input directory exists.
    /// Call this before any operation that reads the corpus.
    pub fn require_input_dir(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            anyhow::bail!(
                "Input directory {} not found.\n\
                 Pass --input-dir or set ABSTRACTA_INPUT_DIR in your .env file.",
                self.input_dir.display()
            );
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw:?} is not a valid value")),
        Err(_) => Ok(default),
    }
}
