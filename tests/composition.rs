// Composition tests: files on disk through cleaning, corpus building, LDA,
// bucketing and matrix assembly.
//
// Every test works in its own directory under the system temp dir. The
// end-to-end runs use a whitespace preprocessor so the vocabulary is exactly
// what the fixture files contain.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use abstracta::config::Config;
use abstracta::pipeline::analyze::{self, AnalyzeOptions};
use abstracta::preprocess::cleaner::AbstractCleaner;
use abstracta::preprocess::pool::{clean_files, list_corpus_files};
use abstracta::preprocess::traits::TextPreprocessor;

const OCEAN: &[&str] = &["coral", "reef", "kelp", "plankton", "salinity", "tide"];
const SPACE: &[&str] = &["orbit", "comet", "nebula", "quasar", "pulsar", "galaxy"];

/// Splits on whitespace, nothing else. Empty files fail.
struct WhitespacePreprocessor;

impl TextPreprocessor for WhitespacePreprocessor {
    fn process_file(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.process_text(&text)
    }

    fn process_text(&self, text: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            bail!("empty document");
        }
        Ok(tokens)
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("abstracta_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Three copies of every theme word, 18 tokens per document.
fn themed_text(words: &[&str]) -> String {
    let mut tokens = Vec::new();
    for _ in 0..3 {
        tokens.extend_from_slice(words);
    }
    tokens.join(" ")
}

/// 24 documents alternating ocean, space, ocean, ... in sorted name order,
/// plus one too-short file and one unreadable file that sort last.
fn write_themed_corpus(dir: &Path) {
    for i in 0..24 {
        let words = if i % 2 == 0 { OCEAN } else { SPACE };
        fs::write(dir.join(format!("doc_{i:02}.txt")), themed_text(words)).unwrap();
    }
    fs::write(dir.join("zz_short.txt"), "coral reef orbit").unwrap();
    fs::write(dir.join("zz_unreadable.txt"), [0xff, 0xfe, 0x00]).unwrap();
}

fn config_for(dir: &Path) -> Config {
    Config {
        input_dir: dir.to_path_buf(),
        num_topics: 2,
        passes: 30,
        workers: 3,
        min_docs: 2,
        seed: 42,
    }
}

fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (t, &p) in row.iter().enumerate() {
        if p > row[best] {
            best = t;
        }
    }
    best
}

// ============================================================
// File listing and the cleaning pool
// ============================================================

#[test]
fn listing_is_sorted_and_skips_hidden_files_and_directories() {
    let dir = scratch_dir("listing");
    fs::write(dir.join("b.txt"), "b").unwrap();
    fs::write(dir.join("a.txt"), "a").unwrap();
    fs::write(dir.join(".hidden"), "h").unwrap();
    fs::create_dir(dir.join("nested")).unwrap();

    let files = list_corpus_files(&dir).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn listing_missing_directory_is_an_error() {
    assert!(list_corpus_files(Path::new("/no/such/abstracta/dir")).is_err());
}

#[tokio::test]
async fn pool_drops_failures_and_short_documents_and_keeps_order() {
    let dir = scratch_dir("pool");
    let body = "glacier moraine crevasse tundra permafrost iceberg \
                snowpack meltwater fjord avalanche sediment erosion";
    fs::write(dir.join("a.txt"), format!("Abstract    :\nalpha {body}")).unwrap();
    fs::write(dir.join("b.txt"), format!("Abstract    :\nbravo {body}")).unwrap();
    fs::write(dir.join("c.txt"), "Abstract    :\nglacier moraine").unwrap();
    fs::write(dir.join("d.txt"), [0xff, 0xfe, 0x00]).unwrap();
    fs::write(dir.join("e.txt"), format!("Abstract    :\nechoes {body}")).unwrap();

    let files = list_corpus_files(&dir).unwrap();
    let cleaner: Arc<dyn TextPreprocessor> = Arc::new(AbstractCleaner::new().unwrap());
    let outcome = clean_files(cleaner, files, 4, false).await.unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.too_short, 1);
    let kept: Vec<PathBuf> = outcome.documents.iter().map(|d| d.path.clone()).collect();
    assert_eq!(kept, vec![dir.join("a.txt"), dir.join("b.txt"), dir.join("e.txt")]);
    assert_eq!(outcome.token_lists().len(), 3);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn pool_order_does_not_depend_on_worker_count() {
    let dir = scratch_dir("pool_workers");
    write_themed_corpus(&dir);
    let files = list_corpus_files(&dir).unwrap();

    let one = clean_files(Arc::new(WhitespacePreprocessor), files.clone(), 1, false)
        .await
        .unwrap();
    let many = clean_files(Arc::new(WhitespacePreprocessor), files, 8, false)
        .await
        .unwrap();

    assert_eq!(one.token_lists(), many.token_lists());
    assert_eq!(one.documents.len(), 24);

    let _ = fs::remove_dir_all(&dir);
}

// ============================================================
// End to end: analyze::run
// ============================================================

#[tokio::test]
async fn two_themes_fill_both_buckets_after_four_documents() {
    let dir = scratch_dir("e2e");
    write_themed_corpus(&dir);

    let report = analyze::run(
        &config_for(&dir),
        Arc::new(WhitespacePreprocessor),
        &AnalyzeOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_too_short, 1);
    assert_eq!(report.corpus.len(), 24);
    // Each word appears in exactly half the documents, so nothing is pruned
    assert_eq!(report.dictionary.len(), 12);

    assert!(report.buckets.is_balanced());
    assert_eq!(report.buckets.documents_examined(), 4);
    assert_eq!(report.buckets.counts(), vec![2, 2]);

    let ids = report.matrix.ids.clone();
    assert!(
        ids == vec![1, 3, 2, 4] || ids == vec![2, 4, 1, 3],
        "unexpected grouping {ids:?}"
    );
    for row in &report.matrix.rows {
        assert_eq!(row.len(), 2);
        let total: f64 = row.iter().sum();
        assert!(total <= 1.0 + 1e-9);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn grouped_rows_are_ordered_by_dominant_topic() {
    let dir = scratch_dir("e2e_grouped");
    write_themed_corpus(&dir);
    let mut config = config_for(&dir);
    config.min_docs = 5;

    let report = analyze::run(&config, Arc::new(WhitespacePreprocessor), &AnalyzeOptions::default())
        .await
        .unwrap();

    let dominant: Vec<usize> = report.matrix.rows.iter().map(|r| argmax(r)).collect();
    assert!(dominant.windows(2).all(|w| w[0] <= w[1]), "{dominant:?}");
    assert_eq!(report.matrix.len(), 10);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn arrival_order_keeps_processing_order() {
    let dir = scratch_dir("e2e_arrival");
    write_themed_corpus(&dir);
    let options = AnalyzeOptions {
        grouped: false,
        ..Default::default()
    };

    let report = analyze::run(&config_for(&dir), Arc::new(WhitespacePreprocessor), &options)
        .await
        .unwrap();

    assert_eq!(report.matrix.ids, vec![1, 2, 3, 4]);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn topics_separate_the_two_themes() {
    let dir = scratch_dir("e2e_topics");
    write_themed_corpus(&dir);

    let options = AnalyzeOptions {
        top_words: 3,
        ..Default::default()
    };
    let report = analyze::run(&config_for(&dir), Arc::new(WhitespacePreprocessor), &options)
        .await
        .unwrap();

    assert_eq!(report.topics.len(), 2);
    for topic in &report.topics {
        assert_eq!(topic.words.len(), 3);
        let ocean = topic.words.iter().filter(|(w, _)| OCEAN.contains(&w.as_str())).count();
        let space = topic.words.iter().filter(|(w, _)| SPACE.contains(&w.as_str())).count();
        assert!(ocean == 3 || space == 3, "mixed topic: {:?}", topic.words);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn same_seed_gives_same_sample() {
    let dir = scratch_dir("e2e_repeat");
    write_themed_corpus(&dir);
    let config = config_for(&dir);

    let first = analyze::run(&config, Arc::new(WhitespacePreprocessor), &AnalyzeOptions::default())
        .await
        .unwrap();
    let second = analyze::run(&config, Arc::new(WhitespacePreprocessor), &AnalyzeOptions::default())
        .await
        .unwrap();

    assert_eq!(first.matrix, second.matrix);

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn run_writes_json_export() {
    let dir = scratch_dir("e2e_export");
    write_themed_corpus(&dir);
    let out = std::env::temp_dir().join(format!("abstracta_export_{}.json", std::process::id()));
    let options = AnalyzeOptions {
        output: Some(out.clone()),
        ..Default::default()
    };

    analyze::run(&config_for(&dir), Arc::new(WhitespacePreprocessor), &options)
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["num_topics"], 2);
    assert_eq!(json["grouped"], true);
    assert_eq!(json["ids"].as_array().unwrap().len(), 4);
    assert_eq!(json["rows"].as_array().unwrap().len(), 4);

    let _ = fs::remove_file(&out);
    let _ = fs::remove_dir_all(&dir);
}

// ============================================================
// End to end: failure modes
// ============================================================

#[tokio::test]
async fn empty_directory_is_an_error() {
    let dir = scratch_dir("e2e_empty");
    let result = analyze::run(
        &config_for(&dir),
        Arc::new(WhitespacePreprocessor),
        &AnalyzeOptions::default(),
    )
    .await;
    assert!(result.is_err());

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn only_short_documents_is_an_error() {
    let dir = scratch_dir("e2e_short");
    fs::write(dir.join("a.txt"), "coral reef").unwrap();
    fs::write(dir.join("b.txt"), "orbit comet").unwrap();

    let err = analyze::run(
        &config_for(&dir),
        Arc::new(WhitespacePreprocessor),
        &AnalyzeOptions::default(),
    )
    .await
    .err()
    .unwrap();
    assert!(format!("{err:#}").contains("No documents survived"));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_input_directory_is_an_error() {
    let config = config_for(Path::new("/no/such/abstracta/corpus"));
    let result = analyze::run(&config, Arc::new(WhitespacePreprocessor), &AnalyzeOptions::default()).await;
    assert!(result.is_err());
}
