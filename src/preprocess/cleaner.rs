// Abstract cleaner: the default TextPreprocessor.
//
// Award-abstract files carry a header block (title, dates, program officer)
// followed by an `Abstract    :` line; only the text after that line is topic
// material. Files without the marker are used whole.
//
// Cleaning pipeline, in order: strip markup, URLs and e-mail addresses,
// lowercase, keep letters only, split, drop short tokens and stop words,
// then stem what's left.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex_lite::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

use super::traits::TextPreprocessor;

/// Words that show up in nearly every abstract and say nothing about topic.
const BOILERPLATE_WORDS: &[&str] = &[
    "abstract", "award", "nsf", "project", "proposal", "research", "program", "will",
];

pub struct AbstractCleaner {
    stop_words: HashSet<String>,
    stemmer: Stemmer,
    /// Tokens shorter than this are dropped before stemming
    pub min_token_len: usize,
    section_marker: Regex,
    markup: Regex,
    non_letters: Regex,
}

impl AbstractCleaner {
    pub fn new() -> Result<Self> {
        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stop_words.extend(BOILERPLATE_WORDS.iter().map(|w| w.to_string()));

        Ok(Self {
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
            min_token_len: 3,
            section_marker: Regex::new(r"(?m)^[ \t]*Abstract[ \t]*:")
                .context("Invalid section marker pattern")?,
            markup: Regex::new(r"<[^>]*>|https?://\S+|www\.\S+|\S+@\S+")
                .context("Invalid markup pattern")?,
            non_letters: Regex::new(r"[^a-z]+").context("Invalid letter pattern")?,
        })
    }

    /// Add extra stop words (compared before stemming, case-insensitive).
    pub fn add_stop_words(&mut self, words: &[&str]) {
        self.stop_words
            .extend(words.iter().map(|w| w.to_lowercase()));
    }

    /// The abstract body: text after the first `Abstract:` line, or all of it.
    pub fn extract_section<'a>(&self, text: &'a str) -> &'a str {
        match self.section_marker.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        }
    }

    fn tokenize(&self, section: &str) -> Vec<String> {
        let stripped = self.markup.replace_all(section, " ");
        let lowered = stripped.to_lowercase();
        let letters = self.non_letters.replace_all(&lowered, " ");

        letters
            .split_whitespace()
            .filter(|word| word.len() >= self.min_token_len && !self.stop_words.contains(*word))
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }
}

impl TextPreprocessor for AbstractCleaner {
    fn process_file(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        self.process_text(&text)
            .with_context(|| format!("Failed to clean {}", path.display()))
    }

    fn process_text(&self, text: &str) -> Result<Vec<String>> {
        let section = self.extract_section(text);
        if section.trim().is_empty() {
            anyhow::bail!("Abstract section is empty");
        }
        Ok(self.tokenize(section))
    }
}
