// TopicSummary: a human-readable view of a fitted topic.
//
// Each topic gets a label from its top stems and the list of those stems
// with their probabilities, so a reader can sanity-check what the model
// found before looking at the document grid.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::lda::GibbsLda;
use crate::corpus::Dictionary;

/// The top words of one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: usize,
    /// Top three words joined with " / "
    pub label: String,
    /// Most probable words, highest first
    pub words: Vec<(String, f64)>,
}

/// Summarize every topic in `model` with its `top_n` words.
pub fn summarize(model: &GibbsLda, dictionary: &Dictionary, top_n: usize) -> Vec<TopicSummary> {
    (0..model.topic_word().len())
        .map(|id| {
            let words: Vec<(String, f64)> = model
                .top_words(id, top_n)
                .into_iter()
                .filter_map(|(token, p)| dictionary.token(token).map(|w| (w.to_string(), p)))
                .collect();
            let label = words
                .iter()
                .take(3)
                .map(|(w, _)| w.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            TopicSummary { id, label, words }
        })
        .collect()
}

/// Print the topic list with each topic's counts from the sample.
///
/// `counts[i]` is the number of sampled documents whose dominant topic is `i`.
pub fn display(summaries: &[TopicSummary], counts: &[usize], min_docs: usize) {
    println!("\n{}", format!("=== Topics ({}) ===", summaries.len()).bold());
    println!();

    for summary in summaries {
        let count = counts.get(summary.id).copied().unwrap_or(0);
        let count_str = format!("{count:>3} docs");
        let colored_count = if count >= min_docs {
            count_str.bright_green()
        } else if count > 0 {
            count_str.bright_yellow()
        } else {
            count_str.bright_red()
        };

        println!(
            "  {:>2}. {:<40} {}",
            summary.id,
            summary.label.bold(),
            colored_count
        );

        let words: Vec<String> = summary
            .words
            .iter()
            .map(|(w, p)| format!("{w} ({p:.3})"))
            .collect();
        println!("      Words: {}", words.join(", ").dimmed());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_labels_from_top_words() {
        let dictionary = Dictionary::from_documents(&[vec![
            "reef".to_string(),
            "coral".to_string(),
            "ocean".to_string(),
            "galaxy".to_string(),
        ]]);
        let model = GibbsLda::from_topic_word(
            vec![vec![0.4, 0.3, 0.2, 0.1], vec![0.1, 0.1, 0.1, 0.7]],
            0.5,
        )
        .unwrap();

        let summaries = summarize(&model, &dictionary, 3);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].label, "reef / coral / ocean");
        assert_eq!(summaries[1].words[0].0, "galaxy");
    }
}
