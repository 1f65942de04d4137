//! Heuristic wordlist augmentation from target content.

use scraper::Html;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct KeywordFilter {
    pub min_length: usize,
    pub min_frequency: usize,
    pub ignore: HashSet<String>,
}

/// Frequent words from rendered page text, most frequent first. Markup
/// is stripped before counting so tag soup never reaches the wordlist.
pub fn extract_keywords(html: &str, filter: &KeywordFilter) -> Vec<String> {
    let document = Html::parse_document(html);
    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.len() < filter.min_length {
            continue;
        }
        let token = token.to_lowercase();
        if filter.ignore.contains(&token) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut frequent: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= filter.min_frequency)
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequent.into_iter().map(|(word, _)| word).collect()
}

/// Bare domain token for the wordlist: drops a leading `www.` label and
/// the TLD, keeps the registrable name.
pub fn domain_token(hostname: &str) -> Option<String> {
    let labels: Vec<&str> = hostname.split('.').filter(|l| !l.is_empty()).collect();
    let labels = if labels.first() == Some(&"www") {
        &labels[1..]
    } else {
        &labels[..]
    };

    match labels.len() {
        0 => None,
        1 => Some(labels[0].to_lowercase()),
        n => Some(labels[n - 2].to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(min_length: usize, min_frequency: usize, ignore: &[&str]) -> KeywordFilter {
        KeywordFilter {
            min_length,
            min_frequency,
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn frequency_and_length_thresholds() {
        let words = extract_keywords(
            "wordpress wordpress blog security security security",
            &filter(4, 2, &["the", "and"]),
        );
        assert!(words.contains(&"wordpress".to_string()));
        assert!(words.contains(&"security".to_string()));
        assert!(!words.contains(&"blog".to_string()));
        assert!(!words.contains(&"the".to_string()));
        assert!(!words.contains(&"and".to_string()));
    }

    #[test]
    fn most_frequent_words_come_first() {
        let words = extract_keywords(
            "alpha alpha beta beta beta alpha alpha gamma gamma",
            &filter(4, 2, &[]),
        );
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn markup_is_stripped_before_counting() {
        let words = extract_keywords(
            "<html><body><p class=\"entry\">kittens kittens</p></body></html>",
            &filter(4, 2, &[]),
        );
        assert_eq!(words, vec!["kittens"]);
        assert!(!words.contains(&"entry".to_string()));
    }

    #[test]
    fn ignored_words_are_dropped_case_insensitively() {
        let words = extract_keywords("Admin admin ADMIN", &filter(4, 2, &["admin"]));
        assert!(words.is_empty());
    }

    #[test]
    fn domain_tokens() {
        assert_eq!(domain_token("www.example.com"), Some("example".to_string()));
        assert_eq!(domain_token("blog.example.com"), Some("example".to_string()));
        assert_eq!(domain_token("example.org"), Some("example".to_string()));
        assert_eq!(domain_token("localhost"), Some("localhost".to_string()));
        assert_eq!(domain_token(""), None);
    }
}
