use std::sync::LazyLock;

use regex::Regex;

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\S+").unwrap());

/// Outcome of classifying one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Relevant { term: String },
    HashtagSpam { hashes: usize, tokens: usize },
    NoMatch,
}

impl Verdict {
    pub fn is_relevant(&self) -> bool {
        matches!(self, Verdict::Relevant { .. })
    }
}

/// Keyword classifier with a hashtag-spam guard.
///
/// Terms are matched as plain substrings of the text after hashtags are
/// removed, so short terms also hit inside longer words ("sre" in
/// "misread"). That false-positive source is accepted.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    vocabulary: Vec<String>,
    hashtag_threshold: usize,
    token_threshold: usize,
}

impl RelevanceClassifier {
    pub fn new(vocabulary: &[String], hashtag_threshold: usize, token_threshold: usize) -> Self {
        let mut terms: Vec<String> = Vec::with_capacity(vocabulary.len());
        for term in vocabulary {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self {
            vocabulary: terms,
            hashtag_threshold,
            token_threshold,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn classify(&self, text: &str) -> Verdict {
        let lower = text.to_lowercase();

        // Mostly a hashtag list with little prose around it.
        let hashes = lower.matches('#').count();
        let tokens = lower.split_whitespace().count();
        if hashes > self.hashtag_threshold && tokens < self.token_threshold {
            return Verdict::HashtagSpam { hashes, tokens };
        }

        let cleaned = strip_hashtags(&lower);
        self.vocabulary
            .iter()
            .find(|term| cleaned.contains(term.as_str()))
            .map(|term| Verdict::Relevant { term: term.clone() })
            .unwrap_or(Verdict::NoMatch)
    }

    pub fn is_relevant(&self, text: &str) -> bool {
        self.classify(text).is_relevant()
    }
}

/// Remove `#tag` tokens, leaving the surrounding whitespace.
pub fn strip_hashtags(text: &str) -> String {
    HASHTAG_RE.replace_all(text, "").into_owned()
}

// ── Tests ──
