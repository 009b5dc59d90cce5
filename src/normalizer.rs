//! Offline keyword normalization.
//!
//! Hebrew queries are rewritten to English with a longest-match-first substitution over
//! a fixed term table. Queries without Hebrew characters pass through untouched.
//!
//! Flow:
//! 1. Strip `.,!?;:"'`
//! 2. Replace every literal occurrence of each table key, longest key first
//! 3. Split on whitespace and drop tokens that still contain Hebrew
//! 4. Join the survivors, or return the original input if none survive

use std::sync::LazyLock;

use regex::Regex;

use crate::terms::TermTable;

static HEBREW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{0590}-\u{05FF}]").expect("valid Hebrew range pattern"));

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,!?;:"']"#).expect("valid punctuation pattern"));

/// Returns true if `text` contains at least one character in the Hebrew block.
pub fn contains_hebrew(text: &str) -> bool {
    HEBREW.is_match(text)
}

/// Result of the dictionary stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The query to forward.
    pub query: String,
    /// Number of tokens dropped because they were still Hebrew after substitution.
    pub untranslated: usize,
}

impl Normalized {
    /// True if the dictionary left Hebrew tokens behind.
    pub fn is_partial(&self) -> bool {
        self.untranslated > 0
    }
}

/// Dictionary-driven Hebrew → English normalizer.
#[derive(Debug, Clone)]
pub struct KeywordNormalizer {
    /// Table entries sorted by key length (in chars) descending, then by key.
    terms: Vec<(String, String)>,
}

impl KeywordNormalizer {
    pub fn new(table: &TermTable) -> Self {
        let mut terms: Vec<(String, String)> = table
            .iter()
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        terms.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        Self { terms }
    }

    /// Normalize `input`, returning only the query string.
    pub fn normalize(&self, input: &str) -> String {
        self.normalize_detailed(input).query
    }

    /// Normalize `input` and report how many tokens were left untranslated.
    pub fn normalize_detailed(&self, input: &str) -> Normalized {
        if !contains_hebrew(input) {
            return Normalized {
                query: input.to_string(),
                untranslated: 0,
            };
        }

        let mut working = PUNCTUATION.replace_all(input, "").into_owned();
        for (source, target) in &self.terms {
            // str::replace matches literally, so keys need no escaping.
            if working.contains(source.as_str()) {
                working = working.replace(source.as_str(), target);
            }
        }

        let mut untranslated = 0;
        let tokens: Vec<&str> = working
            .split_whitespace()
            .filter(|token| {
                if contains_hebrew(token) {
                    untranslated += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        if tokens.is_empty() {
            tracing::debug!("No translatable keywords in {:?}, using original query", input);
            return Normalized {
                query: input.to_string(),
                untranslated,
            };
        }

        let query = tokens.join(" ");
        tracing::debug!("Normalized {:?} to {:?}", input, query);
        Normalized {
            query,
            untranslated,
        }
    }
}

impl Default for KeywordNormalizer {
    fn default() -> Self {
        Self::new(&TermTable::search_terms())
    }
}
