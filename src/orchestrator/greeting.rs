use std::collections::HashSet;

/// Matches queries that contain a greeting word.
///
/// The query is lowercased and split on whitespace; a greeting is detected when any
/// single token equals a configured word. Entries containing whitespace (e.g. `xin chào`)
/// can therefore never match on their own.
#[derive(Debug, Clone)]
pub struct GreetingDetector {
    words: HashSet<String>,
    response: String,
}

impl GreetingDetector {
    pub fn new<I, S>(words: I, response: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            response: response.into(),
        }
    }

    pub fn is_greeting(&self, query: &str) -> bool {
        query
            .to_lowercase()
            .split_whitespace()
            .any(|token| self.words.contains(token))
    }

    /// The canned reply when `query` is a greeting.
    pub fn reply(&self, query: &str) -> Option<&str> {
        self.is_greeting(query).then_some(self.response.as_str())
    }
}
