//! Ordered first-match-wins answer rules.

use serde::{Deserialize, Serialize};

/// One static answer: a lowercase substring pattern and the value to use
/// whenever a field label contains it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerRule {
    pub key: String,
    pub value: String,
}

impl AnswerRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into().to_lowercase(),
            value: value.into(),
        }
    }
}

/// Ordered rule table. Order is load-bearing: when several keys are
/// substrings of the same label, the earliest rule wins, so more specific
/// keys must be registered before more generic ones.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<AnswerRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rules: pairs
                .into_iter()
                .map(|(key, value)| AnswerRule::new(key, value))
                .collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.rules.push(AnswerRule::new(key, value));
    }

    pub fn with_rule(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose key is a substring of the lowercased, trimmed label.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| label.contains(&rule.key))
            .map(|rule| rule.value.as_str())
    }
}
