//! Run-scoped cache of generative answers.

use std::collections::HashMap;
use std::sync::Mutex;

/// Maps exact question text to a previously generated answer.
///
/// Scoped to one batch run: created at process start, never persisted. It
/// grows with the number of distinct open-ended questions seen, which is
/// small in practice.
#[derive(Debug, Default)]
pub struct AnswerCache {
    entries: Mutex<HashMap<String, String>>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(question).cloned())
    }

    pub fn put(&self, question: impl Into<String>, answer: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(question.into(), answer.into());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
