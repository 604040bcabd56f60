//! The two-tier resolver: ordered rules first, generative fallback second.

use std::sync::Arc;

use browser_port::ControlKind;
use tracing::debug;

use crate::cache::AnswerCache;
use crate::completer::TextCompleter;
use crate::rules::RuleTable;

/// Generated answers are clipped before being written into a field.
pub const MAX_GENERATED_ANSWER_LEN: usize = 2000;

/// Labels this short are noise (icons, stray asterisks), not questions.
const MIN_FALLBACK_LABEL_LEN: usize = 4;

/// Static facts about the candidate, rendered into every fallback prompt.
#[derive(Clone, Debug, Default)]
pub struct CandidateFacts {
    /// Candidate's full name.
    pub name: String,
    /// One-line description of the roles being applied for.
    pub role_summary: String,
    /// Bullet facts: education, experience, skills, constraints.
    pub facts: Vec<String>,
}

impl CandidateFacts {
    fn prompt_for(&self, question: &str) -> String {
        let mut prompt = format!(
            "You are filling out a job application form for {} applying for {}.\n\n\
             Form question: \"{}\"\n\n\
             Candidate facts:\n",
            self.name, self.role_summary, question
        );
        for fact in &self.facts {
            prompt.push_str("- ");
            prompt.push_str(fact);
            prompt.push('\n');
        }
        prompt.push_str(
            "\nReply with ONLY the answer (1-3 sentences, first person, professional). \
             No preamble.",
        );
        prompt
    }
}

/// Maps field labels to answer values.
///
/// The completer is optional; without one the resolver degrades to pure rule
/// lookup. Completer failures are logged and swallowed, so a flaky endpoint
/// never fails an application attempt.
pub struct AnswerResolver {
    rules: RuleTable,
    cache: AnswerCache,
    completer: Option<Arc<dyn TextCompleter>>,
    facts: CandidateFacts,
}

impl AnswerResolver {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            cache: AnswerCache::new(),
            completer: None,
            facts: CandidateFacts::default(),
        }
    }

    pub fn with_completer(mut self, completer: Arc<dyn TextCompleter>) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn with_facts(mut self, facts: CandidateFacts) -> Self {
        self.facts = facts;
        self
    }

    /// First-match-wins rule lookup on its own, used for radio-group labels
    /// where the generative fallback does not apply.
    pub fn lookup_rule(&self, label: &str) -> Option<&str> {
        self.rules.lookup(label)
    }

    /// Resolve a label to an answer value, or `None` to leave the field
    /// unfilled.
    pub async fn resolve(&self, label: &str, kind: ControlKind) -> Option<String> {
        if let Some(value) = self.rules.lookup(label) {
            return Some(value.to_string());
        }

        if !kind.is_textual() {
            return None;
        }
        let question = label.trim();
        if question.chars().count() < MIN_FALLBACK_LABEL_LEN {
            return None;
        }
        let completer = self.completer.as_ref()?;

        if let Some(answer) = self.cache.get(question) {
            return Some(answer);
        }

        match completer.complete(&self.facts.prompt_for(question)).await {
            Ok(answer) => {
                let answer = clip(answer.trim(), MAX_GENERATED_ANSWER_LEN);
                self.cache.put(question, answer.clone());
                Some(answer)
            }
            Err(err) => {
                debug!(target: "resolver", question, error = %err, "generative fallback failed");
                None
            }
        }
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completer::{FailingCompleter, MockCompleter};

    fn table() -> RuleTable {
        RuleTable::new()
            .with_rule("require sponsorship", "Yes")
            .with_rule("sponsorship", "Yes")
            .with_rule("notice period", "30 days")
            .with_rule("phone", "+44 7000 000000")
    }

    #[tokio::test]
    async fn rule_match_bypasses_the_completer() {
        let completer = Arc::new(MockCompleter::new("generated"));
        let resolver = AnswerResolver::new(table()).with_completer(completer.clone());

        let answer = resolver
            .resolve("What is your notice period?", ControlKind::Text)
            .await;
        assert_eq!(answer.as_deref(), Some("30 days"));
        assert_eq!(completer.call_count(), 0);
    }

    #[tokio::test]
    async fn fallback_is_cached_per_question_text() {
        let completer = Arc::new(MockCompleter::new("I led the ML pipeline work."));
        let resolver = AnswerResolver::new(table()).with_completer(completer.clone());

        let question = "Describe a project you are proud of";
        let first = resolver.resolve(question, ControlKind::Textarea).await;
        let second = resolver.resolve(question, ControlKind::Textarea).await;

        assert_eq!(first, second);
        assert_eq!(completer.call_count(), 1);
    }

    #[tokio::test]
    async fn fallback_skips_non_textual_and_short_labels() {
        let completer = Arc::new(MockCompleter::new("generated"));
        let resolver = AnswerResolver::new(RuleTable::new()).with_completer(completer.clone());

        assert!(resolver
            .resolve("Describe yourself", ControlKind::Select)
            .await
            .is_none());
        assert!(resolver.resolve(" ok ", ControlKind::Text).await.is_none());
        assert_eq!(completer.call_count(), 0);
    }

    #[tokio::test]
    async fn completer_failure_resolves_to_none() {
        let resolver =
            AnswerResolver::new(RuleTable::new()).with_completer(Arc::new(FailingCompleter));
        assert!(resolver
            .resolve("Why do you want this role?", ControlKind::Textarea)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn no_completer_means_rules_only() {
        let resolver = AnswerResolver::new(table());
        assert!(resolver
            .resolve("Why do you want this role?", ControlKind::Textarea)
            .await
            .is_none());
        assert_eq!(
            resolver.resolve("Mobile phone number", ControlKind::Text).await.as_deref(),
            Some("+44 7000 000000")
        );
    }

    #[test]
    fn prompt_carries_question_and_facts() {
        let facts = CandidateFacts {
            name: "A. Candidate".into(),
            role_summary: "a junior software engineering role".into(),
            facts: vec!["1 year experience, 30-day notice".into()],
        };
        let prompt = facts.prompt_for("Why us?");
        assert!(prompt.contains("Form question: \"Why us?\""));
        assert!(prompt.contains("- 1 year experience, 30-day notice"));
        assert!(prompt.contains("No preamble"));
    }
}
