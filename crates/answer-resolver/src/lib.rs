//! Answer resolution for unknown application-form questions.
//!
//! Resolution is two-tier: an ordered rule table of static candidate facts is
//! consulted first (first matching key wins), and open-ended text questions
//! fall back to a generative completion service, cached per question text for
//! the lifetime of the run. A question neither tier can answer resolves to
//! `None`, which callers treat as "leave the field unfilled", never as an
//! error.

pub mod cache;
pub mod completer;
pub mod errors;
pub mod matching;
pub mod resolver;
pub mod rules;

pub use cache::AnswerCache;
pub use completer::{FailingCompleter, GeminiCompleter, GeminiConfig, MockCompleter, TextCompleter};
pub use errors::CompleterError;
pub use matching::{first_non_empty, pick_option, pick_radio, truthy};
pub use resolver::{AnswerResolver, CandidateFacts, MAX_GENERATED_ANSWER_LEN};
pub use rules::{AnswerRule, RuleTable};
