//! Button-label vocabularies for entry detection and step navigation.
//!
//! Matching is case-insensitive on accessible label or visible text. Order
//! within each list matters: more specific labels come first so that a
//! button labelled "Continue to next step" is not shadowed by "Continue".

use browser_port::NavVocabulary;

/// Labels that unambiguously mark the in-page application entry point.
pub const ENTRY_VOCAB: &[&str] = &["easy apply", "quick apply"];

pub const SUBMIT_VOCAB: &[&str] = &["submit application", "submit"];

pub const REVIEW_VOCAB: &[&str] = &["review your application", "review"];

pub const NEXT_VOCAB: &[&str] = &["continue to next step", "next step", "next", "continue"];

/// Labels the last-resort button fallback must never click.
pub const EXCLUDE_VOCAB: &[&str] = &["back", "close", "cancel", "dismiss", "discard", "exit"];

/// The full navigation vocabulary, priority submit > review > next.
pub const QUICK_APPLY_NAV: NavVocabulary = NavVocabulary {
    submit: SUBMIT_VOCAB,
    review: REVIEW_VOCAB,
    next: NEXT_VOCAB,
    exclude: EXCLUDE_VOCAB,
};
