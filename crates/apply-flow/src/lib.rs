//! The application form navigation engine.
//!
//! One call to [`ApplyEngine::run`] takes an already-authenticated page, a
//! job URL, and attempt parameters, and drives the posting's multi-step
//! quick-apply form to exactly one terminal [`Outcome`]. The form's field
//! count, step count, labels, and control types are unknown in advance; the
//! engine is a best-effort state machine that must never panic past its own
//! boundary and never hang, so every wait is bounded and every fault is
//! classified at the attempt boundary.
//!
//! [`Outcome`]: applyflow_core_types::Outcome

pub mod errors;
pub mod executor;
pub mod log;
pub mod types;
pub mod vocab;

pub use errors::AttemptError;
pub use executor::{ApplyEngine, EngineTiming};
pub use log::AttemptLog;
pub use types::{AttemptSpec, COVER_LETTER_MAX_LEN, DEFAULT_MAX_STEPS};
pub use vocab::{ENTRY_VOCAB, QUICK_APPLY_NAV};
