//! applyflow: automated job discovery and quick-apply form navigation.
//!
//! The crate is organised as a workspace. The form navigation engine lives
//! in `apply-flow` behind the `browser-port` capability interface, with
//! `cdp-page` as the production Chrome DevTools Protocol backend and
//! `answer-resolver` supplying field answers. This root crate holds the
//! operator-facing surface: configuration and candidate profile, listing
//! sources, cover-letter rendering, the CSV application tracker, and the
//! batch driver wired together by the `applyflow` binary.

pub mod batch;
pub mod config;
pub mod cover;
pub mod draft;
pub mod search;
pub mod sources;
pub mod tracker;

pub use config::{Config, Profile};
pub use tracker::Tracker;
