//! Capability interface between the apply engine and a scriptable browser
//! page.
//!
//! The engine never touches a markup dialect directly; it drives whatever
//! implements [`PagePort`]. The production implementation lives in the
//! `cdp-page` crate; [`scripted::ScriptedPage`] is a deterministic in-memory
//! implementation for tests and offline development.

pub mod errors;
pub mod model;
pub mod ports;
pub mod scripted;

pub use errors::PortError;
pub use model::{
    ControlKind, ControlRef, FieldGroup, FormControl, FormField, NavAction, NavKind,
    NavVocabulary, RadioOption,
};
pub use ports::PagePort;
pub use scripted::{ScriptedPage, ScriptedStep};
