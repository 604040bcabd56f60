//! Chrome DevTools Protocol backend for the [`browser_port::PagePort`]
//! capability interface.
//!
//! [`session::BrowserSession`] owns the launched browser, its event handler
//! task, and one page; [`page::CdpPage`] implements the port by evaluating
//! small self-contained scripts in that page. Control handles are data
//! attributes stamped onto elements during each snapshot, so they stay
//! resolvable without holding remote object references across steps.

pub mod page;
pub mod scripts;
pub mod session;

pub use page::CdpPage;
pub use session::{BrowserSession, SessionConfig, SessionError};
