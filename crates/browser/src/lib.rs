//! # Browser Fallback Tier
//!
//! Renders a document in headless Chrome and pulls the meeting notes out of the
//! live page. The browser itself sits behind [`PageLauncher`] and
//! [`PageDriver`] so the scrolling and locating logic can run against a
//! scripted page.

pub mod chrome;
pub mod errors;
pub mod extractor;
pub mod locator;
pub mod page;
pub mod scroll;
pub mod session;
pub mod snapshot;

pub use chrome::ChromeLauncher;
pub use errors::BrowserError;
pub use extractor::BrowserExtractor;
pub use locator::{ContentLocator, ContentStrategy, LocatedContent};
pub use page::{PageDriver, PageLauncher};
pub use scroll::{ScrollLoader, ScrollReport};
pub use session::{Session, SessionSource};
pub use snapshot::PageSnapshot;
