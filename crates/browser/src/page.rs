//! The seam between extraction logic and a real browser.

use crate::{errors::BrowserError, session::Session, snapshot::PageSnapshot};
use async_trait::async_trait;
use std::time::Duration;

/// One open browser tab.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// The rendered document's scroll height in pixels.
    async fn document_height(&self) -> Result<f64, BrowserError>;

    async fn scroll_by(&self, pixels: u32) -> Result<(), BrowserError>;

    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError>;

    /// Releases the tab and its browser process.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// Opens an authenticated tab.
#[async_trait]
pub trait PageLauncher: Send + Sync {
    async fn launch(&self, session: &Session) -> Result<Box<dyn PageDriver>, BrowserError>;
}
