//! Scroll Loader: scrolls a virtualized page until its height stops growing.

use crate::{errors::BrowserError, page::PageDriver};
use minutes::config::ScrollSettings;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollReport {
    pub scrolls: u32,
    pub final_height: f64,
    /// False when the loop stopped at the scroll cap instead.
    pub stabilized: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollLoader {
    settings: ScrollSettings,
}

impl ScrollLoader {
    pub fn new(settings: ScrollSettings) -> Self {
        Self { settings }
    }

    pub async fn load_all(&self, page: &dyn PageDriver) -> Result<ScrollReport, BrowserError> {
        let mut previous: Option<f64> = None;
        let mut scrolls = 0;

        for _ in 0..self.settings.max_scrolls {
            let height = page.document_height().await?;
            if previous == Some(height) {
                debug!("Page height stable at {height}px after {scrolls} scroll(s)");
                return Ok(ScrollReport {
                    scrolls,
                    final_height: height,
                    stabilized: true,
                });
            }
            previous = Some(height);

            page.scroll_by(self.settings.step_px).await?;
            scrolls += 1;
            tokio::time::sleep(self.settings.wait).await;
        }

        debug!("Scroll cap of {} reached", self.settings.max_scrolls);
        Ok(ScrollReport {
            scrolls,
            final_height: previous.unwrap_or_default(),
            stabilized: false,
        })
    }
}
