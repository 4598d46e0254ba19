//! Headless Chrome over the DevTools protocol.

use crate::{
    errors::BrowserError,
    page::{PageDriver, PageLauncher},
    session::Session,
    snapshot::{PageSnapshot, SNAPSHOT_SCRIPT},
};
use async_trait::async_trait;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    cdp::browser_protocol::network::CookieParam,
    cdp::js_protocol::runtime::EvaluateParams,
    Page,
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

const WINDOW_WIDTH: u32 = 1920;
const WINDOW_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    /// Extra command-line switches, e.g. `--no-sandbox` in containers.
    pub args: Vec<String>,
}

#[async_trait]
impl PageLauncher for ChromeLauncher {
    async fn launch(&self, session: &Session) -> Result<Box<dyn PageDriver>, BrowserError> {
        let config = BrowserConfig::builder()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .args(self.args.iter().map(String::as_str))
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        info!("Launched headless Chrome");

        let chrome = ChromePage {
            browser: Mutex::new(Some(browser)),
            page: None,
            handler_task,
        };
        chrome.open_tab(session).await
    }
}

pub struct ChromePage {
    browser: Mutex<Option<Browser>>,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

impl ChromePage {
    async fn open_tab(mut self, session: &Session) -> Result<Box<dyn PageDriver>, BrowserError> {
        let opened = {
            let guard = self.browser.lock().await;
            match guard.as_ref() {
                Some(browser) => browser.new_page("about:blank").await.map_err(BrowserError::from),
                None => Err(BrowserError::Launch("browser already closed".to_string())),
            }
        };
        let page = match opened {
            Ok(page) => page,
            Err(e) => {
                let _ = self.close().await;
                return Err(e);
            }
        };

        if let Err(e) = set_cookies(&page, session).await {
            let _ = self.close().await;
            return Err(e);
        }

        self.page = Some(page);
        Ok(Box::new(self))
    }

    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Launch("no open tab".to_string()))
    }

    async fn eval<T: DeserializeOwned>(&self, expression: &str) -> Result<T, BrowserError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .build()
            .map_err(BrowserError::Script)?;
        self.page()?
            .evaluate_expression(params)
            .await?
            .into_value::<T>()
            .map_err(|e| BrowserError::Script(e.to_string()))
    }
}

async fn set_cookies(page: &Page, session: &Session) -> Result<(), BrowserError> {
    let mut cookies = Vec::with_capacity(session.cookies.len());
    for cookie in &session.cookies {
        let param = CookieParam::builder()
            .name(cookie.name.clone())
            .value(cookie.value.clone())
            .domain(cookie.domain.clone())
            .path(cookie.path.clone())
            .secure(cookie.secure)
            .http_only(cookie.http_only)
            .build()
            .map_err(BrowserError::Launch)?;
        cookies.push(param);
    }
    page.set_cookies(cookies).await?;
    debug!("Installed {} session cookie(s)", session.cookies.len());
    Ok(())
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn document_height(&self) -> Result<f64, BrowserError> {
        self.eval("document.body ? document.body.scrollHeight : 0")
            .await
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), BrowserError> {
        self.eval::<serde_json::Value>(&format!("window.scrollBy(0, {pixels}); true"))
            .await
            .map(|_| ())
    }

    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError> {
        self.eval(SNAPSHOT_SCRIPT).await
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("Chrome did not exit cleanly: {e}");
        }
        self.handler_task.abort();
        closed.map(|_| ()).map_err(BrowserError::from)
    }
}
