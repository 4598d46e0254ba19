#![allow(dead_code)]
//! # Common Test Utilities
//!
//! A scripted page that stands in for headless Chrome.

use async_trait::async_trait;
use minutes_browser::{
    errors::BrowserError,
    page::{PageDriver, PageLauncher},
    session::Session,
    snapshot::PageSnapshot,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything the fake page was asked to do.
#[derive(Debug, Default)]
pub struct PageLog {
    pub navigations: Vec<String>,
    pub scrolls: Vec<u32>,
    pub height_reads: usize,
    pub closed: usize,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Default)]
struct Script {
    heights: VecDeque<f64>,
    last_height: f64,
    snapshot: PageSnapshot,
    navigation_error: Option<String>,
}

/// A page whose heights and snapshot are scripted by the test. The last
/// queued height repeats once the queue runs dry.
#[derive(Clone, Default)]
pub struct FakePage {
    script: Arc<Mutex<Script>>,
    pub log: Arc<Mutex<PageLog>>,
}

impl FakePage {
    pub fn new(heights: &[f64], snapshot: PageSnapshot) -> Self {
        let page = Self::default();
        {
            let mut script = page.script.lock().unwrap();
            script.heights = heights.iter().copied().collect();
            script.snapshot = snapshot;
        }
        page
    }

    pub fn failing_navigation(reason: &str) -> Self {
        let page = Self::default();
        page.script.lock().unwrap().navigation_error = Some(reason.to_string());
        page
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, PageLog> {
        self.log.lock().unwrap()
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        match &self.script.lock().unwrap().navigation_error {
            Some(reason) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn document_height(&self) -> Result<f64, BrowserError> {
        self.log.lock().unwrap().height_reads += 1;
        let mut script = self.script.lock().unwrap();
        if let Some(height) = script.heights.pop_front() {
            script.last_height = height;
        }
        Ok(script.last_height)
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), BrowserError> {
        self.log.lock().unwrap().scrolls.push(pixels);
        Ok(())
    }

    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError> {
        Ok(self.script.lock().unwrap().snapshot.clone())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Hands out clones of one [`FakePage`] and counts launches.
#[derive(Clone)]
pub struct FakeLauncher {
    pub page: FakePage,
}

#[async_trait]
impl PageLauncher for FakeLauncher {
    async fn launch(&self, session: &Session) -> Result<Box<dyn PageDriver>, BrowserError> {
        self.page.log.lock().unwrap().sessions.push(session.clone());
        Ok(Box::new(self.page.clone()))
    }
}

pub fn load_snapshot(name: &str) -> PageSnapshot {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("parse {path}: {e}"))
}
