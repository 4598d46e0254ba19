//! # Scroll Loader Tests
//!
//! Time is paused so the waits between scrolls cost nothing.

mod common;

use common::FakePage;
use minutes::config::ScrollSettings;
use minutes_browser::{scroll::ScrollLoader, snapshot::PageSnapshot};
use std::time::Duration;
use tokio::time::Instant;

fn settings(max_scrolls: u32) -> ScrollSettings {
    ScrollSettings {
        max_scrolls,
        step_px: 800,
        wait: Duration::from_millis(500),
    }
}

#[tokio::test(start_paused = true)]
async fn test_stops_when_height_stabilizes() {
    // --- 1. Arrange ---
    let page = FakePage::new(&[1000.0, 1800.0, 2400.0, 2400.0], PageSnapshot::default());
    let loader = ScrollLoader::new(settings(20));
    let start = Instant::now();

    // --- 2. Act ---
    let report = loader.load_all(&page).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(report.scrolls, 3);
    assert_eq!(report.final_height, 2400.0);
    assert!(report.stabilized);
    assert_eq!(page.log().scrolls, vec![800, 800, 800]);
    assert_eq!(page.log().height_reads, 4);
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_stops_at_the_scroll_cap() {
    let page = FakePage::new(&[100.0, 200.0, 300.0, 400.0, 500.0], PageSnapshot::default());
    let loader = ScrollLoader::new(settings(3));

    let report = loader.load_all(&page).await.unwrap();

    assert_eq!(report.scrolls, 3);
    assert_eq!(report.final_height, 300.0);
    assert!(!report.stabilized);
    assert_eq!(page.log().height_reads, 3);
}

#[tokio::test(start_paused = true)]
async fn test_short_page_scrolls_once() {
    let page = FakePage::new(&[900.0], PageSnapshot::default());

    let report = ScrollLoader::new(settings(20)).load_all(&page).await.unwrap();

    assert_eq!(report.scrolls, 1);
    assert!(report.stabilized);
}

#[tokio::test(start_paused = true)]
async fn test_zero_cap_never_scrolls() {
    let page = FakePage::new(&[900.0], PageSnapshot::default());

    let report = ScrollLoader::new(settings(0)).load_all(&page).await.unwrap();

    assert_eq!(report.scrolls, 0);
    assert!(!report.stabilized);
    assert!(page.log().scrolls.is_empty());
}
