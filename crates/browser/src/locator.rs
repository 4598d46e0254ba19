//! # Content Locator
//!
//! Finds the meeting-notes content in a [`PageSnapshot`]. Strategies are tried
//! in order and the first non-empty result wins, so a strategy broken by a UI
//! change degrades to the next one instead of failing the whole extraction.

use crate::snapshot::{PageSnapshot, SnapshotBlock};
use minutes::markers;
use tracing::{debug, warn};

/// Blocks collected after a marker match by [`SiblingAggregationStrategy`].
pub const SIBLING_WINDOW: usize = 10;

/// Characters a marker match must carry beyond the marker keywords themselves.
pub const MIN_SECTION_BODY: usize = 20;

const TYPED_BLOCK_HINTS: &[&str] = &["meeting-notes", "meeting_notes", "transcription"];

pub trait ContentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, snapshot: &PageSnapshot) -> Option<String>;

    /// Whether a hit from this strategy may include unrelated content.
    fn is_degraded(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedContent {
    pub text: String,
    pub strategy: &'static str,
    pub degraded: bool,
}

/// Looks for the marker text itself.
///
/// A block typed as meeting notes or transcription wins outright (the last one,
/// being the most recent meeting). Otherwise the last rendered text node that
/// contains a marker is resolved to its enclosing block, or used as-is when it
/// has none. A bare marker heading is not a hit, so the sibling window can
/// pick up the notes that follow it.
#[derive(Debug, Default)]
pub struct MarkerTextStrategy;

impl ContentStrategy for MarkerTextStrategy {
    fn name(&self) -> &'static str {
        "marker-text"
    }

    fn locate(&self, snapshot: &PageSnapshot) -> Option<String> {
        let typed = snapshot
            .blocks
            .iter()
            .rev()
            .find(|b| is_meeting_block(b) && !b.text.is_empty());
        if let Some(block) = typed {
            return Some(block.text.clone());
        }

        let leaf = snapshot
            .leaves
            .iter()
            .rev()
            .find(|leaf| markers::has_any_marker(&leaf.text))?;

        let from_block = leaf
            .block_id
            .as_deref()
            .and_then(|id| snapshot.block(id))
            .map(|b| b.text.clone())
            .filter(|t| !t.is_empty());
        let text = from_block.unwrap_or_else(|| leaf.text.clone());
        has_body(&text).then_some(text)
    }
}

fn has_body(text: &str) -> bool {
    markers::strip_markers(text).chars().count() >= MIN_SECTION_BODY
}

fn is_meeting_block(block: &SnapshotBlock) -> bool {
    let kind = block.kind.to_lowercase();
    TYPED_BLOCK_HINTS.iter().any(|hint| kind.contains(hint))
}

/// Finds the last block whose text has a marker and appends the text of up to
/// `window` following blocks that share its parent.
#[derive(Debug)]
pub struct SiblingAggregationStrategy {
    pub window: usize,
}

impl Default for SiblingAggregationStrategy {
    fn default() -> Self {
        Self {
            window: SIBLING_WINDOW,
        }
    }
}

impl ContentStrategy for SiblingAggregationStrategy {
    fn name(&self) -> &'static str {
        "sibling-aggregation"
    }

    fn locate(&self, snapshot: &PageSnapshot) -> Option<String> {
        let (index, anchor) = snapshot
            .blocks
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| markers::has_any_marker(&b.text))?;

        let mut parts = vec![anchor.text.as_str()];
        parts.extend(
            snapshot.blocks[index + 1..]
                .iter()
                .filter(|b| b.parent_id == anchor.parent_id && !b.text.is_empty())
                .take(self.window)
                .map(|b| b.text.as_str()),
        );
        Some(parts.join("\n\n"))
    }
}

/// Joins the text of every top-level block on the page.
#[derive(Debug, Default)]
pub struct WholePageStrategy;

impl ContentStrategy for WholePageStrategy {
    fn name(&self) -> &'static str {
        "whole-page"
    }

    fn locate(&self, snapshot: &PageSnapshot) -> Option<String> {
        let has_roots = snapshot.blocks.iter().any(|b| b.parent_id.is_none());
        let text = snapshot
            .blocks
            .iter()
            .filter(|b| !has_roots || b.parent_id.is_none())
            .map(|b| b.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        (!text.is_empty()).then_some(text)
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

pub struct ContentLocator {
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MarkerTextStrategy),
            Box::new(SiblingAggregationStrategy::default()),
            Box::new(WholePageStrategy),
        ])
    }
}

impl ContentLocator {
    pub fn new(strategies: Vec<Box<dyn ContentStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn locate(&self, snapshot: &PageSnapshot) -> Option<LocatedContent> {
        for strategy in &self.strategies {
            let Some(text) = strategy.locate(snapshot).filter(|t| !t.trim().is_empty()) else {
                debug!("Strategy '{}' found nothing", strategy.name());
                continue;
            };

            if strategy.is_degraded() {
                warn!(
                    "Falling back to '{}': result may include unrelated page content",
                    strategy.name()
                );
            } else {
                debug!("Strategy '{}' located {} chars", strategy.name(), text.len());
            }
            return Some(LocatedContent {
                text: text.trim().to_string(),
                strategy: strategy.name(),
                degraded: strategy.is_degraded(),
            });
        }
        None
    }
}
