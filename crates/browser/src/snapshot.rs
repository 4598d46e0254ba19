//! A serializable view of the rendered page, taken in one script evaluation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Every element carrying a block id, in document order.
    #[serde(default)]
    pub blocks: Vec<SnapshotBlock>,
    /// Elements without element children that carry text, in document order.
    #[serde(default)]
    pub leaves: Vec<SnapshotLeaf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotBlock {
    pub id: String,
    /// `data-block-type`, falling back to the element's class list.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLeaf {
    pub text: String,
    #[serde(default)]
    pub block_id: Option<String>,
}

impl PageSnapshot {
    pub fn block(&self, id: &str) -> Option<&SnapshotBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

pub const SNAPSHOT_SCRIPT: &str = r#"(() => {
  const textOf = (el) => (el.innerText || el.textContent || '').trim();
  const blockIdOf = (el) => {
    const block = el.closest('[data-block-id]');
    return block ? block.getAttribute('data-block-id') : null;
  };
  const blocks = Array.from(document.querySelectorAll('[data-block-id]')).map((el) => {
    const parent = el.parentElement ? el.parentElement.closest('[data-block-id]') : null;
    return {
      id: el.getAttribute('data-block-id') || '',
      kind: el.getAttribute('data-block-type') || String(el.className || ''),
      parentId: parent ? parent.getAttribute('data-block-id') : null,
      text: textOf(el),
    };
  });
  const leaves = [];
  const root = document.querySelector('.notion-page-content') || document.body;
  for (const el of root.querySelectorAll('*')) {
    if (el.children.length > 0) continue;
    const text = textOf(el);
    if (text) leaves.push({ text, blockId: blockIdOf(el) });
  }
  return { blocks, leaves };
})()"#;
