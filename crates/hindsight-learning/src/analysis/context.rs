//! Assistant context preceding a feedback turn.

use hindsight_core::models::Classification;
use hindsight_transcript::ConversationTree;
use serde::Serialize;

/// Assistant entries a feedback turn responds to, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextWindow {
    pub ids: Vec<String>,
    /// Tool names called by those entries, in call order.
    pub tools: Vec<String>,
}

impl ContextWindow {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn shares_entry_with(&self, other: &ContextWindow) -> bool {
        self.ids.iter().any(|id| other.ids.contains(id))
    }
}

/// Walk up to `window` MAIN ancestors of the entry at `idx` and keep the
/// assistant turns among them.
///
/// The walk follows parent links, not file order, so sibling retry branches
/// never see each other. It stops early at a root or at the first ancestor
/// that is not MAIN.
pub fn collect_context(tree: &ConversationTree, idx: usize, window: usize) -> ContextWindow {
    let entries = tree.entries();
    let mut picked = Vec::new();
    let mut cursor = tree.parent_index(idx);
    let mut steps = 0;

    while let Some(parent) = cursor {
        if steps == window || tree.classification(parent) != Classification::Main {
            break;
        }
        if entries[parent].is_assistant_turn() {
            picked.push(parent);
        }
        steps += 1;
        cursor = tree.parent_index(parent);
    }

    picked.reverse();
    ContextWindow {
        ids: picked.iter().map(|&i| entries[i].id.clone()).collect(),
        tools: picked
            .iter()
            .flat_map(|&i| entries[i].tool_calls.iter().map(|call| call.name.clone()))
            .collect(),
    }
}
