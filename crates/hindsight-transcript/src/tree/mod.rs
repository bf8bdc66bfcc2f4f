//! Conversation tree: MAIN / SIDECHAIN / ORPHAN classification over an arena.
//!
//! Entries live in a flat, id-indexed arena; parent links are resolved
//! through a lookup map, never stored as back-references, so malformed
//! input (cycles, dangling parents) cannot corrupt the structure.
//!
//! Rules:
//! - A dangling `parent_id` makes the entry a new root, classified ORPHAN.
//! - `is_sidechain = true` makes the entry SIDECHAIN, and everything beneath
//!   it stays SIDECHAIN even when a descendant's flag disagrees.
//! - Everything else reachable from a root is MAIN.
//! - A parent with two or more non-sidechain children is a branch point.

use std::collections::HashMap;

use hindsight_core::models::{
    AnomalyKind, BranchPoint, Classification, Entry, StructuralAnomaly,
};
use hindsight_observability::events;
use serde::Serialize;
use tracing::warn;

/// Per-classification entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationCounts {
    pub main: usize,
    pub sidechain: usize,
    pub orphan: usize,
}

/// An entry paired with its classification, for serialized output.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEntry<'a> {
    pub classification: Classification,
    #[serde(flatten)]
    pub entry: &'a Entry,
}

/// The classified structure of one transcript. Built fresh per run.
#[derive(Debug, Clone)]
pub struct ConversationTree {
    session_id: String,
    /// Arena, file order, duplicate ids removed.
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    classifications: Vec<Classification>,
    branch_points: Vec<BranchPoint>,
    sidechain_roots: Vec<String>,
    anomalies: Vec<StructuralAnomaly>,
}

impl ConversationTree {
    /// Build the tree for one transcript's entries.
    pub fn build(session_id: &str, entries: Vec<Entry>) -> Self {
        let _span = hindsight_observability::tree_span!(session_id, entries.len()).entered();
        let mut anomalies = Vec::new();

        // Arena: first occurrence of an id wins.
        let mut arena: Vec<Entry> = Vec::with_capacity(entries.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        for entry in entries {
            if index.contains_key(&entry.id) {
                anomalies.push(StructuralAnomaly {
                    entry_id: entry.id.clone(),
                    kind: AnomalyKind::DuplicateId {
                        line_number: entry.line_number,
                    },
                });
                continue;
            }
            index.insert(entry.id.clone(), arena.len());
            arena.push(entry);
        }

        // Adjacency.
        let n = arena.len();
        let mut parents: Vec<Option<usize>> = vec![None; n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots: Vec<usize> = Vec::new();
        let mut dangling = vec![false; n];
        for (idx, entry) in arena.iter().enumerate() {
            match entry.parent_id.as_deref() {
                None => roots.push(idx),
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent_idx) => {
                        parents[idx] = Some(parent_idx);
                        children[parent_idx].push(idx);
                    }
                    None => {
                        anomalies.push(StructuralAnomaly {
                            entry_id: entry.id.clone(),
                            kind: AnomalyKind::MissingParent {
                                parent_id: parent_id.to_string(),
                            },
                        });
                        dangling[idx] = true;
                        roots.push(idx);
                    }
                },
            }
        }

        // Classification walk. Each stack item carries the nearest sidechain ancestor.
        let mut classes: Vec<Option<Classification>> = vec![None; n];
        let mut sidechain_roots = Vec::new();
        for &root in &roots {
            let mut stack: Vec<(usize, Option<usize>)> = vec![(root, None)];
            while let Some((idx, sidechain_ancestor)) = stack.pop() {
                if classes[idx].is_some() {
                    continue;
                }
                let entry = &arena[idx];
                let class = match sidechain_ancestor {
                    Some(ancestor) => {
                        if !entry.is_sidechain {
                            anomalies.push(StructuralAnomaly {
                                entry_id: entry.id.clone(),
                                kind: AnomalyKind::SidechainFlagMismatch {
                                    sidechain_ancestor: arena[ancestor].id.clone(),
                                },
                            });
                        }
                        Classification::Sidechain
                    }
                    None if entry.is_sidechain => {
                        if entry.parent_id.is_none() {
                            sidechain_roots.push(entry.id.clone());
                        }
                        Classification::Sidechain
                    }
                    None if dangling[idx] => Classification::Orphan,
                    None => Classification::Main,
                };
                classes[idx] = Some(class);

                let next_ancestor = match (class, sidechain_ancestor) {
                    (Classification::Sidechain, Some(a)) => Some(a),
                    (Classification::Sidechain, None) => Some(idx),
                    _ => None,
                };
                // Reverse so children pop in file order.
                for &child in children[idx].iter().rev() {
                    stack.push((child, next_ancestor));
                }
            }
        }

        // Anything unvisited hangs off a parent cycle.
        let classifications: Vec<Classification> = classes
            .into_iter()
            .enumerate()
            .map(|(idx, class)| {
                class.unwrap_or_else(|| {
                    anomalies.push(StructuralAnomaly {
                        entry_id: arena[idx].id.clone(),
                        kind: AnomalyKind::Unreachable,
                    });
                    Classification::Orphan
                })
            })
            .collect();

        let branch_points = find_branch_points(&arena, &children);

        for anomaly in &anomalies {
            warn!(
                session_id = %session_id,
                entry_id = %anomaly.entry_id,
                anomaly = ?anomaly.kind,
                "structural anomaly in transcript"
            );
        }

        let tree = Self {
            session_id: session_id.to_string(),
            entries: arena,
            index,
            parents,
            children,
            classifications,
            branch_points,
            sidechain_roots,
            anomalies,
        };
        let counts = tree.counts();
        events::tree_built(
            session_id,
            counts.main,
            counts.sidechain,
            counts.orphan,
            tree.anomalies.len(),
        );
        tree
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Arena entries in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index_of(id).map(|idx| &self.entries[idx])
    }

    pub fn classification(&self, idx: usize) -> Classification {
        self.classifications[idx]
    }

    pub fn classification_of(&self, id: &str) -> Option<Classification> {
        self.index_of(id).map(|idx| self.classifications[idx])
    }

    /// Arena index of the parent, if the parent exists in this transcript.
    pub fn parent_index(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Arena indices of MAIN entries, in file order.
    pub fn main_indices(&self) -> Vec<usize> {
        self.indices_of(Classification::Main)
    }

    /// MAIN entries in file order.
    pub fn main_entries(&self) -> Vec<&Entry> {
        self.main_indices()
            .into_iter()
            .map(|idx| &self.entries[idx])
            .collect()
    }

    fn indices_of(&self, class: Classification) -> Vec<usize> {
        self.classifications
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == class)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn branch_points(&self) -> &[BranchPoint] {
        &self.branch_points
    }

    pub fn sidechain_roots(&self) -> &[String] {
        &self.sidechain_roots
    }

    pub fn anomalies(&self) -> &[StructuralAnomaly] {
        &self.anomalies
    }

    pub fn counts(&self) -> ClassificationCounts {
        let mut counts = ClassificationCounts::default();
        for class in &self.classifications {
            match class {
                Classification::Main => counts.main += 1,
                Classification::Sidechain => counts.sidechain += 1,
                Classification::Orphan => counts.orphan += 1,
            }
        }
        counts
    }

    /// Every entry with its classification, in file order.
    pub fn classified(&self) -> Vec<ClassifiedEntry<'_>> {
        self.entries
            .iter()
            .zip(&self.classifications)
            .map(|(entry, &classification)| ClassifiedEntry {
                classification,
                entry,
            })
            .collect()
    }
}

/// A parent with ≥2 children whose `is_sidechain` is false. Content is not compared.
fn find_branch_points(arena: &[Entry], children: &[Vec<usize>]) -> Vec<BranchPoint> {
    children
        .iter()
        .enumerate()
        .filter_map(|(parent_idx, kids)| {
            let main_kids: Vec<&Entry> = kids
                .iter()
                .map(|&k| &arena[k])
                .filter(|e| !e.is_sidechain)
                .collect();
            if main_kids.len() < 2 {
                return None;
            }
            Some(BranchPoint {
                parent_id: arena[parent_idx].id.clone(),
                child_ids: main_kids.iter().map(|e| e.id.clone()).collect(),
                child_timestamps: main_kids.iter().map(|e| e.timestamp).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::models::{EntryKind, Role};

    fn entry(id: &str, parent: Option<&str>, sidechain: bool) -> Entry {
        Entry {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            kind: EntryKind::UserTurn,
            timestamp: None,
            is_sidechain: sidechain,
            role: Role::User,
            text: String::new(),
            tool_calls: vec![],
            tool_results: vec![],
            internal_reasoning: None,
            line_number: 0,
        }
    }

    #[test]
    fn linear_chain_is_all_main() {
        let tree = ConversationTree::build(
            "s",
            vec![entry("a", None, false), entry("b", Some("a"), false)],
        );
        assert_eq!(tree.counts().main, 2);
        assert!(tree.branch_points().is_empty());
        assert!(tree.anomalies().is_empty());
    }

    #[test]
    fn self_parent_is_unreachable_orphan() {
        let tree = ConversationTree::build("s", vec![entry("loop", Some("loop"), false)]);
        assert_eq!(tree.classification_of("loop"), Some(Classification::Orphan));
        assert_eq!(tree.anomalies()[0].kind, AnomalyKind::Unreachable);
    }

    #[test]
    fn two_node_cycle_is_unreachable() {
        let tree = ConversationTree::build(
            "s",
            vec![entry("x", Some("y"), false), entry("y", Some("x"), false)],
        );
        assert_eq!(tree.counts().orphan, 2);
        assert_eq!(
            tree.anomalies()
                .iter()
                .filter(|a| a.kind == AnomalyKind::Unreachable)
                .count(),
            2
        );
    }

    #[test]
    fn sidechain_entry_under_main_parent_starts_a_sidechain() {
        let tree = ConversationTree::build(
            "s",
            vec![
                entry("a", None, false),
                entry("t", Some("a"), true),
                entry("t1", Some("t"), false),
            ],
        );
        assert_eq!(tree.classification_of("t"), Some(Classification::Sidechain));
        assert_eq!(tree.classification_of("t1"), Some(Classification::Sidechain));
        // Only null-parent sidechain entries are sidechain roots.
        assert!(tree.sidechain_roots().is_empty());
    }

    #[test]
    fn orphan_with_sidechain_flag_stays_sidechain() {
        let tree = ConversationTree::build("s", vec![entry("x", Some("gone"), true)]);
        assert_eq!(tree.classification_of("x"), Some(Classification::Sidechain));
        assert_eq!(tree.anomalies().len(), 1);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = ConversationTree::build("s", vec![]);
        assert!(tree.is_empty());
        assert_eq!(tree.counts(), ClassificationCounts::default());
    }
}
