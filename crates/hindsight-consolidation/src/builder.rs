//! ClusterBuilder: one per analysis run, fed events in chronological order.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use hindsight_core::config::ClusteringConfig;
use hindsight_core::models::{CorrectionCategory, CorrectionEvent, PatternCluster};
use hindsight_observability::events;
use serde::Serialize;
use tracing::debug;

use crate::algorithms::{jaccard, token_set};

/// What happened to one pushed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClusterAssignment {
    Seeded { cluster_id: String },
    Attached { cluster_id: String, similarity: f64 },
}

/// Result of a clustering pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterOutput {
    /// Clusters that reached the repetition threshold, in seed order.
    pub promoted: Vec<PatternCluster>,
    /// Members of every cluster that was not promoted, in seed order.
    pub residual: Vec<CorrectionEvent>,
    /// Open clusters at the end of the pass, promoted or not.
    pub clusters_total: usize,
}

#[derive(Debug)]
struct OpenCluster {
    id: String,
    category: CorrectionCategory,
    representative: String,
    representative_score: f64,
    representative_tokens: BTreeSet<String>,
    members: Vec<CorrectionEvent>,
    aggregate_frustration: f64,
    sessions: BTreeSet<String>,
    first_seen: Option<DateTime<Utc>>,
    last_seen: Option<DateTime<Utc>>,
}

impl OpenCluster {
    fn seed(event: CorrectionEvent, tokens: BTreeSet<String>) -> Self {
        let hash = blake3::hash(event.id.as_bytes()).to_hex();
        Self {
            id: format!("pattern-{}", &hash.as_str()[..16]),
            category: event.category,
            representative: event.text.clone(),
            representative_score: event.frustration_score,
            representative_tokens: tokens,
            aggregate_frustration: event.frustration_score,
            sessions: BTreeSet::from([event.session_id.clone()]),
            first_seen: event.timestamp,
            last_seen: event.timestamp,
            members: vec![event],
        }
    }

    fn attach(&mut self, event: CorrectionEvent, tokens: BTreeSet<String>) {
        // Strictly higher only: ties keep the earlier representative.
        if event.frustration_score > self.representative_score {
            self.representative = event.text.clone();
            self.representative_score = event.frustration_score;
            self.representative_tokens = tokens;
        }
        self.aggregate_frustration = self.aggregate_frustration.max(event.frustration_score);
        self.sessions.insert(event.session_id.clone());
        self.first_seen = min_time(self.first_seen, event.timestamp);
        self.last_seen = self.last_seen.max(event.timestamp);
        self.members.push(event);
    }

    fn into_pattern(self) -> PatternCluster {
        PatternCluster {
            id: self.id,
            representative: self.representative,
            category: self.category,
            member_event_ids: self.members.iter().map(|m| m.id.clone()).collect(),
            aggregate_frustration: self.aggregate_frustration,
            session_ids: self.sessions.into_iter().collect(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
        }
    }
}

fn min_time(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Token set an event is compared with: its words plus a category tag, so
/// same-category corrections lean together.
fn event_tokens(event: &CorrectionEvent) -> BTreeSet<String> {
    let mut tokens = token_set(&event.text);
    tokens.insert(category_tag(event.category));
    tokens
}

fn category_tag(category: CorrectionCategory) -> String {
    format!("category:{}", category.label())
}

/// Online greedy single-pass clusterer.
///
/// Not a globally optimal partition: each event is compared only with the
/// clusters that exist when it arrives, so callers must push in
/// chronological order.
#[derive(Debug)]
pub struct ClusterBuilder {
    similarity_threshold: f64,
    repetition_threshold: usize,
    clusters: Vec<OpenCluster>,
}

impl ClusterBuilder {
    pub fn new(config: &ClusteringConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            repetition_threshold: config.repetition_threshold,
            clusters: Vec::new(),
        }
    }

    /// Attach to the most similar open cluster at or above the threshold,
    /// or seed a new one.
    pub fn push(&mut self, event: CorrectionEvent) -> ClusterAssignment {
        let tokens = event_tokens(&event);

        let mut best: Option<(usize, f64)> = None;
        for (idx, cluster) in self.clusters.iter().enumerate() {
            let similarity = jaccard(&tokens, &cluster.representative_tokens);
            if similarity < self.similarity_threshold {
                continue;
            }
            // Strict comparison: the earliest cluster wins ties.
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((idx, similarity));
            }
        }

        match best {
            Some((idx, similarity)) => {
                let cluster = &mut self.clusters[idx];
                debug!(
                    event_id = %event.id,
                    cluster_id = %cluster.id,
                    similarity,
                    "event attached"
                );
                cluster.attach(event, tokens);
                ClusterAssignment::Attached {
                    cluster_id: cluster.id.clone(),
                    similarity,
                }
            }
            None => {
                let cluster = OpenCluster::seed(event, tokens);
                debug!(cluster_id = %cluster.id, "cluster seeded");
                let cluster_id = cluster.id.clone();
                self.clusters.push(cluster);
                ClusterAssignment::Seeded { cluster_id }
            }
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Consume the builder, promoting clusters that reached the threshold.
    pub fn finish(self) -> ClusterOutput {
        let mut output = ClusterOutput {
            clusters_total: self.clusters.len(),
            ..ClusterOutput::default()
        };
        for cluster in self.clusters {
            if cluster.members.len() >= self.repetition_threshold {
                let pattern = cluster.into_pattern();
                events::pattern_promoted(
                    &pattern.id,
                    pattern.member_count(),
                    pattern.session_coverage(),
                    pattern.aggregate_frustration,
                );
                output.promoted.push(pattern);
            } else {
                output.residual.extend(cluster.members);
            }
        }
        output
    }
}

/// Ordering key of one event in the cross-session merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeKey<'a> {
    pub session_id: &'a str,
    /// Position within the session's transcript.
    pub sequence: usize,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Merge events from several sessions into one chronological order.
///
/// Within a session, file order always wins: an event without a timestamp
/// (or with one earlier than its predecessor) takes its predecessor's time.
/// Across sessions, events sort by that effective time, then session id,
/// then position. Events with no timestamp anywhere before them sort first.
pub fn merge_order<T>(items: Vec<T>, key: impl Fn(&T) -> MergeKey<'_>) -> Vec<T> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let (ka, kb) = (key(&items[a]), key(&items[b]));
        ka.session_id
            .cmp(kb.session_id)
            .then(ka.sequence.cmp(&kb.sequence))
    });

    let mut effective: Vec<Option<DateTime<Utc>>> = vec![None; items.len()];
    let mut previous: Option<usize> = None;
    for &idx in &order {
        let current = key(&items[idx]);
        let floor = previous
            .filter(|&p| key(&items[p]).session_id == current.session_id)
            .and_then(|p| effective[p]);
        effective[idx] = floor.max(current.timestamp);
        previous = Some(idx);
    }

    order.sort_by(|&a, &b| {
        let (ka, kb) = (key(&items[a]), key(&items[b]));
        effective[a]
            .cmp(&effective[b])
            .then_with(|| ka.session_id.cmp(kb.session_id))
            .then(ka.sequence.cmp(&kb.sequence))
    });

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.into_iter().filter_map(|idx| slots[idx].take()).collect()
}

/// Correction events in merge order.
pub fn chronological_order(events: Vec<CorrectionEvent>) -> Vec<CorrectionEvent> {
    merge_order(events, |e| MergeKey {
        session_id: &e.session_id,
        sequence: e.sequence,
        timestamp: e.timestamp,
    })
}

/// Put `events` in merge order and run one clustering pass over them.
pub fn build_clusters(events: Vec<CorrectionEvent>, config: &ClusteringConfig) -> ClusterOutput {
    let _span = hindsight_observability::clustering_span!(events.len()).entered();
    let mut builder = ClusterBuilder::new(config);
    for event in chronological_order(events) {
        builder.push(event);
    }
    builder.finish()
}
