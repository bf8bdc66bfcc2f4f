//! # hindsight-consolidation
//!
//! Cross-session clustering of correction events. A single chronological
//! pass seeds a cluster with each event that matches nothing, and attaches
//! later events to the best-matching open cluster. Earlier events anchor
//! cluster identity, so new sessions can be folded in without recomputing
//! history.

pub mod algorithms;
pub mod builder;

pub use builder::{
    build_clusters, chronological_order, merge_order, ClusterAssignment, ClusterBuilder,
    ClusterOutput, MergeKey,
};
