//! Normalized lexical token overlap (Jaccard index).

use std::collections::BTreeSet;

use super::tokenize::token_set;

/// |A ∩ B| / |A ∪ B|. Two empty sets have nothing in common: 0.0.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Token-overlap similarity of two raw texts.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}
