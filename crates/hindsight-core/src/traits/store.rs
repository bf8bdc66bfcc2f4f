use std::collections::BTreeMap;

use crate::errors::HindsightResult;
use crate::models::{MemoryKind, Tier};

/// The external memory store. The engine is a producer only and makes no
/// assumption about how records are persisted or queried.
pub trait IMemoryStore: Send + Sync {
    fn store_record(
        &self,
        content: &str,
        memory_kind: MemoryKind,
        tier: Tier,
        metadata: &BTreeMap<String, serde_json::Value>,
    ) -> HindsightResult<()>;
}
