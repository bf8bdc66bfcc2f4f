//! AnalysisReport, per-run accounting, and record emission.

use std::path::PathBuf;
use std::sync::Mutex;

use hindsight_core::errors::{IngestError, StoreError};
use hindsight_core::models::MemoryRecord;
use hindsight_core::{HindsightResult, IMemoryStore, MemoryKind, Tier};
use hindsight_observability::events;
use serde::{Serialize, Serializer};

/// A transcript that could not be analyzed. Other files in the run continue.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_display")]
    pub error: IngestError,
}

fn serialize_display<S: Serializer>(error: &IngestError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Every unit of work in a run, accounted for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub transcripts_requested: usize,
    pub transcripts_analyzed: usize,
    pub entries: usize,
    pub skipped_lines: usize,
    /// Later entries dropped for reusing an earlier id.
    pub duplicate_entries: usize,
    pub anomalies: usize,
    pub main_entries: usize,
    pub sidechain_entries: usize,
    pub orphan_entries: usize,
    pub user_turns_scanned: usize,
    pub injected_turns_skipped: usize,
    pub empty_turns_skipped: usize,
    pub corrections: usize,
    pub approvals: usize,
    pub clusters_total: usize,
    pub patterns_promoted: usize,
    pub residual_corrections: usize,
    pub records: usize,
    /// Events that produced no record because single-session capture is off.
    pub not_persisted: usize,
}

/// Output of one analysis run.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisReport {
    pub records: Vec<MemoryRecord>,
    pub failures: Vec<FileFailure>,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one tier, in report order.
    pub fn records_in(&self, tier: Tier) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter().filter(move |r| r.tier == tier)
    }

    pub fn records_of(&self, kind: MemoryKind) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter().filter(move |r| r.memory_kind == kind)
    }

    /// Hand every record to `store`, in order. The report is only built once
    /// the whole batch is computed, so a store never sees a partial run from
    /// the engine. Stops at the first store error and returns it.
    pub fn emit(&self, store: &dyn IMemoryStore) -> HindsightResult<usize> {
        for record in &self.records {
            store.store_record(&record.content, record.memory_kind, record.tier, &record.metadata)?;
        }
        events::records_emitted(self.records.len());
        Ok(self.records.len())
    }

    pub fn to_json(&self) -> HindsightResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// In-memory store that keeps what it is given. For tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingStore {
    records: Mutex<Vec<MemoryRecord>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MemoryRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IMemoryStore for RecordingStore {
    fn store_record(
        &self,
        content: &str,
        memory_kind: MemoryKind,
        tier: Tier,
        metadata: &std::collections::BTreeMap<String, serde_json::Value>,
    ) -> HindsightResult<()> {
        let mut records = self.records.lock().map_err(|e| StoreError::Unavailable {
            reason: e.to_string(),
        })?;
        records.push(MemoryRecord {
            content: content.to_string(),
            memory_kind,
            tier,
            metadata: metadata.clone(),
        });
        Ok(())
    }
}
