//! AnalysisEngine: parallel map over transcripts, serial reduce over events.

use std::path::{Path, PathBuf};

use hindsight_consolidation::build_clusters;
use hindsight_core::models::{ApprovalEvent, CorrectionEvent};
use hindsight_core::{HindsightConfig, HindsightResult};
use hindsight_learning::{DetectionOutput, FeedbackDetector};
use hindsight_observability::events;
use hindsight_transcript::{
    discover_transcripts, ingest_file, ClassificationCounts, ConversationTree,
};
use rayon::prelude::*;
use tracing::info;

use crate::report::{AnalysisReport, AnalysisStats, FileFailure};
use crate::tiering::TierMapper;

/// What the map phase extracts from one transcript.
struct SessionAnalysis {
    entries: usize,
    skipped_lines: usize,
    duplicate_entries: usize,
    anomalies: usize,
    counts: ClassificationCounts,
    detection: DetectionOutput,
}

/// Entry point for single-session and project-wide analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: HindsightConfig,
    detector: FeedbackDetector,
}

impl AnalysisEngine {
    pub fn new(config: HindsightConfig) -> Self {
        let detector = FeedbackDetector::new(config.detection.clone());
        Self { config, detector }
    }

    pub fn config(&self) -> &HindsightConfig {
        &self.config
    }

    /// Analyze a bounded set of transcripts as one project scope.
    ///
    /// Unreadable files are reported in `failures` and do not stop the run.
    /// An empty path list yields an empty report.
    pub fn analyze<P>(&self, paths: &[P]) -> AnalysisReport
    where
        P: AsRef<Path> + Sync,
    {
        self.run(paths, None)
    }

    /// Analyze every transcript directly under `dir`. The directory is the
    /// project scope and is recorded on each emitted record.
    pub fn analyze_project(&self, dir: impl AsRef<Path>) -> HindsightResult<AnalysisReport> {
        let dir = dir.as_ref();
        let paths = discover_transcripts(dir)?;
        info!(dir = %dir.display(), transcripts = paths.len(), "analyzing project");
        Ok(self.run(&paths, Some(dir.display().to_string())))
    }

    fn run<P>(&self, paths: &[P], project_scope: Option<String>) -> AnalysisReport
    where
        P: AsRef<Path> + Sync,
    {
        // Map: transcripts share no state. `collect` keeps input order.
        let outcomes: Vec<Result<SessionAnalysis, FileFailure>> = paths
            .par_iter()
            .map(|path| self.analyze_session(path.as_ref()))
            .collect();

        // Reduce: one serial pass so clustering sees events in chronological order.
        let mut stats = AnalysisStats {
            transcripts_requested: paths.len(),
            ..AnalysisStats::default()
        };
        let mut failures = Vec::new();
        let mut corrections: Vec<CorrectionEvent> = Vec::new();
        let mut approvals: Vec<ApprovalEvent> = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(session) => {
                    stats.transcripts_analyzed += 1;
                    stats.entries += session.entries;
                    stats.skipped_lines += session.skipped_lines;
                    stats.duplicate_entries += session.duplicate_entries;
                    stats.anomalies += session.anomalies;
                    stats.main_entries += session.counts.main;
                    stats.sidechain_entries += session.counts.sidechain;
                    stats.orphan_entries += session.counts.orphan;
                    stats.user_turns_scanned += session.detection.user_turns_scanned;
                    stats.injected_turns_skipped += session.detection.injected_turns_skipped;
                    stats.empty_turns_skipped += session.detection.empty_turns_skipped;
                    corrections.extend(session.detection.corrections);
                    approvals.extend(session.detection.approvals);
                }
                Err(failure) => {
                    events::transcript_failed(
                        &failure.path.display().to_string(),
                        &failure.error.to_string(),
                    );
                    failures.push(failure);
                }
            }
        }
        stats.corrections = corrections.len();
        stats.approvals = approvals.len();

        let clusters = build_clusters(corrections, &self.config.clustering);
        stats.clusters_total = clusters.clusters_total;
        stats.patterns_promoted = clusters.promoted.len();
        stats.residual_corrections = clusters.residual.len();

        let repetition_threshold = self.config.clustering.repetition_threshold;
        let tiering = TierMapper::new(&self.config.tiering, repetition_threshold)
            .with_project_scope(project_scope)
            .map(&clusters.promoted, &clusters.residual, &approvals);
        stats.records = tiering.records.len();
        stats.not_persisted = tiering.not_persisted;

        events::analysis_completed(stats.transcripts_analyzed, failures.len(), stats.records);
        AnalysisReport {
            records: tiering.records,
            failures,
            stats,
        }
    }

    fn analyze_session(&self, path: &Path) -> Result<SessionAnalysis, FileFailure> {
        let transcript = ingest_file(path).map_err(|error| FileFailure {
            path: PathBuf::from(path),
            error,
        })?;
        let ingested = transcript.entries.len();
        let skipped_lines = transcript.skipped_count();

        let tree = ConversationTree::build(&transcript.session_id, transcript.entries);
        let detection = self.detector.detect(&tree);

        Ok(SessionAnalysis {
            entries: ingested,
            skipped_lines,
            duplicate_entries: ingested - tree.len(),
            anomalies: tree.anomalies().len(),
            counts: tree.counts(),
            detection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_paths_yield_an_empty_report() {
        let report = AnalysisEngine::default().analyze::<PathBuf>(&[]);
        assert!(report.records.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.stats, AnalysisStats::default());
    }

    #[test]
    fn missing_project_directory_is_an_error() {
        let err = AnalysisEngine::default()
            .analyze_project("/definitely/not/a/project")
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/a/project"));
    }
}
