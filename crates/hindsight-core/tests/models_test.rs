use chrono::{TimeZone, Utc};
use hindsight_core::models::*;

#[test]
fn entry_kind_maps_known_discriminators() {
    assert_eq!(EntryKind::from_discriminator("user"), EntryKind::UserTurn);
    assert_eq!(EntryKind::from_discriminator("assistant"), EntryKind::AssistantTurn);
    assert_eq!(EntryKind::from_discriminator("summary"), EntryKind::Summary);
    assert_eq!(
        EntryKind::from_discriminator("file-history-snapshot"),
        EntryKind::FileSnapshot
    );
}

#[test]
fn entry_kind_passes_unknown_through() {
    assert_eq!(
        EntryKind::from_discriminator("queue-operation"),
        EntryKind::Unknown("queue-operation".to_string())
    );
}

#[test]
fn correction_category_labels_are_distinct() {
    let mut labels: Vec<&str> = CorrectionCategory::ALL.iter().map(|c| c.label()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), CorrectionCategory::ALL.len());
    assert_eq!(CorrectionCategory::NegationImperative.to_string(), "negation+imperative");
}

#[test]
fn latest_child_prefers_newest_timestamp() {
    let bp = BranchPoint {
        parent_id: "b".into(),
        child_ids: vec!["d1".into(), "d2".into()],
        child_timestamps: vec![
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 5, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 1, 0).unwrap()),
        ],
    };
    assert_eq!(bp.latest_child(), Some("d1"));
}

#[test]
fn latest_child_falls_back_to_file_order() {
    let bp = BranchPoint {
        parent_id: "b".into(),
        child_ids: vec!["d1".into(), "d2".into()],
        child_timestamps: vec![None, None],
    };
    assert_eq!(bp.latest_child(), Some("d2"));
}

#[test]
fn tiers_order_by_durability() {
    assert!(Tier::SessionScoped < Tier::LongTerm);
    assert!(Tier::LongTerm < Tier::Anchor);
}

#[test]
fn anomaly_serializes_with_flattened_kind() {
    let anomaly = StructuralAnomaly {
        entry_id: "x".into(),
        kind: AnomalyKind::MissingParent {
            parent_id: "gone".into(),
        },
    };
    let json = serde_json::to_value(&anomaly).unwrap();
    assert_eq!(json["entry_id"], "x");
    assert_eq!(json["kind"], "missing_parent");
    assert_eq!(json["parent_id"], "gone");
}
