// Single source of truth for all default values.

// --- Detection ---
pub const DEFAULT_LOOKBACK_WINDOW: usize = 3;
pub const DEFAULT_APPROVAL_MAX_TOKENS: usize = 8;
pub const DEFAULT_ESCALATION_BONUS: f64 = 0.2;
pub const DEFAULT_MAX_ESCALATION_STEPS: usize = 3;
pub const DEFAULT_REPEAT_SIMILARITY_THRESHOLD: f64 = 0.5;

// --- Clustering ---
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_REPETITION_THRESHOLD: usize = 2;

// --- Tiering ---
pub const DEFAULT_ANCHOR_THRESHOLD: f64 = 0.6;
pub const DEFAULT_CAPTURE_SINGLE_SESSION: bool = false;
pub const DEFAULT_DECISION_TOOLS: &[&str] = &["ExitPlanMode"];

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
