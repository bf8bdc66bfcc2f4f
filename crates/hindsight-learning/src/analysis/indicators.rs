//! Correction and approval indicator tables.
//!
//! Each category owns one case-insensitive pattern. Categories are tried in
//! priority order and the first hit wins, so a turn maps to at most one
//! category.

use std::sync::LazyLock;

use hindsight_consolidation::algorithms::word_count;
use hindsight_core::constants::INTERRUPT_MARKER;
use hindsight_core::models::{ApprovalCategory, CorrectionCategory};
use regex::Regex;
use serde::Serialize;

macro_rules! indicator_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Corrections ────────────────────────────────────────────────────────────
indicator_pattern!(
    RE_ESCALATION,
    r"(?i)\b(i\s+(already|just)\s+(told|said|asked)|as\s+i\s+(said|mentioned)|like\s+i\s+said|how\s+many\s+times|you\s+keep|still\s+(not|doesn['’]?t|isn['’]?t|wrong|broken|failing)|for\s+the\s+(second|third|last)\s+time|stop\s+ignoring|(told|asked)\s+you\s+(not\s+)?to)\b"
);

indicator_pattern!(
    RE_REVERT,
    r"(?i)\b(undo|revert|roll\s*back|put\s+it\s+back|change\s+it\s+back|go\s+back\s+to)\b"
);

indicator_pattern!(
    RE_NEGATION_IMPERATIVE,
    r"(?i)(^\s*(no|nope|nah)\b[\s,.!-]*[a-z0-9]|\b(don['’]?t|do\s+not|never|stop|quit)\s+\w+|\b(that['’]?s|it['’]?s|this\s+is)\s+(not|wrong|incorrect)\b|\binstead\b|\bshould\s*n['’]?t\b|\bshould\s+not\b)"
);

indicator_pattern!(
    RE_INTERRUPTION,
    &format!("(?i){}", regex::escape(INTERRUPT_MARKER))
);

indicator_pattern!(RE_BARE_NEGATION, r"(?i)^\s*(no|nope|nah|wrong)\s*[.!]*\s*$");

// "no problem", "no worries": negation words that are not feedback.
indicator_pattern!(RE_NEGATION_IDIOM, r"(?i)^\s*no\s+(problem|worries|worry)\b");

// ── Approvals ──────────────────────────────────────────────────────────────
indicator_pattern!(
    RE_EXPLICIT_APPROVAL,
    r"(?i)\b(perfect|great|excellent|awesome|nice|lgtm|looks\s+(good|great|right)|well\s+done|exactly|thanks|thank\s+you|that\s+works|good\s+job|love\s+it)\b"
);

indicator_pattern!(
    RE_PROCEED,
    r"(?i)^\s*(yes|yep|yeah|ok(ay)?|sure|go\s+ahead|proceed|continue|do\s+it|ship\s+it|sounds\s+good)\b"
);

/// What one user turn signals, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", content = "category", rename_all = "snake_case")]
pub enum Signal {
    Correction(CorrectionCategory),
    Approval(ApprovalCategory),
}

fn correction_pattern(category: CorrectionCategory) -> &'static LazyLock<Option<Regex>> {
    match category {
        CorrectionCategory::Escalation => &RE_ESCALATION,
        CorrectionCategory::Revert => &RE_REVERT,
        CorrectionCategory::NegationImperative => &RE_NEGATION_IMPERATIVE,
        CorrectionCategory::Interruption => &RE_INTERRUPTION,
        CorrectionCategory::BareNegation => &RE_BARE_NEGATION,
    }
}

fn approval_pattern(category: ApprovalCategory) -> &'static LazyLock<Option<Regex>> {
    match category {
        ApprovalCategory::ExplicitApproval => &RE_EXPLICIT_APPROVAL,
        ApprovalCategory::Proceed => &RE_PROCEED,
    }
}

/// Base frustration weight of a correction category.
///
/// Strictly ordered: escalation > revert > negation+imperative >
/// interruption > bare negation.
pub fn base_weight(category: CorrectionCategory) -> f64 {
    match category {
        CorrectionCategory::Escalation => 0.7,
        CorrectionCategory::Revert => 0.55,
        CorrectionCategory::NegationImperative => 0.45,
        CorrectionCategory::Interruption => 0.35,
        CorrectionCategory::BareNegation => 0.25,
    }
}

fn is_match(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

/// First correction category whose pattern matches `text`.
pub fn match_correction(text: &str) -> Option<CorrectionCategory> {
    if is_match(&RE_NEGATION_IDIOM, text) {
        return None;
    }
    CorrectionCategory::ALL
        .into_iter()
        .find(|&category| is_match(correction_pattern(category), text))
}

/// First approval category whose pattern matches `text`. Long turns are
/// never approvals: praise inside a paragraph of new instructions is not a
/// sign-off.
pub fn match_approval(text: &str, max_tokens: usize) -> Option<ApprovalCategory> {
    if word_count(text) > max_tokens {
        return None;
    }
    ApprovalCategory::ALL
        .into_iter()
        .find(|&category| is_match(approval_pattern(category), text))
}

/// Classify one user turn. Approval is only considered when no correction
/// matched.
pub fn classify_turn(text: &str, approval_max_tokens: usize) -> Option<Signal> {
    if let Some(category) = match_correction(text) {
        return Some(Signal::Correction(category));
    }
    match_approval(text, approval_max_tokens).map(Signal::Approval)
}
