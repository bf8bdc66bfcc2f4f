//! Frustration scoring.
//!
//! score = base weight of the category
//!       + intensity bonus (exclamation runs, shouted words), capped
//!       + escalation bonus per earlier similar correction in the session, capped
//! clamped to [0, 1].

use hindsight_core::config::DetectionConfig;
use hindsight_core::models::CorrectionCategory;

use super::indicators::base_weight;

/// Upper bound of the intensity bonus.
pub const MAX_INTENSITY_BONUS: f64 = 0.1;

const INTENSITY_STEP: f64 = 0.05;
const MIN_SHOUTED_LEN: usize = 3;

/// Bonus for typographic intensity: each run of `!` and each ALL-CAPS word of
/// at least three letters adds a step, up to [`MAX_INTENSITY_BONUS`].
pub fn intensity_bonus(text: &str) -> f64 {
    let exclamation_runs = text
        .split(|c: char| c != '!')
        .filter(|run| !run.is_empty())
        .count();
    let shouted = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| {
            word.chars().count() >= MIN_SHOUTED_LEN && word.chars().all(|c| c.is_uppercase())
        })
        .count();
    ((exclamation_runs + shouted) as f64 * INTENSITY_STEP).min(MAX_INTENSITY_BONUS)
}

/// Score one correction. `prior_repeats` is the number of earlier
/// corrections in the same session that this one repeats.
pub fn frustration_score(
    category: CorrectionCategory,
    text: &str,
    prior_repeats: usize,
    config: &DetectionConfig,
) -> f64 {
    let steps = prior_repeats.min(config.max_escalation_steps) as f64;
    let score = base_weight(category) + intensity_bonus(text) + config.escalation_bonus * steps;
    score.clamp(0.0, 1.0)
}
