use std::collections::BTreeMap;

/// Splits text into lowercase word tokens.
///
/// Anything that is not alphanumeric or an apostrophe separates tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Turns per-label log scores into percentages that sum to 100.
///
/// The maximum is subtracted before exponentiating so large negative
/// log-likelihoods don't underflow to zero across the board.
pub(crate) fn normalize_log_scores(scores: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return scores.keys().map(|label| (label.clone(), 0.0)).collect();
    }

    let exps: BTreeMap<String, f64> = scores
        .iter()
        .map(|(label, score)| (label.clone(), (score - max).exp()))
        .collect();
    let total: f64 = exps.values().sum();

    exps.into_iter()
        .map(|(label, value)| (label, value / total * 100.0))
        .collect()
}
