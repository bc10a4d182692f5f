use crate::config::Hysteresis;
use crate::rules::RuleSet;
use hermia_common::types::{Channel, Reading};

/// Per-rule breach count over one window. Computed each cycle, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreachTally {
    pub channel: Channel,
    pub breaches: usize,
    /// Readings actually available in the window
    pub window_len: usize,
}

/// Counts, for every enabled rule, the readings in `window` that breach it
/// once hysteresis is applied. Missing values never breach; disabled rules
/// get no tally.
pub fn tally(rules: &RuleSet, hysteresis: &Hysteresis, window: &[Reading]) -> Vec<BreachTally> {
    rules
        .enabled()
        .map(|rule| {
            let margin = hysteresis.margin(rule.channel);
            let breaches = window
                .iter()
                .filter_map(|r| r.value(rule.channel))
                .filter(|&v| rule.comparison.breaches(v, margin))
                .count();
            BreachTally {
                channel: rule.channel,
                breaches,
                window_len: window.len(),
            }
        })
        .collect()
}
