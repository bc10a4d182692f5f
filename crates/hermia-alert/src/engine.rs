use crate::arbitration::{arbitrate, Contribution};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::rules::RuleSet;
use crate::severity::grade;
use crate::store::ReadingStore;
use crate::window::{tally, BreachTally};
use crate::Outcome;
use hermia_common::types::Reading;

/// Stateless alert evaluator. Each call looks only at the window it is
/// given, so re-evaluating the same window yields the same outcome.
pub struct AlertEngine {
    config: EngineConfig,
    rules: RuleSet,
}

impl AlertEngine {
    /// Validates `config` and builds the engine. Invalid settings fail here,
    /// never during a cycle.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rules = RuleSet::new(config.rules.clone())?;
        tracing::debug!(
            window_size = config.window_size,
            quorum = config.quorum,
            enabled_rules = rules.enabled().count(),
            "Alert engine configured"
        );
        Ok(Self { config, rules })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A store sized for this engine's configuration.
    pub fn new_store(&self) -> ReadingStore {
        ReadingStore::new(self.config.store_capacity)
    }

    /// Breach counts per enabled rule over the last `window_size` readings.
    pub fn tally(&self, readings: &[Reading]) -> Vec<BreachTally> {
        tally(&self.rules, &self.config.hysteresis, self.window(readings))
    }

    /// Evaluates the last `window_size` readings of `readings`; the final
    /// reading is the current one.
    pub fn evaluate(&self, readings: &[Reading]) -> Outcome {
        let window = self.window(readings);
        let Some(current) = window.last() else {
            return Outcome::Healthy;
        };

        let tallies = tally(&self.rules, &self.config.hysteresis, window);
        let mut contributions = Vec::new();

        for t in tallies.iter().filter(|t| t.breaches >= self.config.quorum) {
            let Some(rule) = self.rules.get(t.channel) else {
                continue;
            };
            let value = current.value(t.channel);
            match (value, grade(rule, value)) {
                (Some(value), Some(severity)) => contributions.push(Contribution {
                    rule,
                    value,
                    breaches: t.breaches,
                    severity,
                }),
                _ => tracing::debug!(
                    channel = %t.channel,
                    breaches = t.breaches,
                    "Quorum met but current value is inside limits, rule skipped"
                ),
            }
        }

        let outcome = arbitrate(contributions, current, self.config.window_size);
        if let Outcome::Healthy = outcome {
            tracing::debug!(
                window_len = window.len(),
                timestamp = %current.timestamp,
                "No alert this cycle"
            );
        }
        outcome
    }

    /// Evaluates the store's most recent window.
    pub fn evaluate_store(&self, store: &ReadingStore) -> Outcome {
        self.evaluate(store.recent(self.config.window_size))
    }

    fn window<'a>(&self, readings: &'a [Reading]) -> &'a [Reading] {
        let start = readings.len().saturating_sub(self.config.window_size);
        &readings[start..]
    }
}
