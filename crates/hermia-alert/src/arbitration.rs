use crate::rules::Rule;
use crate::Outcome;
use hermia_common::types::{AlertEvent, AlertStatus, Reading, Severity, TriggeredRule};

/// A rule that met quorum and graded to a severity on the current reading.
#[derive(Debug, Clone)]
pub struct Contribution<'a> {
    pub rule: &'a Rule,
    pub value: f64,
    pub breaches: usize,
    pub severity: Severity,
}

/// Merges contributing rules into at most one alert at their maximum
/// severity. An empty set is the explicit healthy outcome.
pub fn arbitrate(
    mut contributions: Vec<Contribution<'_>>,
    current: &Reading,
    window_size: usize,
) -> Outcome {
    let Some(severity) = contributions.iter().map(|c| c.severity).max() else {
        return Outcome::Healthy;
    };

    contributions.sort_by_key(|c| c.rule.channel);
    let triggers: Vec<TriggeredRule> = contributions
        .iter()
        .map(|c| TriggeredRule {
            channel: c.rule.channel,
            description: clause(c, window_size),
            value: c.value,
            breaches: c.breaches,
            window_size,
            severity: c.severity,
        })
        .collect();

    let description = triggers
        .iter()
        .map(|t| t.description.as_str())
        .collect::<Vec<_>>()
        .join(" | ");

    let representative = current.representative();

    Outcome::Alert(AlertEvent {
        timestamp: current.timestamp,
        severity,
        description,
        triggers,
        value: representative.map(|(_, v)| v),
        value_channel: representative.map(|(ch, _)| ch),
        status: AlertStatus::Registered,
    })
}

fn clause(c: &Contribution<'_>, window_size: usize) -> String {
    format!(
        "{} {} (value={}, {}/{}, {})",
        c.rule.channel, c.rule.comparison, c.value, c.breaches, window_size, c.severity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rules;
    use chrono::Utc;
    use hermia_common::types::Channel;

    #[test]
    fn empty_contributions_are_healthy() {
        let current = Reading::new(Utc::now()).with(Channel::Vibration, 0.2);
        assert_eq!(arbitrate(Vec::new(), &current, 5), Outcome::Healthy);
    }

    #[test]
    fn picks_maximum_severity_and_orders_clauses() {
        let rules = default_rules();
        let temperature = &rules[3];
        let vibration = &rules[0];
        let current = Reading::new(Utc::now())
            .with(Channel::Vibration, 0.9)
            .with(Channel::Temperature, 40.0);

        let outcome = arbitrate(
            vec![
                Contribution {
                    rule: temperature,
                    value: 40.0,
                    breaches: 4,
                    severity: Severity::High,
                },
                Contribution {
                    rule: vibration,
                    value: 0.9,
                    breaches: 3,
                    severity: Severity::Low,
                },
            ],
            &current,
            5,
        );

        let Outcome::Alert(event) = outcome else {
            panic!("expected an alert");
        };
        assert_eq!(event.severity, Severity::High);
        assert_eq!(
            event.description,
            "vibration >= 0.8 (value=0.9, 3/5, low) | temperature outside [18, 32] (value=40, 4/5, high)"
        );
        assert_eq!(event.triggers[0].channel, Channel::Vibration);
        assert_eq!(event.value, Some(0.9));
        assert_eq!(event.value_channel, Some(Channel::Vibration));
        assert_eq!(event.timestamp, current.timestamp);
        assert_eq!(event.status, AlertStatus::Registered);
    }

    #[test]
    fn representative_value_skips_missing_channels() {
        let rules = default_rules();
        let current = Reading::new(Utc::now())
            .with(Channel::Luminosity, 20.0)
            .with(Channel::Temperature, 25.0);
        let outcome = arbitrate(
            vec![Contribution {
                rule: &rules[2],
                value: 20.0,
                breaches: 5,
                severity: Severity::High,
            }],
            &current,
            5,
        );
        let event = outcome.alert().cloned().unwrap();
        assert_eq!(event.value, Some(20.0));
        assert_eq!(event.value_channel, Some(Channel::Luminosity));
    }
}
