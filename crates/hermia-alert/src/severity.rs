use crate::rules::Rule;
use hermia_common::types::Severity;

/// Grades the current reading's value against a rule's raw limits.
///
/// Returns `None` when the value is missing or back inside the acceptable
/// zone, even if the rule met its persistence quorum.
pub fn grade(rule: &Rule, current: Option<f64>) -> Option<Severity> {
    let distance = rule.comparison.distance(current?)?;
    Some(rule.cuts.tier(distance))
}
