use serde::{Deserialize, Serialize};

use super::super::catalog::{RuleCatalog, WEIGHT_TOTAL};
use super::super::report::RuleEvaluation;

/// How the overall score was assembled, kept on the report for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub hard_rules_passed: usize,
    pub hard_rules_total: usize,
    pub soft_points_earned: f64,
    pub soft_points_available: f64,
    pub hard_component: f64,
    pub soft_component: f64,
}

/// Weighted score over evaluations that sit positionally beside the catalog's rules.
pub(crate) fn score_evaluations(
    catalog: &RuleCatalog,
    hard: &[RuleEvaluation],
    soft: &[RuleEvaluation],
) -> (ScoreBreakdown, f64) {
    let scoring = catalog.scoring();

    let hard_rules_total = catalog.hard_rules().len();
    let hard_rules_passed = hard.iter().filter(|evaluation| evaluation.compliant).count();
    let hard_component = if hard_rules_total == 0 {
        0.0
    } else {
        hard_rules_passed as f64 / hard_rules_total as f64 * scoring.hard_rules_weight
    };

    let soft_points_available = catalog.max_soft_score();
    let soft_points_earned: f64 = catalog
        .soft_rules()
        .iter()
        .zip(soft)
        .filter(|(_, evaluation)| evaluation.compliant)
        .map(|(rule, _)| rule.weight)
        .sum();
    let soft_component = if soft_points_available > 0.0 {
        soft_points_earned / soft_points_available * scoring.soft_rules_weight
    } else {
        0.0
    };

    let overall = (hard_component + soft_component).clamp(0.0, WEIGHT_TOTAL);

    (
        ScoreBreakdown {
            hard_rules_passed,
            hard_rules_total,
            soft_points_earned,
            soft_points_available,
            hard_component,
            soft_component,
        },
        overall,
    )
}
