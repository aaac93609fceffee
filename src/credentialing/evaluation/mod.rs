//! Keyword-ratio evaluation of document text against a rule catalog.
//!
//! Each rule is matched independently (`rules`), soft-rule weights and the hard/soft split are
//! folded into a 0..=100 score (`scoring`), and the score is mapped to a verdict (`policy`).
//! Evaluation never fails: unreadable or empty text simply scores zero.

mod config;
mod policy;
mod rules;
mod scoring;

#[cfg(test)]
mod tests;

pub use config::{HARD_RULE_MATCH_THRESHOLD, MAX_EVIDENCE_LINES, SOFT_RULE_MATCH_THRESHOLD};
pub use policy::ComplianceStatus;
pub use scoring::ScoreBreakdown;

use std::sync::Arc;

use tracing::info;

use super::catalog::{Rule, RuleCatalog};
use super::extraction::ExtractedFields;
use super::report::{ComplianceReport, RuleEvaluation};
use policy::decide_status;
use rules::{evaluate_normalized, NormalizedText};
use scoring::score_evaluations;

/// Match one rule against raw document text.
pub fn evaluate_rule(rule: &Rule, text: &str) -> RuleEvaluation {
    evaluate_normalized(rule, &NormalizedText::new(text))
}

/// Evaluate every catalog rule against one document and aggregate the outcome.
///
/// Total over any input: empty or noisy text yields non-compliant evaluations, never an error.
pub fn evaluate_document(catalog: &RuleCatalog, text: &str) -> ComplianceReport {
    let normalized = NormalizedText::new(text);

    let hard_rule_evaluations: Vec<RuleEvaluation> = catalog
        .hard_rules()
        .iter()
        .map(|rule| evaluate_normalized(rule, &normalized))
        .collect();
    let soft_rule_evaluations: Vec<RuleEvaluation> = catalog
        .soft_rules()
        .iter()
        .map(|rule| evaluate_normalized(rule, &normalized))
        .collect();

    let (breakdown, overall_score) =
        score_evaluations(catalog, &hard_rule_evaluations, &soft_rule_evaluations);
    let status = decide_status(overall_score, catalog.scoring());
    let extracted_fields = ExtractedFields::from_text(text);

    info!(
        overall_score,
        %status,
        hard_passed = breakdown.hard_rules_passed,
        hard_total = breakdown.hard_rules_total,
        fields = extracted_fields.len(),
        "evaluated document"
    );

    ComplianceReport {
        hard_rule_evaluations,
        soft_rule_evaluations,
        overall_score,
        status,
        extracted_fields,
        breakdown,
    }
}

/// Seam through which callers obtain compliance reports.
pub trait DocumentEvaluator: Send + Sync {
    fn catalog(&self) -> &RuleCatalog;

    fn evaluate(&self, text: &str) -> ComplianceReport {
        evaluate_document(self.catalog(), text)
    }
}

/// Stateless evaluator bound to a shared catalog.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    catalog: Arc<RuleCatalog>,
}

impl RuleEvaluator {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn shared_catalog(&self) -> Arc<RuleCatalog> {
        Arc::clone(&self.catalog)
    }
}

impl DocumentEvaluator for RuleEvaluator {
    fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }
}
