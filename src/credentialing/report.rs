use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::evaluation::{ComplianceStatus, ScoreBreakdown};
use super::extraction::ExtractedFields;

/// Outcome of matching one document against one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub rule_id: String,
    pub compliant: bool,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub match_ratio: f64,
    pub evidence: Vec<String>,
    /// Why a non-compliant rule fell short; absent when the rule passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Aggregate result for one document against one catalog.
///
/// Evaluations are positional: index `i` of `hard_rule_evaluations` belongs to hard rule `i`
/// of the catalog that produced the report, and likewise for soft rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub overall_score: f64,
    #[serde(rename = "complianceStatus")]
    pub status: ComplianceStatus,
    pub hard_rule_evaluations: Vec<RuleEvaluation>,
    pub soft_rule_evaluations: Vec<RuleEvaluation>,
    pub extracted_fields: ExtractedFields,
    pub breakdown: ScoreBreakdown,
}

impl ComplianceReport {
    pub fn evaluations(&self) -> impl Iterator<Item = &RuleEvaluation> {
        self.hard_rule_evaluations
            .iter()
            .chain(self.soft_rule_evaluations.iter())
    }

    pub fn evaluation(&self, rule_id: &str) -> Option<&RuleEvaluation> {
        self.evaluations()
            .find(|evaluation| evaluation.rule_id == rule_id)
    }

    pub fn failed_hard_rules(&self) -> Vec<&str> {
        self.hard_rule_evaluations
            .iter()
            .filter(|evaluation| !evaluation.compliant)
            .map(|evaluation| evaluation.rule_id.as_str())
            .collect()
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.extracted_fields.expiration_date()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({:.1}/100): {}; {}/{} hard rules passed",
            self.status,
            self.overall_score,
            self.status.summary(),
            self.breakdown.hard_rules_passed,
            self.breakdown.hard_rules_total
        )
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
