use serde::Deserialize;

/// On-disk catalog layout: `hard_rules`, `soft_rules`, and a `compliance_scoring` block.
#[derive(Debug, Deserialize)]
pub(super) struct CatalogDocument {
    #[serde(default)]
    pub hard_rules: Vec<RuleSource>,
    #[serde(default)]
    pub soft_rules: Vec<RuleSource>,
    pub compliance_scoring: ScoringSource,
}

#[derive(Debug, Deserialize)]
pub(super) struct RuleSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Defaults to the partition the rule is listed under.
    #[serde(default)]
    pub mandatory: Option<bool>,
    pub keywords: Vec<String>,
    #[serde(default = "default_rule_weight")]
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScoringSource {
    pub hard_rules_weight: f64,
    pub soft_rules_weight: f64,
    pub minimum_passing_score: f64,
    #[serde(default)]
    pub conditional_score: Option<f64>,
}

fn default_rule_weight() -> f64 {
    1.0
}
