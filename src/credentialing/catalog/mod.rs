//! Immutable rule catalog: hard and soft credentialing rules plus scoring parameters.
//!
//! A catalog is validated once when it is loaded and never mutated afterwards, so a single
//! instance can be shared across threads behind an `Arc` without synchronization.

mod source;
mod standard;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use source::{CatalogDocument, RuleSource, ScoringSource};

/// Total that `hard_rules_weight + soft_rules_weight` must reach.
pub const WEIGHT_TOTAL: f64 = 100.0;
/// Default floor for the `conditional` verdict when the source omits it.
pub const DEFAULT_CONDITIONAL_SCORE: f64 = 60.0;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Errors raised while loading a catalog. Evaluation itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog: rule `{rule_id}` has no keywords")]
    EmptyKeywords { rule_id: String },
    #[error("invalid catalog: rule `{rule_id}` has a blank keyword")]
    BlankKeyword { rule_id: String },
    #[error("invalid catalog: rule id must not be blank")]
    BlankRuleId,
    #[error("invalid catalog: duplicate rule id `{rule_id}`")]
    DuplicateRuleId { rule_id: String },
    #[error("invalid catalog: rule `{rule_id}` has invalid weight {weight}")]
    InvalidRuleWeight { rule_id: String, weight: f64 },
    #[error("invalid catalog: {field} must be a non-negative number (found {value})")]
    InvalidScoringWeight { field: &'static str, value: f64 },
    #[error("invalid catalog: hard_rules_weight + soft_rules_weight must equal {expected} (found {found})")]
    WeightTotalMismatch { expected: f64, found: f64 },
    #[error("invalid catalog: {field} must fall within 0..=100 (found {value})")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
    #[error("invalid catalog: rule `{rule_id}` is listed as {listed} but declares mandatory = {mandatory}")]
    MisplacedRule {
        rule_id: String,
        listed: RuleClass,
        mandatory: bool,
    },
    #[error("invalid catalog: malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid catalog: unable to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// Partition a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleClass {
    Hard,
    Soft,
}

impl RuleClass {
    pub fn label(self) -> &'static str {
        match self {
            RuleClass::Hard => "hard rule",
            RuleClass::Soft => "soft rule",
        }
    }

    fn is_mandatory(self) -> bool {
        matches!(self, RuleClass::Hard)
    }
}

impl std::fmt::Display for RuleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single credentialing requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub category: String,
    pub mandatory: bool,
    pub keywords: Vec<String>,
    /// Contribution to the soft-rule point pool. Ignored for hard rules.
    pub weight: f64,
}

impl Rule {
    pub fn class(&self) -> RuleClass {
        if self.mandatory {
            RuleClass::Hard
        } else {
            RuleClass::Soft
        }
    }
}

/// Global scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringParameters {
    pub hard_rules_weight: f64,
    pub soft_rules_weight: f64,
    pub minimum_passing_score: f64,
    pub conditional_score: f64,
}

/// Validated, read-only rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCatalog {
    hard_rules: Vec<Rule>,
    soft_rules: Vec<Rule>,
    scoring: ScoringParameters,
}

impl RuleCatalog {
    /// Built-in credentialing catalog used when no external source is configured.
    pub fn standard() -> Self {
        standard::catalog()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.as_ref().display(),
            hard_rules = catalog.hard_rules.len(),
            soft_rules = catalog.soft_rules.len(),
            "loaded rule catalog"
        );
        Ok(catalog)
    }

    /// Validate already-built rules and parameters.
    pub fn new(
        hard_rules: Vec<Rule>,
        soft_rules: Vec<Rule>,
        scoring: ScoringParameters,
    ) -> Result<Self, CatalogError> {
        {
            let mut seen = HashSet::new();
            for (class, rules) in [(RuleClass::Hard, &hard_rules), (RuleClass::Soft, &soft_rules)]
            {
                for rule in rules {
                    validate_rule(rule, class)?;
                    if !seen.insert(rule.id.as_str()) {
                        return Err(CatalogError::DuplicateRuleId {
                            rule_id: rule.id.clone(),
                        });
                    }
                }
            }
        }

        validate_scoring(&scoring)?;

        Ok(Self {
            hard_rules,
            soft_rules,
            scoring,
        })
    }

    fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            hard_rules,
            soft_rules,
            compliance_scoring,
        } = document;

        let hard_rules = hard_rules
            .into_iter()
            .map(|rule| rule.into_rule(RuleClass::Hard))
            .collect::<Result<Vec<_>, _>>()?;
        let soft_rules = soft_rules
            .into_iter()
            .map(|rule| rule.into_rule(RuleClass::Soft))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(hard_rules, soft_rules, compliance_scoring.into())
    }

    pub fn hard_rules(&self) -> &[Rule] {
        &self.hard_rules
    }

    pub fn soft_rules(&self) -> &[Rule] {
        &self.soft_rules
    }

    /// Hard rules followed by soft rules, each in catalog order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.hard_rules.iter().chain(self.soft_rules.iter())
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules().find(|rule| rule.id == id)
    }

    pub fn scoring(&self) -> &ScoringParameters {
        &self.scoring
    }

    /// Sum of soft-rule weights; the denominator of the soft-rule term.
    pub fn max_soft_score(&self) -> f64 {
        self.soft_rules.iter().map(|rule| rule.weight).sum()
    }
}

impl RuleSource {
    fn into_rule(self, listed: RuleClass) -> Result<Rule, CatalogError> {
        if let Some(mandatory) = self.mandatory {
            if mandatory != listed.is_mandatory() {
                return Err(CatalogError::MisplacedRule {
                    rule_id: self.id,
                    listed,
                    mandatory,
                });
            }
        }

        Ok(Rule {
            id: self.id,
            name: self.name,
            category: self.category,
            mandatory: listed.is_mandatory(),
            keywords: self.keywords,
            weight: self.weight,
        })
    }
}

impl From<ScoringSource> for ScoringParameters {
    fn from(source: ScoringSource) -> Self {
        Self {
            hard_rules_weight: source.hard_rules_weight,
            soft_rules_weight: source.soft_rules_weight,
            minimum_passing_score: source.minimum_passing_score,
            conditional_score: source
                .conditional_score
                .unwrap_or(DEFAULT_CONDITIONAL_SCORE),
        }
    }
}

fn validate_rule(rule: &Rule, listed: RuleClass) -> Result<(), CatalogError> {
    if rule.id.trim().is_empty() {
        return Err(CatalogError::BlankRuleId);
    }

    if rule.mandatory != listed.is_mandatory() {
        return Err(CatalogError::MisplacedRule {
            rule_id: rule.id.clone(),
            listed,
            mandatory: rule.mandatory,
        });
    }

    if rule.keywords.is_empty() {
        return Err(CatalogError::EmptyKeywords {
            rule_id: rule.id.clone(),
        });
    }

    if rule.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
        return Err(CatalogError::BlankKeyword {
            rule_id: rule.id.clone(),
        });
    }

    if !rule.weight.is_finite() || rule.weight < 0.0 {
        return Err(CatalogError::InvalidRuleWeight {
            rule_id: rule.id.clone(),
            weight: rule.weight,
        });
    }

    Ok(())
}

fn validate_scoring(scoring: &ScoringParameters) -> Result<(), CatalogError> {
    for (field, value) in [
        ("hard_rules_weight", scoring.hard_rules_weight),
        ("soft_rules_weight", scoring.soft_rules_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::InvalidScoringWeight { field, value });
        }
    }

    let total = scoring.hard_rules_weight + scoring.soft_rules_weight;
    if (total - WEIGHT_TOTAL).abs() > WEIGHT_TOLERANCE {
        return Err(CatalogError::WeightTotalMismatch {
            expected: WEIGHT_TOTAL,
            found: total,
        });
    }

    for (field, value) in [
        ("minimum_passing_score", scoring.minimum_passing_score),
        ("conditional_score", scoring.conditional_score),
    ] {
        if !(0.0..=WEIGHT_TOTAL).contains(&value) {
            return Err(CatalogError::ThresholdOutOfRange { field, value });
        }
    }

    Ok(())
}
