use serde::{Deserialize, Serialize};

use super::super::catalog::ScoringParameters;

/// Discrete verdict derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Conditional,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::Conditional => "conditional",
            ComplianceStatus::NonCompliant => "non_compliant",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "meets credentialing requirements",
            ComplianceStatus::Conditional => "conditionally compliant, follow-up required",
            ComplianceStatus::NonCompliant => "does not meet credentialing requirements",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching threshold wins: passing score, then conditional floor.
pub(crate) fn decide_status(overall_score: f64, scoring: &ScoringParameters) -> ComplianceStatus {
    if overall_score >= scoring.minimum_passing_score {
        return ComplianceStatus::Compliant;
    }

    if overall_score >= scoring.conditional_score {
        return ComplianceStatus::Conditional;
    }

    ComplianceStatus::NonCompliant
}
