use crate::credentialing::catalog::{Rule, RuleCatalog, ScoringParameters};

pub(super) const SCENARIO_TEXT: &str = "STATE MEDICAL BOARD LICENSE\nBoard Certification: Active";

pub(super) fn hard_rule(id: &str, keywords: &[&str]) -> Rule {
    Rule {
        id: id.to_string(),
        name: id.replace('_', " "),
        category: "test".to_string(),
        mandatory: true,
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        weight: 1.0,
    }
}

pub(super) fn soft_rule(id: &str, keywords: &[&str], weight: f64) -> Rule {
    Rule {
        mandatory: false,
        weight,
        ..hard_rule(id, keywords)
    }
}

pub(super) fn scoring(hard: f64, soft: f64, minimum_passing: f64) -> ScoringParameters {
    ScoringParameters {
        hard_rules_weight: hard,
        soft_rules_weight: soft,
        minimum_passing_score: minimum_passing,
        conditional_score: 60.0,
    }
}

/// One hard license rule and one soft board-certification rule, split 70/30, passing at 80.
pub(super) fn scenario_catalog() -> RuleCatalog {
    RuleCatalog::new(
        vec![hard_rule("medical_license", &["license", "medical board"])],
        vec![soft_rule("board_certification", &["board certification"], 10.0)],
        scoring(70.0, 30.0, 80.0),
    )
    .expect("scenario catalog is valid")
}

/// Four single-keyword hard rules carrying the whole score.
pub(super) fn quarter_catalog(minimum_passing: f64, conditional: f64) -> RuleCatalog {
    RuleCatalog::new(
        vec![
            hard_rule("alpha", &["alpha"]),
            hard_rule("bravo", &["bravo"]),
            hard_rule("charlie", &["charlie"]),
            hard_rule("delta", &["delta"]),
        ],
        Vec::new(),
        ScoringParameters {
            conditional_score: conditional,
            ..scoring(100.0, 0.0, minimum_passing)
        },
    )
    .expect("quarter catalog is valid")
}
