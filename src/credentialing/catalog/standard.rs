use super::{Rule, RuleCatalog, ScoringParameters, DEFAULT_CONDITIONAL_SCORE};

pub(super) fn catalog() -> RuleCatalog {
    RuleCatalog {
        hard_rules: hard_rules(),
        soft_rules: soft_rules(),
        scoring: ScoringParameters {
            hard_rules_weight: 70.0,
            soft_rules_weight: 30.0,
            minimum_passing_score: 80.0,
            conditional_score: DEFAULT_CONDITIONAL_SCORE,
        },
    }
}

fn rule(
    id: &str,
    name: &str,
    category: &str,
    mandatory: bool,
    weight: f64,
    keywords: &[&str],
) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        mandatory,
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        weight,
    }
}

fn hard_rules() -> Vec<Rule> {
    vec![
        rule(
            "medical_license",
            "Active State Medical License",
            "licensure",
            true,
            1.0,
            &["license", "medical board", "active", "state"],
        ),
        rule(
            "dea_registration",
            "DEA Controlled Substance Registration",
            "registration",
            true,
            1.0,
            &["dea", "controlled substance", "registration", "schedule"],
        ),
        rule(
            "malpractice_insurance",
            "Professional Liability Coverage",
            "insurance",
            true,
            1.0,
            &["malpractice", "liability", "insurance", "coverage", "policy"],
        ),
        rule(
            "background_check",
            "Criminal Background Check",
            "disclosure",
            true,
            1.0,
            &["background check", "criminal", "sanction", "exclusion"],
        ),
    ]
}

fn soft_rules() -> Vec<Rule> {
    vec![
        rule(
            "board_certification",
            "Board Certification",
            "certification",
            false,
            30.0,
            &["board certification", "board certified", "diplomate", "american board"],
        ),
        rule(
            "continuing_education",
            "Continuing Medical Education",
            "education",
            false,
            25.0,
            &["cme", "continuing education", "credits", "hours"],
        ),
        rule(
            "hospital_privileges",
            "Hospital Privileges",
            "affiliation",
            false,
            25.0,
            &["privileges", "hospital", "affiliation", "staff"],
        ),
        rule(
            "peer_references",
            "Peer References",
            "references",
            false,
            20.0,
            &["reference", "peer", "recommendation"],
        ),
    ]
}
