use tracing::debug;

use super::super::catalog::Rule;
use super::super::report::RuleEvaluation;
use super::config::{HARD_RULE_MATCH_THRESHOLD, MAX_EVIDENCE_LINES, SOFT_RULE_MATCH_THRESHOLD};

/// Document text prepared once for case-insensitive keyword matching.
pub(crate) struct NormalizedText<'a> {
    raw: &'a str,
    lowered: String,
}

impl<'a> NormalizedText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lowered: raw.to_lowercase(),
        }
    }

    fn contains(&self, keyword: &str) -> bool {
        self.lowered.contains(keyword)
    }

    /// Original lines mentioning any of `keywords`, in line order, each line at most once.
    fn evidence(&self, keywords: &[String]) -> Vec<String> {
        if keywords.is_empty() {
            return Vec::new();
        }

        self.raw
            .lines()
            .filter(|line| {
                let lowered = line.to_lowercase();
                keywords.iter().any(|keyword| lowered.contains(keyword))
            })
            .take(MAX_EVIDENCE_LINES)
            .map(str::to_string)
            .collect()
    }
}

pub(crate) fn evaluate_normalized(rule: &Rule, text: &NormalizedText<'_>) -> RuleEvaluation {
    let mut matched_keywords = Vec::new();
    let mut lowered_matches = Vec::new();
    for keyword in &rule.keywords {
        let lowered = keyword.to_lowercase();
        if text.contains(&lowered) {
            matched_keywords.push(keyword.clone());
            lowered_matches.push(lowered);
        }
    }

    let match_ratio = if rule.keywords.is_empty() {
        0.0
    } else {
        matched_keywords.len() as f64 / rule.keywords.len() as f64
    };

    let threshold = if rule.mandatory {
        HARD_RULE_MATCH_THRESHOLD
    } else {
        SOFT_RULE_MATCH_THRESHOLD
    };
    let compliant = match_ratio >= threshold;
    let confidence = if rule.mandatory {
        (match_ratio * 2.0).min(1.0)
    } else {
        match_ratio
    };
    let failure_reason = (!compliant).then(|| {
        describe_shortfall(matched_keywords.len(), rule.keywords.len(), threshold)
    });

    let evidence = text.evidence(&lowered_matches);

    debug!(
        rule_id = %rule.id,
        class = %rule.class(),
        matched = matched_keywords.len(),
        total = rule.keywords.len(),
        compliant,
        "evaluated rule"
    );

    RuleEvaluation {
        rule_id: rule.id.clone(),
        compliant,
        confidence,
        matched_keywords,
        match_ratio,
        evidence,
        failure_reason,
    }
}

fn describe_shortfall(matched: usize, total: usize, threshold: f64) -> String {
    if matched == 0 {
        format!("none of the {total} keywords were found")
    } else {
        format!(
            "matched {matched} of {total} keywords, below the {:.0}% threshold",
            threshold * 100.0
        )
    }
}
