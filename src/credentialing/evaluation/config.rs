/// Minimum share of a hard rule's keywords that must appear for the rule to pass.
pub const HARD_RULE_MATCH_THRESHOLD: f64 = 0.3;
/// Minimum share of a soft rule's keywords that must appear for the rule to pass.
pub const SOFT_RULE_MATCH_THRESHOLD: f64 = 0.2;
/// Source lines retained as evidence per rule.
pub const MAX_EVIDENCE_LINES: usize = 3;
