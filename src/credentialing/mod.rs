//! Credentialing compliance: rule catalog, per-rule evaluation, scoring, and verdicts.
//!
//! Every caller (CLI, HTTP routes, batch jobs) goes through the single evaluation path in
//! [`evaluation`]; the catalog is passed in explicitly so alternate catalogs can be swapped in.

pub mod batch;
pub mod catalog;
pub mod evaluation;
pub mod extraction;
pub mod report;

pub use batch::{evaluate_batch, BatchSummary, DocumentInput, DocumentReport};
pub use catalog::{CatalogError, Rule, RuleCatalog, RuleClass, ScoringParameters};
pub use evaluation::{
    evaluate_document, evaluate_rule, ComplianceStatus, DocumentEvaluator, RuleEvaluator,
    ScoreBreakdown,
};
pub use extraction::{ExtractedFields, FieldName};
pub use report::{ComplianceReport, RuleEvaluation};
