use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::evaluation::{ComplianceStatus, DocumentEvaluator};
use super::report::ComplianceReport;

/// One document submitted for batch evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    pub document_id: String,
    pub text: String,
}

/// Report for one document of a batch, keyed by its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub document_id: String,
    pub report: ComplianceReport,
}

/// Evaluate documents in parallel. Output order follows input order.
pub fn evaluate_batch<E>(evaluator: &E, documents: &[DocumentInput]) -> Vec<DocumentReport>
where
    E: DocumentEvaluator + ?Sized,
{
    let reports: Vec<DocumentReport> = documents
        .par_iter()
        .map(|document| DocumentReport {
            document_id: document.document_id.clone(),
            report: evaluator.evaluate(&document.text),
        })
        .collect();

    info!(documents = reports.len(), "evaluated document batch");
    reports
}

/// Number of equal-width bands the 0..=100 score range is split into.
pub const SCORE_BANDS: usize = 5;

/// Aggregate statistics over a batch of reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub compliant: usize,
    pub conditional: usize,
    pub non_compliant: usize,
    /// Share of documents judged compliant, `0.0` for an empty batch.
    pub compliance_rate: f64,
    /// Mean overall score, `0.0` for an empty batch.
    pub average_score: f64,
    /// Documents per 20-point band; the last band includes a perfect 100.
    pub score_distribution: [usize; SCORE_BANDS],
}

impl BatchSummary {
    pub fn from_reports(reports: &[DocumentReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            compliant: 0,
            conditional: 0,
            non_compliant: 0,
            compliance_rate: 0.0,
            average_score: 0.0,
            score_distribution: [0; SCORE_BANDS],
        };

        let mut score_total = 0.0;
        for entry in reports {
            let report = &entry.report;
            match report.status {
                ComplianceStatus::Compliant => summary.compliant += 1,
                ComplianceStatus::Conditional => summary.conditional += 1,
                ComplianceStatus::NonCompliant => summary.non_compliant += 1,
            }
            score_total += report.overall_score;
            summary.score_distribution[score_band(report.overall_score)] += 1;
        }

        if summary.total > 0 {
            summary.compliance_rate = summary.compliant as f64 / summary.total as f64;
            summary.average_score = score_total / summary.total as f64;
        }

        summary
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents: {} compliant, {} conditional, {} non-compliant; \
             compliance rate {:.1}%, average score {:.2}",
            self.total,
            self.compliant,
            self.conditional,
            self.non_compliant,
            self.compliance_rate * 100.0,
            self.average_score
        )
    }
}

fn score_band(score: f64) -> usize {
    let width = 100.0 / SCORE_BANDS as f64;
    ((score.max(0.0) / width).floor() as usize).min(SCORE_BANDS - 1)
}
