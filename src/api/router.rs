use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::credentialing::{
    evaluate_batch, BatchSummary, DocumentEvaluator, DocumentInput, DocumentReport,
};

/// Upper bound on documents accepted by one batch request.
pub const MAX_BATCH_DOCUMENTS: usize = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub documents: Vec<DocumentInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub summary: BatchSummary,
    pub reports: Vec<DocumentReport>,
}

/// Router builder exposing catalog inspection and document evaluation.
pub fn credentialing_router<E>(evaluator: Arc<E>) -> Router
where
    E: DocumentEvaluator + 'static,
{
    Router::new()
        .route("/api/v1/credentialing/catalog", get(catalog_handler::<E>))
        .route("/api/v1/credentialing/evaluate", post(evaluate_handler::<E>))
        .route("/api/v1/credentialing/batch", post(batch_handler::<E>))
        .with_state(evaluator)
}

pub(crate) async fn catalog_handler<E>(State(evaluator): State<Arc<E>>) -> Response
where
    E: DocumentEvaluator + 'static,
{
    (StatusCode::OK, Json(evaluator.catalog())).into_response()
}

pub(crate) async fn evaluate_handler<E>(
    State(evaluator): State<Arc<E>>,
    Json(request): Json<EvaluateRequest>,
) -> Response
where
    E: DocumentEvaluator + 'static,
{
    let report = evaluator.evaluate(&request.text);
    info!(status = %report.status, score = report.overall_score, "served evaluation");
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn batch_handler<E>(
    State(evaluator): State<Arc<E>>,
    Json(request): Json<BatchRequest>,
) -> Response
where
    E: DocumentEvaluator + 'static,
{
    if request.documents.len() > MAX_BATCH_DOCUMENTS {
        let payload = json!({
            "error": format!(
                "batch holds {} documents; the limit is {}",
                request.documents.len(),
                MAX_BATCH_DOCUMENTS
            ),
        });
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(payload)).into_response();
    }

    let documents = request.documents;
    let outcome =
        tokio::task::spawn_blocking(move || evaluate_batch(evaluator.as_ref(), &documents)).await;

    match outcome {
        Ok(reports) => {
            let summary = BatchSummary::from_reports(&reports);
            info!(
                documents = summary.total,
                compliant = summary.compliant,
                "served batch evaluation"
            );
            (StatusCode::OK, Json(BatchResponse { summary, reports })).into_response()
        }
        Err(error) => {
            warn!(%error, "batch evaluation task failed");
            let payload = json!({
                "error": "batch evaluation failed",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
