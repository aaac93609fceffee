//! HTTP surface for the presentation layer.

mod ops;
mod router;

pub use ops::{with_operational_routes, AppState};
pub use router::{
    credentialing_router, BatchRequest, BatchResponse, EvaluateRequest, MAX_BATCH_DOCUMENTS,
};
