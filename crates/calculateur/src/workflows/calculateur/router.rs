use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{CaseSituation, ComputationResult};
use super::service::DeadlineService;
use super::statutory::StatutoryEntryView;
use super::taxonomy::{TaxonomyLevel, TaxonomyOption};

#[derive(Debug, Deserialize)]
pub struct ComputeRequest {
    #[serde(rename = "case")]
    pub situation: CaseSituation,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct TaxonomyQuery {
    pub level: TaxonomyLevel,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Router builder exposing the calculator over HTTP.
pub fn calculator_router(service: Arc<DeadlineService>) -> Router {
    Router::new()
        .route("/api/v1/calculateur/compute", post(compute_handler))
        .route("/api/v1/calculateur/taxonomy", get(taxonomy_handler))
        .route(
            "/api/v1/calculateur/decision-kinds",
            get(decision_kinds_handler),
        )
        .with_state(service)
}

pub(crate) async fn compute_handler(
    State(service): State<Arc<DeadlineService>>,
    Json(request): Json<ComputeRequest>,
) -> Json<ComputationResult> {
    Json(service.compute(&request.situation, request.today))
}

pub(crate) async fn taxonomy_handler(
    State(service): State<Arc<DeadlineService>>,
    Query(query): Query<TaxonomyQuery>,
) -> Json<Vec<TaxonomyOption>> {
    let options = service
        .engine()
        .taxonomy()
        .children_of(query.level, query.parent.as_deref());
    Json(options)
}

pub(crate) async fn decision_kinds_handler(
    State(service): State<Arc<DeadlineService>>,
) -> Json<Vec<StatutoryEntryView>> {
    Json(service.engine().statutes().views())
}
