use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use calculateur::workflows::calculateur::{calculator_router, DeadlineService};
use serde_json::json;
use std::sync::Arc;

/// Calculator API plus the operational probes. Probe handlers read
/// [`AppState`] from an `Extension` layer added by the caller.
pub(crate) fn with_calculator_routes(service: Arc<DeadlineService>) -> Router {
    calculator_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use calculateur::workflows::calculateur::Clock;
    use chrono::NaiveDate;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(ready: bool) -> Router {
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid date");
        let service = Arc::new(DeadlineService::standard(Clock::Fixed(today)));
        with_calculator_routes(service).layer(Extension(state(ready)))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn compute_uses_service_clock_when_today_omitted() {
        let payload = r#"{
            "case": {
                "situation": "new_or_renewal_application",
                "application_kind": "renewal",
                "permit_category": {
                    "motif": "activite_professionnelle",
                    "subcategory": "salarie",
                    "permit_type": "csp_salarie"
                },
                "current_expiration_date": "2025-01-01"
            }
        }"#;

        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/calculateur/compute")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["days_remaining"], 92);
        assert_eq!(body["urgency"], "nominal");
        assert_eq!(body["active_window"]["start"], "2024-09-01");
    }

    #[tokio::test]
    async fn malformed_case_is_rejected() {
        let response = app(true)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/calculateur/compute")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "case": { "situation": "naturalisation" } }"#))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert!(response.status().is_client_error());
    }
}
