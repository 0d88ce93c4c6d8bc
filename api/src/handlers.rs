use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use raffle_core::{RaffleMap, SubmitResult};
use serde_json::{json, Value};

use crate::{
    error::{ApiError, ApiErrorKind, ApiResult},
    metrics,
    state::AppState,
};

/// Body of a submission: a JSON array of codes. `null` for the whole body or
/// for single codes is accepted here and reported by validation.
pub type SubmitBody = Option<Vec<Option<String>>>;

fn map_json_rejection(err: JsonRejection) -> ApiError {
    ApiError::new(
        ApiErrorKind::from_status(err.status()),
        format!("Invalid JSON payload: {}", err.body_text()),
    )
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let raffles = state.raffles.raffle_count();

    tracing::debug!(uptime_secs = uptime, raffles, "health check passed");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_secs": uptime,
            "raffles": raffles,
        })),
    )
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = metrics::gather_metrics(&state.registry);
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

/// List every raffle as an address → codes object
pub async fn get_all_raffles(State(state): State<AppState>) -> Json<RaffleMap> {
    Json(state.raffles.all_raffles())
}

/// Codes submitted for one address
pub async fn get_raffle(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let codes = state.raffles.raffle_by_address(&address);
    metrics::observe_lookup(codes.is_some());

    codes
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Raffle not found"))
}

/// Validate and store a raffle. Rejected submissions are still a 200; the
/// verdict is in the body.
pub async fn submit_raffle(
    State(state): State<AppState>,
    Path(address): Path<String>,
    payload: Result<Json<SubmitBody>, JsonRejection>,
) -> ApiResult<Json<SubmitResult>> {
    let Json(codes) = payload.map_err(map_json_rejection)?;

    let result = state.raffles.submit(Some(&address), codes.as_deref());
    metrics::observe_submission(result.errors(), state.raffles.raffle_count());

    Ok(Json(result))
}

pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found("Route not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;
    use raffle_core::RaffleService;

    const VALID_ADDRESS: &str = "0x0000000000000000000000000000000000000Abc";

    fn test_state() -> AppState {
        let registry = Registry::new_custom(Some("test".into()), None).unwrap();
        metrics::register_all(&registry).unwrap();
        AppState::new(RaffleService::default(), registry)
    }

    #[tokio::test]
    async fn test_get_raffle_missing_is_not_found() {
        let state = test_state();
        let err = get_raffle(State(state), Path(VALID_ADDRESS.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
        assert_eq!(err.to_string(), "Raffle not found");
    }

    #[tokio::test]
    async fn test_submit_then_get() {
        let state = test_state();
        let body = Some(vec![Some("12345".to_string()), Some("23456".to_string())]);

        let Json(result) = submit_raffle(
            State(state.clone()),
            Path(VALID_ADDRESS.to_string()),
            Ok(Json(body)),
        )
        .await
        .unwrap();
        assert!(result.approved());

        let Json(codes) = get_raffle(State(state.clone()), Path(VALID_ADDRESS.to_string()))
            .await
            .unwrap();
        assert_eq!(codes, vec!["12345", "23456"]);

        let Json(all) = get_all_raffles(State(state)).await;
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_returns_text() {
        let state = test_state();
        metrics::RAFFLES_STORED.set(0);
        let resp = metrics_endpoint(State(state)).await.into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(ct.contains("text/plain"));
    }
}
