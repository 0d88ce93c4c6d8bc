//! HTTP surface of the raffle service.
//!
//! Exposes the submission workflow from `raffle-core` as JSON endpoints under
//! `/raffle`, with request tracing, metrics and a uniform error envelope.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod observability;
pub mod routes;
pub mod state;
pub mod trace_id;

use axum::http::{header, HeaderValue, Method};
use axum::{extract::MatchedPath, middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router around `state`.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    let routes = Router::new()
        .merge(routes::raffle_routes())
        .merge(routes::health_routes())
        .merge(routes::observability_routes())
        .fallback(handlers::route_not_found);

    with_middleware(routes, cors_origins).with_state(state)
}

/// Wrap `routes` in the request pipeline, innermost first: panic recovery,
/// request logging, tower-http tracing, trace ids, CORS. Panic recovery sits
/// inside the trace-id scope so a 500 body reports the request's id.
fn with_middleware(routes: Router<AppState>, cors_origins: &[String]) -> Router<AppState> {
    routes
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id::assign_trace_id))
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn request_logger(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    metrics::observe_http(method.as_str(), &path, status, elapsed.as_secs_f64());

    tracing::info!("{method} {uri} {status} {}ms", elapsed.as_millis());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use prometheus::Registry;
    use raffle_core::RaffleService;
    use tower::ServiceExt;

    async fn explode() -> &'static str {
        panic!("store exploded")
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_500_envelope() {
        let registry = Registry::new_custom(Some("test".into()), None).unwrap();
        metrics::register_all(&registry).unwrap();
        let state = AppState::new(RaffleService::default(), registry);
        let app = with_middleware(Router::new().route("/explode", get(explode)), &[])
            .with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let header_id = response
            .headers()
            .get(trace_id::TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 500);
        assert_eq!(json["message"], "Internal server error: store exploded");
        assert_eq!(json["traceId"], header_id.as_str());
    }
}
