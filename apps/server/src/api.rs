use std::sync::Arc;

use crate::{
    auth::{login, register, require_jwt},
    config::Config,
    main_lib::AppState,
};
use axum::{
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod goals;
pub mod schedules;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Answers every OPTIONS request with an empty 200 before routing and auth.
async fn short_circuit_options(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.cors_allow.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect::<Vec<_>>();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Requests running past the configured limit end with an empty 408.
fn timeout_layer(config: &Config) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, config.request_timeout)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let public = Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .merge(goals::router())
        .merge(schedules::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state)
        .layer(middleware::from_fn(short_circuit_options))
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(timeout_layer(config))
        .layer(TraceLayer::new_for_http())
}
