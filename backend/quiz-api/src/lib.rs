use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::ApiError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api = api_routes(&app_state.config);

    Router::new()
        // Public endpoints
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        // Quiz API
        .nest("/api", api)
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/get-questions",
            with_cors(
                get(handlers::questions::get_questions),
                config,
                Method::GET,
            ),
        )
        .route(
            "/get-score-descriptions",
            with_cors(
                get(handlers::score_descriptions::get_score_descriptions),
                config,
                Method::GET,
            ),
        )
        .route(
            "/record-answer",
            with_cors(post(handlers::answers::record_answer), config, Method::POST),
        )
}

/// Adds OPTIONS preflight, the JSON 405 fallback and CORS to a single-method route
fn with_cors(
    route: MethodRouter<Arc<AppState>>,
    config: &Config,
    method: Method,
) -> MethodRouter<Arc<AppState>> {
    // `get` also answers HEAD unless a HEAD handler is set
    route
        .head(handlers::method_not_allowed)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed)
        .layer(cors_layer(config, method))
}

fn cors_layer(config: &Config, method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allowed_origin(config))
}

fn allowed_origin(config: &Config) -> AllowOrigin {
    if config.allows_any_origin() {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}
