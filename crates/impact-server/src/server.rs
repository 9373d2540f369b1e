use std::any::Any;
use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::{error, warn};

use crate::error::AppError;
use crate::handlers::{
    auth::{current_user, google_callback, google_login, logout},
    health::health_check,
    items::{create_item, delete_item, get_item, list_items, update_item},
    metrics::metrics_handler,
    posts::{create_post, delete_post, get_post, list_posts, update_post},
    root::{not_found, welcome},
    social_data::social_media_data,
};
use crate::middleware::{LoggingLayer, RequestIdLayer, ResponseCacheLayer, require_session};
use crate::state::AppState;

/// Rutas `/api`: sesion primero, despues cache, despues handler.
fn api_router(state: &AppState) -> Router {
    let cache_layer = ResponseCacheLayer::new(
        state.cache().clone(),
        state.http().route_ttl,
        state.http().max_body_bytes,
    );

    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/social-media-posts", get(list_posts).post(create_post))
        .route(
            "/api/social-media-posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/social-media-data", get(social_media_data))
        // El ultimo layer agregado es el mas externo
        .layer(cache_layer)
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state.clone())
}

fn auth_router(state: &AppState) -> Router {
    Router::new()
        .route("/auth/google", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/user", get(current_user))
        .route("/auth/logout", post(logout))
        .with_state(state.clone())
}

fn cors_layer(frontend_url: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        Err(_) => {
            warn!(frontend_url, "Invalid frontend URL, CORS disabled");
            None
        },
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    AppError::Internal("Something broke!".to_string()).into_response()
}

/// Creates a router with the given application state and metrics handle.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // /metrics lleva su propio estado (el handle de Prometheus)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let app_router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .merge(auth_router(&state))
        .merge(api_router(&state))
        .merge(metrics_router);

    let app_router = match &state.http().static_dir {
        Some(dir) => app_router.fallback_service(
            // Rutas del SPA caen en index.html con 200
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => app_router.fallback(not_found),
    };

    let app_router = app_router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ));

    let app_router = match cors_layer(&state.http().frontend_url) {
        Some(cors) => app_router.layer(cors),
        None => app_router,
    };

    app_router.layer(middleware_stack)
}

/// Runs the server with the given state and metrics handle.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
