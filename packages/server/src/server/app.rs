//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{agent_builders, assets, health_handler, mcp_catalogs};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(db_pool: PgPool, deps: ServerDeps, jwt_service: JwtService) -> Self {
        Self {
            db_pool,
            deps: Arc::new(deps),
            jwt_service: Arc::new(jwt_service),
        }
    }
}

/// CORS for the admin frontend; no configured origins means any origin (development)
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let jwt_service = state.jwt_service.clone();

    let agent_builder_routes = Router::new()
        .route(
            "/",
            get(agent_builders::list_agent_builders).post(agent_builders::create_agent_builder),
        )
        .route("/stream", post(agent_builders::stream_agent_graph))
        .route("/templates", get(agent_builders::list_templates))
        .route("/templates/:template_id", get(agent_builders::get_template))
        .route(
            "/:graph_id",
            get(agent_builders::get_agent_builder).delete(agent_builders::delete_agent_builder),
        )
        .route("/:graph_id/info", put(agent_builders::update_agent_info))
        .route("/:graph_id/graph", put(agent_builders::save_agent_graph))
        .route("/:graph_id/lineages", get(agent_builders::get_agent_lineages))
        .route(
            "/:graph_id/policy",
            get(agent_builders::get_agent_policy).put(agent_builders::set_agent_policy),
        )
        .route("/:graph_id/app-info", get(agent_builders::get_app_info))
        .route("/:graph_id/export", get(agent_builders::export_code));

    let mcp_routes = Router::new()
        .route("/", post(mcp_catalogs::create_mcp_catalog))
        .route("/:catalog_id", axum::routing::delete(mcp_catalogs::delete_mcp_catalog));

    Router::new()
        .nest("/api/v1/agent-builders", agent_builder_routes)
        .nest("/api/v1/mcp-catalogs", mcp_routes)
        .route("/api/v1/assets/move", put(assets::move_asset))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
