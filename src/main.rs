use axum::{
    extract::Request,
    middleware,
    routing::{get, post, put},
    Router, ServiceExt,
};
use serde_json::{json, Value};
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};

use gambit_admin_api::config::{AppConfig, Environment};
use gambit_admin_api::database::seed;
use gambit_admin_api::middleware::auth::{admin_gate, user_gate};
use gambit_admin_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Gambit Admin API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; token issuance will be refused");
    }

    let state = AppState::new(config);

    // Seed default roles and admin when the database is reachable; a missing
    // database degrades /health instead of aborting startup
    match state.db.pool().await {
        Ok(pool) => {
            if let Err(e) = seed::seed_admin_accounts(&pool).await {
                tracing::error!("Error seeding admin accounts: {}", e);
            }
        }
        Err(e) => tracing::warn!("Database not reachable at startup: {}", e),
    }

    let port = state.config.server.port;

    // Treat /api/teams and /api/teams/ as the same route
    let app = NormalizePathLayer::trim_trailing_slash().layer(app(state));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Gambit Admin API listening on http://{}", bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .expect("server");
}

fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Admin console API behind the permission gate
        .merge(admin_api_routes(state.clone()))
        // End-user profile API behind the user gate
        .merge(user_api_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Token acquisition and consumer-app reads; no gate
fn public_routes() -> Router<AppState> {
    use gambit_admin_api::handlers::{auth, content, user_auth};

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/user-auth/signup", post(user_auth::signup))
        .route("/api/user-auth/login", post(user_auth::login))
        .route("/api/user-auth/refresh", post(user_auth::refresh))
        .route(
            "/api/content/pages/type/:page_type",
            get(content::page_get_by_type),
        )
}

/// Every route here requires an admin access token; the required permission
/// tag per path lives in the dispatch table the gate consults
fn admin_api_routes(state: AppState) -> Router<AppState> {
    use axum::routing::patch;
    use gambit_admin_api::handlers::{admins, auth, content, leagues, notifications, players,
        reels, roles, subscribers, teams, users};

    Router::new()
        // Session
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/change-password", post(auth::change_password))
        // Admin accounts
        .route("/api/admins", get(admins::list).post(admins::create))
        .route(
            "/api/admins/:id",
            get(admins::get).put(admins::update).delete(admins::delete),
        )
        .route("/api/admins/:id/toggle-status", patch(admins::toggle_status))
        // Roles
        .route("/api/roles", get(roles::list).post(roles::create))
        .route("/api/roles/permissions", get(roles::permissions))
        .route("/api/roles/admin-assignments", get(roles::admin_assignments))
        .route("/api/roles/assign", post(roles::assign))
        .route("/api/roles/unassign", post(roles::unassign))
        .route(
            "/api/roles/:id",
            get(roles::get).put(roles::update).delete(roles::delete),
        )
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/stats", get(users::stats))
        .route("/api/users/uuid/:uuid", get(users::get_by_uuid))
        .route(
            "/api/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        // Leagues
        .route("/api/leagues", get(leagues::list).post(leagues::create))
        .route("/api/leagues/popular", get(leagues::popular))
        .route(
            "/api/leagues/:id",
            get(leagues::get).put(leagues::update).delete(leagues::delete),
        )
        .route("/api/leagues/:id/toggle", put(leagues::toggle))
        // Teams
        .route("/api/teams", get(teams::list).post(teams::create))
        .route("/api/teams/popular", get(teams::popular))
        .route(
            "/api/teams/:id",
            get(teams::get).put(teams::update).delete(teams::delete),
        )
        // Players
        .route("/api/players", get(players::list))
        .route("/api/players/popular", get(players::popular))
        .route("/api/players/:id", get(players::get))
        // Reels
        .route("/api/reels", get(reels::list))
        .route("/api/reels/popular", get(reels::popular))
        .route("/api/reels/manage", get(reels::manage))
        .route("/api/reels/:id", get(reels::get))
        // Subscribers
        .route(
            "/api/subscribers",
            get(subscribers::list).post(subscribers::create),
        )
        .route("/api/subscribers/stats", get(subscribers::stats))
        .route(
            "/api/subscribers/:id",
            get(subscribers::get)
                .put(subscribers::update)
                .delete(subscribers::delete),
        )
        // Content
        .route(
            "/api/content/faqs",
            get(content::faq_list).post(content::faq_create),
        )
        .route(
            "/api/content/faqs/:id",
            get(content::faq_get)
                .put(content::faq_update)
                .patch(content::faq_update)
                .delete(content::faq_delete),
        )
        .route(
            "/api/content/pages",
            get(content::page_list).post(content::page_create),
        )
        .route(
            "/api/content/pages/:id",
            get(content::page_get)
                .put(content::page_update)
                .patch(content::page_update)
                .delete(content::page_delete),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::list).post(notifications::create),
        )
        .route(
            "/api/notifications/:id",
            get(notifications::get)
                .put(notifications::update)
                .delete(notifications::delete),
        )
        .route("/api/notifications/:id/send", post(notifications::send))
        .route_layer(middleware::from_fn_with_state(state, admin_gate))
}

fn user_api_routes(state: AppState) -> Router<AppState> {
    use gambit_admin_api::handlers::user_auth;

    Router::new()
        .route(
            "/api/user-auth/me",
            get(user_auth::me).put(user_auth::update_me),
        )
        .route(
            "/api/user-auth/change-password",
            post(user_auth::change_password),
        )
        .route(
            "/api/user-auth/update-favorites",
            put(user_auth::update_favorites),
        )
        .route_layer(middleware::from_fn_with_state(state, user_gate))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development || config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Gambit Admin API",
            "version": version,
            "description": "Admin backend for the Gambit sports-content platform",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/login, /api/auth/refresh (public - token acquisition)",
                "user_auth": "/api/user-auth/* (public signup/login, token-protected profile)",
                "admins": "/api/admins (protected, roles permission)",
                "roles": "/api/roles (protected, roles permission)",
                "users": "/api/users (protected, users permission)",
                "leagues": "/api/leagues, /api/teams (protected, leagues permission)",
                "players": "/api/players (protected, any admin)",
                "reels": "/api/reels (protected, reels permission)",
                "subscribers": "/api/subscribers (protected, subscribers permission)",
                "content": "/api/content (protected, content permission)",
                "notifications": "/api/notifications (protected, notification permission)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": {
                    "message": "database unavailable",
                    "details": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                }
            })),
        ),
    }
}
