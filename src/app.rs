use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{AppConfig, Environment};
use crate::database::{ArtworkRepository, CategoryRepository, Database, ProjectRepository, UserRepository};
use crate::handlers;
use crate::media::{ImageKitClient, MediaError, MediaStore, MemoryMediaStore};
use crate::middleware::jwt_auth_middleware;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig, media: Arc<dyn MediaStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            media,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.pool().clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.pool().clone())
    }

    pub fn artworks(&self) -> ArtworkRepository {
        ArtworkRepository::new(self.db.pool().clone())
    }

    pub fn projects(&self) -> ProjectRepository {
        ProjectRepository::new(self.db.pool().clone())
    }
}

/// ImageKit when a private key is configured. Development falls back to an
/// in-memory store so the API can run without credentials.
pub fn media_store(config: &AppConfig) -> Result<Arc<dyn MediaStore>, MediaError> {
    match ImageKitClient::new(&config.media) {
        Ok(client) => {
            info!("Using ImageKit media host");
            Ok(Arc::new(client))
        }
        Err(MediaError::NotConfigured(key)) if config.environment == Environment::Development => {
            warn!("{} not set; uploaded images will not be stored", key);
            let base = if config.media.url_endpoint.is_empty() {
                format!("http://localhost:{}/media", config.api.port)
            } else {
                config.media.url_endpoint.clone()
            };
            Ok(Arc::new(MemoryMediaStore::new(base)))
        }
        Err(e) => Err(e),
    }
}

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes())
        .merge(category_routes())
        .merge(artwork_routes())
        .merge(project_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::{artworks, auth, categories, projects};

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/profile/:userId", get(auth::public_profile))
        .route("/api/categories", get(categories::list))
        .route("/api/categories/user/:userId", get(categories::list_by_user))
        .route("/api/artworks", get(artworks::list))
        .route("/api/artworks/user/:userId", get(artworks::list_by_user))
        .route("/api/artworks/:id", get(artworks::get))
        .route("/api/projects", get(projects::list))
        .route("/api/projects/user/:userId", get(projects::list_by_user))
        .route("/api/projects/:id", get(projects::get))
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/profile", get(auth::profile_get).put(auth::profile_put))
        .route("/api/auth/password", put(auth::password_put))
        .route("/api/auth/profile/image", post(auth::profile_image_post))
}

fn category_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::protected::categories;

    Router::new()
        .route("/api/categories/my", get(categories::list_mine))
        .route("/api/categories", post(categories::create))
        .route("/api/categories/:id", put(categories::update).delete(categories::delete))
}

fn artwork_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::protected::artworks;

    Router::new()
        .route("/api/artworks/my", get(artworks::list_mine))
        .route("/api/artworks", post(artworks::create))
        .route("/api/artworks/:id", put(artworks::update).delete(artworks::delete))
}

fn project_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use handlers::protected::projects;

    Router::new()
        .route("/api/projects/my", get(projects::list_mine))
        .route("/api/projects", post(projects::create))
        .route("/api/projects/:id", put(projects::update).delete(projects::delete))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Portfolio CMS API",
            "version": version,
            "description": "Backend for a portfolio content-management app",
            "endpoints": {
                "auth": "/api/auth/* (register, login public; profile and password protected)",
                "categories": "/api/categories[/:id] (read public, write protected)",
                "artworks": "/api/artworks[/:id] (read public, write protected)",
                "projects": "/api/projects[/:id] (read public, write protected)",
                "health": "/health"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
