use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::models::FileUrls;
use crate::database::Storage;
use crate::handlers::{self, protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{ProductService, UserService};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    storage: Arc<dyn Storage>,
    products: ProductService,
    users: UserService,
}

impl AppState {
    pub fn new<S: Storage + 'static>(config: AppConfig, storage: Arc<S>) -> Result<Self, url::ParseError> {
        let files = FileUrls::new(&config.storage.public_url)?;

        Ok(Self {
            products: ProductService::new(storage.clone()),
            users: UserService::new(storage.clone(), files),
            storage,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn products(&self) -> &ProductService {
        &self.products
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    if state.config().security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(public::users::register))
        .route("/sessions", post(public::sessions::create))
        .route("/products", get(public::products::list))
        .route("/products/:id", get(public::products::show))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", put(protected::users::update))
        .route("/products/own", get(protected::products::list_own))
        .route(
            "/products",
            post(protected::products::create).put(protected::products::update),
        )
        .route("/products/:id", delete(protected::products::destroy))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
