use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, AppConfig, Environment};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the router with settings from the global config
pub fn app(state: AppState) -> Router {
    app_with_config(state, config::config())
}

pub fn app_with_config(state: AppState, config: &AppConfig) -> Router {
    let protected = Router::new()
        .merge(post_routes())
        .merge(profile_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(cors_layer(config)),
        );

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn post_routes() -> Router<AppState> {
    use protected::{comments, likes, posts};

    Router::new()
        .route(
            "/posts",
            get(posts::list).post(posts::create).delete(posts::delete_all),
        )
        .route("/posts/:id", get(posts::get).delete(posts::delete))
        .route("/posts/like/:id", put(likes::toggle))
        .route("/posts/comment/:id", post(comments::create))
        .route("/posts/comment/:id/:comment_id", delete(comments::delete))
}

fn profile_routes() -> Router<AppState> {
    use protected::profile;

    Router::new()
        .route("/profile", post(profile::upsert))
        .route("/profile/me", get(profile::me))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if matches!(config.environment, Environment::Development) {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
