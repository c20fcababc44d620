// Route modules
pub mod fees;
pub mod members;
pub mod non_members;
pub mod trip_types;
pub mod trips;
pub mod users;

use crate::{
    app_state::AppState,
    middleware::{create_rate_limiter, grant_access, jwt_auth_middleware, logging_middleware},
    models::role::{Action, Resource},
};
use axum::{middleware, Router};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state.clone()))
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes(state: AppState) -> Router<AppState> {
    // Club administration routes, each gated by role
    let mut protected_routes = Router::new()
        .merge(members::routes())
        .merge(non_members::routes())
        .merge(fees::routes())
        .merge(trip_types::routes())
        .merge(trips::routes())
        .merge(users::session_routes(state.config.is_development()));

    if state.config.rate_limit_active() {
        let rate_limiter =
            create_rate_limiter(state.redis.clone(), state.config.rate_limit.clone());
        protected_routes = protected_routes.route_layer(middleware::from_fn(rate_limiter));
    }

    let protected_routes = protected_routes.layer(middleware::from_fn_with_state(
        state.clone(),
        jwt_auth_middleware,
    ));

    // Public routes (no authentication required)
    let public_routes = users::public_routes();

    // Combine all routes with request/response body logging
    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(middleware::from_fn(logging_middleware))
}

/// Restrict a router to roles granted `action` on `resource`
fn gated(router: Router<AppState>, resource: Resource, action: Action) -> Router<AppState> {
    router.route_layer(middleware::from_fn(grant_access(resource, action)))
}
