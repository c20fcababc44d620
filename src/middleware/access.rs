//! Role-based access checks
//!
//! Runs after `jwt_auth_middleware` and rejects requests whose role does
//! not grant the action on the resource.

use crate::{
    error::{ApiError, Result},
    middleware::jwt_auth::UserIdentity,
    models::role::{Action, Resource},
};
use axum::{extract::Request, middleware::Next, response::Response};
use std::{future::Future, pin::Pin};
use tracing::{debug, warn};

/// Build a middleware allowing only roles that may perform `action` on `resource`
pub fn grant_access(
    resource: Resource,
    action: Action,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response>> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let identity = request
                .extensions()
                .get::<UserIdentity>()
                .ok_or_else(|| ApiError::Unauthorized("User is not authenticated".to_string()))?;

            if !identity.role.can(resource, action) {
                warn!(
                    "Denied {:?} on {:?} for {} (role: {:?})",
                    action, resource, identity.email, identity.role
                );
                return Err(ApiError::Forbidden(
                    "You do not have permission to perform this action".to_string(),
                ));
            }

            debug!("Granted {:?} on {:?} to {}", action, resource, identity.email);

            Ok(next.run(request).await)
        })
    }
}
