//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod fees;
pub mod health;
pub mod invoices;
pub mod payments;
pub mod statements;

/// Creates the API router: public health check plus authenticated billing
/// routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(fees::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(statements::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
