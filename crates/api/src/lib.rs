//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for fee structures, invoices, payments and fee statements
//! - Authentication middleware and role gates
//! - Request extractors
//! - Response types

pub mod dto;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use axum::Router;
use scholaris_core::billing::DocumentNumbering;
use scholaris_db::{FeeStructureRepository, InvoiceRepository, PaymentRepository};
use scholaris_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Invoice and payment number generator.
    pub numbering: Arc<DocumentNumbering>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, numbering: DocumentNumbering) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            numbering: Arc::new(numbering),
        }
    }

    /// Fee structure repository over the shared pool.
    #[must_use]
    pub fn fee_structures(&self) -> FeeStructureRepository {
        FeeStructureRepository::new((*self.db).clone())
    }

    /// Invoice repository over the shared pool.
    #[must_use]
    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new((*self.db).clone(), (*self.numbering).clone())
    }

    /// Payment repository over the shared pool.
    #[must_use]
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new((*self.db).clone(), (*self.numbering).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
