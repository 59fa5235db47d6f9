//! API module
//!
//! Contains HTTP request handlers and the route table for the expense API

pub mod expenses;
pub mod middleware;
pub mod utils;

use crate::expenses::ExpenseService;
use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Hello payload served at `/`
#[derive(Serialize)]
pub struct HelloResponse {
    /// Greeting
    pub message: String,
    /// Status indicator
    pub status: String,
}

/// Health payload served at `/api/health`
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health indicator
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable detail
    pub message: String,
}

/// Build the application routes over the given service
///
/// Middleware layers are added by the binary.
pub fn router(service: ExpenseService) -> Router {
    Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Expense API
        .route(
            "/api/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/api/expenses/summary", get(expenses::summarize_expenses))
        .route(
            "/api/expenses/:id",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .with_state(service)
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from Expense Tracker Backend!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    })
}
