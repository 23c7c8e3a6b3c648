//! Thin axum control-plane binary: `POST /stream`, `GET /stream/{id}`,
//! `GET /history/{id}`, `GET /thread/{id}`, `GET /thread/{id}/agents`,
//! `GET /api/artifacts/{id}`. Every handler deserializes its input, calls
//! straight into `fin-graph`/`fin-events`/`fin-artifacts`, and serializes
//! the result -- no validation or business logic lives in this crate.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod runtime;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
