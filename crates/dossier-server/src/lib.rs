//! # dossier-server
//!
//! The HTTP surface over the research pipeline. Builds the axum router,
//! wires the admission stack (API-key gate, rate limiter, response cache)
//! in front of the handlers, and serves with graceful shutdown.

#![deny(unsafe_code)]

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::DossierServer;
pub use state::AppState;
