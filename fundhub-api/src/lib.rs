//! Fundhub API service
//!
//! Records confirmed deposits and redemptions and serves per-investor
//! summaries and fund statistics over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use config::ApiServerConfig;
pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use store::{InMemoryStore, InvestmentStore, StoreHealth};
