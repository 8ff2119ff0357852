/// Shared types for the fundhub vault dashboard
///
/// This crate provides the records, fixed-point quantities, error taxonomy and
/// aggregation helpers used by the SDK, the CLI and the query service.

pub mod amount;
pub mod error;
pub mod fund;
pub mod investment;
pub mod metrics;
pub mod validation;

// Re-export all public types
pub use amount::*;
pub use error::*;
pub use fund::*;
pub use investment::*;
pub use metrics::*;
pub use validation::*;
