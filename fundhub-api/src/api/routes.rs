//! API route definitions

use super::{handlers::*, ApiState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create investment routes
pub fn create_investment_routes() -> Router<ApiState> {
    Router::new()
        .route("/api/funds/investments", post(record_investment))
        .route("/api/funds/investments/summary", get(get_investment_summary))
        .route("/api/funds/:fund_id/investments", get(get_fund_investments))
}

/// Create fund-level routes
pub fn create_fund_routes() -> Router<ApiState> {
    Router::new().route("/api/funds/:fund_id/statistics", get(get_fund_statistics))
}
