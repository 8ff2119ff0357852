//! REST API for recorded fund investments

mod handlers;
mod responses;
mod routes;

pub use responses::*;
pub use routes::*;

use crate::config::ApiConfig;
use crate::store::InvestmentStore;
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Start the API server
pub async fn start_server(
    store: Arc<dyn InvestmentStore>,
    config: &ApiConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_app(store, config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Create the main API application
pub fn create_app(store: Arc<dyn InvestmentStore>, config: &ApiConfig) -> Router {
    let app = Router::new()
        .merge(create_investment_routes())
        .merge(create_fund_routes())
        .route("/health", get(handlers::health_handler))
        .with_state(ApiState::new(store))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        );

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn InvestmentStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn InvestmentStore>) -> Self {
        Self { store }
    }
}
