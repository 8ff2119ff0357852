use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fundhub_api::{
    api::create_app, config::ApiConfig, InMemoryStore, InvestmentStore, StoreError, StoreHealth,
    StoreResult,
};
use fundhub_types::{FundStatistics, InvestmentRecord, NewInvestment, UserInvestmentSummary};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(store: Arc<dyn InvestmentStore>) -> Router {
    create_app(store, &ApiConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn dec(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let records = [
        NewInvestment::deposit("alpha", "0xAAA1", "100".parse().unwrap(), "1".parse().unwrap(), "0x01"),
        NewInvestment::deposit("alpha", "0xbbb2", "30".parse().unwrap(), "1.5".parse().unwrap(), "0x02"),
        NewInvestment::redeem("alpha", "0xaaa1", "20".parse().unwrap(), "1.5".parse().unwrap(), "0x03"),
        NewInvestment::deposit("beta", "0xaaa1", "7".parse().unwrap(), "1".parse().unwrap(), "0x04"),
    ];
    for record in records {
        store.record_investment(record.unwrap()).await.unwrap();
    }
    store
}

#[tokio::test]
async fn test_summary_requires_both_parameters() {
    let app = app(Arc::new(InMemoryStore::new()));

    for uri in [
        "/api/funds/investments/summary",
        "/api/funds/investments/summary?fundId=alpha",
        "/api/funds/investments/summary?investor=0xaaa1",
        "/api/funds/investments/summary?fundId=alpha&investor=%20",
    ] {
        let (status, body) = send(app.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "fundId and investor parameters are required");
    }
}

#[tokio::test]
async fn test_summary_for_investor() {
    let app = app(seeded_store().await);

    let (status, body) = send(
        app,
        get("/api/funds/investments/summary?fundId=alpha&investor=0xAAA1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["fundId"], "alpha");
    assert_eq!(dec(&data["totalDeposited"]), Decimal::from(100));
    assert_eq!(dec(&data["totalRedeemed"]), Decimal::from(30));
    assert_eq!(dec(&data["currentShares"]), Decimal::from(80));
    assert_eq!(dec(&data["currentValue"]), Decimal::from(120));
    assert_eq!(data["depositCount"], 1);
    assert_eq!(data["redeemCount"], 1);
}

#[tokio::test]
async fn test_summary_for_unknown_investor_is_empty() {
    let app = app(seeded_store().await);

    let (status, body) = send(
        app,
        get("/api/funds/investments/summary?fundId=alpha&investor=0xffff"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["data"]["totalDeposited"]), Decimal::ZERO);
    assert_eq!(dec(&body["data"]["returnPercentage"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_fund_history_with_investor_filter() {
    let app = app(seeded_store().await);

    let (status, body) = send(app.clone(), get("/api/funds/alpha/investments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    // newest first
    assert_eq!(body["data"]["investments"][0]["txHash"], "0x03");

    let (_, body) = send(app, get("/api/funds/alpha/investments?investor=0xaaa1")).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["investor"], "0xaaa1");
    assert!(body["data"]["investments"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["investor"].as_str().unwrap().eq_ignore_ascii_case("0xaaa1")));
}

#[tokio::test]
async fn test_fund_statistics() {
    let app = app(seeded_store().await);

    let (status, body) = send(app, get("/api/funds/alpha/statistics")).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(dec(&data["totalShares"]), Decimal::from(100));
    assert_eq!(dec(&data["currentSharePrice"]), Decimal::new(15, 1));
    assert_eq!(dec(&data["totalAssets"]), Decimal::from(150));
    assert_eq!(data["totalInvestors"], 2);
    assert_eq!(data["recordCount"], 3);
}

#[tokio::test]
async fn test_record_deposit() {
    let store = Arc::new(InMemoryStore::new());
    let app = app(store.clone());

    let (status, body) = send(
        app,
        post_json(
            "/api/funds/investments",
            json!({
                "fundId": "alpha",
                "investor": "0xabc",
                "type": "deposit",
                "amount": "105",
                "sharePrice": "1.05",
                "txHash": "0xfeed"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "deposit");
    assert_eq!(dec(&body["data"]["shares"]), Decimal::from(100));

    let history = store.fund_investment_history("alpha").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].tx_hash, "0xfeed");
}

#[tokio::test]
async fn test_record_rejects_invalid_input() {
    let app = app(Arc::new(InMemoryStore::new()));

    let (status, body) = send(
        app.clone(),
        post_json(
            "/api/funds/investments",
            json!({
                "fundId": "alpha",
                "investor": "0xabc",
                "type": "redeem",
                "sharePrice": "1",
                "txHash": "0x01"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        app.clone(),
        post_json(
            "/api/funds/investments",
            json!({
                "fundId": "alpha",
                "investor": "0xabc",
                "type": "deposit",
                "amount": "1",
                "sharePrice": "0",
                "txHash": "0x01"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app,
        post_json("/api/funds/investments", json!({ "fundId": "alpha" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

/// Store whose reads always fail
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io {
        path: "investments.json".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable"),
    }
}

#[async_trait]
impl InvestmentStore for BrokenStore {
    async fn record_investment(&self, _: NewInvestment) -> StoreResult<InvestmentRecord> {
        Err(broken())
    }

    async fn user_investment_summary(&self, _: &str, _: &str) -> StoreResult<UserInvestmentSummary> {
        Err(broken())
    }

    async fn fund_investment_history(&self, _: &str) -> StoreResult<Vec<InvestmentRecord>> {
        Err(broken())
    }

    async fn user_fund_investment_history(
        &self,
        _: &str,
        _: &str,
    ) -> StoreResult<Vec<InvestmentRecord>> {
        Err(broken())
    }

    async fn fund_statistics(&self, _: &str) -> StoreResult<FundStatistics> {
        Err(broken())
    }

    async fn health_check(&self) -> StoreResult<StoreHealth> {
        Err(broken())
    }
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = app(Arc::new(BrokenStore));

    let (status, body) = send(
        app,
        get("/api/funds/investments/summary?fundId=alpha&investor=0xaaa1"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("disk unavailable"));
}

#[tokio::test]
async fn test_health() {
    let app = app(seeded_store().await);

    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["recordCount"], 4);
}

#[tokio::test]
async fn test_overflowing_fund_totals_are_internal_errors() {
    let app = app(Arc::new(InMemoryStore::new()));

    for tx_hash in ["0x01", "0x02"] {
        let (status, _) = send(
            app.clone(),
            post_json(
                "/api/funds/investments",
                json!({
                    "fundId": "alpha",
                    "investor": "0xabc",
                    "type": "deposit",
                    "amount": "79228162514264337593543950335",
                    "sharePrice": "1",
                    "txHash": tx_hash
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    for uri in [
        "/api/funds/investments/summary?fundId=alpha&investor=0xabc",
        "/api/funds/alpha/statistics",
    ] {
        let (status, body) = send(app.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("overflow"), "{}", uri);
    }
}
