//! API request handlers

use super::{responses::*, ApiState};
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use fundhub_types::{
    FundStatistics, InvestmentKind, InvestmentRecord, NewInvestment, UserInvestmentSummary,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

/// Query parameters for the investor summary
#[derive(Deserialize)]
pub struct SummaryQuery {
    #[serde(rename = "fundId")]
    pub fund_id: Option<String>,
    pub investor: Option<String>,
}

/// Optional investor filter for history queries
#[derive(Deserialize)]
pub struct InvestorFilter {
    pub investor: Option<String>,
}

/// Body for recording a confirmed deposit or redemption
///
/// Deposits give the asset `amount`, redemptions the `shares`; the other side
/// is derived from `sharePrice`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInvestmentRequest {
    pub fund_id: String,
    pub investor: String,
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    pub amount: Option<Decimal>,
    pub shares: Option<Decimal>,
    pub share_price: Decimal,
    pub tx_hash: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Summary of one investor's position in a fund
pub async fn get_investment_summary(
    State(state): State<ApiState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<ApiResponse<UserInvestmentSummary>>> {
    let (Some(fund_id), Some(investor)) = (non_blank(query.fund_id), non_blank(query.investor))
    else {
        return Err(ApiError::BadRequest(
            "fundId and investor parameters are required".to_string(),
        ));
    };

    let summary = state
        .store
        .user_investment_summary(&fund_id, &investor)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Investment history of a fund
pub async fn get_fund_investments(
    State(state): State<ApiState>,
    Path(fund_id): Path<String>,
    Query(filter): Query<InvestorFilter>,
) -> ApiResult<Json<ApiResponse<InvestmentHistory<InvestmentRecord>>>> {
    let investor = non_blank(filter.investor);
    let investments = match &investor {
        Some(investor) => {
            state
                .store
                .user_fund_investment_history(&fund_id, investor)
                .await?
        }
        None => state.store.fund_investment_history(&fund_id).await?,
    };

    Ok(Json(ApiResponse::ok(InvestmentHistory {
        fund_id,
        investor,
        total: investments.len(),
        investments,
    })))
}

/// Fund-wide statistics
pub async fn get_fund_statistics(
    State(state): State<ApiState>,
    Path(fund_id): Path<String>,
) -> ApiResult<Json<ApiResponse<FundStatistics>>> {
    let stats = state.store.fund_statistics(&fund_id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// Record a confirmed deposit or redemption
pub async fn record_investment(
    State(state): State<ApiState>,
    body: Result<Json<RecordInvestmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<InvestmentRecord>>)> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let investment = match request.kind {
        InvestmentKind::Deposit => {
            let amount = request
                .amount
                .ok_or_else(|| ApiError::BadRequest("amount is required for deposits".into()))?;
            NewInvestment::deposit(
                request.fund_id,
                request.investor,
                amount,
                request.share_price,
                request.tx_hash,
            )
        }
        InvestmentKind::Redeem => {
            let shares = request
                .shares
                .ok_or_else(|| ApiError::BadRequest("shares are required for redemptions".into()))?;
            NewInvestment::redeem(
                request.fund_id,
                request.investor,
                shares,
                request.share_price,
                request.tx_hash,
            )
        }
    }
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = state.store.record_investment(investment).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// Health check handler
pub async fn health_handler(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let store = state.store.health_check().await?;
    let status = if store.healthy { "healthy" } else { "degraded" };
    Ok(Json(json!({
        "status": status,
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "fundhub-api",
        "store": store,
    })))
}
