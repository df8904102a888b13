use axum::extract::{ Query, State };
use axum::http::{ HeaderMap, StatusCode };
use axum::Json;
use serde::Deserialize;

use crate::db::{ NewTransaction, Transaction, TxType };
use crate::error::{ AppError, Result };
use crate::services::TxListParams;

use super::AppState;

#[derive(Deserialize)]
pub struct TxListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    #[serde(default)]
    pub date_gte: Option<String>,
    #[serde(rename = "_order")]
    pub order: Option<String>,
}

/// Body of POST /transactions. The acting user always comes from the bearer
/// token; a userId in the body is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTxRequest {
    #[serde(rename = "type")]
    pub tx_type: TxType,
    #[serde(default)]
    pub beneficiary: String,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub pix_key: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TxListQuery>
) -> Result<Json<Vec<Transaction>>> {
    let user = super::authenticate(&state, &headers)?;

    let user_id = query.user_id.ok_or_else(||
        AppError::InvalidInput("userId obrigatório".to_string())
    )?;

    let ascending = query.order.as_deref().map(str::to_lowercase).as_deref() == Some("asc");

    let list = state.transaction_service.list(&user, TxListParams {
        user_id,
        tx_type: query.tx_type,
        date_gte: query.date_gte,
        ascending,
    })?;

    Ok(Json(list))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTxRequest>
) -> Result<(StatusCode, Json<Transaction>)> {
    let user = super::authenticate(&state, &headers)?;

    let amount = request.amount.ok_or_else(||
        AppError::InvalidInput("Valor inválido".to_string())
    )?;

    let tx = state.transaction_service.create(&user, NewTransaction {
        tx_type: request.tx_type,
        beneficiary: request.beneficiary,
        document: request.document,
        bank: request.bank,
        agency: request.agency,
        account: request.account,
        pix_key: request.pix_key,
        amount,
        date: request.date.unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
    })?;

    Ok((StatusCode::CREATED, Json(tx)))
}
