use axum::extract::{ Path, Query, State };
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::{ Account, AccountPatch };
use crate::error::{ AppError, Result };

use super::AppState;

#[derive(Deserialize)]
pub struct AccountListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

pub async fn my_account(
    State(state): State<AppState>,
    headers: HeaderMap
) -> Result<Json<Account>> {
    let user = super::authenticate(&state, &headers)?;

    Ok(Json(state.account_service.my_account(&user)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AccountListQuery>
) -> Result<Json<Vec<Account>>> {
    let user = super::authenticate(&state, &headers)?;

    let user_id = query.user_id.ok_or_else(||
        AppError::InvalidInput("userId obrigatório".to_string())
    )?;

    let accounts = state.account_service.list_for_user(&user, user_id)?;

    Ok(Json(accounts))
}

pub async fn patch_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<AccountPatch>
) -> Result<Json<Account>> {
    let user = super::authenticate(&state, &headers)?;

    let account = state.account_service.patch(&user, id, patch)?;

    Ok(Json(account))
}
