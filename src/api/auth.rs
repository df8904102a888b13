use axum::body::Bytes;
use axum::extract::State;
use axum::http::{ HeaderMap, StatusCode };
use axum::Json;
use serde::{ Deserialize, Serialize };

use crate::db::UserPublic;
use crate::error::{ AppError, Result };
use crate::services::SessionTokens;

use super::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>
) -> Result<(StatusCode, Json<SessionTokens>)> {
    let tokens = state.auth_service.register(&request.name, &request.email, &request.password)?;

    Ok((StatusCode::CREATED, Json(tokens)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>
) -> Result<Json<SessionTokens>> {
    let tokens = state.auth_service.login(&request.email, &request.password)?;

    Ok(Json(tokens))
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<UserPublic>> {
    let user = super::authenticate(&state, &headers)?;

    Ok(Json(UserPublic::from(&user)))
}

pub async fn logout(State(state): State<AppState>) -> Json<OkResponse> {
    state.auth_service.logout();

    Json(OkResponse { ok: true })
}

/// The refresh token is read from the `x-refresh-token` header or, failing
/// that, a `{"refreshToken": ...}` body. A malformed body is ignored rather
/// than rejected so header-only callers can send anything.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes
) -> Result<Json<RefreshResponse>> {
    let from_header = headers
        .get("x-refresh-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let from_body = serde_json
        ::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("refreshToken").and_then(|t| t.as_str()).map(str::to_string));

    let token = from_header.or(from_body).ok_or(AppError::InvalidRefresh)?;
    let access_token = state.auth_service.refresh(&token)?;

    Ok(Json(RefreshResponse { access_token }))
}
