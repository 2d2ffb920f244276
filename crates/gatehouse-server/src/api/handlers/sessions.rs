//! Sign-in handler.

use axum::Json;
use axum::extract::State;
use gatehouse_auth::service::SignInInput;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub user_id: Uuid,
    pub expires_in: u64,
}

/// `POST /sign-in`
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInBody>,
) -> ApiResult<Json<SignInResponse>> {
    let output = state
        .auth
        .sign_in(SignInInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(SignInResponse {
        access_token: output.access_token,
        user_id: output.user_id,
        expires_in: output.expires_in,
    }))
}
