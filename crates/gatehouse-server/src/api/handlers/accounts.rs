//! Account provisioning handler.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use gatehouse_auth::provisioning::CreateAccountRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::bearer_token;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub flat_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub success: bool,
    pub user_id: Uuid,
    /// Present (and true) only when this call performed the one-time
    /// super_admin bootstrap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeded: Option<bool>,
}

/// `POST /create-user`
///
/// Unauthenticated while no super_admin exists (the bootstrap);
/// afterwards requires an admin or super_admin bearer token. All
/// policy lives in the provisioning authority.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateUserBody>,
) -> ApiResult<Json<CreateUserResponse>> {
    let bearer = bearer_token(&headers);

    let provisioned = state
        .provisioning
        .create_account(
            CreateAccountRequest {
                email: body.email,
                password: body.password,
                role: body.role,
                full_name: body.full_name,
                phone_number: body.phone_number,
                flat_number: body.flat_number,
            },
            bearer,
        )
        .await?;

    Ok(Json(CreateUserResponse {
        success: true,
        user_id: provisioned.user_id,
        seeded: provisioned.seeded.then_some(true),
    }))
}
