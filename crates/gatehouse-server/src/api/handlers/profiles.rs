//! Admin resident-management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::profile::Profile;
use gatehouse_core::repository::{Pagination, ProfileRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::authorize;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            user_id: p.user_id,
            full_name: p.full_name,
            phone_number: p.phone_number,
            flat_number: p.flat_number,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListResponse {
    pub items: Vec<ProfileResponse>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// `GET /profiles` — admin listing of resident profiles.
pub async fn list_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProfileListQuery>,
) -> ApiResult<Json<ProfileListResponse>> {
    let ctx = authorize(&state, &headers).await?;
    if !ctx.is_admin() {
        return Err(GatehouseError::Forbidden {
            reason: "profile listing requires admin".into(),
        }
        .into());
    }

    let page = state
        .profiles
        .list(Pagination {
            offset: query.offset,
            limit: query.limit,
        })
        .await?;

    Ok(Json(ProfileListResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignFlatBody {
    pub flat_number: String,
}

/// `POST /profiles/:id/flat` — admin sets (or moves) a resident's
/// flat assignment. An occupied flat is a conflict.
pub async fn assign_flat(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<AssignFlatBody>,
) -> ApiResult<Json<ProfileResponse>> {
    let ctx = authorize(&state, &headers).await?;
    if !ctx.is_admin() {
        return Err(GatehouseError::Forbidden {
            reason: "flat assignment requires admin".into(),
        }
        .into());
    }

    let profile = state.profiles.assign_flat(user_id, &body.flat_number).await?;
    Ok(Json(profile.into()))
}
