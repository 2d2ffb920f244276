//! Visitor lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use gatehouse_access::ListScope;
use gatehouse_core::error::GatehouseError;
use gatehouse_core::models::role::Role;
use gatehouse_core::models::visitor::{Decision, Visitor, VisitorInfo};
use gatehouse_core::repository::Pagination;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::authorize;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorResponse {
    pub id: Uuid,
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub flat_number: String,
    pub resident_id: Uuid,
    pub logged_by: Uuid,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Visitor> for VisitorResponse {
    fn from(v: Visitor) -> Self {
        Self {
            id: v.id,
            visitor_name: v.visitor_name,
            visitor_phone: v.visitor_phone,
            purpose: v.purpose,
            flat_number: v.flat_number,
            resident_id: v.resident_id,
            logged_by: v.logged_by,
            status: v.status.to_string(),
            expected_at: v.expected_at,
            notes: v.notes,
            approved_at: v.approved_at,
            approved_by: v.approved_by,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryBody {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub flat_number: String,
    pub notes: Option<String>,
}

/// `POST /visitors` — guard logs a walk-up visitor.
pub async fn log_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LogEntryBody>,
) -> ApiResult<Json<VisitorResponse>> {
    let ctx = authorize(&state, &headers).await?;

    let visitor = state
        .visitors
        .log_entry(
            VisitorInfo {
                visitor_name: body.visitor_name,
                visitor_phone: body.visitor_phone,
                purpose: body.purpose,
                notes: body.notes,
            },
            &body.flat_number,
            &ctx,
        )
        .await?;

    Ok(Json(visitor.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegisterBody {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub purpose: String,
    pub expected_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// `POST /visitors/pre-register` — resident registers an expected
/// guest for their own flat.
pub async fn pre_register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PreRegisterBody>,
) -> ApiResult<Json<VisitorResponse>> {
    let ctx = authorize(&state, &headers).await?;

    let visitor = state
        .visitors
        .pre_register(
            VisitorInfo {
                visitor_name: body.visitor_name,
                visitor_phone: body.visitor_phone,
                purpose: body.purpose,
                notes: body.notes,
            },
            body.expected_at,
            &ctx,
        )
        .await?;

    Ok(Json(visitor.into()))
}

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
    pub decision: Decision,
}

/// `POST /visitors/:id/decision` — owning resident settles a pending
/// entry.
pub async fn decide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<DecisionBody>,
) -> ApiResult<Json<VisitorResponse>> {
    let ctx = authorize(&state, &headers).await?;
    let visitor = state.visitors.decide(id, body.decision, &ctx).await?;
    Ok(Json(visitor.into()))
}

/// `POST /visitors/:id/revoke` — owning resident withdraws an
/// approval.
pub async fn revoke(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<VisitorResponse>> {
    let ctx = authorize(&state, &headers).await?;
    let visitor = state.visitors.revoke(id, &ctx).await?;
    Ok(Json(visitor.into()))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `all`, `own`, or `recent`. Defaults by the caller's primary
    /// role when absent.
    pub scope: Option<String>,
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
pub struct VisitorListResponse {
    pub items: Vec<VisitorResponse>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// `GET /visitors` — role-scoped listing.
pub async fn list_visitors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<VisitorListResponse>> {
    let ctx = authorize(&state, &headers).await?;

    let scope = match query.scope.as_deref() {
        Some("all") => ListScope::All(Pagination {
            offset: query.offset,
            limit: query.limit,
        }),
        Some("own") => ListScope::OwnFlat,
        Some("recent") => ListScope::Recent { limit: query.limit },
        Some(other) => {
            return Err(GatehouseError::InvalidArgument {
                message: format!("unknown scope: {other}"),
            }
            .into());
        }
        // No explicit scope: follow the caller's primary role.
        None => match ctx.roles.primary() {
            Some(Role::Admin) | Some(Role::SuperAdmin) => ListScope::All(Pagination {
                offset: query.offset,
                limit: query.limit,
            }),
            Some(Role::Guard) => ListScope::Recent { limit: query.limit },
            _ => ListScope::OwnFlat,
        },
    };

    let page = state.visitors.list(scope, &ctx).await?;

    Ok(Json(VisitorListResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    }))
}

/// `GET /visitors/expected/:flat` — guard lookup of still-approved
/// pre-registrations for a flat.
pub async fn expected_for_flat(
    State(state): State<AppState>,
    Path(flat): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<VisitorResponse>>> {
    let ctx = authorize(&state, &headers).await?;
    let expected = state.visitors.expected_for_flat(&flat, &ctx).await?;
    Ok(Json(expected.into_iter().map(Into::into).collect()))
}
