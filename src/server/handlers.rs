//! HTTP handlers for link operations
//!
//! The upstream session layer resolves the calling principal and forwards it
//! as an `X-User-Id` header; this core trusts that identifier and performs
//! no authentication itself. An absent header means an anonymous viewer.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{LinksResult, RequestError};
use crate::core::model::{PlatformType, PrivacyLevel, SocialLink};
use crate::registry::{LinkRegistry, UpdateFields};
use crate::visibility::VisibilityEngine;

/// Header carrying the caller identity resolved by the session layer
pub const USER_ID_HEADER: &str = "x-user-id";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LinkRegistry>,
    pub engine: Arc<VisibilityEngine>,
}

/// Viewer-facing serialization of a link.
///
/// Deliberately omits `owner_id` (it is already in the path) and carries
/// only the fields the API contract names.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub platform_type: PlatformType,
    pub url: String,
    pub privacy_level: PrivacyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SocialLink> for LinkResponse {
    fn from(link: SocialLink) -> Self {
        Self {
            id: link.id,
            platform_type: link.platform_type,
            url: link.url,
            privacy_level: link.privacy_level,
            label: link.label,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response for the listing endpoints
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkResponse>,
    pub count: usize,
}

/// Request body for creating a link
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub platform_type: PlatformType,
    pub url: String,
    pub privacy_level: PrivacyLevel,
    #[serde(default)]
    pub label: Option<String>,
}

/// Request body for updating a link; absent fields are left untouched.
///
/// `label` distinguishes absent (keep) from explicit `null` (clear), so a
/// label set once can still be removed.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateLinkRequest {
    pub url: Option<String>,
    pub privacy_level: Option<PrivacyLevel>,
    #[serde(default, deserialize_with = "double_option")]
    pub label: Option<Option<String>>,
}

/// Maps a present field to `Some(value)` so `null` becomes `Some(None)`
/// while an absent field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Extract the caller identity from the request headers, if present
fn caller_identity(headers: &HeaderMap) -> LinksResult<Option<Uuid>> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let text = value.to_str().map_err(|_| RequestError::InvalidIdentity {
        value: "<non-ascii>".to_string(),
    })?;

    let id = Uuid::parse_str(text).map_err(|_| RequestError::InvalidIdentity {
        value: text.to_string(),
    })?;

    Ok(Some(id))
}

/// Extract the caller identity, failing for anonymous requests
fn require_caller(headers: &HeaderMap) -> LinksResult<Uuid> {
    caller_identity(headers)?.ok_or_else(|| RequestError::MissingIdentity.into())
}

/// Create a link
///
/// POST /users/{owner_id}/links
pub async fn create_link(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<CreateLinkRequest>,
) -> LinksResult<(StatusCode, Json<LinkResponse>)> {
    let caller_id = require_caller(&headers)?;

    let link = state
        .registry
        .create(
            caller_id,
            owner_id,
            body.platform_type,
            &body.url,
            body.privacy_level,
            body.label,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Update a link
///
/// PATCH /users/{owner_id}/links/{link_id}
pub async fn update_link(
    State(state): State<AppState>,
    Path((_owner_id, link_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(body): Json<UpdateLinkRequest>,
) -> LinksResult<Json<LinkResponse>> {
    let caller_id = require_caller(&headers)?;

    let fields = UpdateFields {
        url: body.url,
        privacy_level: body.privacy_level,
        label: body.label,
    };

    let link = state.registry.update(link_id, caller_id, fields).await?;

    Ok(Json(link.into()))
}

/// Delete a link
///
/// DELETE /users/{owner_id}/links/{link_id}
pub async fn delete_link(
    State(state): State<AppState>,
    Path((_owner_id, link_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> LinksResult<StatusCode> {
    let caller_id = require_caller(&headers)?;

    state.registry.delete(link_id, caller_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The owner's own editing view, including hidden links
///
/// GET /users/{owner_id}/links
pub async fn list_own_links(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    headers: HeaderMap,
) -> LinksResult<Json<ListLinksResponse>> {
    let caller_id = require_caller(&headers)?;
    if caller_id != owner_id {
        return Err(crate::core::error::RegistryError::Unauthorized { caller_id }.into());
    }

    let links = state.registry.list_all(owner_id).await?;

    Ok(Json(to_list_response(links)))
}

/// The privacy-filtered view for an arbitrary (possibly anonymous) viewer
///
/// GET /users/{owner_id}/profile-links
pub async fn get_visible_links(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    headers: HeaderMap,
) -> LinksResult<Json<ListLinksResponse>> {
    let viewer_id = caller_identity(&headers)?;

    let mut links = state.engine.visible_links(owner_id, viewer_id).await?;

    // Belt-and-suspenders: the engine already excludes hidden links for
    // non-owners, but this endpoint must never serialize one even if the
    // engine regresses.
    if viewer_id != Some(owner_id) {
        links.retain(|l| l.privacy_level != PrivacyLevel::Hidden);
    }

    Ok(Json(to_list_response(links)))
}

fn to_list_response(links: Vec<SocialLink>) -> ListLinksResponse {
    let links: Vec<LinkResponse> = links.into_iter().map(LinkResponse::from).collect();
    ListLinksResponse {
        count: links.len(),
        links,
    }
}
