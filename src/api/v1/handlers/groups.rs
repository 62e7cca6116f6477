/*
 * Responsibility
 * - GET/POST /groups[/{userid}]
 * - client-credentials token → Graph memberOf → `{type: displayName}`
 * - The user id is resolved by the extractor, so a request without one is
 *   rejected before any upstream call
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::groups::{GroupsResponse, reduce_memberships},
        extractors::UserId,
    },
    error::AppError,
    services::{graph::GraphClient, identity::ConfidentialClient},
    state::AppState,
};

/// The user id is resolved first (by the extractor), then the token is
/// requested, then Graph is queried. A request without a user id is therefore
/// answered 400 even when the token grant would fail.
pub async fn get_groups(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<GroupsResponse>, AppError> {
    tracing::info!("groups request received");

    let client = ConfidentialClient::new(&state.identity, &state.http).map_err(|err| {
        tracing::warn!(error = %err, "unable to build client-credentials requester");
        AppError::ClientInit
    })?;

    let token = client
        .acquire_token_for_client(&state.identity.scopes)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "access token acquisition failed");
            AppError::TokenUnavailable
        })?;

    let memberships = GraphClient::new(&state.graph, &state.http)
        .member_of(&token, &user_id)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "Graph memberOf query failed");
            AppError::from(err)
        })?;

    tracing::info!(count = memberships.len(), "received memberships from Graph");
    tracing::debug!(?memberships, "memberOf content");

    Ok(Json(reduce_memberships(memberships)))
}
