/*
 * Responsibility
 * - Resolve the target user id of a groups request
 * - Lookup order: path `{userid}` → query `?userid=` → JSON body `{"userid": ...}`
 * - Empty values count as absent; a body that is not the expected JSON is skipped
 * - A body that cannot be read (over the size limit, broken stream) is rejected
 *   with the rejection's own status
 * - Nothing found → AppError::MissingUserId (400)
 */
use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

#[derive(Debug, Deserialize)]
struct UserIdParam {
    userid: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn from_path<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    let Path(mut params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .ok()?;
    present(params.remove("userid"))
}

fn from_query(parts: &Parts) -> Option<String> {
    let Query(param) = Query::<UserIdParam>::try_from_uri(&parts.uri).ok()?;
    present(param.userid)
}

async fn from_body<S: Send + Sync>(req: Request, state: &S) -> Result<Option<String>, AppError> {
    let bytes = Bytes::from_request(req, state).await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let id = serde_json::from_slice::<UserIdParam>(&bytes)
        .ok()
        .and_then(|param| present(param.userid));
    Ok(id)
}

impl<S> FromRequest<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        if let Some(id) = from_path(&mut parts, state).await {
            return Ok(Self(id));
        }
        if let Some(id) = from_query(&parts) {
            return Ok(Self(id));
        }

        let req = Request::from_parts(parts, body);
        from_body(req, state)
            .await?
            .map(Self)
            .ok_or(AppError::MissingUserId)
    }
}
