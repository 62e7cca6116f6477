use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Body returned by the `/oauth2/v2.0/token` endpoint.
///
/// Success and failure share one shape: a successful grant carries
/// `access_token`, a rejected one carries `error` / `error_description`.
#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Bearer token for Microsoft Graph. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid authority {authority:?}: {reason}")]
    InvalidAuthority {
        authority: String,
        reason: &'static str,
    },
    #[error("client id is empty")]
    MissingClientId,
    #[error("client secret is empty")]
    MissingClientSecret,
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token request rejected: {error}: {description}")]
    Rejected { error: String, description: String },
    #[error("token response carried no access_token")]
    MissingAccessToken,
}
