use reqwest::header;
use secrecy::ExposeSecret;
use url::{Host, Url};

use crate::config::IdentityConfig;
use crate::services::identity::types::{AccessToken, IdentityError, TokenResponse};

/// Confidential client for the OAuth2 client-credentials grant.
///
/// Built per request from the shared `IdentityConfig`; construction only
/// validates settings and never touches the network.
#[derive(Debug)]
pub struct ConfidentialClient<'a> {
    config: &'a IdentityConfig,
    http: &'a reqwest::Client,
    token_endpoint: Url,
}

impl<'a> ConfidentialClient<'a> {
    pub fn new(config: &'a IdentityConfig, http: &'a reqwest::Client) -> Result<Self, IdentityError> {
        if config.client_id.trim().is_empty() {
            return Err(IdentityError::MissingClientId);
        }
        if config.client_secret.expose_secret().trim().is_empty() {
            return Err(IdentityError::MissingClientSecret);
        }

        let token_endpoint = token_endpoint(&config.authority)?;

        Ok(Self {
            config,
            http,
            token_endpoint,
        })
    }

    /// Request an app-only token for `scopes`.
    ///
    /// The endpoint answers errors with a JSON body as well, so the body is
    /// decoded regardless of status and inspected for `access_token`.
    #[tracing::instrument(skip_all, fields(endpoint = %self.token_endpoint))]
    pub async fn acquire_token_for_client(
        &self,
        scopes: &[String],
    ) -> Result<AccessToken, IdentityError> {
        let scope = scopes.join(" ");
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body: TokenResponse = response.json().await?;

        tracing::debug!(
            %status,
            token_type = body.token_type.as_deref().unwrap_or("-"),
            expires_in = body.expires_in.unwrap_or_default(),
            "token endpoint responded"
        );

        match body.access_token.filter(|token| !token.is_empty()) {
            Some(token) => Ok(AccessToken::new(token)),
            None => match body.error {
                Some(error) => Err(IdentityError::Rejected {
                    error,
                    description: body.error_description.unwrap_or_default(),
                }),
                None => Err(IdentityError::MissingAccessToken),
            },
        }
    }
}

/// `{authority}/oauth2/v2.0/token`
///
/// The authority must be an https URL naming a tenant. Plain http is
/// accepted for loopback hosts only.
fn token_endpoint(authority: &str) -> Result<Url, IdentityError> {
    let invalid = |reason| IdentityError::InvalidAuthority {
        authority: authority.to_string(),
        reason,
    };

    let mut url = Url::parse(authority).map_err(|_| invalid("not an absolute URL"))?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        _ => return Err(invalid("scheme must be https")),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }

    let has_tenant = url
        .path_segments()
        .is_some_and(|mut segments| segments.any(|s| !s.is_empty()));
    if !has_tenant {
        return Err(invalid("tenant segment is missing"));
    }

    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base URL"))?
        .pop_if_empty()
        .extend(["oauth2", "v2.0", "token"]);

    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
