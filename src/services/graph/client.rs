use reqwest::header;
use url::Url;

use crate::config::GraphConfig;
use crate::services::graph::types::{DirectoryObject, GraphError, ODataPage};
use crate::services::identity::AccessToken;

/// Thin Graph client: one GET per page, no retries.
#[derive(Debug)]
pub struct GraphClient<'a> {
    config: &'a GraphConfig,
    http: &'a reqwest::Client,
}

impl<'a> GraphClient<'a> {
    pub fn new(config: &'a GraphConfig, http: &'a reqwest::Client) -> Self {
        Self { config, http }
    }

    fn base_url(&self) -> Result<Url, GraphError> {
        let invalid = |reason| GraphError::InvalidBaseUrl {
            url: self.config.base_url.clone(),
            reason,
        };

        let url = Url::parse(&self.config.base_url).map_err(|_| invalid("not an absolute URL"))?;
        if url.cannot_be_a_base() {
            return Err(invalid("cannot be a base URL"));
        }
        Ok(url)
    }

    /// `{base}/users/{user_id}/memberOf`, with `user_id` percent-encoded as a
    /// single path segment.
    pub fn member_of_url(&self, user_id: &str) -> Result<Url, GraphError> {
        let mut url = self.base_url()?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("users")
                .push(user_id)
                .push("memberOf");
        }
        Ok(url)
    }

    /// Collect every `memberOf` entry for `user_id`, following
    /// `@odata.nextLink` up to `max_pages` pages.
    #[tracing::instrument(skip(self, token))]
    pub async fn member_of(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<Vec<DirectoryObject>, GraphError> {
        let first = self.member_of_url(user_id)?;
        let origin = first.origin();

        let mut objects = Vec::new();
        let mut next = Some(first);
        let mut pages = 0;

        while let Some(url) = next {
            if pages == self.config.max_pages {
                tracing::warn!(
                    max_pages = self.config.max_pages,
                    collected = objects.len(),
                    "memberOf has more pages than allowed; returning partial result"
                );
                break;
            }

            let page: ODataPage<DirectoryObject> = self
                .http
                .get(url)
                .bearer_auth(token.as_str())
                .header(header::ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            pages += 1;
            objects.extend(page.value);

            next = match page.next_link {
                Some(link) => {
                    // The bearer token must not leave the Graph origin.
                    let url = Url::parse(&link)
                        .ok()
                        .filter(|url| url.origin() == origin)
                        .ok_or(GraphError::InvalidNextLink(link))?;
                    Some(url)
                }
                None => None,
            };
        }

        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    fn graph(base_url: &str, max_pages: usize) -> GraphConfig {
        GraphConfig {
            base_url: base_url.to_string(),
            max_pages,
        }
    }

    fn group(name: &str) -> serde_json::Value {
        json!({
            "@odata.type": "#microsoft.graph.group",
            "id": "6f0b2c1e-0000-4000-8000-000000000000",
            "displayName": name
        })
    }

    #[test]
    fn member_of_url_for_guid() {
        let config = graph("https://graph.microsoft.com/v1.0", 1);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let url = client
            .member_of_url("4562bcc8-b593-4913-a0bf-5e2f2a5f3a1c")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/users/4562bcc8-b593-4913-a0bf-5e2f2a5f3a1c/memberOf"
        );
    }

    #[test]
    fn member_of_url_escapes_unsafe_characters() {
        let config = graph("https://graph.microsoft.com/v1.0/", 1);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let url = client.member_of_url("a b/c?d#e%f").unwrap();

        assert_eq!(url.path(), "/v1.0/users/a%20b%2Fc%3Fd%23e%25f/memberOf");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn member_of_url_rejects_bad_base() {
        let config = graph("graph.microsoft.com", 1);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        assert!(matches!(
            client.member_of_url("someone"),
            Err(GraphError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn member_of_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf"))
            .and(header("authorization", "Bearer token-abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"value": [group("Engineering")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 10);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let objects = client
            .member_of(&AccessToken::new("token-abc"), "user-1")
            .await
            .unwrap();

        assert_eq!(
            objects,
            vec![DirectoryObject {
                odata_type: Some("#microsoft.graph.group".to_string()),
                display_name: Some("Engineering".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn member_of_follows_next_link_in_order() {
        let server = MockServer::start().await;
        let next = format!("{}/v1.0/users/user-1/memberOf/page-2", server.uri());
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [group("Engineering")],
                "@odata.nextLink": next
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf/page-2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"value": [group("Admins")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 10);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let names: Vec<_> = client
            .member_of(&AccessToken::new("t"), "user-1")
            .await
            .unwrap()
            .into_iter()
            .filter_map(|o| o.display_name)
            .collect();

        assert_eq!(names, vec!["Engineering", "Admins"]);
    }

    #[tokio::test]
    async fn member_of_stops_at_page_limit() {
        let server = MockServer::start().await;
        let next = format!("{}/v1.0/users/user-1/memberOf/page-2", server.uri());
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [group("Engineering")],
                "@odata.nextLink": next
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf/page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
            .expect(0)
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 1);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let objects = client
            .member_of(&AccessToken::new("t"), "user-1")
            .await
            .unwrap();

        assert_eq!(objects.len(), 1);
    }

    #[tokio::test]
    async fn next_link_to_foreign_origin_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [],
                "@odata.nextLink": "https://attacker.example/collect"
            })))
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 10);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let err = client
            .member_of(&AccessToken::new("t"), "user-1")
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::InvalidNextLink(_)));
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/missing/memberOf"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "Request_ResourceNotFound", "message": "not found"}
            })))
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 10);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let err = client
            .member_of(&AccessToken::new("t"), "missing")
            .await
            .unwrap_err();

        match err {
            GraphError::Request(e) => {
                assert_eq!(e.status(), Some(reqwest::StatusCode::NOT_FOUND))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn body_without_value_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/users/user-1/memberOf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let config = graph(&format!("{}/v1.0", server.uri()), 10);
        let http = reqwest::Client::new();
        let client = GraphClient::new(&config, &http);

        let err = client
            .member_of(&AccessToken::new("t"), "user-1")
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::Request(ref e) if e.is_decode()));
    }
}
