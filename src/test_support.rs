//! Shared fixtures for router-level tests.
use crate::config::Config;

/// Config pointing both the authority (`{uri}/contoso`) and Graph
/// (`{uri}/v1.0`) at one mock server.
pub fn config_for(server_uri: &str) -> Config {
    Config::from_lookup(|key| match key {
        "AZURE_AUTHORITY" => Some(format!("{server_uri}/contoso")),
        "AZURE_CLIENT_ID" => Some("client-123".to_string()),
        "CLIENT_CREDENTIAL" => Some("s3cret".to_string()),
        "GRAPH_BASE_URL" => Some(format!("{server_uri}/v1.0")),
        _ => None,
    })
    .expect("test config is complete")
}
