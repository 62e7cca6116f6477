/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - immutable identity / Graph settings + one pooled HTTP client
 * - Cheap to Clone (Arc inside, reqwest::Client is Arc-backed)
 */
use std::sync::Arc;

use crate::config::{GraphConfig, IdentityConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub http: reqwest::Client,
    pub identity: Arc<IdentityConfig>,
    pub graph: Arc<GraphConfig>,
}

impl AppState {
    pub fn new(http: reqwest::Client, identity: IdentityConfig, graph: GraphConfig) -> Self {
        Self {
            http,
            identity: Arc::new(identity),
            graph: Arc::new(graph),
        }
    }
}
