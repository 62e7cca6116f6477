use serde::Deserialize;
use thiserror::Error;

/// One entry of a `memberOf` collection (group, directory role, admin unit).
///
/// Only the two fields the service reports are decoded; Graph may send
/// either of them as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryObject {
    #[serde(rename = "@odata.type")]
    pub odata_type: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// A page of an OData collection.
#[derive(Debug, Deserialize)]
pub(super) struct ODataPage<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid Graph base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: &'static str },
    #[error("refusing to follow nextLink {0:?}")]
    InvalidNextLink(String),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
