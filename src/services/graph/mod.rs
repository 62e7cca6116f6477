//! Microsoft Graph directory queries.
pub mod client;
pub mod types;

pub use client::GraphClient;
pub use types::{DirectoryObject, GraphError};
