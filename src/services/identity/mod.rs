//! Client-credentials token acquisition against the Microsoft identity platform.
pub mod client;
pub mod types;

pub use client::ConfidentialClient;
pub use types::AccessToken;
