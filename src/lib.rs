//! ACME DNS-01 challenge helper for PowerDNS-hosted zones.

pub mod challenge;
pub mod config;
pub mod error;
pub mod powerdns;

pub use challenge::{ChallengeHandler, DEFAULT_TTL};
pub use config::Credentials;
pub use error::{ConfigError, PluginError, TransportError};

/// Builds a handler for one challenge session, fetching the zone inventory.
pub async fn setup(credentials: &Credentials) -> Result<ChallengeHandler, PluginError> {
    ChallengeHandler::connect(credentials).await
}
