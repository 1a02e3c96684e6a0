//! DNS-01 challenge handling on top of the PowerDNS client.
//!
//! A [`ChallengeHandler`] is built once per challenge session. It fetches the
//! zone inventory up front and keeps it for its whole lifetime, so every lookup
//! afterwards is served from that snapshot.

use tracing::{debug, error, info};

use crate::config::Credentials;
use crate::error::PluginError;
use crate::powerdns::client::PowerDnsClient;
use crate::powerdns::names::{challenge_record_name, ensure_dot};
use crate::powerdns::types::PdnsZone;

/// TTL used for challenge records unless the caller asks otherwise.
pub const DEFAULT_TTL: u32 = 60;

const TXT: &str = "TXT";

pub struct ChallengeHandler {
    client: PowerDnsClient,
    zones: Vec<PdnsZone>, // fetch order
}

impl ChallengeHandler {
    pub async fn connect(credentials: &Credentials) -> Result<Self, PluginError> {
        let client = PowerDnsClient::new(&credentials.api_url, credentials.api_key.clone());
        Self::with_client(client).await
    }

    /// Fails when the listing errors out or comes back empty; nothing can be
    /// resolved without the zone inventory.
    pub async fn with_client(client: PowerDnsClient) -> Result<Self, PluginError> {
        debug!("getting list of all zones");
        let zones = client.list_zones().await.map_err(|err| {
            error!(error = %err, "failed to retrieve zones");
            PluginError::ZoneListing(err)
        })?;

        if zones.is_empty() {
            return Err(PluginError::EmptyZoneListing);
        }
        debug!(count = zones.len(), "found zones");

        Ok(Self { client, zones })
    }

    pub fn zones(&self) -> &[PdnsZone] {
        &self.zones
    }

    pub fn find_zone(&self, domain: &str) -> Option<&PdnsZone> {
        find_best_matching_zone(&self.zones, domain)
    }

    /// Publishes `validation_token` at `_acme-challenge.<domain>.`.
    ///
    /// The record name is always derived from `domain`; `_validation_name` is
    /// accepted for symmetry with [`remove_challenge`](Self::remove_challenge).
    pub async fn publish_challenge(
        &self,
        domain: &str,
        _validation_name: &str,
        validation_token: &str,
        ttl: u32,
    ) -> Result<(), PluginError> {
        let zone = self.find_zone(domain).ok_or_else(|| PluginError::ZoneNotFound {
            domain: domain.to_string(),
        })?;

        let record_name = challenge_record_name(domain);
        self.client
            .replace_record(&zone.name, &record_name, TXT, ttl, validation_token)
            .await
            .map_err(|source| PluginError::RecordCreation {
                record_name: record_name.clone(),
                source,
            })?;

        info!(zone = %zone.name, record = %record_name, ttl, "published challenge record");
        Ok(())
    }

    /// Deletes the TXT RRset at `validation_name`.
    ///
    /// A domain without a hosted zone is a no-op. The whole RRset is removed by
    /// name and type; `_validation_token` does not narrow the deletion.
    pub async fn remove_challenge(
        &self,
        domain: &str,
        validation_name: &str,
        _validation_token: &str,
    ) -> Result<(), PluginError> {
        let Some(zone) = self.find_zone(domain) else {
            debug!(domain, "no zone for domain, nothing to clean up");
            return Ok(());
        };

        self.client
            .delete_record(&zone.name, validation_name, TXT)
            .await
            .map_err(|source| PluginError::RecordDeletion {
                record_name: validation_name.to_string(),
                source,
            })?;

        info!(zone = %zone.name, record = %validation_name, "deleted challenge record");
        Ok(())
    }
}

/// Most specific zone hosting `domain`: the domain itself is tried first, then
/// each parent obtained by dropping the leftmost label. Within one candidate the
/// first zone in `zones` order wins.
pub fn find_best_matching_zone<'a>(zones: &'a [PdnsZone], domain: &str) -> Option<&'a PdnsZone> {
    debug!(domain, "checking zones matching domain");
    let mut candidate = domain;

    loop {
        if candidate.is_empty() {
            debug!(domain, "exhausted all zones");
            return None;
        }

        let absolute = ensure_dot(candidate);
        if let Some(zone) = zones.iter().find(|z| ensure_dot(&z.name) == absolute) {
            debug!(zone = %zone.name, domain, "found zone for domain");
            return Some(zone);
        }

        match candidate.split_once('.') {
            Some((_, parent)) => candidate = parent,
            None => {
                debug!(domain, "exhausted all zones");
                return None;
            }
        }
    }
}
