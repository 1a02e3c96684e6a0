// src/error.rs
use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Failures talking to the PowerDNS HTTP API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to PowerDNS failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("PowerDNS answered with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed JSON from PowerDNS: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid method '{0}'")]
    UnsupportedMethod(Method),

    /// A mutating call got a body back instead of 204.
    #[error("bad return from PowerDNS API: {response}")]
    Api { response: Value },
}

impl TransportError {
    /// Raw API response attached to an application-level failure, if any.
    pub fn api_response(&self) -> Option<&Value> {
        match self {
            TransportError::Api { response } => Some(response),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("error while retrieving zones from PowerDNS API: {0}")]
    ZoneListing(#[source] TransportError),

    #[error("zone listing returned nothing")]
    EmptyZoneListing,

    #[error("could not find zone for {domain}")]
    ZoneNotFound { domain: String },

    #[error("failed to add TXT record {record_name}: {source}")]
    RecordCreation {
        record_name: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to delete TXT record {record_name}: {source}")]
    RecordDeletion {
        record_name: String,
        #[source]
        source: TransportError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read credentials file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing or empty '{0}' in credentials")]
    MissingField(&'static str),
}
