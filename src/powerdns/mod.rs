//! Thin client for the PowerDNS v1 HTTP API.

pub mod client;
pub mod names;
pub mod types;
