use crate::error::TransportError;
use crate::powerdns::names::{ensure_dot, ensure_slash};
use crate::powerdns::types::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const API_PATH: &str = "api/v1";
const SERVER_ID: &str = "localhost";

#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
}

impl PowerDnsClient {
    /// `api_url` is the server root without path or API version.
    pub fn new(api_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("{}{}", ensure_slash(api_url), API_PATH),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
    }

    fn zone_uri(zone_name: &str) -> String {
        format!("/servers/{}/zones/{}", SERVER_ID, ensure_dot(zone_name))
    }

    /// Sends one request. `Ok(None)` stands for 204 or an empty/`null` body.
    pub async fn query<B: Serialize + ?Sized>(
        &self,
        uri: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<Option<Value>, TransportError> {
        let url = format!("{}{}", self.base_url, uri);
        let sends_body = [Method::POST, Method::PUT, Method::PATCH].contains(&method);
        if !sends_body && method != Method::GET && method != Method::DELETE {
            return Err(TransportError::UnsupportedMethod(method));
        }

        let req = self.with_headers(self.http.request(method, url));
        let req = match body {
            Some(body) if sends_body => req.json(body),
            _ => req,
        };

        let res = req.send().await?;
        let status = res.status();
        debug!(%status, uri, "PowerDNS responded");
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = res.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status { status, body: text });
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&text)?;
        Ok((!value.is_null()).then_some(value))
    }

    pub async fn list_zones(&self) -> Result<Vec<PdnsZone>, TransportError> {
        let uri = format!("/servers/{}/zones", SERVER_ID);
        match self.query::<()>(&uri, Method::GET, None).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn patch_rrsets(
        &self,
        zone_name: &str,
        rrsets: &[PdnsRrset],
    ) -> Result<(), TransportError> {
        let body = PatchBody { rrsets };
        match self
            .query(&Self::zone_uri(zone_name), Method::PATCH, Some(&body))
            .await?
        {
            None => Ok(()),
            Some(response) => Err(TransportError::Api { response }),
        }
    }

    pub async fn apply(&self, change: &RecordChange) -> Result<(), TransportError> {
        self.patch_rrsets(&change.zone_name, &[change.to_rrset()])
            .await
    }

    pub async fn replace_record(
        &self,
        zone_name: &str,
        record_name: &str,
        record_type: &str,
        ttl: u32,
        content: &str,
    ) -> Result<(), TransportError> {
        self.apply(&RecordChange::replace(
            zone_name,
            record_name,
            record_type,
            ttl,
            content,
        ))
        .await
    }

    pub async fn delete_record(
        &self,
        zone_name: &str,
        record_name: &str,
        record_type: &str,
    ) -> Result<(), TransportError> {
        self.apply(&RecordChange::delete(zone_name, record_name, record_type))
            .await
    }
}
