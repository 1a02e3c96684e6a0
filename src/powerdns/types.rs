use serde::{Deserialize, Serialize};

use super::names::{ensure_dot, ensure_quotes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsZone {
    pub name: String, // "example.com."
    #[serde(default)]
    pub id: Option<String>, // "example.com."
    #[serde(default)]
    pub kind: Option<String>, // "Native", "Master", ...
    #[serde(default)]
    pub url: Option<String>, // "/api/v1/servers/localhost/zones/example.com."
}

impl PdnsZone {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            kind: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Replace,
    Delete,
}

#[derive(Debug, Serialize)]
pub struct PdnsRrset {
    pub name: String, // "_acme-challenge.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "TXT"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub changetype: ChangeType,
    pub records: Vec<PdnsRecord>,
}

#[derive(Debug, Serialize)]
pub struct PdnsRecord {
    pub content: String, // "\"token\"" for TXT
    pub disabled: bool,
    #[serde(rename = "set-ptr")]
    pub set_ptr: bool,
}

/// Body of a `PATCH /zones/{zone}` request.
#[derive(Debug, Serialize)]
pub struct PatchBody<'a> {
    pub rrsets: &'a [PdnsRrset],
}

/// One atomic RRset mutation against a zone, built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub zone_name: String,
    pub record_name: String,
    pub record_type: String,
    pub ttl: Option<u32>,
    pub content: Option<String>,
    pub change_kind: ChangeType,
}

impl RecordChange {
    pub fn replace(
        zone_name: impl Into<String>,
        record_name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            zone_name: zone_name.into(),
            record_name: record_name.into(),
            record_type: record_type.into(),
            ttl: Some(ttl),
            content: Some(content.into()),
            change_kind: ChangeType::Replace,
        }
    }

    pub fn delete(
        zone_name: impl Into<String>,
        record_name: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            zone_name: zone_name.into(),
            record_name: record_name.into(),
            record_type: record_type.into(),
            ttl: None,
            content: None,
            change_kind: ChangeType::Delete,
        }
    }

    /// Wire form: absolute record name, TXT content quoted, no records on DELETE.
    pub fn to_rrset(&self) -> PdnsRrset {
        let records = match (self.change_kind, &self.content) {
            (ChangeType::Replace, Some(content)) => {
                let content = if self.record_type == "TXT" {
                    ensure_quotes(content)
                } else {
                    content.clone()
                };
                vec![PdnsRecord {
                    content,
                    disabled: false,
                    set_ptr: false,
                }]
            }
            _ => Vec::new(),
        };

        PdnsRrset {
            name: ensure_dot(&self.record_name),
            rrtype: self.record_type.clone(),
            ttl: self.ttl,
            changetype: self.change_kind,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_change_quotes_txt_content_and_absolutizes_name() {
        let rrset = RecordChange::replace(
            "example.com.",
            "_acme-challenge.example.com",
            "TXT",
            60,
            "token",
        )
        .to_rrset();

        assert_eq!(rrset.name, "_acme-challenge.example.com.");
        assert_eq!(rrset.ttl, Some(60));
        assert_eq!(rrset.changetype, ChangeType::Replace);
        assert_eq!(rrset.records.len(), 1);
        assert_eq!(rrset.records[0].content, "\"token\"");
    }

    #[test]
    fn replace_change_leaves_non_txt_content_untouched() {
        let rrset =
            RecordChange::replace("example.com.", "www.example.com.", "A", 300, "192.0.2.1")
                .to_rrset();
        assert_eq!(rrset.records[0].content, "192.0.2.1");
    }

    #[test]
    fn delete_change_carries_no_records() {
        let rrset = RecordChange::delete("example.com", "_acme-challenge.example.com.", "TXT")
            .to_rrset();
        assert_eq!(rrset.changetype, ChangeType::Delete);
        assert_eq!(rrset.ttl, None);
        assert!(rrset.records.is_empty());
    }

    #[test]
    fn replace_rrset_serializes_with_ttl_and_record_flags() {
        let rrsets = [PdnsRrset {
            name: "_acme-challenge.example.com.".into(),
            rrtype: "TXT".into(),
            ttl: Some(60),
            changetype: ChangeType::Replace,
            records: vec![PdnsRecord {
                content: "\"token\"".into(),
                disabled: false,
                set_ptr: false,
            }],
        }];

        let value = serde_json::to_value(PatchBody { rrsets: &rrsets }).unwrap();
        assert_eq!(
            value,
            json!({
                "rrsets": [{
                    "name": "_acme-challenge.example.com.",
                    "type": "TXT",
                    "ttl": 60,
                    "changetype": "REPLACE",
                    "records": [{ "content": "\"token\"", "disabled": false, "set-ptr": false }]
                }]
            })
        );
    }

    #[test]
    fn delete_rrset_omits_ttl() {
        let rrsets = [PdnsRrset {
            name: "_acme-challenge.example.com.".into(),
            rrtype: "TXT".into(),
            ttl: None,
            changetype: ChangeType::Delete,
            records: Vec::new(),
        }];

        let value = serde_json::to_value(PatchBody { rrsets: &rrsets }).unwrap();
        assert_eq!(
            value,
            json!({
                "rrsets": [{
                    "name": "_acme-challenge.example.com.",
                    "type": "TXT",
                    "changetype": "DELETE",
                    "records": []
                }]
            })
        );
    }

    #[test]
    fn zone_listing_entries_ignore_unknown_fields() {
        let zones: Vec<PdnsZone> = serde_json::from_value(json!([
            {
                "id": "example.com.",
                "name": "example.com.",
                "kind": "Native",
                "url": "/api/v1/servers/localhost/zones/example.com.",
                "serial": 2024010101,
                "dnssec": false
            },
            { "name": "example.org." }
        ]))
        .unwrap();

        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].kind.as_deref(), Some("Native"));
        assert_eq!(zones[1], PdnsZone::named("example.org."));
    }
}
