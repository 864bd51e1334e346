use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::PROVIDER_NAME;
use crate::error::{ProviderError, Result};

// ============ Endpoint ============

/// A provider-specific key/value attached to an [`Endpoint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// A single DNS name with its record type and targets, as exchanged with external-dns.
///
/// Field names on the wire follow external-dns (`dnsName`, `recordType`, `recordTTL`, ...).
/// Empty optional fields are omitted when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified name, without trailing dot.
    pub dns_name: String,
    /// Record targets (addresses for A/AAAA, canonical names for CNAME).
    #[serde(default)]
    pub targets: Vec<String>,
    /// Record type string such as `A`, `AAAA` or `CNAME`.
    pub record_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,
    #[serde(
        rename = "recordTTL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub record_ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    pub fn new(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        targets: Vec<String>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            targets,
            record_type: record_type.into(),
            set_identifier: String::new(),
            record_ttl: None,
            labels: BTreeMap::new(),
            provider_specific: Vec::new(),
        }
    }

    /// Copy of this endpoint carrying a different target list.
    #[must_use]
    pub fn with_targets(&self, targets: Vec<String>) -> Self {
        Self {
            targets,
            ..self.clone()
        }
    }
}

// ============ Changes ============

/// The change-set external-dns asks a provider to apply.
///
/// `update_old` and `update_new` are paired by DNS name and record type.
/// The capitalised field names of older external-dns releases are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    #[serde(default, alias = "Create", deserialize_with = "null_as_empty")]
    pub create: Vec<Endpoint>,
    #[serde(default, alias = "UpdateOld", deserialize_with = "null_as_empty")]
    pub update_old: Vec<Endpoint>,
    #[serde(default, alias = "UpdateNew", deserialize_with = "null_as_empty")]
    pub update_new: Vec<Endpoint>,
    #[serde(default, alias = "Delete", deserialize_with = "null_as_empty")]
    pub delete: Vec<Endpoint>,
}

/// external-dns sends absent lists as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Endpoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Endpoint>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

// ============ Record type ============

/// Record types Pi-hole can hold as local DNS entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
}

impl RecordType {
    /// All supported types, in the order records are listed.
    pub const ALL: [Self; 3] = [Self::A, Self::Aaaa, Self::Cname];

    /// 将字符串转换为 `RecordType`（不区分大小写）
    pub fn parse(record_type: &str) -> Result<Self> {
        match record_type.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            _ => Err(ProviderError::UnsupportedRecordType {
                provider: PROVIDER_NAME.to_string(),
                record_type: record_type.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_external_dns_field_names() {
        let mut ep = Endpoint::new("a.example.io", "A", vec!["1.1.1.1".to_string()]);
        ep.record_ttl = Some(300);
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["dnsName"], "a.example.io");
        assert_eq!(json["recordType"], "A");
        assert_eq!(json["recordTTL"], 300);
        assert_eq!(json["targets"][0], "1.1.1.1");
        assert!(json.get("labels").is_none());
        assert!(json.get("setIdentifier").is_none());
    }

    #[test]
    fn endpoint_deserializes_minimal_payload() {
        let ep: Endpoint =
            serde_json::from_str(r#"{"dnsName":"c.example.io","recordType":"CNAME"}"#).unwrap();
        assert_eq!(ep.dns_name, "c.example.io");
        assert!(ep.targets.is_empty());
        assert_eq!(ep.record_ttl, None);
    }

    #[test]
    fn changes_accept_both_field_spellings() {
        let lower: Changes = serde_json::from_str(
            r#"{"create":[{"dnsName":"a.io","recordType":"A","targets":["1.1.1.1"]}]}"#,
        )
        .unwrap();
        let upper: Changes = serde_json::from_str(
            r#"{"Create":[{"dnsName":"a.io","recordType":"A","targets":["1.1.1.1"]}],"UpdateOld":null,"Delete":null}"#,
        )
        .unwrap();
        assert_eq!(lower.create.len(), 1);
        assert!(lower.update_old.is_empty());
        assert!(lower.delete.is_empty());
        assert!(!lower.is_empty());
        assert_eq!(upper.create, lower.create);
        assert!(Changes::default().is_empty());
    }

    #[test]
    fn with_targets_keeps_other_fields() {
        let mut ep = Endpoint::new("a.example.io", "A", vec!["1.1.1.1".to_string()]);
        ep.set_identifier = "blue".to_string();
        let copy = ep.with_targets(vec!["2.2.2.2".to_string()]);
        assert_eq!(copy.targets, vec!["2.2.2.2".to_string()]);
        assert_eq!(copy.set_identifier, "blue");
        assert_eq!(copy.dns_name, ep.dns_name);
    }

    #[test]
    fn record_type_parse_is_case_insensitive() {
        assert_eq!(RecordType::parse("a").unwrap(), RecordType::A);
        assert_eq!(RecordType::parse("aaaa").unwrap(), RecordType::Aaaa);
        assert_eq!(RecordType::parse("Cname").unwrap(), RecordType::Cname);
        assert!(matches!(
            RecordType::parse("TXT"),
            Err(ProviderError::UnsupportedRecordType { record_type, .. }) if record_type == "TXT"
        ));
    }
}
