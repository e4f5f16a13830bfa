//! Network listing and filtering

use super::name_matches;
use serde_json::Value;
use std::collections::BTreeMap;

/// One virtual network as reported by `listNetworks`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRecord {
    pub name: String,
    pub cidr: String,
    pub id: String,
    pub zone_id: String,
    pub zone_name: String,
}

impl From<&Value> for NetworkRecord {
    fn from(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Self {
            name: field("name"),
            cidr: field("cidr"),
            id: field("id"),
            zone_id: field("zoneid"),
            zone_name: field("zonename"),
        }
    }
}

/// List networks from a `listNetworks` response body, optionally keeping
/// only names containing `filter` (case-insensitive substring).
///
/// Network names are assumed unique within one listing; should the
/// remote side ever violate that, a later record overwrites the earlier
/// one. Output is sorted by name.
pub fn list(response: &Value, filter: Option<&str>) -> Vec<NetworkRecord> {
    let Some(networks) = response.get("network").and_then(|v| v.as_array()) else {
        tracing::warn!("Empty networks list. Maybe wrong or empty projectid?");
        return Vec::new();
    };

    let mut by_name: BTreeMap<String, NetworkRecord> = BTreeMap::new();
    for network in networks {
        let record = NetworkRecord::from(network);
        by_name.insert(record.name.clone(), record);
    }

    by_name
        .into_values()
        .filter(|record| name_matches(&record.name, filter))
        .collect()
}
