//! Virtual machine address index
//!
//! Machines are aggregated by display name, which is not unique: several
//! machines sharing a display name accumulate one address each into a
//! single list, in the order the API listed them. Each machine
//! contributes exactly one address, taken from its first network
//! interface.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Display name -> addresses, one address per listed machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineAddressIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl MachineAddressIndex {
    /// Addresses recorded for a display name. `None` means the name was
    /// never listed, which is distinct from an empty index.
    pub fn addresses(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Display names in sorted order with their addresses
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of recorded addresses across all names
    pub fn address_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Build the index from a `listVirtualMachines` response body.
///
/// A missing `virtualmachine` key yields an empty index and a warning; a
/// present machine record missing its display name or first-NIC address
/// is a contract violation and fails with a typed error instead of an
/// out-of-range panic.
pub fn build_index(response: &Value) -> Result<MachineAddressIndex> {
    let mut index = MachineAddressIndex::default();

    let Some(machines) = response.get("virtualmachine").and_then(|v| v.as_array()) else {
        tracing::warn!("Empty virtual machines list. Maybe wrong or empty projectid?");
        return Ok(index);
    };

    for machine in machines {
        let name = machine
            .get("displayname")
            .and_then(|v| v.as_str())
            .ok_or_else(|| malformed(machine, "displayname"))?;
        let address = machine
            .pointer("/nic/0/ipaddress")
            .and_then(|v| v.as_str())
            .ok_or_else(|| malformed(machine, "nic[0].ipaddress"))?;

        index
            .entries
            .entry(name.to_string())
            .or_default()
            .push(address.to_string());
    }

    Ok(index)
}

fn malformed(machine: &Value, field: &str) -> Error {
    let key = machine
        .get("displayname")
        .or_else(|| machine.get("id"))
        .and_then(|v| v.as_str())
        .unwrap_or("<unnamed>")
        .to_string();
    Error::MalformedRecord {
        key,
        field: field.to_string(),
    }
}
