//! Property-based tests using proptest
//!
//! These tests verify the filter and aggregation invariants of the
//! inventory normalizers under randomized inputs: address conservation,
//! case-insensitive completeness of the name filter, and idempotence.

use csinv::inventory::{machines, networks, templates};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A small name pool so display-name collisions actually happen
fn arb_display_name() -> impl Strategy<Value = String> {
    prop_oneof!["web1", "web2", "db1", "cache1", "worker1"].prop_map(String::from)
}

fn arb_ip() -> impl Strategy<Value = String> {
    (1u8..=254, 1u8..=254).prop_map(|(a, b)| format!("10.0.{}.{}", a, b))
}

/// Raw machine entries as (display name, first NIC address)
fn arb_machine_entries() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_display_name(), arb_ip()), 0..50)
}

fn machine_response(entries: &[(String, String)]) -> Value {
    let machines: Vec<Value> = entries
        .iter()
        .map(|(name, ip)| json!({"displayname": name, "nic": [{"ipaddress": ip}]}))
        .collect();
    json!({ "virtualmachine": machines })
}

/// Unique network names with a CIDR each
fn arb_network_names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z][a-z0-9-]{0,14}", 0..40)
}

fn network_response(names: &BTreeSet<String>) -> Value {
    let networks: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "cidr": format!("10.{}.0.0/24", i % 250),
                "id": format!("n-{}", i),
                "zoneid": "z-1",
                "zonename": "zone-east"
            })
        })
        .collect();
    json!({ "network": networks })
}

proptest! {
    /// One address is recorded per machine entry, no more, no less
    #[test]
    fn address_count_matches_entry_count(entries in arb_machine_entries()) {
        let index = machines::build_index(&machine_response(&entries)).unwrap();
        prop_assert_eq!(index.address_count(), entries.len());
    }

    /// Addresses accumulate under their display name in encounter order
    #[test]
    fn addresses_keep_encounter_order(entries in arb_machine_entries()) {
        let index = machines::build_index(&machine_response(&entries)).unwrap();

        let mut expected: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, ip) in &entries {
            expected.entry(name).or_default().push(ip);
        }

        for (name, ips) in &expected {
            let got = index.addresses(name).expect("listed name must exist");
            let got: Vec<&str> = got.iter().map(String::as_str).collect();
            prop_assert_eq!(&got, ips);
        }
        prop_assert_eq!(index.len(), expected.len());
    }

    /// Every filtered network matches, and every matching network is kept
    #[test]
    fn network_filter_is_exact(
        names in arb_network_names(),
        filter in "[a-z0-9-]{0,3}"
    ) {
        let response = network_response(&names);
        let filtered = networks::list(&response, Some(&filter));

        let filter_lower = filter.to_lowercase();
        for record in &filtered {
            prop_assert!(record.name.to_lowercase().contains(&filter_lower));
        }

        let expected: BTreeSet<&String> = names
            .iter()
            .filter(|n| n.to_lowercase().contains(&filter_lower))
            .collect();
        let got: BTreeSet<&String> = filtered.iter().map(|r| &r.name).collect();
        prop_assert_eq!(got, expected);
    }

    /// Filtering carries no hidden state: same input, same output
    #[test]
    fn network_filter_is_idempotent(
        names in arb_network_names(),
        filter in "[a-z]{0,4}"
    ) {
        let response = network_response(&names);
        let first = networks::list(&response, Some(&filter));
        let second = networks::list(&response, Some(&filter));
        prop_assert_eq!(first, second);
    }

    /// No filter keeps every (unique) network
    #[test]
    fn no_network_filter_keeps_everything(names in arb_network_names()) {
        let response = network_response(&names);
        prop_assert_eq!(networks::list(&response, None).len(), names.len());
    }

    /// The template filter never matches on display text
    #[test]
    fn template_filter_ignores_display_text(names in prop::collection::vec("[a-y]{1,10}", 0..20)) {
        let rows: Vec<Value> = names
            .iter()
            .map(|name| json!({
                "name": name,
                // Marker appears only in the display text.
                "displaytext": format!("zzz {}", name),
                "zoneid": "z-1",
                "id": "t-1",
                "ostypename": "Linux",
                "zonename": "zone-east"
            }))
            .collect();
        let response = json!({ "template": rows });

        prop_assert!(templates::list(&response, Some("zzz")).is_empty());
        prop_assert_eq!(templates::list(&response, None).len(), names.len());
    }
}
