//! OS template listing and filtering

use super::name_matches;
use serde_json::Value;

/// One machine image template as reported by `listTemplates`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    pub name: String,
    pub display_text: String,
    pub zone_id: String,
    pub id: String,
    pub os_type_name: String,
    pub zone_name: String,
}

impl From<&Value> for TemplateRecord {
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
            display_text: field("displaytext"),
            zone_id: field("zoneid"),
            id: field("id"),
            os_type_name: field("ostypename"),
            zone_name: field("zonename"),
        }
    }
}

/// List templates from a `listTemplates` response body in listing order.
///
/// The same display text may legitimately repeat across zones, so
/// nothing is deduplicated here. The filter applies to `name`, not to
/// the display text; callers sort by display text before rendering.
pub fn list(response: &Value, filter: Option<&str>) -> Vec<TemplateRecord> {
    let Some(templates) = response.get("template").and_then(|v| v.as_array()) else {
        tracing::warn!("Empty templates list. Maybe wrong or empty projectid?");
        return Vec::new();
    };

    templates
        .iter()
        .map(TemplateRecord::from)
        .filter(|record| name_matches(&record.name, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({"template": [
            {"name": "ubuntu-22.04", "displaytext": "Ubuntu 22.04 LTS",
             "zoneid": "z-1", "id": "t-1", "ostypename": "Ubuntu",
             "zonename": "zone-east"},
            {"name": "ubuntu-22.04", "displaytext": "Ubuntu 22.04 LTS",
             "zoneid": "z-2", "id": "t-2", "ostypename": "Ubuntu",
             "zonename": "zone-west"},
            {"name": "centos-9", "displaytext": "CentOS Stream 9",
             "zoneid": "z-1", "id": "t-3", "ostypename": "CentOS",
             "zonename": "zone-east"}
        ]})
    }

    #[test]
    fn repeated_display_text_across_zones_is_preserved() {
        let records = list(&sample_response(), None);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "t-1");
        assert_eq!(records[1].id, "t-2");
    }

    #[test]
    fn filter_applies_to_the_name_not_the_display_text() {
        // "LTS" appears only in display text and must not match.
        assert!(list(&sample_response(), Some("LTS")).is_empty());

        let ubuntu = list(&sample_response(), Some("UBUNTU"));
        assert_eq!(ubuntu.len(), 2);
    }

    #[test]
    fn missing_collection_key_yields_an_empty_result() {
        assert!(list(&json!({"count": 0}), None).is_empty());
    }

    #[test]
    fn missing_scalar_fields_default_to_empty_strings() {
        let response = json!({"template": [{"name": "bare"}]});
        let records = list(&response, None);
        assert_eq!(records[0].name, "bare");
        assert_eq!(records[0].display_text, "");
        assert_eq!(records[0].os_type_name, "");
    }
}
