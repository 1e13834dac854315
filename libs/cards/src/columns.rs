//! JSON text columns of the `cards` table
//!
//! `services`, `products` and `socials` are stored as JSON text. Reads never
//! fail: NULL, invalid JSON, a wrong shape or a value the driver already
//! decoded all resolve to a usable container, and malformed list items are
//! dropped.

use crate::model::{Product, Service, Socials};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn decode_services(raw: Option<&str>) -> Vec<Service> {
    decode_list(raw)
}

pub fn decode_products(raw: Option<&str>) -> Vec<Product> {
    decode_list(raw)
}

pub fn decode_socials(raw: Option<&str>) -> Socials {
    socials_from_value(parse_text(raw))
}

/// Decode a list column from JSON text
pub fn decode_list<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    list_from_value(parse_text(raw))
}

/// Decode a list column the driver handed over as a JSON value
pub fn decode_list_value<T: DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    list_from_value(unwrap_text(value))
}

pub fn decode_socials_value(value: Option<Value>) -> Socials {
    socials_from_value(unwrap_text(value))
}

pub fn encode_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub fn encode_socials(socials: &Socials) -> String {
    serde_json::to_string(socials).unwrap_or_else(|_| "{}".to_string())
}

fn parse_text(raw: Option<&str>) -> Option<Value> {
    unwrap_text(raw.and_then(|text| serde_json::from_str(text).ok()))
}

/// A JSON string holding JSON text is decoded one more level
fn unwrap_text(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(text)) => serde_json::from_str(&text).ok(),
        other => other,
    }
}

fn list_from_value<T: DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn socials_from_value(value: Option<Value>) -> Socials {
    let Some(Value::Object(entries)) = value else {
        return Socials::new();
    };

    let links: BTreeMap<String, String> = entries
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(url) if !url.trim().is_empty() => Some((key, url)),
            _ => None,
        })
        .collect();

    Socials::from_raw(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SocialPlatform;
    use serde_json::json;

    #[test]
    fn test_bad_text_decodes_to_empty() {
        for raw in [None, Some("not json"), Some(""), Some("42"), Some("{\"a\":1}")] {
            assert!(decode_services(raw).is_empty(), "input {raw:?}");
        }
        for raw in [None, Some("not json"), Some("[1, 2]"), Some("null")] {
            assert!(decode_socials(raw).is_empty(), "input {raw:?}");
        }
    }

    #[test]
    fn test_malformed_items_are_dropped() {
        let products = decode_products(Some(
            r#"[{"name":"Kit","link":"https://x.com"}, {"link":"https://y.com"}, "junk", {"name":"Tee"}]"#,
        ));

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Kit");
        assert_eq!(products[1].link, None);
    }

    #[test]
    fn test_already_decoded_values() {
        let services: Vec<Service> =
            decode_list_value(Some(json!([{ "name": "Design", "description": "UI" }])));
        assert_eq!(services[0].description.as_deref(), Some("UI"));

        let socials = decode_socials_value(Some(json!({ "github": "https://github.com/a", "x": 3 })));
        assert_eq!(socials.get(SocialPlatform::Github), Some("https://github.com/a"));
        assert_eq!(socials.len(), 1);

        assert!(decode_socials_value(None).is_empty());
        assert!(decode_list_value::<Product>(Some(json!("not json"))).is_empty());
    }

    #[test]
    fn test_double_encoded_text() {
        let raw = serde_json::to_string(r#"[{"name":"Design"}]"#).unwrap();
        assert_eq!(decode_services(Some(&raw)).len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let services = vec![
            Service {
                name: "Design".to_string(),
                description: None,
            },
            Service {
                name: "Build".to_string(),
                description: Some("Rust, \"fast\"".to_string()),
            },
        ];
        assert_eq!(decode_services(Some(&encode_list(&services))), services);

        let mut socials = Socials::new();
        socials.insert(SocialPlatform::Youtube, "https://youtube.com/@a");
        assert_eq!(decode_socials(Some(&encode_socials(&socials))), socials);
    }
}
