//! Normalization of list and detail response envelopes.
//!
//! The backend returns collections in several shapes:
//! - a bare array: `[...]`
//! - a resource collection: `{ "data": [...], "meta": {...} }`
//! - a wrapped paginator: `{ "data": { "data": [...], "current_page": 1, ... } }`
//!
//! [`Envelope::parse`] tries each shape in that fixed order and anything else
//! degrades to an empty page.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pagination metadata attached to a list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    /// Everything else the backend sent, e.g. faceted counts.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PageMeta {
    /// Returns a faceted-count map such as `status_counts`, if present and numeric.
    #[must_use]
    pub fn facet(&self, name: &str) -> Option<BTreeMap<String, u64>> {
        let Value::Object(map) = self.extra.get(name)? else {
            return None;
        };
        Some(
            map.iter()
                .filter_map(|(k, v)| v.as_u64().map(|n| (k.clone(), n)))
                .collect(),
        )
    }

    /// Whether a page after the current one exists.
    #[must_use]
    pub fn has_more(&self) -> bool {
        matches!((self.current_page, self.last_page), (Some(c), Some(l)) if c < l)
    }
}

/// A normalized list response.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: None,
        }
    }
}

/// Recognized list envelope shapes, in parse priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Bare(Vec<Value>),
    Data {
        items: Vec<Value>,
        meta: Option<Value>,
    },
    Nested {
        items: Vec<Value>,
        meta: Option<Value>,
    },
    Unknown,
}

/// Keys a Laravel-style paginator puts next to its `data` array.
const PAGINATOR_KEYS: [&str; 4] = ["current_page", "last_page", "total", "per_page"];

impl Envelope {
    /// Classifies a response body.
    #[must_use]
    pub fn parse(body: Value) -> Self {
        match body {
            Value::Array(items) => Self::Bare(items),
            Value::Object(mut outer) => {
                let outer_meta = outer.remove("meta").filter(Value::is_object);
                match outer.remove("data") {
                    Some(Value::Array(items)) => Self::Data {
                        items,
                        meta: outer_meta,
                    },
                    Some(Value::Object(mut inner)) => match inner.remove("data") {
                        Some(Value::Array(items)) => Self::Nested {
                            items,
                            meta: outer_meta.or_else(|| inner_meta(inner)),
                        },
                        _ => Self::Unknown,
                    },
                    _ => Self::Unknown,
                }
            }
            _ => Self::Unknown,
        }
    }

    /// Splits the envelope into raw records and raw metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Option<Value>) {
        match self {
            Self::Bare(items) => (items, None),
            Self::Data { items, meta } | Self::Nested { items, meta } => (items, meta),
            Self::Unknown => (Vec::new(), None),
        }
    }
}

/// Metadata of a wrapped paginator: its own `meta` object, or the pagination
/// fields that sit beside the inner `data` array.
fn inner_meta(mut inner: Map<String, Value>) -> Option<Value> {
    if let Some(meta) = inner.remove("meta").filter(Value::is_object) {
        return Some(meta);
    }
    PAGINATOR_KEYS
        .iter()
        .any(|k| inner.contains_key(*k))
        .then(|| Value::Object(inner))
}

/// Normalizes a list response body into records and pagination metadata.
///
/// Never fails: unknown shapes yield an empty page and records that do not
/// match `T` are skipped.
#[must_use]
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> ListPage<T> {
    let envelope = Envelope::parse(body);
    if envelope == Envelope::Unknown {
        tracing::debug!("Unrecognized list response shape");
    }

    let (raw_items, raw_meta) = envelope.into_parts();
    let items = raw_items
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value(raw) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, "Skipping malformed list record: {e}");
                None
            }
        })
        .collect();
    let meta = raw_meta.and_then(|m| serde_json::from_value(m).ok());

    ListPage { items, meta }
}

/// Unwraps a detail response that may be `{ "data": {...} }` or the bare object.
pub fn unwrap_resource<T: DeserializeOwned>(body: Value) -> serde_json::Result<T> {
    match body {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            serde_json::from_value(map.remove("data").unwrap_or_default())
        }
        other => serde_json::from_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_has_no_meta() {
        let page: ListPage<i64> = normalize_list(json!([1, 2, 3]));
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.meta, None);
    }

    #[test]
    fn data_envelope_keeps_meta() {
        let page: ListPage<i64> = normalize_list(json!({ "data": [1, 2], "meta": { "total": 2 } }));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(
            page.meta,
            Some(PageMeta {
                total: Some(2),
                ..PageMeta::default()
            })
        );
    }

    #[test]
    fn nested_paginator_uses_inner_fields() {
        let body = json!({
            "data": {
                "current_page": 2,
                "data": [{ "id": 7 }],
                "last_page": 3,
                "per_page": 15,
                "total": 31
            }
        });
        let page: ListPage<Value> = normalize_list(body);
        assert_eq!(page.items, vec![json!({ "id": 7 })]);

        let meta = page.meta.unwrap();
        assert_eq!(meta.current_page, Some(2));
        assert_eq!(meta.last_page, Some(3));
        assert_eq!(meta.per_page, Some(15));
        assert_eq!(meta.total, Some(31));
        assert!(meta.has_more());
    }

    #[test]
    fn nested_data_prefers_outer_meta() {
        let body = json!({ "data": { "data": [1] }, "meta": { "current_page": 1, "last_page": 1 } });
        let page: ListPage<i64> = normalize_list(body);
        assert_eq!(page.items, vec![1]);
        assert!(!page.meta.unwrap().has_more());
    }

    #[test]
    fn unknown_shapes_degrade_to_empty() {
        for body in [
            json!({}),
            Value::Null,
            json!("oops"),
            json!({ "data": "nope" }),
            json!({ "data": { "items": [] } }),
        ] {
            let page: ListPage<i64> = normalize_list(body);
            assert_eq!(page, ListPage::default());
        }
    }

    #[test]
    fn malformed_records_are_skipped() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Row {
            id: u64,
        }

        let page: ListPage<Row> = normalize_list(json!([{ "id": 1 }, { "id": "x" }, { "id": 3 }]));
        assert_eq!(page.items, vec![Row { id: 1 }, Row { id: 3 }]);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let first: ListPage<Value> =
            normalize_list(json!({ "data": [{ "id": 1 }, { "id": 2 }], "meta": { "total": 2 } }));
        let second: ListPage<Value> = normalize_list(Value::Array(first.items.clone()));
        assert_eq!(second.items, first.items);
        assert_eq!(second.meta, None);
    }

    #[test]
    fn facets_are_exposed_from_meta() {
        let page: ListPage<i64> = normalize_list(json!({
            "data": [],
            "meta": {
                "current_page": 1,
                "status_counts": { "published": 4, "draft": 2 }
            }
        }));
        let meta = page.meta.unwrap();
        let counts = meta.facet("status_counts").unwrap();
        assert_eq!(counts["published"], 4);
        assert_eq!(counts["draft"], 2);
        assert!(meta.facet("missing").is_none());
    }

    #[test]
    fn unwrap_resource_accepts_both_shapes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Row {
            id: u64,
        }

        assert_eq!(
            unwrap_resource::<Row>(json!({ "data": { "id": 4 } })).unwrap(),
            Row { id: 4 }
        );
        assert_eq!(unwrap_resource::<Row>(json!({ "id": 5 })).unwrap(), Row { id: 5 });
        assert!(unwrap_resource::<Row>(json!([])).is_err());
    }
}
