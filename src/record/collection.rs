//! Notion collections (databases) and their property schema.

use serde::{Deserialize, Serialize};

use super::{JsonMap, text};

/// Column definition of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PropertySchema {
    /// Case-insensitive name comparison, as Notion property lookups do.
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A collection with its schema in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub schema: Vec<(String, PropertySchema)>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawCollection {
    id: String,
    name: serde_json::Value,
    schema: JsonMap,
}

impl Collection {
    /// Build from the `value` of a `collection` record entry.
    ///
    /// Schema entries that don't parse are dropped rather than failing the
    /// whole record.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let raw: RawCollection = serde_json::from_value(value)?;
        let schema = raw
            .schema
            .into_iter()
            .filter_map(|(id, v)| {
                serde_json::from_value::<PropertySchema>(v)
                    .ok()
                    .map(|s| (id, s))
            })
            .collect();

        Ok(Self {
            id: raw.id,
            name: text::plain(&raw.name),
            schema,
        })
    }

    /// Find a property by display name (case-insensitive).
    pub fn property_named(&self, name: &str) -> Option<(&str, &PropertySchema)> {
        self.schema
            .iter()
            .find(|(_, s)| s.is_named(name))
            .map(|(id, s)| (id.as_str(), s))
    }

    /// Schema entry for a property id.
    pub fn property(&self, id: &str) -> Option<&PropertySchema> {
        self.schema.iter().find(|(pid, _)| pid == id).map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posts() -> Collection {
        Collection::from_value(json!({
            "id": "c1",
            "name": [["Posts"]],
            "schema": {
                "title": {"name": "Name", "type": "title"},
                "a1": {"name": "Author", "type": "text"},
                "p1": {"name": "Published", "type": "date"},
                "bad": "not-an-object"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_value_keeps_schema_order() {
        let collection = posts();
        assert_eq!(collection.name, "Posts");
        let ids: Vec<_> = collection.schema.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["title", "a1", "p1"]);
    }

    #[test]
    fn test_property_named_case_insensitive() {
        let collection = posts();
        let (id, schema) = collection.property_named("author").unwrap();
        assert_eq!(id, "a1");
        assert_eq!(schema.kind, "text");
        assert!(collection.property_named("Missing").is_none());
    }

    #[test]
    fn test_property_by_id() {
        let collection = posts();
        assert_eq!(collection.property("p1").unwrap().name, "Published");
        assert!(collection.property("zz").is_none());
    }
}
