//! Classification of raw API response bodies
//!
//! Strapi-style backends answer with one of a handful of shapes: an error
//! object carrying a `statusCode`, an array of entries (bare or wrapped in
//! `{ "data": [...] }`), a single entity carrying an `id`, or a literal
//! `null`. Decoding the body into a tagged variant up front lets the client
//! dispatch on the shape instead of probing fields at every call site.

use serde_json::{Map, Value};

/// Classified shape of a decoded JSON response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Error payload carrying a `statusCode` field
    Error {
        /// HTTP-equivalent status code embedded in the body
        status_code: u64,
    },
    /// Array of entries, either bare or unwrapped from `{ "data": [...] }`
    Collection(Vec<Value>),
    /// Single object carrying an `id` field
    Entity(Map<String, Value>),
    /// Literal `null` body
    Null,
    /// Anything that matches none of the expected shapes
    Unrecognized(Value),
}

impl Envelope {
    /// Classifies a decoded response body.
    ///
    /// An embedded `statusCode` wins over every other shape, so error bodies
    /// that also happen to carry `id` or `data` fields still classify as
    /// errors.
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Null => Envelope::Null,
            Value::Array(items) => Envelope::Collection(items),
            Value::Object(mut map) => {
                if let Some(status_code) = map.get("statusCode").and_then(Value::as_u64) {
                    return Envelope::Error { status_code };
                }
                if let Some(Value::Array(_)) = map.get("data") {
                    if let Some(Value::Array(items)) = map.remove("data") {
                        return Envelope::Collection(items);
                    }
                }
                if map.contains_key("id") {
                    return Envelope::Entity(map);
                }
                Envelope::Unrecognized(Value::Object(map))
            }
            other => Envelope::Unrecognized(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_body_classifies_as_null() {
        assert_eq!(Envelope::classify(Value::Null), Envelope::Null);
    }

    #[test]
    fn test_bare_array_classifies_as_collection() {
        let body = json!([{"id": 1}, {"id": 2}]);
        match Envelope::classify(body) {
            Envelope::Collection(items) => assert_eq!(items.len(), 2),
            other => panic!("Expected Collection, got {:?}", other),
        }
    }

    #[test]
    fn test_data_wrapped_array_classifies_as_collection() {
        let body = json!({"data": [{"id": 1}], "meta": {"pagination": {"total": 1}}});
        match Envelope::classify(body) {
            Envelope::Collection(items) => assert_eq!(items.len(), 1),
            other => panic!("Expected Collection, got {:?}", other),
        }
    }

    #[test]
    fn test_object_with_id_classifies_as_entity() {
        let body = json!({"id": 7, "title": "hello"});
        match Envelope::classify(body) {
            Envelope::Entity(map) => {
                assert_eq!(map.get("id"), Some(&json!(7)));
                assert_eq!(map.get("title"), Some(&json!("hello")));
            }
            other => panic!("Expected Entity, got {:?}", other),
        }
    }

    #[test]
    fn test_status_code_classifies_as_error() {
        let body = json!({"statusCode": 403, "error": "Forbidden"});
        assert_eq!(
            Envelope::classify(body),
            Envelope::Error { status_code: 403 }
        );
    }

    #[test]
    fn test_status_code_wins_over_id() {
        let body = json!({"statusCode": 404, "id": 1});
        assert_eq!(
            Envelope::classify(body),
            Envelope::Error { status_code: 404 }
        );
    }

    #[test]
    fn test_object_without_id_is_unrecognized() {
        let body = json!({"title": "no id here"});
        assert!(matches!(
            Envelope::classify(body),
            Envelope::Unrecognized(_)
        ));
    }

    #[test]
    fn test_scalar_body_is_unrecognized() {
        assert!(matches!(
            Envelope::classify(json!("just a string")),
            Envelope::Unrecognized(_)
        ));
        assert!(matches!(
            Envelope::classify(json!(42)),
            Envelope::Unrecognized(_)
        ));
    }

    #[test]
    fn test_data_wrapped_object_is_unrecognized() {
        // A single entity arrives as a bare object, never data-wrapped
        let body = json!({"data": {"id": 1}});
        assert!(matches!(
            Envelope::classify(body),
            Envelope::Unrecognized(_)
        ));
    }
}
