use serde_json::{json, Value};

/// The declared field set of a review, in response order.
pub const DECLARED_FIELDS: [&str; 7] = [
    "id",
    "review",
    "date_created",
    "rating",
    "name",
    "email",
    "verified",
];

/// Introspection document served on OPTIONS: every declared field with its
/// type and whether clients may write it.
pub fn schema_document() -> Value {
    json!({
        "schema": {
            "title": "product_review",
            "properties": {
                "id":           { "type": "integer", "readonly": true },
                "review":       { "type": "string",  "readonly": false },
                "date_created": { "type": "string",  "format": "date-time", "readonly": true },
                "rating":       { "type": "integer", "readonly": false },
                "name":         { "type": "string",  "readonly": false },
                "email":        { "type": "string",  "readonly": false },
                "verified":     { "type": "boolean", "readonly": true },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_exactly_the_seven_fields() {
        let doc = schema_document();
        let properties = doc["schema"]["properties"]
            .as_object()
            .expect("properties object");
        assert_eq!(properties.len(), DECLARED_FIELDS.len());
        for field in DECLARED_FIELDS {
            assert!(properties.contains_key(field), "missing field {field}");
        }
    }

    #[test]
    fn store_assigned_fields_are_readonly() {
        let doc = schema_document();
        for field in ["id", "date_created", "verified"] {
            assert_eq!(
                doc["schema"]["properties"][field]["readonly"],
                serde_json::json!(true),
                "{field} must not be client-settable"
            );
        }
    }
}
