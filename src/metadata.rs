//! Tolerant decoding of the dispatch call's first argument.

use serde_json::{Map, Value};

/// Span name used when the call carries neither `clientMethod` nor `action`.
pub const FALLBACK_SPAN_NAME: &str = "prisma.request";

/// Metadata describing one intercepted dispatch call.
///
/// Every field borrows from the request parameters and is optional: a
/// missing field, or one of an unexpected JSON type, decodes to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CallMetadata<'a> {
    /// Logical operation name, e.g. `findMany`.
    pub client_method: Option<&'a str>,
    /// ORM operation kind.
    pub action: Option<&'a str>,
    /// Target model (table) name.
    pub model: Option<&'a str>,
    /// Operation parameters.
    pub args: Option<&'a Map<String, Value>>,
}

impl<'a> CallMetadata<'a> {
    /// Decode metadata from the raw request parameters. Never fails.
    pub fn from_params(params: &'a Value) -> Self {
        let Some(fields) = params.as_object() else {
            return Self::default();
        };

        Self {
            client_method: fields.get("clientMethod").and_then(Value::as_str),
            action: fields.get("action").and_then(Value::as_str),
            model: fields.get("model").and_then(Value::as_str),
            args: fields.get("args").and_then(Value::as_object),
        }
    }

    /// Human-readable span name for this call.
    pub fn span_name(&self) -> &'a str {
        self.client_method
            .or(self.action)
            .unwrap_or(FALLBACK_SPAN_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_metadata() {
        let params = json!({
            "clientMethod": "user.findMany",
            "action": "findMany",
            "model": "User",
            "args": { "where": { "id": 1 } },
            "dataPath": [],
        });
        let meta = CallMetadata::from_params(&params);

        assert_eq!(meta.client_method, Some("user.findMany"));
        assert_eq!(meta.action, Some("findMany"));
        assert_eq!(meta.model, Some("User"));
        assert_eq!(meta.args, params["args"].as_object());
        assert_eq!(meta.span_name(), "user.findMany");
    }

    #[test]
    fn test_decode_missing_fields() {
        let params = json!({ "clientMethod": "$queryRaw" });
        let meta = CallMetadata::from_params(&params);

        assert_eq!(meta.client_method, Some("$queryRaw"));
        assert!(meta.action.is_none());
        assert!(meta.model.is_none());
        assert!(meta.args.is_none());
    }

    #[test]
    fn test_decode_wrong_types_degrade_to_none() {
        let params = json!({
            "clientMethod": 42,
            "action": "count",
            "model": ["User"],
            "args": "where id = 1",
        });
        let meta = CallMetadata::from_params(&params);

        assert!(meta.client_method.is_none());
        assert!(meta.model.is_none());
        assert!(meta.args.is_none());
        assert_eq!(meta.span_name(), "count");
    }

    #[test]
    fn test_decode_non_object_params() {
        for params in [Value::Null, json!("findMany"), json!([1, 2])] {
            let meta = CallMetadata::from_params(&params);
            assert_eq!(meta, CallMetadata::default());
            assert_eq!(meta.span_name(), FALLBACK_SPAN_NAME);
        }
    }
}
