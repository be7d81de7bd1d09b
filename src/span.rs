//! Request span creation.

use opentelemetry::{Array, StringValue};
use serde_json::Value;
use tracing::{field, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::InstrumentationConfig;
use crate::flatten::flatten;
use crate::metadata::CallMetadata;

/// Create a client span for one dispatch call.
///
/// The span is a child of whatever span is current when this is called.
/// Fields recorded later by the completion observer are declared empty here.
pub(crate) fn start_span(config: &InstrumentationConfig, metadata: &CallMetadata<'_>) -> Span {
    let span = tracing::info_span!(
        "prisma.request",
        otel.name = %metadata.span_name(),
        otel.kind = "client",
        component = %config.component,
        prisma.action = field::Empty,
        prisma.model = field::Empty,
        otel.status_code = field::Empty,
        error = field::Empty,
        exception.message = field::Empty,
        exception.stacktrace = field::Empty,
        slow_request = field::Empty,
    );

    if let Some(action) = metadata.action {
        span.record("prisma.action", action);
    }
    if let Some(model) = metadata.model {
        span.record("prisma.model", model);
    }

    if config.record_args {
        for (key, value) in flatten(metadata.args, &config.args_namespace) {
            if let Some(value) = attribute_value(value) {
                span.set_attribute(key, value);
            }
        }
    }

    span
}

/// Convert a flattened JSON leaf into an OpenTelemetry attribute value.
///
/// `null` has no attribute representation and yields `None`. Arrays that do
/// not hold a single primitive type are recorded as their JSON text.
pub(crate) fn attribute_value(value: &Value) -> Option<opentelemetry::Value> {
    let converted = match value {
        Value::Null => return None,
        Value::Bool(b) => opentelemetry::Value::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => opentelemetry::Value::I64(i),
            None => opentelemetry::Value::F64(n.as_f64()?),
        },
        Value::String(s) => opentelemetry::Value::String(s.clone().into()),
        Value::Array(items) => match homogeneous_array(items) {
            Some(array) => opentelemetry::Value::Array(array),
            None => opentelemetry::Value::String(value.to_string().into()),
        },
        Value::Object(_) => opentelemetry::Value::String(value.to_string().into()),
    };
    Some(converted)
}

fn homogeneous_array(items: &[Value]) -> Option<Array> {
    let first = items.first()?;
    match first {
        Value::Bool(_) => items
            .iter()
            .map(Value::as_bool)
            .collect::<Option<Vec<_>>>()
            .map(Array::Bool),
        Value::Number(_) if items.iter().all(|v| v.as_i64().is_some()) => items
            .iter()
            .map(Value::as_i64)
            .collect::<Option<Vec<_>>>()
            .map(Array::I64),
        Value::Number(_) => items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<_>>>()
            .map(Array::F64),
        Value::String(_) => items
            .iter()
            .map(|v| v.as_str().map(|s| StringValue::from(s.to_string())))
            .collect::<Option<Vec<_>>>()
            .map(Array::String),
        _ => None,
    }
}
