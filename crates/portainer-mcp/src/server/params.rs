use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::tool_error;

/// JSON schema advertised for a tool whose arguments deserialize into `T`.
pub(crate) fn input_schema<T: schemars::JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Deserialize raw tool arguments. A missing or mistyped parameter becomes an
/// error result for the caller rather than a protocol error.
pub(crate) fn parse_args<T: DeserializeOwned>(args: JsonObject) -> Result<T, CallToolResult> {
    serde_json::from_value(Value::Object(args)).map_err(|e| tool_error("invalid parameters", e))
}

/// Image refresh stays on unless the caller passes exactly `"false"`.
pub(crate) fn resolve_pull_image(raw: Option<&str>) -> bool {
    raw != Some("false")
}
