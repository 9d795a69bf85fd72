use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body the backend sends alongside 4xx/5xx responses, and sometimes with a 200 from `/api/upload`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// Picks the `error` message out of a JSON body, if it has one.
    pub fn from_value(value: &Value) -> Option<Self> {
        let error = value.as_object()?.get("error")?;
        let error = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        Some(ApiErrorBody { error })
    }
}

/// Either a payload or the backend's `{error}` object.
///
/// Goes through `serde_json::Value` rather than an untagged enum: timetable slot maps use
/// integer keys, which only `serde_json`'s own map deserializer parses out of JSON strings.
pub fn decode_payload<T: DeserializeOwned>(
    value: Value,
) -> Result<Result<T, ApiErrorBody>, serde_json::Error> {
    if let Some(error) = ApiErrorBody::from_value(&value) {
        return Ok(Err(error));
    }
    serde_json::from_value(value).map(Ok)
}
