use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::ForwardError;

/// The call a client asks us to make, as read from stdin.
#[derive(Debug, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    headers: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    /// Parses the raw stdin contents. Zero bytes of input count as `{}`.
    pub fn parse(input: &str) -> Result<RequestDescriptor, ForwardError> {
        let input = if input.is_empty() { "{}" } else { input };
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ForwardError::input(format!("Invalid JSON payload: {}", e)))?;
        // serde would happily read a struct out of an array
        if !value.is_object() {
            return Err(ForwardError::input("Invalid JSON payload: expected an object"));
        }
        let descriptor: RequestDescriptor = serde_json::from_value(value)
            .map_err(|e| ForwardError::input(format!("Invalid JSON payload: {}", e)))?;
        if descriptor.path().is_empty() {
            return Err(ForwardError::input("Missing request path"));
        }
        Ok(descriptor)
    }

    pub fn path(&self) -> &str {
        return self.path.as_deref().unwrap_or("");
    }

    pub fn method(&self) -> String {
        return self.method.as_deref().unwrap_or("GET").to_uppercase();
    }

    /// Only a JSON string is forwarded, anything else means no payload.
    pub fn body(&self) -> Option<&str> {
        return self.body.as_ref().and_then(Value::as_str);
    }

    /// Caller headers in input order.
    pub fn headers(&self) -> Result<Vec<(&str, &str)>, ForwardError> {
        let Some(headers) = &self.headers else {
            return Ok(Vec::new());
        };
        headers
            .iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok((key.as_str(), value.as_str())),
                other => Err(ForwardError::input(format!(
                    "Header '{}' must be a string, got {}",
                    key, other
                ))),
            })
            .collect()
    }
}
