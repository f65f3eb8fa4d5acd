//! Request and response envelopes

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Remote operation selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// List every sale of the user
    GetSales,
    /// Register a new sale
    CreateSale,
    /// List the user's clients
    GetClients,
    /// Dashboard summary
    GetDashboard,
    /// Any other action name, passed through as-is
    Custom(String),
}

impl Action {
    /// Wire name of the action
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::GetSales => "get_sales",
            Self::CreateSale => "create_sale",
            Self::GetClients => "get_clients",
            Self::GetDashboard => "get_dashboard",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        match name {
            "get_sales" => Self::GetSales,
            "create_sale" => Self::CreateSale,
            "get_clients" => Self::GetClients,
            "get_dashboard" => Self::GetDashboard,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Body of every POST to the endpoint.
///
/// `data` and `token` are always present on the wire, as `null` when unset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope<'a> {
    /// Owner of the data being read or written
    pub user_id: &'a str,
    /// Action wire name
    pub action: &'a str,
    /// Action payload
    pub data: Option<&'a Value>,
    /// Optional bearer token
    pub token: Option<&'a str>,
}

/// Envelope returned by the endpoint.
///
/// Only `success` and `data` are interpreted. `error` is kept as whatever
/// JSON the service sent, and every other key lands in `extra`, so the
/// envelope serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Outcome flag reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Action result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error detail on logical failure, a string or any other JSON value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Keys the client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseEnvelope {
    /// A missing `success` counts as failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Error detail as text: strings as-is, other values as compact JSON
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Decode `data` into `T`. Missing or `null` data yields `None`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.data {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| Error::Protocol(format!("unexpected data shape: {e}"))),
        }
    }
}

impl TryFrom<Value> for ResponseEnvelope {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Protocol(format!(
                "expected a JSON object envelope, got {}",
                kind_of(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| Error::Protocol(e.to_string()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_envelope_uses_camel_case_and_explicit_nulls() {
        let envelope = RequestEnvelope {
            user_id: "u1",
            action: Action::GetSales.as_str(),
            data: None,
            token: None,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({"userId": "u1", "action": "get_sales", "data": null, "token": null})
        );
    }

    #[test]
    fn test_request_envelope_carries_payload_and_token() {
        let payload = json!({"clientName": "Ana"});
        let envelope = RequestEnvelope {
            user_id: "u1",
            action: "create_sale",
            data: Some(&payload),
            token: Some("secret"),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["clientName"], "Ana");
        assert_eq!(json["token"], "secret");
    }

    #[test]
    fn test_action_round_trips_known_names() {
        for name in ["get_sales", "create_sale", "get_clients", "get_dashboard"] {
            let action = Action::from(name);
            assert!(!matches!(action, Action::Custom(_)));
            assert_eq!(action.to_string(), name);
        }
        assert_eq!(
            Action::from("get_stock"),
            Action::Custom("get_stock".to_string())
        );
    }

    #[test]
    fn test_response_envelope_keeps_unknown_keys() {
        let body = json!({"success": true, "data": [], "count": 0, "meta": {"page": 1}});
        let envelope = ResponseEnvelope::try_from(body.clone()).unwrap();
        assert!(envelope.is_success());
        assert_eq!(serde_json::to_value(&envelope).unwrap(), body);
    }

    #[test]
    fn test_response_envelope_missing_success_is_failure() {
        let envelope = ResponseEnvelope::try_from(json!({"data": []})).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(serde_json::to_value(&envelope).unwrap(), json!({"data": []}));
    }

    #[test]
    fn test_response_envelope_rejects_non_object() {
        let err = ResponseEnvelope::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_response_envelope_accepts_structured_error() {
        let body = json!({"success": false, "error": {"code": "not-found", "message": "x"}});
        let envelope = ResponseEnvelope::try_from(body.clone()).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(
            envelope.error_message().as_deref(),
            Some(r#"{"code":"not-found","message":"x"}"#)
        );
        assert_eq!(serde_json::to_value(&envelope).unwrap(), body);

        let numeric =
            ResponseEnvelope::try_from(json!({"success": false, "error": 403})).unwrap();
        assert_eq!(numeric.error_message().as_deref(), Some("403"));

        let text = ResponseEnvelope::try_from(json!({"error": "sem acesso"})).unwrap();
        assert_eq!(text.error_message().as_deref(), Some("sem acesso"));
    }

    #[test]
    fn test_data_as_treats_null_as_absent() {
        let envelope =
            ResponseEnvelope::try_from(json!({"success": true, "data": null})).unwrap();
        let data: Option<Vec<Value>> = envelope.data_as().unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_data_as_reports_shape_mismatch() {
        let envelope =
            ResponseEnvelope::try_from(json!({"success": true, "data": "oops"})).unwrap();
        let err = envelope.data_as::<Vec<Value>>().unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
