//! Inbound notification parsing.
//!
//! A notification payload is a JSON object describing a newly written object.
//! Only two fields are read from it: the object URL, whose last `/` segment is
//! the object identifier, and the data-type label. Where those fields live is
//! configured with JSON pointers so the payload shape stays an external
//! contract.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;

pub const SUBSCRIPTION_VALIDATION_EVENT: &str = "Microsoft.EventGrid.SubscriptionValidationEvent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSchema {
    pub url_pointer: String,
    pub data_type_pointer: String,
}

impl Default for PayloadSchema {
    fn default() -> Self {
        Self {
            url_pointer: "/url".to_string(),
            data_type_pointer: "/metadata/dataType".to_string(),
        }
    }
}

impl PayloadSchema {
    pub fn new(url_pointer: impl Into<String>, data_type_pointer: impl Into<String>) -> Self {
        Self {
            url_pointer: url_pointer.into(),
            data_type_pointer: data_type_pointer.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for pointer in [&self.url_pointer, &self.data_type_pointer] {
            if !pointer.starts_with('/') {
                return Err(format!("JSON pointer `{pointer}` must start with `/`"));
            }
        }
        Ok(())
    }
}

/// What the forwarder needs to know about one newly written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub object_id: String,
    pub data_type: String,
}

impl Notification {
    pub fn from_payload(payload: &Value, schema: &PayloadSchema) -> Result<Self, AppError> {
        let url = string_at(payload, &schema.url_pointer)?;
        let data_type = string_at(payload, &schema.data_type_pointer)?;

        let object_id = url.rsplit('/').next().unwrap_or_default();
        if object_id.is_empty() {
            return Err(AppError::parse(format!(
                "url `{url}` has no object name after the last `/`"
            )));
        }

        Ok(Self {
            object_id: object_id.to_string(),
            data_type: data_type.to_string(),
        })
    }
}

fn string_at<'a>(payload: &'a Value, pointer: &str) -> Result<&'a str, AppError> {
    match payload.pointer(pointer) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(AppError::parse(format!(
            "field {pointer} must be a string, got {other}"
        ))),
        None => Err(AppError::parse(format!("missing field {pointer}"))),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    pub data: Value,
}

impl EventEnvelope {
    pub fn is_subscription_validation(&self) -> bool {
        self.event_type.as_deref() == Some(SUBSCRIPTION_VALIDATION_EVENT)
    }

    pub fn validation_code(&self) -> Result<&str, AppError> {
        string_at(&self.data, "/validationCode")
    }
}

/// Decodes a request body holding either one envelope or an array of them.
pub fn parse_envelopes(body: Value) -> Result<Vec<EventEnvelope>, AppError> {
    let envelopes = match body {
        Value::Array(_) => serde_json::from_value::<Vec<EventEnvelope>>(body),
        Value::Object(_) => serde_json::from_value::<EventEnvelope>(body).map(|e| vec![e]),
        other => {
            return Err(AppError::parse(format!(
                "expected an event object or array, got {other}"
            )));
        }
    };
    envelopes.map_err(|e| AppError::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_last_segment_and_type() {
        let payload = json!({
            "url": "https://acct.blob.core.windows.net/incoming/blobs/report42.csv",
            "metadata": { "dataType": "TypeB" }
        });
        let n = Notification::from_payload(&payload, &PayloadSchema::default()).unwrap();
        assert_eq!(n.object_id, "report42.csv");
        assert_eq!(n.data_type, "TypeB");
    }

    #[test]
    fn test_url_without_slash_is_the_identifier() {
        let payload = json!({ "url": "plain.bin", "metadata": { "dataType": "TypeA" } });
        let n = Notification::from_payload(&payload, &PayloadSchema::default()).unwrap();
        assert_eq!(n.object_id, "plain.bin");
    }

    #[test]
    fn test_missing_fields_are_parse_errors() {
        let schema = PayloadSchema::default();
        let no_url = json!({ "metadata": { "dataType": "TypeA" } });
        let no_type = json!({ "url": "https://x/a.csv", "metadata": {} });
        let no_meta = json!({ "url": "https://x/a.csv" });
        let wrong_type = json!({ "url": 7, "metadata": { "dataType": "TypeA" } });
        let trailing = json!({ "url": "https://x/dir/", "metadata": { "dataType": "TypeA" } });

        for payload in [no_url, no_type, no_meta, wrong_type, trailing] {
            let err = Notification::from_payload(&payload, &schema).unwrap_err();
            assert!(matches!(err, AppError::Parse(_)), "payload {payload}: {err:?}");
        }
    }

    #[test]
    fn test_custom_pointers() {
        let schema = PayloadSchema::new("/blobUrl", "/tags/kind");
        let payload = json!({ "blobUrl": "s3://bucket/k/v.json", "tags": { "kind": "TypeC" } });
        let n = Notification::from_payload(&payload, &schema).unwrap();
        assert_eq!(n.object_id, "v.json");
        assert_eq!(n.data_type, "TypeC");

        assert!(PayloadSchema::new("url", "/x").validate().is_err());
        assert!(PayloadSchema::default().validate().is_ok());
    }

    #[test]
    fn test_parse_envelopes_single_and_array() {
        let single = json!({ "id": "1", "eventType": "Microsoft.Storage.BlobCreated", "data": {} });
        let batch = json!([{ "data": { "a": 1 } }, { "data": { "b": 2 } }]);

        let envs = parse_envelopes(single).unwrap();
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0].id.as_deref(), Some("1"));
        assert!(!envs[0].is_subscription_validation());

        assert_eq!(parse_envelopes(batch).unwrap().len(), 2);
        assert!(parse_envelopes(json!("nope")).is_err());
        assert!(parse_envelopes(json!([{ "id": "no data" }])).is_err());
    }

    #[test]
    fn test_subscription_validation_envelope() {
        let body = json!([{
            "id": "2d1781af",
            "eventType": SUBSCRIPTION_VALIDATION_EVENT,
            "data": { "validationCode": "512d38b6-c7b8-40c8-89fe-f46f9e9622b6" }
        }]);
        let envs = parse_envelopes(body).unwrap();
        assert!(envs[0].is_subscription_validation());
        assert_eq!(
            envs[0].validation_code().unwrap(),
            "512d38b6-c7b8-40c8-89fe-f46f9e9622b6"
        );
    }
}
