use serde::{
    de::{self, Unexpected},
    Deserialize, Deserializer, Serialize,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::{Error, Result};

// Alertmanager webhook payload. Only the per-alert fields are read; the
// group-level fields Alertmanager also sends are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlertBatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
    /// Timestamps are relayed as received, never parsed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub starts_at: String,
    #[serde(default, alias = "endAt", deserialize_with = "null_as_default")]
    pub ends_at: String,
}

impl Alert {
    pub fn label(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn annotation(&self, key: &str) -> &str {
        self.annotations.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// Decodes a raw request body into a batch, keeping the order of `alerts`.
///
/// The body and every element of `alerts` must be JSON objects. Derived
/// struct impls would otherwise read arrays positionally.
pub fn decode_batch(body: &[u8]) -> Result<AlertBatch> {
    let value: Value = serde_json::from_slice(body)?;
    expect_object(&value, "an object with an `alerts` field")?;
    if let Some(Value::Array(alerts)) = value.get("alerts") {
        for alert in alerts {
            expect_object(alert, "an alert object")?;
        }
    }
    Ok(serde_json::from_value(value)?)
}

fn expect_object(value: &Value, expected: &'static str) -> Result<()> {
    let unexpected = match value {
        Value::Object(_) => return Ok(()),
        Value::Array(_) => Unexpected::Seq,
        Value::String(s) => Unexpected::Str(s),
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::Null => Unexpected::Unit,
    };
    Err(Error::Decode(de::Error::invalid_type(unexpected, &expected)))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<AlertBatch> {
        decode_batch(value.to_string().as_bytes())
    }

    #[test]
    fn decodes_alertmanager_payload() {
        let batch = decode(json!({
            "receiver": "dingtalk",
            "status": "firing",
            "groupLabels": {"alertname": "DiskFull"},
            "alerts": [
                {
                    "status": "firing",
                    "labels": {"alertname": "DiskFull", "severity": "critical"},
                    "annotations": {"summary": "disk full", "description": "disk at 95%"},
                    "startsAt": "2024-01-01T00:00:00Z",
                    "endsAt": "0001-01-01T00:00:00Z",
                    "generatorURL": "http://prometheus/graph",
                    "fingerprint": "abc"
                },
                {"status": "resolved"}
            ]
        }))
        .unwrap();

        assert_eq!(batch.alerts.len(), 2);
        let first = &batch.alerts[0];
        assert_eq!(first.status, "firing");
        assert_eq!(first.label("severity"), "critical");
        assert_eq!(first.annotation("summary"), "disk full");
        assert_eq!(first.starts_at, "2024-01-01T00:00:00Z");
        assert_eq!(first.ends_at, "0001-01-01T00:00:00Z");
        assert_eq!(batch.alerts[1].status, "resolved");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let batch = decode(json!({"alerts": [{}]})).unwrap();
        assert_eq!(batch.alerts[0], Alert::default());

        let batch = decode(json!({})).unwrap();
        assert!(batch.alerts.is_empty());
    }

    #[test]
    fn nulls_decode_as_empty() {
        let batch = decode(json!({
            "alerts": [{"status": null, "labels": null, "annotations": null, "startsAt": null}]
        }))
        .unwrap();
        assert_eq!(batch.alerts[0], Alert::default());

        let batch = decode(json!({"alerts": null})).unwrap();
        assert!(batch.alerts.is_empty());
    }

    #[test]
    fn accepts_legacy_end_at_key() {
        let batch = decode(json!({"alerts": [{"endAt": "2024-01-01T01:00:00Z"}]})).unwrap();
        assert_eq!(batch.alerts[0].ends_at, "2024-01-01T01:00:00Z");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            decode(json!({"alerts": "not-an-array"})),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            decode(json!({"alerts": [{"labels": 3}]})),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            decode(json!({"alerts": [{"labels": {"severity": 1}}]})),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn rejects_arrays_in_place_of_objects() {
        let bodies: [&[u8]; 5] = [
            b"[]",
            b"[[]]",
            b"[[[\"firing\"]]]",
            br#"{"alerts": [["firing", {"severity": "critical"}]]}"#,
            br#"{"alerts": [{"status": "firing"}, ["firing"]]}"#,
        ];
        for body in bodies {
            let result = decode_batch(body);
            assert!(
                matches!(result, Err(Error::Decode(_))),
                "{} decoded as {:?}",
                String::from_utf8_lossy(body),
                result
            );
        }
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(matches!(decode_batch(b"null"), Err(Error::Decode(_))));
        assert!(matches!(decode_batch(b"\"alerts\""), Err(Error::Decode(_))));
        assert!(matches!(decode_batch(br#"{"alerts": [3]}"#), Err(Error::Decode(_))));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(decode_batch(b"{\"alerts\": ["), Err(Error::Decode(_))));
        assert!(matches!(decode_batch(b""), Err(Error::Decode(_))));
    }

    #[test]
    fn lookups_miss_as_empty() {
        let alert = Alert::default();
        assert_eq!(alert.label("severity"), "");
        assert_eq!(alert.annotation("summary"), "");
    }
}
