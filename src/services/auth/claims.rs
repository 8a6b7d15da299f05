use serde_json::{Map, Value};

/// Decoded, verified token payload.
///
/// The subject comes from `sub`, or from `id` for tokens minted by the legacy issuer.
/// Every claim in the payload (including `sub`/`exp`) stays available via [`AuthClaim::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuthClaim {
    subject: String,
    fields: Map<String, Value>,
}

impl AuthClaim {
    /// `None` when neither `sub` nor `id` holds a non-empty string or a number.
    pub fn from_fields(fields: Map<String, Value>) -> Option<Self> {
        let subject = ["sub", "id"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(subject_from_value))?;

        Some(Self { subject, fields })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.fields.get("exp").and_then(Value::as_u64)
    }
}

fn subject_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
