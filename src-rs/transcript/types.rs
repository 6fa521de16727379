use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// When a transcript line was spoken. Backends send either epoch millis or a date string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            Timestamp::Fractional(ms) if ms.is_finite() => {
                Utc.timestamp_millis_opt(ms.trunc() as i64).single()
            }
            Timestamp::Fractional(_) => None,
            Timestamp::Text(raw) => parse_text(raw.trim()),
        }
    }

    /// Local date/time, or the raw value when it cannot be read as a point in time.
    pub fn to_local_string(&self) -> String {
        match self.to_utc() {
            Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.raw(),
        }
    }

    fn raw(&self) -> String {
        match self {
            Timestamp::Millis(ms) => ms.to_string(),
            Timestamp::Fractional(ms) => ms.to_string(),
            Timestamp::Text(raw) => raw.clone(),
        }
    }
}

fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Naive ISO strings carry no offset and are local wall-clock time.
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Loosely typed scalar as display text. Null, `false` and empty strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(scalar_text).unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(scalar_text))
}

/// `0`, `""` and values of the wrong shape mean "no timestamp".
fn lenient_timestamp<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Timestamp>, D::Error> {
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v @ (Value::Number(_) | Value::String(_))) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(rename = "_id", default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl TranscriptEntry {
    /// Non-empty outcome label, if the entry carries one.
    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref().filter(|o| !o.is_empty())
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Decodes one raw item. Some backends send `id` instead of `_id`.
    pub fn from_value(mut item: Value) -> Option<Self> {
        if let Some(obj) = item.as_object_mut() {
            if !obj.contains_key("_id") {
                if let Some(id) = obj.remove("id") {
                    obj.insert("_id".to_string(), id);
                }
            }
        }
        match serde_json::from_value::<TranscriptEntry>(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable transcript entry");
                None
            }
        }
    }
}

pub fn terminal_outcome(items: &[TranscriptEntry]) -> Option<&str> {
    items.iter().find_map(|item| item.outcome())
}

/// Items are kept raw so one odd entry cannot sink the whole page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TranscriptPage {
    #[serde(default)]
    pub items: Option<Value>,
}

impl TranscriptPage {
    pub fn into_items(self) -> Vec<TranscriptEntry> {
        let raw = match self.items {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        };
        raw.into_iter().filter_map(TranscriptEntry::from_value).collect()
    }
}
