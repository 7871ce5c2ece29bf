//! Label Map - Class id → attack name

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::Serialize;
use serde_json::Value;

use crate::constants::UNKNOWN_LABEL;

/// Immutable lookup from class id to display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelMap {
    labels: BTreeMap<i64, String>,
}

impl LabelMap {
    pub fn new(labels: BTreeMap<i64, String>) -> Self {
        Self { labels }
    }

    /// Accepts `{"0": "Normal", "1": "DoS"}` or `["Normal", "DoS"]`
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let labels = match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, name)| {
                    let id = key.trim().parse::<i64>().map_err(|_| {
                        serde_json::Error::custom(format!("label map key '{}' is not a class id", key))
                    })?;
                    Ok((id, serde_json::from_value::<String>(name)?))
                })
                .collect::<Result<BTreeMap<_, _>, serde_json::Error>>()?,
            Value::Array(list) => list
                .into_iter()
                .enumerate()
                .map(|(i, name)| Ok((i as i64, serde_json::from_value::<String>(name)?)))
                .collect::<Result<BTreeMap<_, _>, serde_json::Error>>()?,
            _ => {
                return Err(serde_json::Error::custom(
                    "label map must be a JSON object or array",
                ))
            }
        };
        Ok(Self::new(labels))
    }

    /// Display name for `id`, "Unknown" when unmapped
    pub fn resolve(&self, id: i64) -> &str {
        self.labels.get(&id).map(String::as_str).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl FromIterator<(i64, String)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (i64, String)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
