use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Score-to-message record. Passed through to clients untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreDescription(pub Map<String, Value>);

impl ScoreDescription {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for ScoreDescription {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
