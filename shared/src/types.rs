//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Record key carrying the participant identifier
pub const PARTICIPANT_ID_KEY: &str = "participantId";

/// Conditions used by the deployed experiment clients
pub const DEFAULT_GROUPS: [&str; 4] = ["Control", "Solo Musica", "Solo Aroma", "Musica y Aroma"];

/// Unique identifier for a browser connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of an experimental condition
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupLabel(String);

impl GroupLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// The closed, ordered set of conditions participants are balanced across.
///
/// Always non-empty and free of blank or duplicate labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSet {
    labels: Vec<GroupLabel>,
}

impl GroupSet {
    pub fn new<I, S>(labels: I) -> SharedResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<GroupLabel> = labels
            .into_iter()
            .map(|label| GroupLabel::new(label.into().trim()))
            .collect();

        if labels.is_empty() {
            return Err(SharedError::invalid_groups("at least one group is required"));
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if label.as_str().is_empty() {
                return Err(SharedError::invalid_groups("group labels must not be blank"));
            }
            if !seen.insert(label.as_str()) {
                return Err(SharedError::invalid_groups(format!("duplicate group '{}'", label)));
            }
        }

        Ok(Self { labels })
    }

    /// Parse a comma-separated list such as `"Control,Solo Musica"`
    pub fn parse(list: &str) -> SharedResult<Self> {
        Self::new(list.split(','))
    }

    pub fn labels(&self) -> &[GroupLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for GroupSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_GROUPS.iter().map(|label| GroupLabel::from(*label)).collect(),
        }
    }
}

/// Everything a participant's browser collected during the session.
///
/// Free-form JSON object; the server only looks at `participantId`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantRecord(Map<String, Value>);

impl ParticipantRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The submitted identifier, if it is a string with non-whitespace content
    pub fn participant_id(&self) -> Option<ParticipantId> {
        match self.0.get(PARTICIPANT_ID_KEY) {
            Some(Value::String(raw)) if !raw.trim().is_empty() => Some(ParticipantId(raw.clone())),
            _ => None,
        }
    }
}

/// A validated participant identifier, kept exactly as submitted
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe token: every character outside `[A-Za-z0-9_ -]` becomes `_`
    pub fn sanitized(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
