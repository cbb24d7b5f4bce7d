use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node.
///
/// Wraps the opaque stable id string assigned by the store to provide
/// type safety and prevent accidental mixing with other string values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new node ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying ID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_serializes_as_raw_string() {
        let id = NodeId::new("9f0c2e1a");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"9f0c2e1a\"");

        let deserialized: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn node_id_displays_inner_value() {
        let id = NodeId::new("abc-123");
        assert_eq!(format!("{}", id), "abc-123");
        assert_eq!(id.as_str(), "abc-123");
    }
}
