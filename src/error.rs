//! Error types for the candidate retrieval pipeline.
//!
//! All failures abort the whole retrieval call; partial candidate lists are
//! never returned, since a silently shortened list is worse than a failed
//! one for an interactive selector. No retries are performed here.

use thiserror::Error;

use crate::models::NodeId;

/// The aggregating query failed to execute.
///
/// Covers an unreachable store, a malformed query, and schema mismatches
/// surfaced while mapping rows.
#[derive(Debug, Error)]
#[error("node retrieval failed: {0}")]
pub struct RetrievalError(#[from] rusqlite::Error);

/// A denormalized row failed to decode into node records.
#[derive(Debug, Error)]
#[error("malformed {column} encoding for node {node_id}: {reason}")]
pub struct DecodeError {
    /// Id of the node whose row failed to decode.
    pub node_id: String,
    /// The column that failed.
    pub column: &'static str,
    /// What was wrong with the encoded value.
    pub reason: String,
}

/// A formatter failed while processing a specific node.
#[derive(Debug, Error)]
#[error("failed to format node {node_id} ({title}): {reason}")]
pub struct FormatError {
    /// Id of the offending node.
    pub node_id: NodeId,
    /// Title variant being formatted when the error occurred.
    pub title: String,
    /// The formatter's error message.
    pub reason: String,
}

/// Any failure of a candidate retrieval call.
#[derive(Debug, Error)]
pub enum Error {
    /// The aggregating query failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// A row failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A node failed to format.
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_node_and_column() {
        let err = DecodeError {
            node_id: "n1".to_string(),
            column: "refs",
            reason: "missing ':' separator".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("n1"));
        assert!(message.contains("refs"));
        assert!(message.contains("missing ':'"));
    }

    #[test]
    fn format_error_names_node_and_title() {
        let err = FormatError {
            node_id: NodeId::new("n2"),
            title: "Weekly review".to_string(),
            reason: "callback refused".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("n2"));
        assert!(message.contains("Weekly review"));
    }

    #[test]
    fn error_wraps_each_variant_transparently() {
        let decode: Error = DecodeError {
            node_id: "n1".to_string(),
            column: "properties",
            reason: "invalid JSON".to_string(),
        }
        .into();

        // Transparent wrapping: the umbrella error reads as the inner one.
        assert!(decode.to_string().contains("properties"));
        assert!(matches!(decode, Error::Decode(_)));
    }
}
