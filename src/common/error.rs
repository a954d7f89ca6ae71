//! Error types for steering_planner

use thiserror::Error;

use crate::common::types::NodeId;

/// Main error type for the steering planner
///
/// Rejected moves and blocked candidates are not errors; they are reported
/// as values by the motion model and skipped by the neighbor iteration.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The node graph handed to the motion model is inconsistent
    #[error("Corrupted search graph at node {node}: {reason}")]
    CorruptedGraph { node: NodeId, reason: String },

    /// Path planning failed
    #[error("Planning error: {0}")]
    PlanningError(String),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub(crate) fn corrupted(node: NodeId, reason: impl Into<String>) -> Self {
        PlannerError::CorruptedGraph {
            node,
            reason: reason.into(),
        }
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::PlanningError("No path found".to_string());
        assert_eq!(format!("{}", err), "Planning error: No path found");
    }

    #[test]
    fn test_corrupted_display_names_node() {
        let err = PlannerError::corrupted(NodeId(7), "missing predecessor");
        assert_eq!(
            format!("{}", err),
            "Corrupted search graph at node #7: missing predecessor"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlannerError = io_err.into();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
