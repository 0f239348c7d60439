use std::fmt;

use crate::graph::NodeId;

/// Errors raised by story graph mutations.
///
/// Only edge insertion can fail. The probe and the analyzer are total and
/// treat absent ids as nodes with no outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint is not a member of the node set.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
        }
    }

    /// The offending node id.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        match self {
            Self::UnknownNode(id) => *id,
        }
    }
}

/// Machine-readable error codes for editor and tooling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputParseError,
    UnknownNode,
    CycleDetected,
    GraphTooLarge,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputParseError => "E1002",
            Self::UnknownNode => "E2001",
            Self::CycleDetected => "E2002",
            Self::GraphTooLarge => "E3001",
        }
    }

    /// Short human-facing summary for terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Story graph input could not be parsed",
            Self::UnknownNode => "Edge references a node that is not in the graph",
            Self::CycleDetected => "Story graph contains a cycle",
            Self::GraphTooLarge => "Story graph exceeds the configured node limit",
        }
    }

    /// Optional remediation hint that can be surfaced to authors.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .storygraph/config.toml and retry."),
            Self::InputParseError => {
                Some("Expected JSON of the form {\"nodes\": [..], \"edges\": [[from, to], ..]}.")
            }
            Self::UnknownNode => Some("Insert the node before linking to it."),
            Self::CycleDetected => Some("Remove one of the suggested edges to break the loop."),
            Self::GraphTooLarge => Some("Raise max_nodes in the config or split the story."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
