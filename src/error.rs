use thiserror::Error;

use crate::model::ElementKind;

/// The main error type for admgraph operations.
///
/// Every fallible operation leaves the document unchanged when it returns
/// one of these, so callers can simply propagate with `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmError {
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },

    #[error("Id {id} is already in use in this document")]
    IdInUse { id: String },

    #[error("Type mismatch for {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("Reference would connect elements of two different documents")]
    CrossDocumentReference,

    #[error("Reference from {from} to {to} would create a pack format cycle")]
    ReferenceCycle { from: String, to: String },

    #[error("Parameter {parameter} is not set")]
    NotSet { parameter: &'static str },

    #[error(
        "Ambiguous duration for {channel_format}: referenced with {} different intervals ({})",
        intervals.len(),
        intervals.join(", ")
    )]
    AmbiguousDuration {
        channel_format: String,
        intervals: Vec<String>,
    },

    #[error("Unsupported reference sync mode: {mode}")]
    UnsupportedSyncMode { mode: String },

    #[error("Handle refers to a {kind} that is no longer part of the document")]
    StaleHandle { kind: ElementKind },
}

impl AdmError {
    /// Shorthand for building an [`AdmError::InvalidValue`].
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        AdmError::InvalidValue {
            parameter,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_duration_message_lists_intervals() {
        let err = AdmError::AmbiguousDuration {
            channel_format: "AC_00031001".into(),
            intervals: vec!["[0s, 3s)".into(), "[2s, 7s)".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("AC_00031001"));
        assert!(msg.contains("2 different intervals"));
        assert!(msg.contains("[2s, 7s)"));
    }

    #[test]
    fn test_stale_handle_names_kind() {
        let err = AdmError::StaleHandle {
            kind: ElementKind::PackFormat,
        };
        assert!(err.to_string().contains("audioPackFormat"));
    }
}
