//! Error types for the olsrsim-core crate.

use core::fmt;

use crate::types::Tick;

/// Why a single topology-file line failed to parse.
#[derive(Debug, PartialEq, Eq)]
pub enum LinkStateParseError {
    /// The line does not have exactly four space-separated fields.
    Malformed,
    /// The tick field is not a non-negative integer.
    InvalidTick(String),
    /// The status field is neither `UP` nor `DOWN`.
    InvalidStatus(String),
    /// A node-id field does not match `^[0-9]$`.
    InvalidId(String),
}

impl fmt::Display for LinkStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStateParseError::Malformed => {
                write!(f, "line must be of the form '<tick> <UP|DOWN> <from> <to>'")
            }
            LinkStateParseError::InvalidTick(v) => {
                write!(f, "tick is not a non-negative integer: '{v}'")
            }
            LinkStateParseError::InvalidStatus(v) => {
                write!(f, "invalid status: '{v}': must be UP or DOWN")
            }
            LinkStateParseError::InvalidId(v) => {
                write!(f, "invalid node id: '{v}': must match '^[0-9]$'")
            }
        }
    }
}

impl std::error::Error for LinkStateParseError {}

/// Why a topology could not be constructed.
#[derive(Debug)]
pub enum TopologyError {
    /// A line failed to parse; `line` is 1-based.
    Parse {
        line: usize,
        source: LinkStateParseError,
    },
    /// A record's tick was smaller than an earlier record's tick.
    OutOfOrder { tick: Tick, prev: Tick },
    /// The input could not be read.
    Io(std::io::Error),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::Parse { line, source } => {
                write!(f, "parse link state (line {line}): {source}")
            }
            TopologyError::OutOfOrder { tick, prev } => {
                write!(
                    f,
                    "link states must be sorted by non-decreasing tick: got {tick} after {prev}"
                )
            }
            TopologyError::Io(e) => write!(f, "unable to read topology input: {e}"),
        }
    }
}

impl From<std::io::Error> for TopologyError {
    fn from(e: std::io::Error) -> Self {
        TopologyError::Io(e)
    }
}

impl std::error::Error for TopologyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TopologyError::Parse { source, .. } => Some(source),
            TopologyError::Io(e) => Some(e),
            TopologyError::OutOfOrder { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_all_variants() {
        let variants: &[LinkStateParseError] = &[
            LinkStateParseError::Malformed,
            LinkStateParseError::InvalidTick("x".into()),
            LinkStateParseError::InvalidStatus("SIDEWAYS".into()),
            LinkStateParseError::InvalidId("42".into()),
        ];
        for v in variants {
            assert!(!v.to_string().is_empty(), "{v:?} should have non-empty Display");
        }
    }

    #[test]
    fn topology_error_display_and_from() {
        let variants: Vec<TopologyError> = vec![
            TopologyError::Parse {
                line: 3,
                source: LinkStateParseError::Malformed,
            },
            TopologyError::OutOfOrder { tick: 5, prev: 9 },
            TopologyError::Io(std::io::Error::other("boom")),
        ];
        for v in &variants {
            assert!(!v.to_string().is_empty(), "{v:?} should have non-empty Display");
        }

        let e: TopologyError = std::io::Error::other("closed").into();
        assert!(matches!(e, TopologyError::Io(_)));
    }
}
