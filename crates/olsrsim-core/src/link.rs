//! Time-indexed directed link states.

use core::fmt;
use std::str::FromStr;

use crate::error::LinkStateParseError;
use crate::types::{NodeId, Tick};

/// Whether a directed link is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Up,
    Down,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Up => write!(f, "UP"),
            LinkStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// A directed link's status from a given tick onward.
///
/// A record declares that from `tick` inclusive the link `from -> to` has
/// `status`, until overridden by a later record for the same ordered pair.
/// The reverse direction is an independent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkState {
    pub tick: Tick,
    pub status: LinkStatus,
    pub from: NodeId,
    pub to: NodeId,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.tick, self.status, self.from, self.to)
    }
}

/// Node-id grammar for topology files: a single decimal digit.
fn parse_id(field: &str) -> Result<NodeId, LinkStateParseError> {
    match field.as_bytes() {
        [b] if b.is_ascii_digit() => Ok(NodeId::new(b - b'0')),
        _ => Err(LinkStateParseError::InvalidId(field.to_string())),
    }
}

impl FromStr for LinkState {
    type Err = LinkStateParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() != 4 {
            return Err(LinkStateParseError::Malformed);
        }

        let tick: Tick = fields[0]
            .parse()
            .map_err(|_| LinkStateParseError::InvalidTick(fields[0].to_string()))?;

        let status = match fields[1] {
            "UP" => LinkStatus::Up,
            "DOWN" => LinkStatus::Down,
            other => return Err(LinkStateParseError::InvalidStatus(other.to_string())),
        };

        Ok(Self {
            tick,
            status,
            from: parse_id(fields[2])?,
            to: parse_id(fields[3])?,
        })
    }
}

/// The ordered state history of one directed link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    states: Vec<LinkState>,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state record. States must be pushed in non-decreasing
    /// tick order; the topology constructor enforces this.
    pub fn push(&mut self, state: LinkState) {
        self.states.push(state);
    }

    /// Effective status at `tick`: the status of the last record whose
    /// `tick` is not in the future. A link with no applicable record is
    /// down.
    #[must_use]
    pub fn is_up(&self, tick: Tick) -> bool {
        let mut up = false;
        for state in &self.states {
            if state.tick <= tick {
                up = state.status == LinkStatus::Up;
            }
        }
        up
    }

    #[must_use]
    pub fn states(&self) -> &[LinkState] {
        &self.states
    }
}
