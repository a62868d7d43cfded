//! Time-indexed topology oracle.
//!
//! Constructed once from the topology file and read-only afterwards, so
//! it can be queried concurrently from router helpers without
//! synchronization.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use crate::error::TopologyError;
use crate::link::{Link, LinkState};
use crate::types::{NodeId, Tick};

/// Directed-link availability over time, indexed by (from, to).
///
/// A missing entry at either level means the link is permanently down.
#[derive(Debug)]
#[must_use]
pub struct NetworkTopology {
    links: HashMap<NodeId, HashMap<NodeId, Link>>,
}

impl NetworkTopology {
    /// Parse a topology from line-oriented `<tick> <UP|DOWN> <from> <to>`
    /// records.
    ///
    /// Records must be sorted by non-decreasing tick; the first violation
    /// aborts construction, leaving no partial topology observable. Blank
    /// lines are skipped.
    pub fn from_reader(reader: impl Read) -> Result<Self, TopologyError> {
        let mut links: HashMap<NodeId, HashMap<NodeId, Link>> = HashMap::new();
        let mut prev_tick: Tick = 0;

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let state: LinkState = line.parse().map_err(|source| TopologyError::Parse {
                line: idx + 1,
                source,
            })?;

            if state.tick < prev_tick {
                return Err(TopologyError::OutOfOrder {
                    tick: state.tick,
                    prev: prev_tick,
                });
            }
            prev_tick = state.tick;

            links
                .entry(state.from)
                .or_default()
                .entry(state.to)
                .or_default()
                .push(state);
        }

        Ok(Self { links })
    }

    /// Whether the directed link `from -> to` is up at `tick`.
    ///
    /// Unknown pairs report down.
    #[must_use]
    pub fn is_up(&self, from: NodeId, to: NodeId, tick: Tick) -> bool {
        self.links
            .get(&from)
            .and_then(|dsts| dsts.get(&to))
            .is_some_and(|link| link.is_up(tick))
    }

    /// The state history of one directed link, if any records exist.
    #[must_use]
    pub fn link(&self, from: NodeId, to: NodeId) -> Option<&Link> {
        self.links.get(&from).and_then(|dsts| dsts.get(&to))
    }
}
