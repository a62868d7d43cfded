//! Protocol timing constants, all in ticks.

use olsrsim_core::Tick;

/// How long a one-hop neighbor entry is held after the HELLO that
/// refreshed it.
pub const NEIGHBOR_HOLD_TIME: Tick = 15;

/// How long a topology-table entry is held after the TC that created it.
pub const TOPOLOGY_HOLD_TIME: Tick = 30;

/// HELLO emission period.
pub const HELLO_PERIOD: Tick = 5;

/// TC emission period.
pub const TC_PERIOD: Tick = 10;

/// Re-origination delay after a DATA send fails for lack of a route.
pub const DATA_RETRY_DELAY: Tick = 30;

/// Upper bound on hop-expansion passes when deriving the routing table.
pub const MAX_ROUTE_HOPS: u32 = 256;
