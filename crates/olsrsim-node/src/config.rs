//! Node-configuration file parsing.
//!
//! One line per node: `<src> <dst> "<msg>" <delay>`, where the ids and
//! the delay are 1–2 digit decimal integers and the message is a
//! double-quoted string with no embedded-quote handling.

use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use regex::Regex;

use olsrsim_core::NodeId;
use olsrsim_protocol::NodeMessage;

use crate::error::SimError;

/// One node's startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub id: NodeId,
    pub message: NodeMessage,
}

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\d{1,2}) (\d{1,2}) (".*?") (\d{1,2})$"#).expect("node config pattern compiles")
});

/// Read one `NodeConfig` per non-blank line.
///
/// Any malformed line aborts the whole read; node configuration errors
/// are unrecoverable at startup.
pub fn read_node_configs(reader: impl Read) -> Result<Vec<NodeConfig>, SimError> {
    let mut configs = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let caps = LINE_RE.captures(&line).ok_or_else(|| {
            SimError::Config(format!(
                "node config line {}: must match '<src> <dst> \"<msg>\" <delay>': '{line}'",
                idx + 1
            ))
        })?;

        let id = parse_id(&caps[1], idx + 1)?;
        let destination = parse_id(&caps[2], idx + 1)?;
        let payload = caps[3].trim_matches('"').to_string();
        let delay = caps[4].parse().map_err(|_| {
            SimError::Config(format!("node config line {}: bad delay '{}'", idx + 1, &caps[4]))
        })?;

        configs.push(NodeConfig {
            id,
            message: NodeMessage {
                payload,
                delay,
                destination,
                sent: false,
            },
        });
    }

    Ok(configs)
}

fn parse_id(field: &str, line: usize) -> Result<NodeId, SimError> {
    field
        .parse::<u8>()
        .map(NodeId::new)
        .map_err(|_| SimError::Config(format!("node config line {line}: bad node id '{field}'")))
}
