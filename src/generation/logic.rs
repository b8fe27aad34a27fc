//! Candidate generation.
//!
//! Protocols produce (x, y) pairs; the merged set is de-duplicated in
//! first-seen order and normalised to `TilePosition` (row = y, column = x).

use indexmap::IndexSet;
use tracing::{debug, warn};

use super::types::Protocol;
use crate::board::TilePosition;
use crate::constants::MAX_PROTOCOL_CANDIDATES;
use crate::error::{CandidateStage, ConfigError, Result};

fn too_many(protocol: &Protocol, count: u64) -> ConfigError {
    ConfigError::InvalidProtocolParams {
        protocol: protocol.tag().to_string(),
        message: format!(
            "{} candidates exceeds the limit of {}",
            count, MAX_PROTOCOL_CANDIDATES
        ),
    }
}

/// Raw (x, y) coordinates produced by a single protocol.
pub fn protocol_candidates(variable: &str, protocol: &Protocol) -> Result<Vec<(i32, i32)>> {
    match protocol {
        Protocol::RangeProduct { xrange, yrange } => {
            let count = xrange
                .len()
                .checked_mul(yrange.len())
                .filter(|&n| n <= MAX_PROTOCOL_CANDIDATES);
            let Some(count) = count else {
                let requested = (xrange.len() as u64).saturating_mul(yrange.len() as u64);
                return Err(too_many(protocol, requested));
            };
            let mut out = Vec::with_capacity(count);
            for &x in xrange {
                for &y in yrange {
                    out.push((x, y));
                }
            }
            Ok(out)
        }
        Protocol::RangePair(b) => {
            let xs = b.x1..b.x2;
            let ys = b.y1..b.y2;
            if xs.len() != ys.len() {
                return Err(ConfigError::InvalidProtocolParams {
                    protocol: protocol.tag().to_string(),
                    message: format!(
                        "x range [{}, {}) has {} values but y range [{}, {}) has {}",
                        b.x1,
                        b.x2,
                        xs.len(),
                        b.y1,
                        b.y2,
                        ys.len()
                    ),
                });
            }
            if xs.len() > MAX_PROTOCOL_CANDIDATES {
                return Err(too_many(protocol, xs.len() as u64));
            }
            let pairs: IndexSet<(i32, i32)> = xs.zip(ys).collect();
            Ok(pairs.into_iter().collect())
        }
        Protocol::RectRange(_) => Err(ConfigError::ProtocolNotImplemented {
            variable: variable.to_string(),
            protocol: protocol.tag().to_string(),
        }),
    }
}

/// Runs every protocol of a variable and merges the results.
///
/// Protocols with invalid parameters are logged and contribute nothing. The
/// merged set must be non-empty.
pub fn generate_candidates(variable: &str, protocols: &[Protocol]) -> Result<Vec<TilePosition>> {
    let mut merged: IndexSet<(i32, i32)> = IndexSet::new();
    for protocol in protocols {
        match protocol_candidates(variable, protocol) {
            Ok(coords) => {
                debug!(
                    variable,
                    protocol = protocol.tag(),
                    count = coords.len(),
                    "generated candidates"
                );
                merged.extend(coords);
            }
            Err(e) if e.is_recoverable() => {
                warn!(
                    variable,
                    params = %protocol.params_json(),
                    "invalid coordinate input: {}",
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }

    if merged.is_empty() {
        return Err(ConfigError::EmptyCandidateSet {
            variable: variable.to_string(),
            stage: CandidateStage::Generated,
        });
    }

    Ok(merged
        .into_iter()
        .map(|(x, y)| TilePosition::from_xy(x, y))
        .collect())
}
