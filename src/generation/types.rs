//! Generation protocols and their document encoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{PROTOCOL_RANGE_PAIR, PROTOCOL_RANGE_PRODUCT, PROTOCOL_RECT_RANGE};
use crate::error::{ConfigError, Result};

/// How a set of (x, y) coordinates is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// Cartesian product of two explicit coordinate lists (`comb_list`).
    RangeProduct { xrange: Vec<i32>, yrange: Vec<i32> },
    /// Element-wise pairing of `[x1, x2)` with `[y1, y2)` (`zip_list`).
    RangePair(Bounds),
    /// Every cell of the rectangle `[x1, x2) x [y1, y2)` (`rect_range`). Reserved.
    RectRange(Bounds),
}

/// Half-open coordinate bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x1: i32,
    pub x2: i32,
    pub y1: i32,
    pub y2: i32,
}

#[derive(Deserialize)]
struct ProductParams {
    xrange: Vec<i32>,
    yrange: Vec<i32>,
}

impl Protocol {
    /// Document tag for this protocol
    pub fn tag(&self) -> &'static str {
        match self {
            Protocol::RangeProduct { .. } => PROTOCOL_RANGE_PRODUCT,
            Protocol::RangePair(_) => PROTOCOL_RANGE_PAIR,
            Protocol::RectRange(_) => PROTOCOL_RECT_RANGE,
        }
    }

    /// Parses one `tag: params` entry of a variable's generation spec.
    pub fn parse(variable: &str, tag: &str, params: &Value) -> Result<Self> {
        let malformed = |e: serde_json::Error| {
            ConfigError::MalformedRecipe(format!("{}.{}: {}", variable, tag, e))
        };
        match tag {
            PROTOCOL_RANGE_PRODUCT => {
                let p = ProductParams::deserialize(params).map_err(malformed)?;
                Ok(Protocol::RangeProduct {
                    xrange: p.xrange,
                    yrange: p.yrange,
                })
            }
            PROTOCOL_RANGE_PAIR => Ok(Protocol::RangePair(
                Bounds::deserialize(params).map_err(malformed)?,
            )),
            PROTOCOL_RECT_RANGE => Ok(Protocol::RectRange(
                Bounds::deserialize(params).map_err(malformed)?,
            )),
            other => Err(ConfigError::UnknownProtocol {
                variable: variable.to_string(),
                tag: other.to_string(),
            }),
        }
    }

    /// Inverse of [`Protocol::parse`]
    pub fn params_json(&self) -> Value {
        match self {
            Protocol::RangeProduct { xrange, yrange } => {
                serde_json::json!({ "xrange": xrange, "yrange": yrange })
            }
            Protocol::RangePair(b) | Protocol::RectRange(b) => {
                serde_json::json!({ "x1": b.x1, "x2": b.x2, "y1": b.y1, "y2": b.y2 })
            }
        }
    }
}
