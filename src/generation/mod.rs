//! Candidate generation from declarative coordinate protocols.

pub mod logic;
pub mod types;

pub use logic::{generate_candidates, protocol_candidates};
pub use types::Protocol;
