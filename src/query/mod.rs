//! Query engine: lazy candidates, filter aggregation and the depth-limited walk.

pub mod candidate;
pub mod engine;
pub mod filter;
