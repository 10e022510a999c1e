//! Portfolio model
//!
//! Position and account entities with derived metrics (weights, P/L,
//! sector allocations). Everything downstream (risk scoring, strategy,
//! validation) consumes these.

mod account;
mod position;

pub use account::Portfolio;
pub use position::{AssetClass, Fundamentals, Position};
