//! Multi-factor portfolio risk assessment
//!
//! Pure scoring functions over a portfolio snapshot: diversification,
//! concentration (HHI), sector exposure, market beta, optional realized
//! volatility, per-position blends, and a weighted overall score.

mod assessor;
pub(crate) mod stats;
mod types;

pub use assessor::{
    assess, concentration_risk, diversification_risk, market_risk, position_risk, sector_risk,
    volatility_risk, ReturnSeries,
};
pub use types::{PositionRisk, RiskReport};
