//! Trade validation and execution scheduling

mod scheduler;
mod types;
mod validator;

pub use scheduler::execute_trades;
pub use types::{ExecutedTrade, TradeStatus};
pub use validator::{validate, Verdict};
