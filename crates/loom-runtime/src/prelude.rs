//! Commonly used types for convenient import.

pub use crate::config::RuntimeConfig;
pub use crate::environment::Environment;
pub use crate::labor_market::{LaborMarket, SubagentTemplate};
pub use crate::runtime::Runtime;
