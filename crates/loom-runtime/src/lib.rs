//! Loom Runtime — the immutable per-session Runtime bundle and the subagent
//! labor market (spec §3, §4.7, component C7).
//!
//! The concrete `SubagentSpawner` that constructs a child agent loop lives
//! in `loom-soul`, not here: spawning requires running the loop itself,
//! which would make this crate depend on its own consumer. This crate only
//! owns the bundle of ambient services and the name-keyed template registry
//! the spawner consults.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod config;
mod environment;
mod labor_market;
pub mod prelude;
mod runtime;

pub use config::RuntimeConfig;
pub use environment::Environment;
pub use labor_market::{LaborMarket, SubagentTemplate};
pub use runtime::Runtime;
