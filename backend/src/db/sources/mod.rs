//! Data source implementations:
//! - `synthetic`: seeded in-memory generator for development, demos and tests
//! - `live`: PostgreSQL via Diesel
#[cfg(feature = "live-source")]
pub mod live;
#[cfg(feature = "synthetic-source")]
pub mod synthetic;

#[cfg(feature = "live-source")]
pub use live::{LiveConfig, LiveSource, PoolStats};
#[cfg(feature = "synthetic-source")]
pub use synthetic::{SyntheticSource, SyntheticTables};
