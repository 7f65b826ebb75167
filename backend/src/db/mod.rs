//! Row-set fetching for the dashboard views.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / view services                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │  DataContext (explicit, no global)
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  DataSource trait (source) + RowFilter (filters)        │
//! └───────────────────┬─────────────────────────────────────┘
//!         ┌───────────┴────────────┐
//! ┌───────▼────────┐      ┌────────▼─────────┐
//! │  LiveSource    │      │ SyntheticSource  │
//! │  (Postgres)    │      │ (seeded, memory) │
//! └────────────────┘      └──────────────────┘
//! ```
//!
//! The source is chosen once by [`SourceFactory`] from the configuration and
//! never mixed inside a view.

#[cfg(not(any(feature = "live-source", feature = "synthetic-source")))]
compile_error!("Enable at least one data source feature.");

pub mod factory;
pub mod filters;
pub mod source;
pub mod sources;

pub use factory::SourceFactory;
pub use filters::{Filterable, RowFilter};
pub use source::{DataSource, ErrorContext, SourceError, SourceKind, SourceResult};
#[cfg(feature = "live-source")]
pub use sources::{LiveConfig, LiveSource, PoolStats};
#[cfg(feature = "synthetic-source")]
pub use sources::{SyntheticSource, SyntheticTables};
