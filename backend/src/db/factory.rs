//! Data source factory.
//!
//! Builds the configured [`DataSource`] once at startup. The choice between
//! the live and the synthetic source is made here and nowhere else.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::db::source::{DataSource, SourceError, SourceKind, SourceResult};
#[cfg(feature = "live-source")]
use crate::db::sources::live::{LiveConfig, LiveSource};
#[cfg(feature = "synthetic-source")]
use crate::db::sources::synthetic::SyntheticSource;

/// Factory for data source instances.
///
/// # Example
/// ```ignore
/// use power_dash::config::DashboardConfig;
/// use power_dash::db::SourceFactory;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DashboardConfig::load()?;
///     let source = SourceFactory::from_config(&config).await?;
///     assert!(source.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct SourceFactory;

impl SourceFactory {
    /// Create the source selected by `config`.
    pub async fn from_config(config: &DashboardConfig) -> SourceResult<Arc<dyn DataSource>> {
        let kind = config
            .source_kind()
            .map_err(|e| SourceError::configuration(e.to_string()))?;
        Self::create(kind, config).await
    }

    /// Create a source of the given kind using the matching config section.
    pub async fn create(
        kind: SourceKind,
        config: &DashboardConfig,
    ) -> SourceResult<Arc<dyn DataSource>> {
        tracing::info!("Creating {} data source", kind);
        match kind {
            SourceKind::Live => {
                #[cfg(feature = "live-source")]
                {
                    let live = Self::create_live(LiveConfig::from(&config.postgres)).await?;
                    Ok(live as Arc<dyn DataSource>)
                }
                #[cfg(not(feature = "live-source"))]
                {
                    Err(SourceError::configuration(
                        "Live source feature not enabled",
                    ))
                }
            }
            SourceKind::Synthetic => {
                #[cfg(feature = "synthetic-source")]
                {
                    let synthetic = SyntheticSource::generate(&config.synthetic);
                    Ok(Arc::new(synthetic) as Arc<dyn DataSource>)
                }
                #[cfg(not(feature = "synthetic-source"))]
                {
                    Err(SourceError::configuration(
                        "Synthetic source feature not enabled",
                    ))
                }
            }
        }
    }

    /// Connect and migrate on a blocking thread.
    #[cfg(feature = "live-source")]
    pub async fn create_live(config: LiveConfig) -> SourceResult<Arc<LiveSource>> {
        let live = tokio::task::spawn_blocking(move || LiveSource::new(config))
            .await
            .map_err(|e| SourceError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(live))
    }
}
