//! Application state for the HTTP server.

use crate::models::Role;
use crate::services::DataContext;

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Source, cache and aggregation settings for the view services
    pub context: DataContext,
    /// Role assumed when a request carries no role header
    pub default_role: Role,
}

impl AppState {
    pub fn new(context: DataContext, default_role: Role) -> Self {
        Self {
            context,
            default_role,
        }
    }
}
