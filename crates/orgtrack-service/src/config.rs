//! Service configuration.

/// Configuration for the query and mutation layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum length, in characters, of project names and task titles.
    pub max_name_length: usize,
    /// Reject project/task updates that do not name an organization.
    ///
    /// Off by default: existing clients update by id alone. When a
    /// caller does pass `organization_slug` it is always enforced.
    pub require_update_scope: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 200,
            require_update_scope: false,
        }
    }
}
