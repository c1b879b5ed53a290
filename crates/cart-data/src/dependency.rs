//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Backend dependencies the cart talks to.
///
/// Each tag carries default timeouts and retry counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Stock / availability checks.
    Inventory,
    /// Product details.
    Catalog,
}

impl DependencyTag {
    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Inventory => Duration::from_millis(2000),
            Self::Catalog => Duration::from_millis(3000),
        }
    }

    /// Get the default max retries for this dependency type.
    ///
    /// Cart lookups are not retried unless configured; a failed lookup is
    /// reported to the shopper straight away.
    pub fn default_max_retries(&self) -> u32 {
        0
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Catalog => "catalog",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
