//! Local-search driver configuration.

/// Configuration for [`LocalSearch`][super::LocalSearch].
///
/// # Examples
///
/// ```
/// use reassign::search::LocalSearchConfig;
///
/// let config = LocalSearchConfig::new()
///     .with_node_limit(50_000)
///     .with_window_budget(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearchConfig {
    /// Enumeration node budget per window.
    pub node_limit: u64,
    /// Adaptive windows stop growing once the product of per-process
    /// branching possibilities would exceed this.
    pub window_budget: u64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            node_limit: 1_000_000,
            window_budget: 100,
        }
    }
}

impl LocalSearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-window enumeration node budget.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Sets the adaptive window-size budget.
    pub fn with_window_budget(mut self, window_budget: u64) -> Self {
        self.window_budget = window_budget;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.node_limit == 0 {
            return Err("node_limit must be positive".to_string());
        }
        if self.window_budget == 0 {
            return Err("window_budget must be positive".to_string());
        }
        Ok(())
    }
}
