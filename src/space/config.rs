//! Budgets for sampling and enumeration.

/// Exploration budgets for [`Space::sample`][super::Space::sample] and
/// [`Space::enumerate`][super::Space::enumerate].
///
/// Both searches are exact within their budget and give up cleanly when it
/// runs out: the sampler returns `None`, the enumerator reports
/// [`Enumeration::Truncated`].
///
/// # Examples
///
/// ```
/// use reassign::space::SearchLimits;
///
/// let limits = SearchLimits::default()
///     .with_fail_limit(500)
///     .with_node_limit(200_000);
/// assert!(limits.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Cumulative failed-node budget for randomized sampling.
    pub fail_limit: u64,
    /// Explored-node budget for deterministic enumeration.
    pub node_limit: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            fail_limit: 100,
            node_limit: 1_000_000,
        }
    }
}

impl SearchLimits {
    /// Creates the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling fail budget.
    pub fn with_fail_limit(mut self, fail_limit: u64) -> Self {
        self.fail_limit = fail_limit;
        self
    }

    /// Sets the enumeration node budget.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Validates the limits.
    pub fn validate(&self) -> Result<(), String> {
        if self.fail_limit == 0 {
            return Err("fail_limit must be positive".to_string());
        }
        if self.node_limit == 0 {
            return Err("node_limit must be positive".to_string());
        }
        Ok(())
    }
}

/// Whether an enumeration visited the whole subtree or ran out of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enumeration {
    /// Every completion under the current restrictions was visited.
    Complete,
    /// The node budget expired; the callback saw a prefix of the
    /// completions.
    Truncated,
}
