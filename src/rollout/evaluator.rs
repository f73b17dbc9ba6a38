//! Monte-Carlo rollout evaluation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::checker;
use crate::model::Context;
use crate::search::{LocalSearch, LocalSearchConfig};
use crate::sink::SolutionSink;
use crate::space::{SearchLimits, Space, SpaceStatus};

/// Configuration for rollout evaluation.
///
/// `seed` makes evaluations reproducible; unset falls back to a fixed
/// default, so two evaluators with default configs agree.
///
/// # Examples
///
/// ```
/// use reassign::rollout::RolloutConfig;
///
/// let config = RolloutConfig::new()
///     .with_fail_limit(200)
///     .with_adaptive(true)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolloutConfig {
    /// Cumulative fail budget for the Monte-Carlo sample.
    pub fail_limit: u64,
    /// Enumeration node budget for the refinement windows.
    pub node_limit: u64,
    /// Window-size budget for adaptive refinement.
    pub window_budget: u64,
    /// Use adaptive windows instead of single-process windows.
    pub adaptive: bool,
    /// RNG seed for sampling.
    pub seed: Option<u64>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            fail_limit: 100,
            node_limit: 1_000_000,
            window_budget: 100,
            adaptive: false,
            seed: None,
        }
    }
}

impl RolloutConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling fail budget.
    pub fn with_fail_limit(mut self, fail_limit: u64) -> Self {
        self.fail_limit = fail_limit;
        self
    }

    /// Sets the refinement node budget.
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Sets the adaptive window-size budget.
    pub fn with_window_budget(mut self, window_budget: u64) -> Self {
        self.window_budget = window_budget;
        self
    }

    /// Selects adaptive or single-process refinement windows.
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.fail_limit == 0 {
            return Err("fail_limit must be positive".to_string());
        }
        if self.node_limit == 0 {
            return Err("node_limit must be positive".to_string());
        }
        if self.window_budget == 0 {
            return Err("window_budget must be positive".to_string());
        }
        Ok(())
    }
}

/// Scores subtrees of the decision space for a tree-search orchestrator.
///
/// An evaluation samples one random completion of the given space, refines
/// it with local search, and normalizes the refined score against the
/// score of the instance's initial placement:
///
/// ```text
/// value = original / (original + refined)
/// ```
///
/// Values live in `[0, 1]` and grow as the refined score shrinks; a failed
/// or exhausted space evaluates to 0. Every sampled and refined solution
/// is offered to the sink on the way.
pub struct RolloutEvaluator<'a> {
    ctx: &'a Context,
    original_score: u64,
}

impl<'a> RolloutEvaluator<'a> {
    /// Creates an evaluator; the normalization baseline is the score of
    /// the initial placement.
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            original_score: checker::compute_score(ctx, ctx.initial_solution()),
        }
    }

    /// The normalization baseline.
    pub fn original_score(&self) -> u64 {
        self.original_score
    }

    /// Evaluates `space` with an internally seeded RNG.
    pub fn evaluate<S>(&self, space: &Space<'a>, config: &RolloutConfig, sink: &S) -> f64
    where
        S: SolutionSink + ?Sized,
    {
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(42));
        self.evaluate_with(space, config, sink, &mut rng)
    }

    /// Evaluates `space`, drawing the Monte-Carlo sample from `rng`.
    pub fn evaluate_with<S, R>(
        &self,
        space: &Space<'a>,
        config: &RolloutConfig,
        sink: &S,
        rng: &mut R,
    ) -> f64
    where
        S: SolutionSink + ?Sized,
        R: Rng + ?Sized,
    {
        debug_assert!(std::ptr::eq(self.ctx, space.context()));
        if space.status() == SpaceStatus::Failed {
            return 0.0;
        }

        let limits = SearchLimits::new()
            .with_fail_limit(config.fail_limit)
            .with_node_limit(config.node_limit);
        let Some(sample) = space.sample(&limits, rng) else {
            return 0.0;
        };
        if let Err(error) = sink.write_solution(&sample, checker::compute_score(self.ctx, &sample))
        {
            warn!(%error, "failed to persist sampled solution");
        }

        let ls_config = LocalSearchConfig::new()
            .with_node_limit(config.node_limit)
            .with_window_budget(config.window_budget);
        let result = if config.adaptive {
            LocalSearch::run_adaptive(space, &sample, &ls_config, sink)
        } else {
            LocalSearch::run(space, &sample, &ls_config, sink)
        };

        if result.best_score == 0 {
            return 1.0;
        }
        self.original_score as f64 / (self.original_score as f64 + result.best_score as f64)
    }

    /// Evaluates a batch of spaces in parallel, one rollout each. Seeds
    /// are derived per index so the batch is reproducible.
    #[cfg(feature = "parallel")]
    pub fn evaluate_batch<S>(
        &self,
        spaces: &[Space<'a>],
        config: &RolloutConfig,
        sink: &S,
    ) -> Vec<f64>
    where
        S: SolutionSink + ?Sized,
    {
        use rayon::prelude::*;

        let base = config.seed.unwrap_or(42);
        spaces
            .par_iter()
            .enumerate()
            .map(|(index, space)| {
                let mut rng = StdRng::seed_from_u64(base.wrapping_add(index as u64));
                self.evaluate_with(space, config, sink, &mut rng)
            })
            .collect()
    }
}
