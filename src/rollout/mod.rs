//! Rollout evaluation for tree-search orchestration.
//!
//! A rollout turns a (possibly restricted) decision space into a scalar
//! value in `[0, 1]`: sample one random completion, refine it with local
//! search, and normalize the refined score against the instance's initial
//! placement. Higher is better; infeasible subtrees score zero. The
//! evaluator holds no mutable state, so one instance serves any number of
//! concurrent rollouts.
//!
//! # Key Components
//!
//! - **Evaluator**: [`RolloutEvaluator`] — `evaluate`, `evaluate_with`,
//!   and the `parallel`-gated `evaluate_batch`
//! - **Config**: [`RolloutConfig`]

mod evaluator;

pub use evaluator::{RolloutConfig, RolloutEvaluator};
