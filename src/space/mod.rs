//! Constrained decision space over process-to-machine assignments.
//!
//! A [`Space`] is a partial assignment plus the incremental bookkeeping
//! needed to admit or reject further placements in O(resources) time:
//! per-machine loads with a fixed transient baseline, a (machine, service)
//! conflict set, per-service location counts, and the move-restriction
//! counters. Exploration never copies the space per branch; sampling and
//! enumeration backtrack in place over an internal clone of the receiver.
//!
//! # Key Components
//!
//! - **State**: [`Space`], [`SpaceStatus`], [`Decision`]
//! - **Budgets**: [`SearchLimits`], [`Enumeration`]
//! - **Branching**: [`footprint_order`] — the static process permutation
//!   both exploration modes follow
//!
//! # Contract with the checker
//!
//! Every space that reaches [`SpaceStatus::Solved`] yields an assignment
//! accepted by [`checker::is_valid`][crate::checker::is_valid]: capacity
//! and conflict hold by construction on every admitted decision, spread is
//! pruned with an exact-at-completion lower bound, and dependency is
//! verified when the last process is placed.

mod branching;
mod config;
#[allow(clippy::module_inception)]
mod space;

pub use branching::footprint_order;
pub use config::{Enumeration, SearchLimits};
pub use space::{Decision, Space, SpaceStatus};
