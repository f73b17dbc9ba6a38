//! Machine-reassignment search engine.
//!
//! Given a set of processes currently placed on machines, this crate finds
//! feasible reassignments that lower a weighted cost function, under four
//! constraint families:
//!
//! - **Capacity (incl. transient)**: machine resource capacities, with
//!   transient resources double-charged against the origin machine while a
//!   process migrates.
//! - **Conflict**: no two processes of one service on the same machine.
//! - **Spread**: a service's processes must span a minimum number of
//!   distinct locations.
//! - **Dependency**: a dependent service must be co-located (per
//!   neighborhood) with every service it depends on.
//!
//! # Key Components
//!
//! - [`model`]: the immutable problem instance ([`model::Context`]) built
//!   through a validating [`model::ContextBuilder`].
//! - [`checker`]: pure feasibility predicates and the five-term cost
//!   function over (context, assignment) pairs.
//! - [`space`]: the constrained decision space — one machine variable per
//!   process with native propagation, cloning, restriction operators, and
//!   budget-bounded branching (Monte-Carlo sampling and exhaustive
//!   enumeration).
//! - [`search`]: the local-search driver that sweeps bounded neighborhoods
//!   of an incumbent and greedily accepts strict improvements.
//! - [`rollout`]: per-rollout evaluation (`sample → refine → normalize`)
//!   for consumption by an external tree-search orchestrator.
//! - [`sink`]: the shared best-solution store with a strict-improvement
//!   write gate.
//!
//! # Architecture
//!
//! The crate is an embedded computational library: it contains no parser,
//! CLI, or persistence beyond the solution sink. An orchestrator builds a
//! [`model::Context`] once, shares it read-only across parallel rollouts,
//! and drives [`space::Space`] clones through sampling and local search.

pub mod checker;
pub mod model;
pub mod rollout;
pub mod search;
pub mod sink;
pub mod space;
