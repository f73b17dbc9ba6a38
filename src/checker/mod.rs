//! Stateless feasibility and scoring over complete assignments.
//!
//! Every function here takes `(&Context, &[MachineId])` where the slice maps
//! each process to its current machine, and inspects nothing else. The
//! checker is the ground truth the search layers are validated against:
//! [`Space`][crate::space::Space] maintains the same constraints
//! incrementally, and its completions must satisfy [`is_valid`] exactly.
//!
//! # Key Components
//!
//! - **Feasibility**: [`is_valid`] and the four individual predicates
//!   ([`check_capacity`], [`check_conflict`], [`check_spread`],
//!   [`check_dependency`])
//! - **Scoring**: [`compute_score`] and the per-term accessors
//!   ([`load_cost`], [`balance_cost`], [`process_move_cost`],
//!   [`service_move_cost`], [`machine_move_cost`])
//!
//! Feasibility and score are deliberately independent: an assignment can be
//! scored whether or not it is valid, and validity never consults costs.

mod feasibility;
mod score;

pub use feasibility::{check_capacity, check_conflict, check_dependency, check_spread, is_valid};
pub use score::{
    balance_cost, compute_score, load_cost, machine_move_cost, process_move_cost,
    service_move_cost,
};
