//! Problem instance model.
//!
//! The model is an arena: a [`Context`] owns flat, append-only arrays of
//! entities, and every cross-reference between entities is a dense 0-based
//! index into one of those arrays. After [`ContextBuilder::build`] the
//! context is read-only and can be shared across concurrent rollouts
//! without synchronization.
//!
//! # Key Components
//!
//! - **Entities**: [`Resource`], [`Machine`], [`Service`], [`Process`],
//!   [`BalanceCost`], [`MigrationMatrix`], [`CostWeights`]
//! - **Context**: [`Context`] — the immutable instance, plus the memoized
//!   initial assignment
//! - **Builder**: [`ContextBuilder`] — the construction interface an
//!   external instance parser feeds (`add_*` / `set_*`), validated on
//!   `build`

mod context;
mod entities;
mod error;

pub use context::{Context, ContextBuilder};
pub use entities::{
    BalanceCost, CostWeights, Machine, MigrationMatrix, Process, Resource, Service,
};
pub use entities::{LocationId, MachineId, NeighborhoodId, ProcessId, ResourceId, ServiceId};
pub use error::ModelError;
