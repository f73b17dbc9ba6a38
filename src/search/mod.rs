//! Local-search refinement of valid assignments.
//!
//! The driver sweeps the branching order backwards and, per window, clones
//! the root space, restricts it to the neighborhood of the current best
//! (one move at most, everything outside the window pinned), and
//! enumerates the neighborhood exhaustively. Strict improvements are
//! accepted greedily and offered to the solution sink as they appear.
//!
//! # Key Components
//!
//! - **Driver**: [`LocalSearch`] — fixed single-process windows (`run`)
//!   and budget-grown adaptive windows (`run_adaptive`)
//! - **Config**: [`LocalSearchConfig`]
//! - **Result**: [`LocalSearchResult`]

mod config;
mod driver;

pub use config::LocalSearchConfig;
pub use driver::{LocalSearch, LocalSearchResult};
