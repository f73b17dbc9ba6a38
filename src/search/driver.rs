//! Backward-sweep local-search driver.

use tracing::{info, warn};

use crate::checker;
use crate::model::{MachineId, ProcessId};
use crate::sink::SolutionSink;
use crate::space::{footprint_order, SearchLimits, Space};

use super::config::LocalSearchConfig;

/// Outcome of a local-search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchResult {
    /// Best assignment found (the incumbent when nothing improved).
    pub best: Vec<MachineId>,
    /// Score of `best`.
    pub best_score: u64,
    /// Number of strict improvements accepted.
    pub improvements: usize,
    /// Number of full passes over the branching order.
    pub sweeps: usize,
}

/// Window-based local search around a valid incumbent.
///
/// Both variants sweep the branching order backwards, carve a neighborhood
/// out of a fresh clone of the root space per window (everything outside
/// the window pinned to the current best), enumerate it exhaustively
/// within the node budget, and accept strict improvements as they are
/// encountered. The sweep index wraps past the start of the order and the
/// search stops once a full cycle completes without any improvement.
///
/// `run` frees a single process per window and additionally restricts the
/// neighborhood to one move from the current best. `run_adaptive` grows
/// each window backwards, admitting further processes while the product
/// of their branching possibilities stays within
/// [`window_budget`][LocalSearchConfig::window_budget] — and posts no
/// move restriction, so the grown window may move together; that is what
/// makes combined moves such as swaps reachable.
pub struct LocalSearch;

impl LocalSearch {
    /// Refines `incumbent` with single-process windows.
    ///
    /// `incumbent` must be a valid assignment of `space.context()`.
    pub fn run<S>(
        space: &Space<'_>,
        incumbent: &[MachineId],
        config: &LocalSearchConfig,
        sink: &S,
    ) -> LocalSearchResult
    where
        S: SolutionSink + ?Sized,
    {
        Self::sweep(space, incumbent, config, sink, false)
    }

    /// Refines `incumbent` with adaptive multi-process windows.
    pub fn run_adaptive<S>(
        space: &Space<'_>,
        incumbent: &[MachineId],
        config: &LocalSearchConfig,
        sink: &S,
    ) -> LocalSearchResult
    where
        S: SolutionSink + ?Sized,
    {
        Self::sweep(space, incumbent, config, sink, true)
    }

    fn sweep<S>(
        space: &Space<'_>,
        incumbent: &[MachineId],
        config: &LocalSearchConfig,
        sink: &S,
        adaptive: bool,
    ) -> LocalSearchResult
    where
        S: SolutionSink + ?Sized,
    {
        let ctx = space.context();
        assert!(
            checker::is_valid(ctx, incumbent),
            "local search requires a valid incumbent"
        );

        let order = footprint_order(ctx);
        let count = order.len();
        let mut best = incumbent.to_vec();
        let mut best_score = checker::compute_score(ctx, &best);
        let mut improvements = 0usize;
        let mut sweeps = 0usize;

        if count == 0 {
            return LocalSearchResult {
                best,
                best_score,
                improvements,
                sweeps,
            };
        }

        let limits = SearchLimits::default().with_node_limit(config.node_limit);
        let mut position = count - 1;
        // Processes visited since the last accepted improvement; a full
        // cycle without one terminates the sweep.
        let mut stale = 0usize;

        loop {
            let reference = best.clone();
            // The single-process sweep bounds the neighborhood with a move
            // restriction; the adaptive sweep must not, since its whole
            // point is letting the grown window move together.
            let (window, neighborhood) = if adaptive {
                Self::grow_window(space, &order, position, config.window_budget, &reference)
            } else {
                let mut neighborhood = space.clone();
                neighborhood.restrict_nb_move(1, &reference);
                neighborhood.restrict_except_proc(order[position], &reference);
                (vec![order[position]], neighborhood)
            };

            let mut improved = false;
            neighborhood.enumerate(&limits, |candidate| {
                // Without a move restriction the reference reappears as a
                // completion of the window; drop it.
                if adaptive && candidate == reference.as_slice() {
                    return;
                }
                debug_assert!(checker::is_valid(ctx, candidate));
                let score = checker::compute_score(ctx, candidate);
                if score < best_score {
                    best_score = score;
                    best = candidate.to_vec();
                    improvements += 1;
                    improved = true;
                    match sink.write_solution(candidate, score) {
                        Ok(true) => info!(score, "improved solution"),
                        Ok(false) => {}
                        Err(error) => warn!(%error, "failed to persist solution"),
                    }
                }
            });

            if improved {
                stale = 0;
            } else {
                stale += window.len();
                if stale >= count {
                    break;
                }
            }

            // Step backward past the window, wrapping at the start.
            for _ in 0..window.len() {
                if position == 0 {
                    position = count - 1;
                    sweeps += 1;
                } else {
                    position -= 1;
                }
            }
        }

        LocalSearchResult {
            best,
            best_score,
            improvements,
            sweeps,
        }
    }

    /// Grows a window backwards from `position` while the product of
    /// per-process branching possibilities stays within `budget`, then
    /// returns the window together with the clone to enumerate: everything
    /// outside the window pinned to `incumbent`, no move restriction.
    ///
    /// Possibilities are recomputed on the pinned clone after every growth
    /// step, so pinning tightens the estimate; counts of at most 1 never
    /// consume budget. The seed process is always included and growth
    /// stops at the front of the order.
    fn grow_window<'a>(
        space: &Space<'a>,
        order: &[ProcessId],
        position: usize,
        budget: u64,
        incumbent: &[MachineId],
    ) -> (Vec<ProcessId>, Space<'a>) {
        fn product(pinned: &Space<'_>, window: &[ProcessId]) -> u64 {
            window
                .iter()
                .map(|&p| pinned.nb_possibilities_for_proc(p) as u64)
                .filter(|&possibilities| possibilities > 1)
                .product()
        }

        let mut window = vec![order[position]];
        let mut pinned = space.clone();
        pinned.restrict_except_procs(&window, incumbent);

        if product(&pinned, &window) <= budget {
            let mut index = position;
            while index > 0 {
                let mut grown = window.clone();
                grown.push(order[index - 1]);
                let mut candidate = space.clone();
                candidate.restrict_except_procs(&grown, incumbent);
                if product(&candidate, &grown) > budget {
                    break;
                }
                window = grown;
                pinned = candidate;
                index -= 1;
            }
        }
        (window, pinned)
    }
}
