//! Branching order and tree exploration.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Context, MachineId, ProcessId};

use super::config::{Enumeration, SearchLimits};
use super::space::{Space, SpaceStatus};

/// Processes ascending by capacity-normalized footprint: the sum over
/// resources of `requirement / total capacity`. Small processes branch
/// first, so the cheap, flexible decisions sit at the top of the tree.
/// Resources with zero total capacity are skipped. Ties keep id order.
pub fn footprint_order(ctx: &Context) -> Vec<ProcessId> {
    let totals: Vec<i64> = (0..ctx.resources().len())
        .map(|r| ctx.machines().iter().map(|m| m.capacity[r]).sum())
        .collect();
    let footprint = |p: ProcessId| -> f64 {
        ctx.processes()[p]
            .requirement
            .iter()
            .zip(&totals)
            .filter(|(_, &total)| total > 0)
            .map(|(&req, &total)| req as f64 / total as f64)
            .sum()
    };
    let mut order: Vec<ProcessId> = (0..ctx.processes().len()).collect();
    order.sort_by(|&a, &b| footprint(a).total_cmp(&footprint(b)));
    order
}

impl<'a> Space<'a> {
    /// Draws one random completion of the current partial assignment.
    ///
    /// Depth-first search in branching order with the machine order
    /// shuffled at every node; backtracking counts dead ends against the
    /// cumulative `fail_limit`. Returns `None` when the space is failed,
    /// or when the budget runs out before a completion is found. The
    /// receiver is untouched; exploration runs on an internal copy.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        limits: &SearchLimits,
        rng: &mut R,
    ) -> Option<Vec<MachineId>> {
        match self.status() {
            SpaceStatus::Failed => return None,
            SpaceStatus::Solved => return self.solution(),
            SpaceStatus::Unbound => {}
        }
        let mut work = self.clone();
        let mut fails = 0u64;
        if sample_rec(&mut work, 0, limits.fail_limit, &mut fails, rng) {
            let solution: Option<Vec<MachineId>> =
                (0..work.context().processes().len()).map(|p| work.assigned(p)).collect();
            solution
        } else {
            None
        }
    }

    /// Visits every completion of the current partial assignment in
    /// deterministic order, invoking `visit` on each.
    ///
    /// Each committed placement costs one node against `node_limit`;
    /// exhausting the budget stops the walk and reports
    /// [`Enumeration::Truncated`]. The receiver is untouched.
    pub fn enumerate<F>(&self, limits: &SearchLimits, mut visit: F) -> Enumeration
    where
        F: FnMut(&[MachineId]),
    {
        match self.status() {
            SpaceStatus::Failed => return Enumeration::Complete,
            SpaceStatus::Solved => {
                if let Some(solution) = self.solution() {
                    visit(&solution);
                }
                return Enumeration::Complete;
            }
            SpaceStatus::Unbound => {}
        }
        let mut work = self.clone();
        let mut nodes = 0u64;
        if enumerate_rec(&mut work, 0, limits.node_limit, &mut nodes, &mut visit) {
            Enumeration::Complete
        } else {
            Enumeration::Truncated
        }
    }
}

/// Returns true when a completion was found; `fails` accumulates dead ends.
fn sample_rec<R: Rng + ?Sized>(
    space: &mut Space<'_>,
    position: usize,
    fail_limit: u64,
    fails: &mut u64,
    rng: &mut R,
) -> bool {
    let mut position = position;
    while position < space.order.len() && space.assigned(space.order[position]).is_some() {
        position += 1;
    }
    if position == space.order.len() {
        if space.dependency_holds() {
            return true;
        }
        *fails += 1;
        return false;
    }
    let process = space.order[position];
    let mut machines: Vec<MachineId> = (0..space.context().machines().len()).collect();
    machines.shuffle(rng);
    for machine in machines {
        if *fails >= fail_limit {
            return false;
        }
        if !space.feasible(process, machine) {
            continue;
        }
        space.apply(process, machine);
        if sample_rec(space, position + 1, fail_limit, fails, rng) {
            return true;
        }
        space.retract(process);
    }
    *fails += 1;
    false
}

/// Returns true when the subtree was fully explored within the budget.
fn enumerate_rec<F>(
    space: &mut Space<'_>,
    position: usize,
    node_limit: u64,
    nodes: &mut u64,
    visit: &mut F,
) -> bool
where
    F: FnMut(&[MachineId]),
{
    let mut position = position;
    while position < space.order.len() && space.assigned(space.order[position]).is_some() {
        position += 1;
    }
    if position == space.order.len() {
        if space.dependency_holds() {
            let solution: Vec<MachineId> = (0..space.context().processes().len())
                .map(|p| space.assigned(p).unwrap_or(0))
                .collect();
            visit(&solution);
        }
        return true;
    }
    let process = space.order[position];
    for machine in 0..space.context().machines().len() {
        if *nodes >= node_limit {
            return false;
        }
        if !space.feasible(process, machine) {
            continue;
        }
        *nodes += 1;
        space.apply(process, machine);
        let complete = enumerate_rec(space, position + 1, node_limit, nodes, visit);
        space.retract(process);
        if !complete {
            return false;
        }
    }
    true
}
