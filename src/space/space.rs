//! The constrained assignment space.

use std::collections::{HashMap, HashSet};

use crate::checker;
use crate::model::{Context, LocationId, MachineId, ProcessId, ServiceId};

/// Lifecycle of a [`Space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceStatus {
    /// Some processes are still unassigned; decisions may be added.
    Unbound,
    /// Every process is assigned and all hard constraints hold.
    Solved,
    /// A decision or restriction made the space infeasible. Terminal.
    Failed,
}

/// One candidate assignment: place `process` on `machine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub process: ProcessId,
    pub machine: MachineId,
}

/// A partial assignment of processes to machines with incremental
/// constraint bookkeeping.
///
/// The space admits decisions one at a time and rejects any that cannot be
/// part of a valid completion of the constraints it tracks eagerly
/// (capacity with transient residue, conflict, a spread lower bound, and
/// the move restrictions). Dependency is checked once, when the last
/// process is placed. Capacity and conflict therefore hold by construction
/// on every [`SpaceStatus::Solved`] space, and the completion check makes
/// spread and dependency exact, so every solved space passes
/// [`checker::is_valid`].
///
/// Branch exploration ([`sample`][Space::sample],
/// [`enumerate`][Space::enumerate]) backtracks in place; `Clone` exists for
/// the clone-then-restrict idiom of the local-search driver, which carves a
/// neighborhood out of a fresh copy per window.
///
/// # Examples
///
/// ```
/// use reassign::model::{ContextBuilder, Machine, Process, Resource, Service};
/// use reassign::space::{Space, SpaceStatus};
///
/// let mut b = ContextBuilder::new();
/// b.add_resource(Resource::new(false, 1));
/// b.add_machine(Machine::new(0, 0, vec![10], vec![10]));
/// b.add_machine(Machine::new(1, 1, vec![10], vec![10]));
/// b.add_service(Service::new(1, vec![]));
/// b.add_process(Process::new(0, vec![4], 1, 0));
/// let ctx = b.build().unwrap();
///
/// let mut space = Space::new(&ctx);
/// assert_eq!(space.add_decision(0, 1), SpaceStatus::Solved);
/// assert_eq!(space.solution(), Some(vec![1]));
/// ```
#[derive(Debug, Clone)]
pub struct Space<'a> {
    ctx: &'a Context,
    status: SpaceStatus,
    assignment: Vec<Option<MachineId>>,
    unassigned: usize,
    /// Committed usage per resource and machine. For transient resources
    /// this holds only the incoming extra (processes placed here whose
    /// initial machine is elsewhere); the residue side lives in
    /// `transient_base`.
    load: Vec<Vec<i64>>,
    /// For each transient resource, the total requirement of processes
    /// whose initial machine is this one. A process occupies its initial
    /// machine's transient capacity whether it stays or moves, so this
    /// baseline is fixed for the whole search.
    transient_base: Vec<Vec<i64>>,
    conflicts: HashSet<(MachineId, ServiceId)>,
    service_locations: Vec<HashMap<LocationId, usize>>,
    service_unassigned: Vec<usize>,
    /// Branching permutation: processes ascending by capacity-normalized
    /// footprint.
    pub(super) order: Vec<ProcessId>,
    incumbent: Option<Vec<MachineId>>,
    max_moves: Option<usize>,
    moved: usize,
}

impl<'a> Space<'a> {
    /// Creates the root space: nothing assigned, all restrictions off.
    ///
    /// Fails immediately when some machine's transient baseline already
    /// exceeds its capacity, since no assignment can relieve it.
    pub fn new(ctx: &'a Context) -> Self {
        let resource_count = ctx.resources().len();
        let machine_count = ctx.machines().len();

        let mut transient_base = vec![vec![0i64; machine_count]; resource_count];
        for process in ctx.processes() {
            for (r, resource) in ctx.resources().iter().enumerate() {
                if resource.transient {
                    transient_base[r][process.initial_machine] += process.requirement[r];
                }
            }
        }

        let mut status = SpaceStatus::Unbound;
        for (r, base) in transient_base.iter().enumerate() {
            for (m, machine) in ctx.machines().iter().enumerate() {
                if base[m] > machine.capacity[r] {
                    status = SpaceStatus::Failed;
                }
            }
        }
        if ctx.processes().is_empty() && status == SpaceStatus::Unbound {
            status = SpaceStatus::Solved;
        }

        let mut service_unassigned = vec![0usize; ctx.services().len()];
        for process in ctx.processes() {
            service_unassigned[process.service] += 1;
        }

        Self {
            ctx,
            status,
            assignment: vec![None; ctx.processes().len()],
            unassigned: ctx.processes().len(),
            load: vec![vec![0; machine_count]; resource_count],
            transient_base,
            conflicts: HashSet::new(),
            service_locations: vec![HashMap::new(); ctx.services().len()],
            service_unassigned,
            order: super::branching::footprint_order(ctx),
            incumbent: None,
            max_moves: None,
            moved: 0,
        }
    }

    /// The instance this space assigns.
    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SpaceStatus {
        self.status
    }

    /// Whether every process is assigned and the space is valid.
    pub fn is_solution(&self) -> bool {
        self.status == SpaceStatus::Solved
    }

    /// The complete assignment, when solved.
    pub fn solution(&self) -> Option<Vec<MachineId>> {
        if self.status == SpaceStatus::Solved {
            Some(self.assignment_unchecked())
        } else {
            None
        }
    }

    /// The machine assigned to `process`, if any.
    pub fn assigned(&self, process: ProcessId) -> Option<MachineId> {
        self.assignment[process]
    }

    fn assignment_unchecked(&self) -> Vec<MachineId> {
        self.assignment.iter().map(|a| a.unwrap_or(0)).collect()
    }

    /// Whether placing `process` on `machine` passes every eagerly tracked
    /// constraint. `process` must be unassigned and the space `Unbound`.
    pub fn feasible(&self, process: ProcessId, machine: MachineId) -> bool {
        debug_assert_eq!(self.status, SpaceStatus::Unbound);
        debug_assert!(self.assignment[process].is_none());

        let entity = &self.ctx.processes()[process];

        if let (Some(incumbent), Some(max_moves)) = (&self.incumbent, self.max_moves) {
            if machine != incumbent[process] && self.moved >= max_moves {
                return false;
            }
        }

        if self.conflicts.contains(&(machine, entity.service)) {
            return false;
        }

        for (r, resource) in self.ctx.resources().iter().enumerate() {
            // A process on its initial machine is already counted in the
            // transient baseline there.
            if resource.transient && machine == entity.initial_machine {
                continue;
            }
            let occupied = self.transient_base[r][machine] + self.load[r][machine];
            if occupied + entity.requirement[r] > self.ctx.machines()[machine].capacity[r] {
                return false;
            }
        }

        // Spread lower bound: the locations already used, plus this one if
        // new, plus one per remaining sibling must reach the minimum.
        let service = &self.ctx.services()[entity.service];
        let used = &self.service_locations[entity.service];
        let location = self.ctx.machines()[machine].location;
        let reachable = used.len()
            + usize::from(!used.contains_key(&location))
            + (self.service_unassigned[entity.service] - 1);
        if reachable < service.spread_min {
            return false;
        }

        true
    }

    /// Commits `process` to `machine`. No feasibility check, no status
    /// transition; exact inverse of [`retract`][Self::retract].
    pub(super) fn apply(&mut self, process: ProcessId, machine: MachineId) {
        let entity = &self.ctx.processes()[process];
        self.assignment[process] = Some(machine);
        self.unassigned -= 1;
        for (r, resource) in self.ctx.resources().iter().enumerate() {
            if resource.transient && machine == entity.initial_machine {
                continue;
            }
            self.load[r][machine] += entity.requirement[r];
        }
        self.conflicts.insert((machine, entity.service));
        *self.service_locations[entity.service]
            .entry(self.ctx.machines()[machine].location)
            .or_insert(0) += 1;
        self.service_unassigned[entity.service] -= 1;
        if let Some(incumbent) = &self.incumbent {
            if machine != incumbent[process] {
                self.moved += 1;
            }
        }
    }

    /// Reverts [`apply`][Self::apply] for `process`. Panics when the
    /// process is unassigned; the caller owns that invariant.
    pub(super) fn retract(&mut self, process: ProcessId) {
        let machine = self.assignment[process]
            .take()
            .expect("retract called on an unassigned process");
        let entity = &self.ctx.processes()[process];
        self.unassigned += 1;
        for (r, resource) in self.ctx.resources().iter().enumerate() {
            if resource.transient && machine == entity.initial_machine {
                continue;
            }
            self.load[r][machine] -= entity.requirement[r];
        }
        self.conflicts.remove(&(machine, entity.service));
        let location = self.ctx.machines()[machine].location;
        let counts = &mut self.service_locations[entity.service];
        if let Some(count) = counts.get_mut(&location) {
            *count -= 1;
            if *count == 0 {
                counts.remove(&location);
            }
        }
        self.service_unassigned[entity.service] += 1;
        if let Some(incumbent) = &self.incumbent {
            if machine != incumbent[process] {
                self.moved -= 1;
            }
        }
    }

    /// Dependency holds on the (complete) current assignment.
    pub(super) fn dependency_holds(&self) -> bool {
        debug_assert_eq!(self.unassigned, 0);
        checker::check_dependency(self.ctx, &self.assignment_unchecked())
    }

    /// Places `process` on `machine` and returns the resulting status.
    ///
    /// An infeasible decision fails the space permanently. Placing the last
    /// process triggers the completion check (dependency), after which the
    /// space is `Solved` or `Failed`.
    pub fn add_decision(&mut self, process: ProcessId, machine: MachineId) -> SpaceStatus {
        debug_assert_eq!(self.status, SpaceStatus::Unbound);
        if !self.feasible(process, machine) {
            self.status = SpaceStatus::Failed;
            return self.status;
        }
        self.apply(process, machine);
        if self.unassigned == 0 {
            self.status = if self.dependency_holds() {
                SpaceStatus::Solved
            } else {
                SpaceStatus::Failed
            };
        }
        self.status
    }

    /// Feasible decisions for the first undetermined process in branching
    /// order. Empty when the space is not `Unbound` (or nothing branches).
    pub fn generate_decisions(&self) -> Vec<Decision> {
        if self.status != SpaceStatus::Unbound {
            return Vec::new();
        }
        let Some(&process) = self
            .order
            .iter()
            .find(|&&p| self.assignment[p].is_none())
        else {
            return Vec::new();
        };
        (0..self.ctx.machines().len())
            .filter(|&machine| self.feasible(process, machine))
            .map(|machine| Decision { process, machine })
            .collect()
    }

    /// Number of machines `process` can still take: 1 when assigned,
    /// otherwise the count of feasible machines.
    pub fn nb_possibilities_for_proc(&self, process: ProcessId) -> usize {
        if self.assignment[process].is_some() || self.status != SpaceStatus::Unbound {
            return 1;
        }
        (0..self.ctx.machines().len())
            .filter(|&machine| self.feasible(process, machine))
            .count()
    }

    /// Restricts the space to assignments deviating from `incumbent` on at
    /// most `max_moves` processes. Replaces any previous move restriction;
    /// committed decisions stay and count against the new budget. Fails
    /// the space when they already deviate more than that.
    pub fn restrict_nb_move(&mut self, max_moves: usize, incumbent: &[MachineId]) {
        debug_assert_eq!(incumbent.len(), self.ctx.processes().len());
        self.moved = self
            .assignment
            .iter()
            .zip(incumbent)
            .filter(|(assigned, &reference)| {
                assigned.is_some() && **assigned != Some(reference)
            })
            .count();
        self.incumbent = Some(incumbent.to_vec());
        self.max_moves = Some(max_moves);
        if self.moved > max_moves && self.status == SpaceStatus::Unbound {
            self.status = SpaceStatus::Failed;
        }
    }

    /// Pins every process except `free` to its machine in `incumbent`.
    pub fn restrict_except_proc(&mut self, free: ProcessId, incumbent: &[MachineId]) {
        self.restrict_except_procs(&[free], incumbent);
    }

    /// Pins every process outside `free` to its machine in `incumbent`,
    /// leaving the window processes open. Independent of any move
    /// restriction; combine with
    /// [`restrict_nb_move`][Self::restrict_nb_move] to bound how far the
    /// window may stray.
    pub fn restrict_except_procs(&mut self, free: &[ProcessId], incumbent: &[MachineId]) {
        debug_assert_eq!(incumbent.len(), self.ctx.processes().len());
        for process in 0..self.ctx.processes().len() {
            if self.status != SpaceStatus::Unbound {
                return;
            }
            if free.contains(&process) || self.assignment[process].is_some() {
                continue;
            }
            self.add_decision(process, incumbent[process]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextBuilder, Machine, Process, Resource, Service};

    fn ctx_two_services() -> Context {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![10], vec![10]));
        b.add_machine(Machine::new(1, 1, vec![10], vec![10]));
        b.add_service(Service::new(1, vec![]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![4], 1, 0));
        b.add_process(Process::new(1, vec![4], 1, 1));
        b.build().unwrap()
    }

    #[test]
    fn test_solve_by_decisions() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        assert_eq!(space.status(), SpaceStatus::Unbound);
        assert_eq!(space.add_decision(0, 0), SpaceStatus::Unbound);
        assert_eq!(space.add_decision(1, 0), SpaceStatus::Solved);
        assert!(space.is_solution());
        assert_eq!(space.solution(), Some(vec![0, 0]));
    }

    #[test]
    fn test_conflict_rejected() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(0, vec![1], 0, 1));
        let ctx = b.build().unwrap();
        let mut space = Space::new(&ctx);
        space.add_decision(0, 0);
        assert!(!space.feasible(1, 0));
        assert!(space.feasible(1, 1));
        assert_eq!(space.add_decision(1, 0), SpaceStatus::Failed);
    }

    #[test]
    fn test_capacity_rejected() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![10], vec![10]));
        b.add_service(Service::new(1, vec![]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![6], 0, 0));
        b.add_process(Process::new(1, vec![6], 0, 0));
        let ctx = b.build().unwrap();
        let mut space = Space::new(&ctx);
        space.add_decision(0, 0);
        assert!(!space.feasible(1, 0));
    }

    #[test]
    fn test_transient_residue_blocks_swap() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(true, 1));
        b.add_machine(Machine::new(0, 0, vec![10], vec![10]));
        b.add_machine(Machine::new(1, 1, vec![10], vec![10]));
        b.add_service(Service::new(1, vec![]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![6], 0, 0));
        b.add_process(Process::new(1, vec![6], 0, 1));
        let ctx = b.build().unwrap();
        let mut space = Space::new(&ctx);
        // Moving process 0 onto machine 1 needs 6 incoming on top of the
        // 6-unit residue baseline of process 1.
        assert!(!space.feasible(0, 1));
        assert!(space.feasible(0, 0));
        space.add_decision(0, 0);
        assert!(space.feasible(1, 1));
    }

    #[test]
    fn test_spread_bound_prunes_early() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        // Two machines in location 0, one in location 1.
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(1, 0, vec![100], vec![100]));
        b.add_service(Service::new(2, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(0, vec![1], 0, 2));
        let ctx = b.build().unwrap();
        let mut space = Space::new(&ctx);
        space.add_decision(0, 0);
        // The last sibling must open a second location now.
        assert!(!space.feasible(1, 1));
        assert!(space.feasible(1, 2));
    }

    #[test]
    fn test_dependency_checked_at_completion() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(1, 1, vec![100], vec![100]));
        b.add_service(Service::new(1, vec![1]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(1, vec![1], 0, 0));
        let ctx = b.build().unwrap();

        let mut space = Space::new(&ctx);
        space.add_decision(0, 0);
        // Dependency is not pruned eagerly; the completion check fails it.
        assert!(space.feasible(1, 1));
        assert_eq!(space.add_decision(1, 1), SpaceStatus::Failed);

        let mut space = Space::new(&ctx);
        space.add_decision(0, 0);
        assert_eq!(space.add_decision(1, 0), SpaceStatus::Solved);
    }

    #[test]
    fn test_restrict_nb_move_caps_deviations() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        space.restrict_nb_move(1, ctx.initial_solution());
        // First deviation allowed.
        assert!(space.feasible(0, 1));
        space.add_decision(0, 1);
        // Second deviation blocked, incumbent value still open.
        assert!(!space.feasible(1, 0));
        assert!(space.feasible(1, 1));
        assert_eq!(space.add_decision(1, 1), SpaceStatus::Solved);
    }

    #[test]
    fn test_restrict_except_procs_pins_rest() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        space.restrict_nb_move(1, ctx.initial_solution());
        space.restrict_except_proc(0, ctx.initial_solution());
        assert_eq!(space.assigned(1), Some(1));
        assert_eq!(space.assigned(0), None);
        assert_eq!(space.add_decision(0, 1), SpaceStatus::Solved);
    }

    #[test]
    fn test_generate_decisions_first_undetermined() {
        let ctx = ctx_two_services();
        let space = Space::new(&ctx);
        let decisions = space.generate_decisions();
        assert!(!decisions.is_empty());
        let process = decisions[0].process;
        assert!(decisions.iter().all(|d| d.process == process));
        // Both machines fit either process at the root.
        assert_eq!(decisions.len(), 2);
    }

    #[test]
    fn test_nb_possibilities() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        assert_eq!(space.nb_possibilities_for_proc(0), 2);
        space.add_decision(0, 0);
        assert_eq!(space.nb_possibilities_for_proc(0), 1);
    }

    #[test]
    fn test_restrict_except_procs_without_move_restriction() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        // No move restriction: the free process may roam while the rest is
        // pinned to the reference.
        space.restrict_except_proc(0, ctx.initial_solution());
        assert_eq!(space.assigned(1), Some(1));
        assert!(space.feasible(0, 0));
        assert!(space.feasible(0, 1));
    }

    #[test]
    #[should_panic(expected = "unassigned process")]
    fn test_retract_unassigned_panics() {
        let ctx = ctx_two_services();
        let mut space = Space::new(&ctx);
        space.retract(0);
    }

    #[test]
    fn test_empty_instance_is_solved() {
        let ctx = ContextBuilder::new().build().unwrap();
        let space = Space::new(&ctx);
        assert_eq!(space.status(), SpaceStatus::Solved);
        assert_eq!(space.solution(), Some(vec![]));
    }

    #[test]
    fn test_overcommitted_transient_baseline_fails_root() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(true, 1));
        b.add_machine(Machine::new(0, 0, vec![5], vec![5]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![9], 0, 0));
        let ctx = b.build().unwrap();
        let space = Space::new(&ctx);
        assert_eq!(space.status(), SpaceStatus::Failed);
    }
}
