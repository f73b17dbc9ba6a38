//! The four hard-constraint predicates.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{Context, MachineId};

/// Checks all hard constraints, short-circuiting on the first violated
/// family.
///
/// Order matters only for diagnostics: capacity, then conflict, then
/// spread, then dependency.
pub fn is_valid(ctx: &Context, assignment: &[MachineId]) -> bool {
    check_capacity(ctx, assignment)
        && check_conflict(ctx, assignment)
        && check_spread(ctx, assignment)
        && check_dependency(ctx, assignment)
}

/// Per-machine usage of every resource, including the transient residue:
/// a moved process keeps charging transient resources against its initial
/// machine for the duration of the migration.
fn usage_with_transient(ctx: &Context, assignment: &[MachineId]) -> Vec<Vec<i64>> {
    let mut used = vec![vec![0i64; ctx.machines().len()]; ctx.resources().len()];
    for (p, process) in ctx.processes().iter().enumerate() {
        let current = assignment[p];
        for (r, resource) in ctx.resources().iter().enumerate() {
            used[r][current] += process.requirement[r];
            if resource.transient && current != process.initial_machine {
                used[r][process.initial_machine] += process.requirement[r];
            }
        }
    }
    used
}

/// Every machine's usage (transient residue included) fits its hard
/// capacity for every resource.
pub fn check_capacity(ctx: &Context, assignment: &[MachineId]) -> bool {
    debug_assert_eq!(assignment.len(), ctx.processes().len());
    let used = usage_with_transient(ctx, assignment);
    for (m, machine) in ctx.machines().iter().enumerate() {
        for r in 0..ctx.resources().len() {
            if used[r][m] > machine.capacity[r] {
                debug!(
                    machine = m,
                    resource = r,
                    used = used[r][m],
                    capacity = machine.capacity[r],
                    "capacity violated"
                );
                return false;
            }
        }
    }
    true
}

/// No two processes of the same service share a machine.
pub fn check_conflict(ctx: &Context, assignment: &[MachineId]) -> bool {
    debug_assert_eq!(assignment.len(), ctx.processes().len());
    let mut seen: HashSet<(MachineId, usize)> = HashSet::new();
    for (p, process) in ctx.processes().iter().enumerate() {
        if !seen.insert((assignment[p], process.service)) {
            debug!(
                process = p,
                machine = assignment[p],
                service = process.service,
                "conflict violated"
            );
            return false;
        }
    }
    true
}

/// Every service's processes span at least `spread_min` distinct locations.
pub fn check_spread(ctx: &Context, assignment: &[MachineId]) -> bool {
    debug_assert_eq!(assignment.len(), ctx.processes().len());
    let mut locations: Vec<HashSet<usize>> = vec![HashSet::new(); ctx.services().len()];
    for (p, process) in ctx.processes().iter().enumerate() {
        locations[process.service].insert(ctx.machines()[assignment[p]].location);
    }
    for (s, service) in ctx.services().iter().enumerate() {
        if locations[s].len() < service.spread_min {
            debug!(
                service = s,
                distinct = locations[s].len(),
                spread_min = service.spread_min,
                "spread violated"
            );
            return false;
        }
    }
    true
}

/// Every neighborhood a service occupies also hosts each of its
/// dependencies.
pub fn check_dependency(ctx: &Context, assignment: &[MachineId]) -> bool {
    debug_assert_eq!(assignment.len(), ctx.processes().len());
    let mut neighborhoods: HashMap<usize, HashSet<usize>> = HashMap::new();
    for (p, process) in ctx.processes().iter().enumerate() {
        neighborhoods
            .entry(process.service)
            .or_default()
            .insert(ctx.machines()[assignment[p]].neighborhood);
    }
    let empty = HashSet::new();
    for (s, service) in ctx.services().iter().enumerate() {
        let own = neighborhoods.get(&s).unwrap_or(&empty);
        for &dep in &service.depends_on {
            let theirs = neighborhoods.get(&dep).unwrap_or(&empty);
            if !own.is_subset(theirs) {
                debug!(service = s, dependency = dep, "dependency violated");
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextBuilder, Machine, Process, Resource, Service};

    /// One resource, two machines in separate locations/neighborhoods, two
    /// single-process services with room to move either process anywhere.
    fn two_machine_ctx(transient: bool) -> Context {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(transient, 1));
        b.add_machine(Machine::new(0, 0, vec![10], vec![8]));
        b.add_machine(Machine::new(1, 1, vec![10], vec![8]));
        b.add_service(Service::new(1, vec![]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![6], 1, 0));
        b.add_process(Process::new(1, vec![6], 1, 1));
        b.build().unwrap()
    }

    #[test]
    fn test_initial_assignment_valid() {
        let ctx = two_machine_ctx(false);
        assert!(is_valid(&ctx, ctx.initial_solution()));
    }

    #[test]
    fn test_capacity_overflow_detected() {
        let ctx = two_machine_ctx(false);
        // Both processes on machine 0: 12 > 10.
        assert!(!check_capacity(&ctx, &[0, 0]));
        assert!(check_capacity(&ctx, &[1, 0]));
    }

    #[test]
    fn test_transient_residue_charges_initial_machine() {
        let ctx = two_machine_ctx(true);
        // Swapping both processes is fine without transient accounting, but
        // with it each machine carries 6 (residue) + 6 (incoming) = 12 > 10.
        assert!(!check_capacity(&ctx, &[1, 0]));
        let ctx = two_machine_ctx(false);
        assert!(check_capacity(&ctx, &[1, 0]));
    }

    #[test]
    fn test_conflict_detected() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(0, vec![1], 0, 1));
        let ctx = b.build().unwrap();
        assert!(!check_conflict(&ctx, &[0, 0]));
        assert!(check_conflict(&ctx, &[0, 1]));
    }

    #[test]
    fn test_spread_counts_distinct_locations() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        // Machines 0 and 1 share a location; machine 2 is elsewhere.
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(1, 0, vec![100], vec![100]));
        b.add_service(Service::new(2, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(0, vec![1], 0, 2));
        let ctx = b.build().unwrap();
        // Two machines, one location: spread 1 < 2.
        assert!(!check_spread(&ctx, &[0, 1]));
        assert!(check_spread(&ctx, &[0, 2]));
        assert!(check_spread(&ctx, &[1, 2]));
    }

    #[test]
    fn test_dependency_requires_neighborhood_subset() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_machine(Machine::new(1, 1, vec![100], vec![100]));
        // Service 0 depends on service 1.
        b.add_service(Service::new(1, vec![1]));
        b.add_service(Service::new(1, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        b.add_process(Process::new(1, vec![1], 0, 0));
        let ctx = b.build().unwrap();
        // Dependent in neighborhood 0, dependency in neighborhood 1.
        assert!(!check_dependency(&ctx, &[0, 1]));
        assert!(check_dependency(&ctx, &[0, 0]));
        assert!(check_dependency(&ctx, &[1, 1]));
    }

    #[test]
    fn test_dependency_on_unplaced_service_with_no_processes() {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(false, 1));
        b.add_machine(Machine::new(0, 0, vec![100], vec![100]));
        b.add_service(Service::new(0, vec![1]));
        // Service 1 exists but has no processes: its neighborhood set is
        // empty, so service 0 may not occupy any neighborhood.
        b.add_service(Service::new(0, vec![]));
        b.add_process(Process::new(0, vec![1], 0, 0));
        let ctx = b.build().unwrap();
        assert!(!check_dependency(&ctx, &[0]));
    }

    #[test]
    fn test_is_valid_is_the_conjunction() {
        let ctx = two_machine_ctx(false);
        let good = [0, 1];
        let bad = [0, 0];
        assert!(is_valid(&ctx, &good));
        assert_eq!(
            is_valid(&ctx, &bad),
            check_capacity(&ctx, &bad)
                && check_conflict(&ctx, &bad)
                && check_spread(&ctx, &bad)
                && check_dependency(&ctx, &bad)
        );
    }
}
