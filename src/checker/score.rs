//! The five cost terms and the aggregate objective.

use crate::model::{Context, MachineId};

/// Per-machine usage of every resource, transient residue excluded. Costs
/// are charged on real usage only; the residue matters for feasibility, not
/// for the objective.
fn usage(ctx: &Context, assignment: &[MachineId]) -> Vec<Vec<i64>> {
    let mut used = vec![vec![0i64; ctx.machines().len()]; ctx.resources().len()];
    for (p, process) in ctx.processes().iter().enumerate() {
        for r in 0..ctx.resources().len() {
            used[r][assignment[p]] += process.requirement[r];
        }
    }
    used
}

/// Weighted overuse beyond safety capacity, summed over resources and
/// machines.
pub fn load_cost(ctx: &Context, assignment: &[MachineId]) -> u64 {
    let used = usage(ctx, assignment);
    let mut total = 0u64;
    for (r, resource) in ctx.resources().iter().enumerate() {
        let mut over = 0u64;
        for (m, machine) in ctx.machines().iter().enumerate() {
            over += (used[r][m] - machine.safety_capacity[r]).max(0) as u64;
        }
        total += resource.load_cost_weight * over;
    }
    total
}

/// Weighted spare-capacity imbalance, summed over balance pairs and
/// machines: `weight · max(0, target·spare_a − spare_b)` per machine.
pub fn balance_cost(ctx: &Context, assignment: &[MachineId]) -> u64 {
    let used = usage(ctx, assignment);
    let mut total = 0u64;
    for bc in ctx.balance_costs() {
        let mut imbalance = 0u64;
        for (m, machine) in ctx.machines().iter().enumerate() {
            let spare_a = machine.capacity[bc.resource_a] - used[bc.resource_a][m];
            let spare_b = machine.capacity[bc.resource_b] - used[bc.resource_b][m];
            imbalance += (bc.target * spare_a - spare_b).max(0) as u64;
        }
        total += bc.weight * imbalance;
    }
    total
}

/// Sum of `move_cost` over processes that left their initial machine
/// (unweighted PMC).
pub fn process_move_cost(ctx: &Context, assignment: &[MachineId]) -> u64 {
    ctx.processes()
        .iter()
        .enumerate()
        .filter(|(p, process)| assignment[*p] != process.initial_machine)
        .map(|(_, process)| process.move_cost)
        .sum()
}

/// Maximum number of moved processes over all services (unweighted SMC).
pub fn service_move_cost(ctx: &Context, assignment: &[MachineId]) -> u64 {
    let mut moved = vec![0u64; ctx.services().len()];
    for (p, process) in ctx.processes().iter().enumerate() {
        if assignment[p] != process.initial_machine {
            moved[process.service] += 1;
        }
    }
    moved.into_iter().max().unwrap_or(0)
}

/// Sum of migration-matrix entries from initial to current machine
/// (unweighted MMC).
pub fn machine_move_cost(ctx: &Context, assignment: &[MachineId]) -> u64 {
    ctx.processes()
        .iter()
        .enumerate()
        .map(|(p, process)| ctx.migration().cost(process.initial_machine, assignment[p]))
        .sum()
}

/// The aggregate objective:
///
/// ```text
/// load + balance + w_pmc·PMC + w_smc·SMC + w_mmc·MMC
/// ```
///
/// Lower is better. Defined for any complete assignment, valid or not.
pub fn compute_score(ctx: &Context, assignment: &[MachineId]) -> u64 {
    let w = ctx.weights();
    load_cost(ctx, assignment)
        + balance_cost(ctx, assignment)
        + w.process_move * process_move_cost(ctx, assignment)
        + w.service_move * service_move_cost(ctx, assignment)
        + w.machine_move * machine_move_cost(ctx, assignment)
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::checker::is_valid;
    use crate::model::{ContextBuilder, CostWeights, Machine, Process, Resource, Service};

    fn random_ctx() -> Context {
        let mut b = ContextBuilder::new();
        b.add_resource(Resource::new(true, 3));
        b.add_resource(Resource::new(false, 2));
        for m in 0..4 {
            b.add_machine(Machine::new(m % 2, m % 2, vec![30, 30], vec![15, 20]));
        }
        b.add_service(Service::new(2, vec![1]));
        b.add_service(Service::new(1, vec![]));
        for p in 0..5 {
            b.add_process(Process::new(p % 2, vec![7, 5], 2, p % 4));
        }
        b.set_weights(CostWeights::new(1, 10, 100));
        b.build().unwrap()
    }

    proptest! {
        #[test]
        fn prop_score_deterministic(assignment in prop::collection::vec(0usize..4, 5)) {
            let ctx = random_ctx();
            prop_assert_eq!(
                compute_score(&ctx, &assignment),
                compute_score(&ctx, &assignment)
            );
        }

        #[test]
        fn prop_validity_matches_conjunction(assignment in prop::collection::vec(0usize..4, 5)) {
            let ctx = random_ctx();
            let conjunction = crate::checker::check_capacity(&ctx, &assignment)
                && crate::checker::check_conflict(&ctx, &assignment)
                && crate::checker::check_spread(&ctx, &assignment)
                && crate::checker::check_dependency(&ctx, &assignment);
            prop_assert_eq!(is_valid(&ctx, &assignment), conjunction);
        }

        #[test]
        fn prop_identity_has_no_move_costs(_seed in 0u8..8) {
            let ctx = random_ctx();
            let initial = ctx.initial_solution().to_vec();
            prop_assert_eq!(process_move_cost(&ctx, &initial), 0);
            prop_assert_eq!(service_move_cost(&ctx, &initial), 0);
            prop_assert_eq!(machine_move_cost(&ctx, &initial), 0);
        }
    }
}
