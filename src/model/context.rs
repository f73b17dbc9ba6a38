//! The immutable problem instance and its builder.

use super::entities::{
    BalanceCost, CostWeights, Machine, MachineId, MigrationMatrix, Process, Resource, Service,
};
use super::error::ModelError;

/// An immutable machine-reassignment instance.
///
/// Owns every entity (arena ownership: cross-references are indices, and
/// entities never outlive the context). Constructed once through
/// [`ContextBuilder`], then read-only — it can be shared across concurrent
/// rollouts without synchronization. Per-rollout mutable state lives in
/// [`Space`][crate::space::Space] clones, never here.
///
/// Equality is structural (value equality over all entity arrays in
/// declaration order) and intended for tests.
///
/// # Examples
///
/// ```
/// use reassign::model::{ContextBuilder, Resource, Machine, Service, Process};
///
/// let mut builder = ContextBuilder::new();
/// let cpu = builder.add_resource(Resource::new(false, 1));
/// let m0 = builder.add_machine(Machine::new(0, 0, vec![10], vec![8]));
/// let m1 = builder.add_machine(Machine::new(1, 0, vec![10], vec![8]));
/// let svc = builder.add_service(Service::new(1, vec![]));
/// builder.add_process(Process::new(svc, vec![4], 1, m0));
/// builder.add_process(Process::new(svc, vec![4], 1, m1));
/// let ctx = builder.build().unwrap();
/// assert_eq!(ctx.initial_solution(), &[m0, m1]);
/// assert_eq!(ctx.resources()[cpu].load_cost_weight, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    resources: Vec<Resource>,
    machines: Vec<Machine>,
    services: Vec<Service>,
    processes: Vec<Process>,
    balance_costs: Vec<BalanceCost>,
    migration: MigrationMatrix,
    weights: CostWeights,
    location_count: usize,
    neighborhood_count: usize,
    // Identity assignment to each process's initial machine, materialized
    // once at build time.
    initial: Vec<MachineId>,
}

impl Context {
    /// All resources, indexed by [`ResourceId`][super::ResourceId].
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// All machines, indexed by [`MachineId`].
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// All services, indexed by [`ServiceId`][super::ServiceId].
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// All processes, indexed by [`ProcessId`][super::ProcessId].
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// All balance-cost pairs.
    pub fn balance_costs(&self) -> &[BalanceCost] {
        &self.balance_costs
    }

    /// The machine-to-machine migration cost matrix.
    pub fn migration(&self) -> &MigrationMatrix {
        &self.migration
    }

    /// Weights of the PMC/SMC/MMC cost terms.
    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    /// Number of distinct locations referenced by machines.
    pub fn location_count(&self) -> usize {
        self.location_count
    }

    /// Number of distinct neighborhoods referenced by machines.
    pub fn neighborhood_count(&self) -> usize {
        self.neighborhood_count
    }

    /// The initial placement: each process on its initial machine.
    pub fn initial_solution(&self) -> &[MachineId] {
        &self.initial
    }
}

/// Append-only construction interface for [`Context`].
///
/// This is the minimum surface an external instance parser needs: `add_*`
/// for each entity section and `set_*` for the migration matrix and cost
/// weights. `build` validates shapes and cross-references.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    resources: Vec<Resource>,
    machines: Vec<Machine>,
    services: Vec<Service>,
    processes: Vec<Process>,
    balance_costs: Vec<BalanceCost>,
    migration: Option<MigrationMatrix>,
    weights: CostWeights,
}

impl ContextBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resource, returning its dense id.
    pub fn add_resource(&mut self, resource: Resource) -> usize {
        self.resources.push(resource);
        self.resources.len() - 1
    }

    /// Appends a machine, returning its dense id.
    pub fn add_machine(&mut self, machine: Machine) -> usize {
        self.machines.push(machine);
        self.machines.len() - 1
    }

    /// Appends a service, returning its dense id.
    pub fn add_service(&mut self, service: Service) -> usize {
        self.services.push(service);
        self.services.len() - 1
    }

    /// Appends a process, returning its dense id.
    pub fn add_process(&mut self, process: Process) -> usize {
        self.processes.push(process);
        self.processes.len() - 1
    }

    /// Appends a balance-cost pair, returning its dense id.
    pub fn add_balance_cost(&mut self, balance_cost: BalanceCost) -> usize {
        self.balance_costs.push(balance_cost);
        self.balance_costs.len() - 1
    }

    /// Sets the migration cost matrix. Unset defaults to all-zero.
    pub fn set_migration_matrix(&mut self, matrix: MigrationMatrix) {
        self.migration = Some(matrix);
    }

    /// Sets the PMC/SMC/MMC weights. Unset defaults to all-zero.
    pub fn set_weights(&mut self, weights: CostWeights) {
        self.weights = weights;
    }

    /// Validates the instance and freezes it into a [`Context`].
    pub fn build(self) -> Result<Context, ModelError> {
        let resource_count = self.resources.len();
        let machine_count = self.machines.len();
        let service_count = self.services.len();

        for (id, machine) in self.machines.iter().enumerate() {
            if machine.capacity.len() != resource_count {
                return Err(ModelError::CapacityShape {
                    machine: id,
                    expected: resource_count,
                    found: machine.capacity.len(),
                });
            }
            if machine.safety_capacity.len() != resource_count {
                return Err(ModelError::SafetyCapacityShape {
                    machine: id,
                    expected: resource_count,
                    found: machine.safety_capacity.len(),
                });
            }
        }

        for (id, service) in self.services.iter().enumerate() {
            for &dep in &service.depends_on {
                if dep >= service_count {
                    return Err(ModelError::UnknownDependency {
                        service: id,
                        dependency: dep,
                    });
                }
            }
        }

        for (id, process) in self.processes.iter().enumerate() {
            if process.requirement.len() != resource_count {
                return Err(ModelError::RequirementShape {
                    process: id,
                    expected: resource_count,
                    found: process.requirement.len(),
                });
            }
            if process.service >= service_count {
                return Err(ModelError::UnknownService {
                    process: id,
                    service: process.service,
                });
            }
            if process.initial_machine >= machine_count {
                return Err(ModelError::UnknownMachine {
                    process: id,
                    machine: process.initial_machine,
                });
            }
        }

        for (index, bc) in self.balance_costs.iter().enumerate() {
            for resource in [bc.resource_a, bc.resource_b] {
                if resource >= resource_count {
                    return Err(ModelError::UnknownResource { index, resource });
                }
            }
        }

        let migration = self
            .migration
            .unwrap_or_else(|| MigrationMatrix::zero(machine_count));
        if migration.machine_count() != machine_count || !migration.is_square() {
            return Err(ModelError::MatrixShape {
                expected: machine_count,
            });
        }

        let location_count = self
            .machines
            .iter()
            .map(|m| m.location + 1)
            .max()
            .unwrap_or(0);
        let neighborhood_count = self
            .machines
            .iter()
            .map(|m| m.neighborhood + 1)
            .max()
            .unwrap_or(0);

        let initial = self.processes.iter().map(|p| p.initial_machine).collect();

        Ok(Context {
            resources: self.resources,
            machines: self.machines,
            services: self.services,
            processes: self.processes,
            balance_costs: self.balance_costs,
            migration,
            weights: self.weights,
            location_count,
            neighborhood_count,
            initial,
        })
    }
}
