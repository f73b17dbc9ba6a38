//! Entity types of the reassignment instance.
//!
//! All ids are dense, 0-based, and contiguous within their entity family.
//! Quantities (requirements, capacities) are `i64` so that spare-capacity
//! arithmetic can go negative on invalid assignments; costs and weights
//! are `u64`.

/// Index of a resource in [`super::Context::resources`][crate::model::Context].
pub type ResourceId = usize;
/// Index of a machine.
pub type MachineId = usize;
/// Index of a process.
pub type ProcessId = usize;
/// Index of a service.
pub type ServiceId = usize;
/// Opaque grouping id: machines in the same location count once for spread.
pub type LocationId = usize;
/// Opaque grouping id: dependency co-location is checked per neighborhood.
pub type NeighborhoodId = usize;

/// A consumable machine resource (CPU, RAM, disk, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    /// Whether usage is double-charged against the origin machine while a
    /// process migrates.
    pub transient: bool,
    /// Multiplier applied to this resource's load cost.
    pub load_cost_weight: u64,
}

impl Resource {
    /// Creates a resource.
    pub fn new(transient: bool, load_cost_weight: u64) -> Self {
        Self {
            transient,
            load_cost_weight,
        }
    }
}

/// A machine with per-resource capacities and grouping memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Machine {
    /// Location this machine belongs to.
    pub location: LocationId,
    /// Neighborhood this machine belongs to.
    pub neighborhood: NeighborhoodId,
    /// Hard capacity per resource (indexed by [`ResourceId`]).
    pub capacity: Vec<i64>,
    /// Soft threshold per resource; usage beyond it is penalized, not
    /// forbidden.
    pub safety_capacity: Vec<i64>,
}

impl Machine {
    /// Creates a machine.
    pub fn new(
        location: LocationId,
        neighborhood: NeighborhoodId,
        capacity: Vec<i64>,
        safety_capacity: Vec<i64>,
    ) -> Self {
        Self {
            location,
            neighborhood,
            capacity,
            safety_capacity,
        }
    }
}

/// A service: a group of processes with placement rules.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Service {
    /// Minimum number of distinct locations this service's processes must
    /// span.
    pub spread_min: usize,
    /// Services that must be present in every neighborhood this service
    /// uses.
    pub depends_on: Vec<ServiceId>,
}

impl Service {
    /// Creates a service.
    pub fn new(spread_min: usize, depends_on: Vec<ServiceId>) -> Self {
        Self {
            spread_min,
            depends_on,
        }
    }
}

/// A process: the unit of placement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Process {
    /// Owning service.
    pub service: ServiceId,
    /// Requirement per resource (indexed by [`ResourceId`]).
    pub requirement: Vec<i64>,
    /// Penalty charged when this process leaves its initial machine (PMC).
    pub move_cost: u64,
    /// Machine the process occupies in the initial placement.
    pub initial_machine: MachineId,
}

impl Process {
    /// Creates a process.
    pub fn new(
        service: ServiceId,
        requirement: Vec<i64>,
        move_cost: u64,
        initial_machine: MachineId,
    ) -> Self {
        Self {
            service,
            requirement,
            move_cost,
            initial_machine,
        }
    }
}

/// A balance-cost pair: penalizes machines whose spare capacities in two
/// resources deviate from a target ratio.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceCost {
    /// First resource of the pair.
    pub resource_a: ResourceId,
    /// Second resource of the pair.
    pub resource_b: ResourceId,
    /// Target ratio: the penalty is `weight · max(0, target·spare_a − spare_b)`.
    pub target: i64,
    /// Penalty multiplier.
    pub weight: u64,
}

impl BalanceCost {
    /// Creates a balance-cost pair.
    pub fn new(resource_a: ResourceId, resource_b: ResourceId, target: i64, weight: u64) -> Self {
        Self {
            resource_a,
            resource_b,
            target,
            weight,
        }
    }
}

/// Pairwise machine migration costs (MMC). Not necessarily symmetric;
/// the diagonal is conventionally zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationMatrix {
    cost: Vec<Vec<u64>>,
}

impl MigrationMatrix {
    /// Creates a matrix from rows; `rows[from][to]` is the cost of moving
    /// a process from machine `from` to machine `to`.
    pub fn new(rows: Vec<Vec<u64>>) -> Self {
        Self { cost: rows }
    }

    /// An all-zero matrix for `machine_count` machines.
    pub fn zero(machine_count: usize) -> Self {
        Self {
            cost: vec![vec![0; machine_count]; machine_count],
        }
    }

    /// Cost of moving from machine `from` to machine `to`.
    pub fn cost(&self, from: MachineId, to: MachineId) -> u64 {
        self.cost[from][to]
    }

    /// Number of machines the matrix covers.
    pub fn machine_count(&self) -> usize {
        self.cost.len()
    }

    pub(crate) fn is_square(&self) -> bool {
        let n = self.cost.len();
        self.cost.iter().all(|row| row.len() == n)
    }
}

/// Weights of the three migration-related cost terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostWeights {
    /// Weight of the per-process move penalty (PMC).
    pub process_move: u64,
    /// Weight of the maximum per-service churn (SMC).
    pub service_move: u64,
    /// Weight of the migration-matrix cost (MMC).
    pub machine_move: u64,
}

impl CostWeights {
    /// Creates the weight triple.
    pub fn new(process_move: u64, service_move: u64, machine_move: u64) -> Self {
        Self {
            process_move,
            service_move,
            machine_move,
        }
    }
}
