//! Model construction errors.

use thiserror::Error;

/// Validation failure raised by [`ContextBuilder::build`][super::ContextBuilder::build].
///
/// These indicate a malformed instance (shape mismatches, dangling ids),
/// not an infeasible one — infeasibility is a normal search outcome, never
/// an error.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A machine's capacity vector does not have one entry per resource.
    #[error("machine {machine}: expected {expected} capacity entries, found {found}")]
    CapacityShape {
        machine: usize,
        expected: usize,
        found: usize,
    },

    /// A machine's safety-capacity vector does not have one entry per resource.
    #[error("machine {machine}: expected {expected} safety-capacity entries, found {found}")]
    SafetyCapacityShape {
        machine: usize,
        expected: usize,
        found: usize,
    },

    /// A process's requirement vector does not have one entry per resource.
    #[error("process {process}: expected {expected} requirement entries, found {found}")]
    RequirementShape {
        process: usize,
        expected: usize,
        found: usize,
    },

    /// A process references a service id outside the service array.
    #[error("process {process} references unknown service {service}")]
    UnknownService { process: usize, service: usize },

    /// A process references an initial machine outside the machine array.
    #[error("process {process} references unknown initial machine {machine}")]
    UnknownMachine { process: usize, machine: usize },

    /// A service depends on a service id outside the service array.
    #[error("service {service} depends on unknown service {dependency}")]
    UnknownDependency { service: usize, dependency: usize },

    /// A balance-cost pair references a resource id outside the resource array.
    #[error("balance cost {index} references unknown resource {resource}")]
    UnknownResource { index: usize, resource: usize },

    /// The migration matrix is not machine_count × machine_count.
    #[error("migration matrix must be {expected}×{expected} for {expected} machines")]
    MatrixShape { expected: usize },
}
