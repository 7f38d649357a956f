//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Site count does not describe a valid device topology.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A gate specification is malformed.
    #[error("Invalid gate spec '{gate}': {reason}")]
    InvalidGateSpec {
        /// Name of the offending gate.
        gate: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Experiment count outside what the backend accepts in one run.
    #[error("Invalid experiment count: {count} submitted, backend accepts 1..={max}")]
    TooManyExperiments {
        /// Number of experiments submitted.
        count: usize,
        /// Backend limit.
        max: u32,
    },

    /// Experiment exceeds backend capabilities.
    #[error("Experiment exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Instruction is not in the backend's supported instruction list.
    #[error("Unsupported instruction: {0}")]
    UnsupportedInstruction(String),

    /// Instruction applied to wires outside its coupling map or register.
    #[error("Instruction '{instruction}' cannot act on wires {wires:?}")]
    InvalidWires {
        /// Instruction name.
        instruction: String,
        /// Wires the instruction was applied to.
        wires: Vec<u32>,
    },

    /// Wrong number of gate parameters.
    #[error("Instruction '{instruction}' takes {expected} parameter(s), got {got}")]
    InvalidParameters {
        /// Instruction name.
        instruction: String,
        /// Parameter count declared by the gate spec.
        expected: usize,
        /// Parameter count supplied.
        got: usize,
    },

    /// Experiments failed validation.
    #[error("Experiment rejected: {}", reasons.join("; "))]
    InvalidExperiment {
        /// Every validation failure, in discovery order.
        reasons: Vec<String>,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The simulation engine reported a failure.
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
