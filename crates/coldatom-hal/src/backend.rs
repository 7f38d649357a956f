//! Backend trait and experiment validation.
//!
//! ```text
//!   configuration() ──→ validate() ──→ run()
//!    (&ref, cached)      (pure)        (engine)
//! ```
//!
//! `configuration()` is infallible: a backend that cannot report its
//! configuration without work is not correctly initialized. `run()` MUST
//! validate before handing anything to the engine.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::capability::BackendConfig;
use crate::error::{HalError, HalResult};
use crate::experiment::{Experiment, Instruction};
use crate::result::RunResult;

/// Trait for cold-atom backends.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str {
        self.configuration().name()
    }

    /// Get the configuration of this backend.
    ///
    /// Implementations MUST build the configuration at construction time
    /// and return a reference.
    fn configuration(&self) -> &BackendConfig;

    /// Validate experiments against the configuration.
    fn validate(&self, experiments: &[Experiment], shots: u32) -> ValidationResult {
        validate_experiments(self.configuration(), experiments, shots)
    }

    /// Validate and execute experiments.
    ///
    /// `seed` makes sampling reproducible when the engine supports it.
    fn run(
        &self,
        experiments: &[Experiment],
        shots: u32,
        seed: Option<u64>,
    ) -> HalResult<RunResult>;
}

/// Result of validating experiments against a configuration.
#[derive(Debug)]
pub enum ValidationResult {
    /// Experiments can be executed as-is.
    Valid,
    /// Experiments cannot run on this backend.
    Invalid {
        /// Every violation found, in discovery order.
        errors: Vec<HalError>,
    },
}

impl ValidationResult {
    /// Check if the experiments are valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Violations as display strings.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid { errors } => {
                errors.iter().map(ToString::to_string).collect()
            }
        }
    }

    /// Convert into a `Result`, folding all violations into
    /// [`HalError::InvalidExperiment`].
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { errors } => Err(HalError::InvalidExperiment {
                reasons: errors.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}

/// Check a batch of experiments against `config`.
///
/// Batch limits (shots, experiment count) are checked first; then every
/// instruction of every experiment. All violations are collected.
pub fn validate_experiments(
    config: &BackendConfig,
    experiments: &[Experiment],
    shots: u32,
) -> ValidationResult {
    let mut errors = Vec::new();

    if shots == 0 || shots > config.max_shots() {
        errors.push(HalError::InvalidShots(format!(
            "{shots} shots requested, backend accepts 1..={}",
            config.max_shots()
        )));
    }

    if experiments.is_empty() || experiments.len() > config.max_experiments() as usize {
        errors.push(HalError::TooManyExperiments {
            count: experiments.len(),
            max: config.max_experiments(),
        });
    }

    for experiment in experiments {
        check_experiment(config, experiment, &mut errors);
    }

    debug!(
        "Validated {} experiment(s) at {} shots: {} violation(s)",
        experiments.len(),
        shots,
        errors.len()
    );

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid { errors }
    }
}

fn check_experiment(config: &BackendConfig, experiment: &Experiment, errors: &mut Vec<HalError>) {
    if experiment.num_wires > config.n_qubits() {
        errors.push(HalError::CircuitTooLarge(format!(
            "experiment '{}' has {} wires but backend '{}' only supports {}",
            experiment.name,
            experiment.num_wires,
            config.name(),
            config.n_qubits()
        )));
        return;
    }

    for instruction in &experiment.instructions {
        if let Err(e) = check_instruction(config, experiment.num_wires, instruction) {
            errors.push(e);
        }
    }
}

fn check_instruction(
    config: &BackendConfig,
    num_wires: u32,
    instruction: &Instruction,
) -> HalResult<()> {
    if !config.supports(&instruction.name) {
        return Err(HalError::UnsupportedInstruction(instruction.name.clone()));
    }

    let invalid_wires = || HalError::InvalidWires {
        instruction: instruction.name.clone(),
        wires: instruction.wires.clone(),
    };

    let mut seen = FxHashSet::default();
    if instruction
        .wires
        .iter()
        .any(|&w| w >= num_wires || !seen.insert(w))
    {
        return Err(invalid_wires());
    }

    if let Some(gate) = config.gate(&instruction.name) {
        if !gate.coupling_map().contains(&instruction.wires) {
            return Err(invalid_wires());
        }
        if instruction.params.len() != gate.parameters().len() {
            return Err(HalError::InvalidParameters {
                instruction: instruction.name.clone(),
                expected: gate.parameters().len(),
                got: instruction.params.len(),
            });
        }
    }

    Ok(())
}
