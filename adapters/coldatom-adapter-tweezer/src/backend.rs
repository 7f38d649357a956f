//! Tweezer backend implementation.

use tracing::{debug, info, instrument};

use coldatom_hal::{
    Backend, BackendConfig, Counts, Experiment, ExperimentResult, HalError, HalResult, RunResult,
    TopologyBuilder,
};

use crate::settings::TweezerSettings;
use crate::topology::{NUM_SPECIES, TweezerChain};

/// Fermionic simulation engine.
///
/// The engine owns state representation, gate application and measurement
/// sampling. It receives experiments that have already passed validation
/// against `config`, and MUST return exactly `shots` observations.
pub trait FermionEngine: Send + Sync {
    /// Simulate one experiment and sample `shots` measurement outcomes.
    fn simulate(
        &self,
        config: &BackendConfig,
        experiment: &Experiment,
        shots: u32,
        seed: Option<u64>,
    ) -> HalResult<Counts>;
}

/// Simulator backend of a fermionic tweezer chain with two spin species.
///
/// The configuration is derived once at construction by a
/// [`TopologyBuilder`] and never changes; the engine only ever sees it by
/// reference.
pub struct FermionicTweezerBackend<E> {
    config: BackendConfig,
    engine: E,
}

impl<E: FermionEngine> FermionicTweezerBackend<E> {
    /// Create a backend for `n_tweezers` sites with the default limits.
    pub fn new(n_tweezers: i64, engine: E) -> HalResult<Self> {
        Self::with_topology(&TweezerChain::default(), n_tweezers, engine)
    }

    /// Create a backend from loaded settings.
    pub fn from_settings(settings: &TweezerSettings, engine: E) -> HalResult<Self> {
        settings.validate()?;
        Self::with_topology(
            &TweezerChain::from_settings(settings),
            settings.n_tweezers,
            engine,
        )
    }

    /// Create a backend whose configuration comes from `topology`.
    pub fn with_topology(
        topology: &dyn TopologyBuilder,
        n_sites: i64,
        engine: E,
    ) -> HalResult<Self> {
        let config = topology.build(n_sites)?;
        info!(
            "Created {} backend from '{}' topology: {} wires",
            config.name(),
            topology.name(),
            config.n_qubits()
        );
        Ok(Self { config, engine })
    }

    /// Number of tweezer sites.
    pub fn n_tweezers(&self) -> u32 {
        self.config.n_qubits() / NUM_SPECIES
    }

    /// The simulation engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: FermionEngine> Backend for FermionicTweezerBackend<E> {
    fn configuration(&self) -> &BackendConfig {
        &self.config
    }

    #[instrument(skip(self, experiments), fields(experiments = experiments.len()))]
    fn run(
        &self,
        experiments: &[Experiment],
        shots: u32,
        seed: Option<u64>,
    ) -> HalResult<RunResult> {
        self.validate(experiments, shots).into_result()?;

        let mut results = Vec::with_capacity(experiments.len());
        for (idx, experiment) in experiments.iter().enumerate() {
            // Distinct but reproducible stream per experiment.
            let exp_seed = seed.map(|s| s.wrapping_add(idx as u64));
            let counts = self
                .engine
                .simulate(&self.config, experiment, shots, exp_seed)?;

            if counts.total() != u64::from(shots) {
                return Err(HalError::Engine(format!(
                    "engine returned {} observations for experiment '{}', expected {}",
                    counts.total(),
                    experiment.name,
                    shots
                )));
            }

            debug!("Experiment '{}' finished", experiment.name);
            results.push(ExperimentResult {
                name: experiment.name.clone(),
                shots,
                counts,
            });
        }

        Ok(RunResult {
            backend_name: self.config.name().to_string(),
            backend_version: self.config.version().to_string(),
            results,
        })
    }
}
