//! Backend capability records.
//!
//! This module defines the types that describe what a cold-atom backend can
//! do: how many wires it has, which gates it offers, and which wire groups
//! each gate may act on. Simulation engines consume these records by
//! reference; validators use them to reject experiments before execution.
//!
//! - [`CouplingMap`]: ordered list of wire groups a gate instance may act on
//! - [`GateSpec`]: one gate with its name, parameter names, description, coupling map
//! - [`BackendConfig`]: the immutable top-level record, built through
//!   [`BackendConfigBuilder`]
//!
//! All records serialize to the field names engines expect
//! (`backend_name`, `n_qubits`, `gates`, `supported_instructions`, ...).
//! Deserializing a [`BackendConfig`] runs the same validation as
//! [`BackendConfigBuilder::build`], so a malformed record is rejected at load
//! time rather than when the engine first touches it.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HalError, HalResult};

/// Ordered sequence of wire groups.
///
/// Each entry names the wires one gate instance acts on. Entry order is part
/// of the observable configuration: consumers may index into it positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouplingMap(Vec<Vec<u32>>);

impl CouplingMap {
    /// Create a coupling map from its entries, preserving order.
    pub fn new(entries: Vec<Vec<u32>>) -> Self {
        Self(entries)
    }

    /// All entries, in order.
    pub fn entries(&self) -> &[Vec<u32>] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<u32>> {
        self.0.iter()
    }

    /// Check whether some entry covers exactly `wires`, ignoring order.
    pub fn contains(&self, wires: &[u32]) -> bool {
        let mut wanted = wires.to_vec();
        wanted.sort_unstable();
        self.0.iter().any(|entry| {
            if entry.len() != wanted.len() {
                return false;
            }
            let mut sorted = entry.clone();
            sorted.sort_unstable();
            sorted == wanted
        })
    }

    /// Check every entry is non-empty, duplicate-free and inside `n_qubits`.
    fn check(&self, owner: &str, n_qubits: u32) -> HalResult<()> {
        for (idx, entry) in self.0.iter().enumerate() {
            if entry.is_empty() {
                return Err(HalError::InvalidGateSpec {
                    gate: owner.to_string(),
                    reason: format!("coupling map entry {idx} is empty"),
                });
            }
            let mut seen = FxHashSet::default();
            for &wire in entry {
                if wire >= n_qubits {
                    return Err(HalError::InvalidGateSpec {
                        gate: owner.to_string(),
                        reason: format!(
                            "coupling map entry {idx} references wire {wire} but the backend has {n_qubits} wires"
                        ),
                    });
                }
                if !seen.insert(wire) {
                    return Err(HalError::InvalidGateSpec {
                        gate: owner.to_string(),
                        reason: format!("coupling map entry {idx} repeats wire {wire}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<u32>>> for CouplingMap {
    fn from(entries: Vec<Vec<u32>>) -> Self {
        Self(entries)
    }
}

impl<'a> IntoIterator for &'a CouplingMap {
    type Item = &'a Vec<u32>;
    type IntoIter = std::slice::Iter<'a, Vec<u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn default_qasm_def() -> String {
    "{}".to_string()
}

/// A gate offered by a backend.
///
/// Immutable once constructed; a [`BackendConfig`] checks its coupling map
/// against the register size when the gate is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    name: String,
    parameters: Vec<String>,
    #[serde(default = "default_qasm_def")]
    qasm_def: String,
    description: String,
    coupling_map: CouplingMap,
}

impl GateSpec {
    /// Create a gate spec with an empty QASM definition (`"{}"`).
    pub fn new<P, S>(
        name: impl Into<String>,
        parameters: P,
        description: impl Into<String>,
        coupling_map: CouplingMap,
    ) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            qasm_def: default_qasm_def(),
            description: description.into(),
            coupling_map,
        }
    }

    /// Gate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names, in call order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// QASM definition string.
    pub fn qasm_def(&self) -> &str {
        &self.qasm_def
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Wire groups this gate may act on.
    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }
}

fn default_true() -> bool {
    true
}

fn default_num_species() -> u32 {
    1
}

fn default_max_shots() -> u32 {
    100_000
}

fn default_max_experiments() -> u32 {
    1
}

/// Configuration record of a backend.
///
/// Built once at backend construction and never mutated afterwards. It is
/// `Send + Sync` and can be shared read-only between any number of runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BackendConfigBuilder")]
pub struct BackendConfig {
    backend_name: String,
    backend_version: String,
    cold_atom_type: Option<String>,
    simulator: bool,
    local: bool,
    coupling_map: Option<CouplingMap>,
    description: String,
    basis_gates: Vec<String>,
    num_species: u32,
    memory: bool,
    n_qubits: u32,
    conditional: bool,
    max_shots: u32,
    max_experiments: u32,
    open_pulse: bool,
    gates: Vec<GateSpec>,
    supported_instructions: Vec<String>,
}

impl BackendConfig {
    /// Start building a configuration.
    pub fn builder(
        name: impl Into<String>,
        version: impl Into<String>,
        n_qubits: u32,
    ) -> BackendConfigBuilder {
        BackendConfigBuilder::new(name, version, n_qubits)
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> HalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON in the engine-facing field layout.
    pub fn to_json(&self) -> HalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Backend name.
    pub fn name(&self) -> &str {
        &self.backend_name
    }

    /// Backend version string.
    pub fn version(&self) -> &str {
        &self.backend_version
    }

    /// Atom statistics (`"fermion"`, `"boson"`), if declared.
    pub fn cold_atom_type(&self) -> Option<&str> {
        self.cold_atom_type.as_deref()
    }

    /// Whether this is a simulator (`true`) or real hardware.
    pub fn is_simulator(&self) -> bool {
        self.simulator
    }

    /// Whether the backend runs in-process.
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Device-wide coupling map, if any. Per-gate maps live on [`GateSpec`].
    pub fn coupling_map(&self) -> Option<&CouplingMap> {
        self.coupling_map.as_ref()
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Basis gate names.
    pub fn basis_gates(&self) -> &[String] {
        &self.basis_gates
    }

    /// Number of atomic species sharing the register.
    pub fn num_species(&self) -> u32 {
        self.num_species
    }

    /// Whether per-shot memory is returned.
    pub fn has_memory(&self) -> bool {
        self.memory
    }

    /// Number of wires in the register.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Number of physical sites (`n_qubits / num_species`).
    pub fn num_sites(&self) -> u32 {
        self.n_qubits / self.num_species
    }

    /// Whether classically conditioned operations are supported.
    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    /// Maximum shots per run.
    pub fn max_shots(&self) -> u32 {
        self.max_shots
    }

    /// Maximum experiments per run.
    pub fn max_experiments(&self) -> u32 {
        self.max_experiments
    }

    /// Whether pulse-level control is exposed.
    pub fn open_pulse(&self) -> bool {
        self.open_pulse
    }

    /// Gate specs, in declaration order.
    pub fn gates(&self) -> &[GateSpec] {
        &self.gates
    }

    /// Instruction names accepted in experiments.
    pub fn supported_instructions(&self) -> &[String] {
        &self.supported_instructions
    }

    /// Look up a gate spec by name.
    pub fn gate(&self, name: &str) -> Option<&GateSpec> {
        self.gates.iter().find(|g| g.name == name)
    }

    /// Check whether an instruction name is supported.
    pub fn supports(&self, instruction: &str) -> bool {
        self.supported_instructions.iter().any(|s| s == instruction)
    }
}

/// Builder for [`BackendConfig`].
///
/// Also the deserialization shape of a configuration record: optional fields
/// fall back to the same defaults as the chainable setters.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfigBuilder {
    backend_name: String,
    backend_version: String,
    #[serde(default)]
    cold_atom_type: Option<String>,
    #[serde(default = "default_true")]
    simulator: bool,
    #[serde(default = "default_true")]
    local: bool,
    #[serde(default)]
    coupling_map: Option<CouplingMap>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default = "default_num_species")]
    num_species: u32,
    #[serde(default = "default_true")]
    memory: bool,
    n_qubits: u32,
    #[serde(default)]
    conditional: bool,
    #[serde(default = "default_max_shots")]
    max_shots: u32,
    #[serde(default = "default_max_experiments")]
    max_experiments: u32,
    #[serde(default)]
    open_pulse: bool,
    #[serde(default)]
    gates: Vec<GateSpec>,
    #[serde(default)]
    supported_instructions: Vec<String>,
}

impl BackendConfigBuilder {
    /// Create a builder for a local simulator with no gates.
    pub fn new(name: impl Into<String>, version: impl Into<String>, n_qubits: u32) -> Self {
        Self {
            backend_name: name.into(),
            backend_version: version.into(),
            cold_atom_type: None,
            simulator: true,
            local: true,
            coupling_map: None,
            description: String::new(),
            basis_gates: Vec::new(),
            num_species: default_num_species(),
            memory: true,
            n_qubits,
            conditional: false,
            max_shots: default_max_shots(),
            max_experiments: default_max_experiments(),
            open_pulse: false,
            gates: Vec::new(),
            supported_instructions: Vec::new(),
        }
    }

    /// Set the atom statistics.
    pub fn with_cold_atom_type(mut self, kind: impl Into<String>) -> Self {
        self.cold_atom_type = Some(kind.into());
        self
    }

    /// Mark as simulator or hardware.
    pub fn simulator(mut self, simulator: bool) -> Self {
        self.simulator = simulator;
        self
    }

    /// Mark as local or remote.
    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Set a device-wide coupling map.
    pub fn with_coupling_map(mut self, coupling_map: CouplingMap) -> Self {
        self.coupling_map = Some(coupling_map);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the basis gate names.
    pub fn with_basis_gates<I, S>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.basis_gates = gates.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of species.
    pub fn with_num_species(mut self, num_species: u32) -> Self {
        self.num_species = num_species;
        self
    }

    /// Enable or disable per-shot memory.
    pub fn with_memory(mut self, memory: bool) -> Self {
        self.memory = memory;
        self
    }

    /// Enable or disable conditional operations.
    pub fn with_conditional(mut self, conditional: bool) -> Self {
        self.conditional = conditional;
        self
    }

    /// Set the shot limit.
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Set the experiment limit.
    pub fn with_max_experiments(mut self, max_experiments: u32) -> Self {
        self.max_experiments = max_experiments;
        self
    }

    /// Enable or disable pulse-level control.
    pub fn with_open_pulse(mut self, open_pulse: bool) -> Self {
        self.open_pulse = open_pulse;
        self
    }

    /// Append a gate spec.
    pub fn with_gate(mut self, gate: GateSpec) -> Self {
        self.gates.push(gate);
        self
    }

    /// Set the supported instruction names.
    pub fn with_supported_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> HalResult<BackendConfig> {
        if self.n_qubits == 0 {
            return Err(HalError::Configuration(
                "n_qubits must be greater than 0".to_string(),
            ));
        }
        if self.num_species == 0 || self.n_qubits % self.num_species != 0 {
            return Err(HalError::Configuration(format!(
                "{} wires cannot be split evenly across {} species",
                self.n_qubits, self.num_species
            )));
        }
        if self.max_shots == 0 {
            return Err(HalError::Configuration(
                "max_shots must be greater than 0".to_string(),
            ));
        }
        if self.max_experiments == 0 {
            return Err(HalError::Configuration(
                "max_experiments must be greater than 0".to_string(),
            ));
        }

        if let Some(map) = &self.coupling_map {
            map.check(&self.backend_name, self.n_qubits)?;
        }

        let supported: FxHashSet<&str> = self
            .supported_instructions
            .iter()
            .map(String::as_str)
            .collect();
        let mut names = FxHashSet::default();
        for gate in &self.gates {
            if gate.name.is_empty() {
                return Err(HalError::InvalidGateSpec {
                    gate: gate.name.clone(),
                    reason: "gate name is empty".to_string(),
                });
            }
            if !names.insert(gate.name.as_str()) {
                return Err(HalError::InvalidGateSpec {
                    gate: gate.name.clone(),
                    reason: "declared more than once".to_string(),
                });
            }
            if !supported.contains(gate.name.as_str()) {
                return Err(HalError::InvalidGateSpec {
                    gate: gate.name.clone(),
                    reason: "missing from supported_instructions".to_string(),
                });
            }
            gate.coupling_map.check(&gate.name, self.n_qubits)?;
        }

        debug!(
            "Built configuration '{}': {} wires, {} gates",
            self.backend_name,
            self.n_qubits,
            self.gates.len()
        );

        Ok(BackendConfig {
            backend_name: self.backend_name,
            backend_version: self.backend_version,
            cold_atom_type: self.cold_atom_type,
            simulator: self.simulator,
            local: self.local,
            coupling_map: self.coupling_map,
            description: self.description,
            basis_gates: self.basis_gates,
            num_species: self.num_species,
            memory: self.memory,
            n_qubits: self.n_qubits,
            conditional: self.conditional,
            max_shots: self.max_shots,
            max_experiments: self.max_experiments,
            open_pulse: self.open_pulse,
            gates: self.gates,
            supported_instructions: self.supported_instructions,
        })
    }
}

impl TryFrom<BackendConfigBuilder> for BackendConfig {
    type Error = HalError;

    fn try_from(builder: BackendConfigBuilder) -> HalResult<Self> {
        builder.build()
    }
}
