//! Experiment description submitted to a backend.
//!
//! An [`Experiment`] is a flat list of [`Instruction`]s over a register of
//! `num_wires` wires. Wire `i < n` is the spin-up occupation of site `i`,
//! wire `i + n` the spin-down occupation of the same site.

use serde::{Deserialize, Serialize};

/// A single instruction: a gate or a directive (`load`, `measure`, `barrier`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Instruction name as listed in `supported_instructions`.
    pub name: String,
    /// Wires the instruction acts on.
    pub wires: Vec<u32>,
    /// Numeric parameters, in the order of the gate's parameter names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(name: impl Into<String>, wires: Vec<u32>, params: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            wires,
            params,
        }
    }

    /// Load one fermion onto `wire`.
    pub fn load(wire: u32) -> Self {
        Self::new("load", vec![wire], vec![])
    }

    /// Measure the given wires.
    pub fn measure(wires: Vec<u32>) -> Self {
        Self::new("measure", wires, vec![])
    }

    /// Barrier across the given wires.
    pub fn barrier(wires: Vec<u32>) -> Self {
        Self::new("barrier", wires, vec![])
    }
}

/// A named experiment over a fixed-size register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment name, echoed in results.
    pub name: String,
    /// Register size.
    pub num_wires: u32,
    /// Instructions, in program order.
    pub instructions: Vec<Instruction>,
}

impl Experiment {
    /// Create an empty experiment.
    pub fn new(name: impl Into<String>, num_wires: u32) -> Self {
        Self {
            name: name.into(),
            num_wires,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction, builder style.
    pub fn with(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if there are no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
