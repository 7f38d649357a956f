//! Coldatom Hardware Abstraction Layer
//!
//! This crate provides the typed records and traits shared by cold-atom
//! backends: what a device offers, how experiments are checked against it,
//! and the seam through which a topology is turned into a configuration.
//!
//! # Overview
//!
//! - [`BackendConfig`] describes a backend: register size, gate specs with
//!   per-gate [`CouplingMap`]s, supported instructions, shot/experiment limits
//! - [`TopologyBuilder`] derives a [`BackendConfig`] from a site count
//! - [`Backend`] is the common interface for validating and running
//!   [`Experiment`]s
//! - [`validate_experiments`] performs the checks every backend runs before
//!   touching its engine
//!
//! # Example: Describing a Backend
//!
//! ```rust
//! use coldatom_hal::{BackendConfig, CouplingMap, GateSpec};
//!
//! let config = BackendConfig::builder("two_site", "0.1.0", 4)
//!     .with_num_species(2)
//!     .with_gate(GateSpec::new(
//!         "hop",
//!         ["j_i"],
//!         "hopping between the two sites",
//!         CouplingMap::new(vec![vec![0, 1, 2, 3]]),
//!     ))
//!     .with_supported_instructions(["load", "measure", "hop"])
//!     .build()?;
//!
//! assert_eq!(config.num_sites(), 2);
//! assert!(config.supports("hop"));
//! # Ok::<(), coldatom_hal::HalError>(())
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod experiment;
pub mod result;
pub mod topology;

pub use backend::{Backend, ValidationResult, validate_experiments};
pub use capability::{BackendConfig, BackendConfigBuilder, CouplingMap, GateSpec};
pub use error::{HalError, HalResult};
pub use experiment::{Experiment, Instruction};
pub use result::{Counts, ExperimentResult, RunResult};
pub use topology::{TopologyBuilder, site_count};
