//! Coldatom Fermionic Tweezer Backend
//!
//! This crate describes a simulated fermionic tweezer device: a 1-D chain of
//! optical tweezers, each holding one spin-up and one spin-down fermion. It
//! derives the device's coupling maps from the number of tweezers and
//! assembles them into an immutable [`BackendConfig`] that an external
//! fermionic simulation engine consumes.
//!
//! # Register Layout
//!
//! For `n` tweezers the register has `2n` wires. Wires `0..n` hold the
//! spin-up occupations, wires `n..2n` the spin-down occupations of the same
//! tweezers.
//!
//! # Gates
//!
//! | Gate | Parameters | Coupling map |
//! |------|------------|--------------|
//! | `hop` | `j_i` | contiguous sub-chains of length 2..=n |
//! | `int` | `u` | the whole register |
//! | `phase` | `mu_i` | `[i, i + n]` per tweezer |
//! | `fer_rx`, `fer_ry`, `fer_rz` | `phi` | `[i, i + n]` per tweezer |
//!
//! # Example
//!
//! ```rust
//! use coldatom_adapter_tweezer::build;
//!
//! let config = build(4)?;
//! assert_eq!(config.n_qubits(), 8);
//!
//! let hop = config.gate("hop").unwrap();
//! assert_eq!(hop.coupling_map().entries()[0], vec![0, 1, 4, 5]);
//! # Ok::<(), coldatom_hal::HalError>(())
//! ```

mod backend;
mod settings;
mod topology;

pub use backend::{FermionEngine, FermionicTweezerBackend};
pub use settings::{SettingsError, TweezerSettings};
pub use topology::{
    BACKEND_NAME, BACKEND_VERSION, NUM_SPECIES, TweezerChain, build, global_site_couplings,
    neighbouring_site_couplings, single_site_couplings,
};

// Re-export common HAL types for convenience.
pub use coldatom_hal::{Backend, BackendConfig, HalError, HalResult, TopologyBuilder};
