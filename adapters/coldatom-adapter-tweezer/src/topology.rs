//! Tweezer-chain topology.
//!
//! A 1-D chain of `n` optical tweezers, each holding one fermion of each
//! spin species. Wires `0..n` are the spin-up occupations, wires `n..2n` the
//! spin-down partners: wire `i` and wire `i + n` are the same tweezer.
//!
//! Three coupling-map families are derived from `n`:
//!
//! | Family | Entries | Gates |
//! |--------|---------|-------|
//! | neighbouring sites | `n(n-1)/2` contiguous sub-chains, length 2..=n | `hop` |
//! | global | one entry with all `2n` wires | `int` |
//! | single site | `n` entries `[i, i + n]` | `phase`, `fer_rx`, `fer_ry`, `fer_rz` |

use tracing::{debug, instrument};

use coldatom_hal::{
    BackendConfig, CouplingMap, GateSpec, HalError, HalResult, TopologyBuilder, site_count,
};

use crate::settings::TweezerSettings;

/// Name reported by the tweezer backend.
pub const BACKEND_NAME: &str = "fermionic_tweezer_simulator";

/// Version reported by the tweezer backend.
pub const BACKEND_VERSION: &str = "0.0.1";

/// Spin species per tweezer.
pub const NUM_SPECIES: u32 = 2;

const DESCRIPTION: &str = "simulator of a fermionic tweezer hardware. The first half of wires in a \
     circuit denote the occupations of the spin-up fermions and the last half of wires denote \
     the spin-down fermions";

const BASIS_GATES: [&str; 8] = [
    "hop", "int", "phase", "FH", "fer_rx", "fer_ry", "fer_rz", "load",
];

const SUPPORTED_INSTRUCTIONS: [&str; 10] = [
    "load", "measure", "barrier", "hop", "int", "phase", "FH", "fer_rx", "fer_ry", "fer_rz",
];

/// Contiguous sub-chains of every length from 2 to `n`.
///
/// Ordered by increasing length, then by increasing start offset. Each entry
/// lists the spin-up wires of the sub-chain followed by their spin-down
/// partners.
///
/// Fails with [`HalError::InvalidTopology`] if the entry list cannot be
/// allocated.
pub fn neighbouring_site_couplings(n: u32) -> HalResult<CouplingMap> {
    let too_large = || {
        HalError::InvalidTopology(format!(
            "cannot allocate neighbouring couplings for {n} tweezers"
        ))
    };
    let count = (n as usize)
        .checked_mul(n.saturating_sub(1) as usize)
        .map(|c| c / 2)
        .ok_or_else(too_large)?;

    let mut entries: Vec<Vec<u32>> = Vec::new();
    entries.try_reserve_exact(count).map_err(|_| too_large())?;
    for size in 2..=n {
        for i in 0..=(n - size) {
            entries.push((i..i + size).chain(i + n..i + size + n).collect());
        }
    }
    Ok(CouplingMap::new(entries))
}

/// A single entry holding every wire, ascending.
pub fn global_site_couplings(n: u32) -> CouplingMap {
    CouplingMap::new(vec![(0..2 * n).collect()])
}

/// One `[i, i + n]` pair per tweezer, ordered by site.
pub fn single_site_couplings(n: u32) -> CouplingMap {
    CouplingMap::new((0..n).map(|i| vec![i, i + n]).collect())
}

/// Topology builder for a linear chain of fermionic tweezers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweezerChain {
    max_shots: u32,
    max_experiments: u32,
}

impl TweezerChain {
    /// Site count used when none is configured.
    pub const DEFAULT_TWEEZERS: i64 = 4;

    /// Default shot limit.
    pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

    /// Default experiment limit.
    pub const DEFAULT_MAX_EXPERIMENTS: u32 = 10;

    /// Largest accepted site count.
    ///
    /// The neighbouring-site map holds `O(n^3)` wire indices in total; at
    /// this bound that is about 5.6 million.
    pub const MAX_TWEEZERS: u32 = 256;

    /// Create a builder with the default limits.
    pub fn new() -> Self {
        Self {
            max_shots: Self::DEFAULT_MAX_SHOTS,
            max_experiments: Self::DEFAULT_MAX_EXPERIMENTS,
        }
    }

    /// Create a builder with the limits from `settings`.
    pub fn from_settings(settings: &TweezerSettings) -> Self {
        Self {
            max_shots: settings.max_shots,
            max_experiments: settings.max_experiments,
        }
    }

    /// Override the shot limit.
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Override the experiment limit.
    pub fn with_max_experiments(mut self, max_experiments: u32) -> Self {
        self.max_experiments = max_experiments;
        self
    }
}

impl Default for TweezerChain {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyBuilder for TweezerChain {
    fn name(&self) -> &str {
        "tweezer_chain"
    }

    #[instrument(skip(self))]
    fn build(&self, n_sites: i64) -> HalResult<BackendConfig> {
        let n = site_count(n_sites, NUM_SPECIES)?;
        if n > Self::MAX_TWEEZERS {
            return Err(HalError::InvalidTopology(format!(
                "{n} tweezers requested, at most {} are supported",
                Self::MAX_TWEEZERS
            )));
        }

        let neighbouring = neighbouring_site_couplings(n)?;
        let global = global_site_couplings(n);
        let single = single_site_couplings(n);
        debug!(
            "Derived couplings for {} tweezers: {} neighbouring, {} single-site",
            n,
            neighbouring.len(),
            single.len()
        );

        let rotation = |name: &str, axis: char| {
            GateSpec::new(
                name,
                ["phi"],
                format!(
                    "{axis}-rotation between the spin-up and spin-down state at one tweezer site"
                ),
                single.clone(),
            )
        };

        BackendConfig::builder(BACKEND_NAME, BACKEND_VERSION, NUM_SPECIES * n)
            .with_cold_atom_type("fermion")
            .simulator(true)
            .local(true)
            .with_description(DESCRIPTION)
            .with_basis_gates(BASIS_GATES)
            .with_num_species(NUM_SPECIES)
            .with_memory(true)
            .with_conditional(false)
            .with_max_shots(self.max_shots)
            .with_max_experiments(self.max_experiments)
            .with_open_pulse(false)
            .with_gate(GateSpec::new(
                "hop",
                ["j_i"],
                "hopping of atoms to neighboring tweezers",
                neighbouring,
            ))
            .with_gate(GateSpec::new(
                "int",
                ["u"],
                "on-site interaction of atoms of opposite spin state",
                global,
            ))
            .with_gate(GateSpec::new(
                "phase",
                ["mu_i"],
                "Applying a local phase to tweezers through an external potential",
                single.clone(),
            ))
            .with_gate(rotation("fer_rx", 'x'))
            .with_gate(rotation("fer_ry", 'y'))
            .with_gate(rotation("fer_rz", 'z'))
            .with_supported_instructions(SUPPORTED_INSTRUCTIONS)
            .build()
    }
}

/// Build the tweezer-chain configuration for `n_tweezers` sites.
///
/// Fails with [`HalError::InvalidTopology`] unless
/// `1 <= n_tweezers <= TweezerChain::MAX_TWEEZERS`. A single tweezer is a
/// valid, if trivial, device: it has no hopping couplings.
pub fn build(n_tweezers: i64) -> HalResult<BackendConfig> {
    TweezerChain::default().build(n_tweezers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbouring_two_sites() {
        assert_eq!(
            neighbouring_site_couplings(2).unwrap().entries(),
            &[vec![0, 1, 2, 3]]
        );
    }

    #[test]
    fn test_neighbouring_single_site_is_empty() {
        assert!(neighbouring_site_couplings(1).unwrap().is_empty());
    }

    #[test]
    fn test_global_three_sites() {
        assert_eq!(global_site_couplings(3).entries(), &[vec![0, 1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_single_site_three_sites() {
        assert_eq!(
            single_site_couplings(3).entries(),
            &[vec![0, 3], vec![1, 4], vec![2, 5]]
        );
    }

    #[test]
    fn test_gate_order_and_parameters() {
        let config = build(3).unwrap();
        let names: Vec<&str> = config.gates().iter().map(|g| g.name()).collect();
        assert_eq!(names, ["hop", "int", "phase", "fer_rx", "fer_ry", "fer_rz"]);

        assert_eq!(config.gate("hop").unwrap().parameters(), &["j_i".to_string()]);
        assert_eq!(config.gate("int").unwrap().parameters(), &["u".to_string()]);
        assert_eq!(config.gate("phase").unwrap().parameters(), &["mu_i".to_string()]);
        assert_eq!(config.gate("fer_ry").unwrap().parameters(), &["phi".to_string()]);
    }

    #[test]
    fn test_identity_fields() {
        let config = build(4).unwrap();
        assert_eq!(config.name(), BACKEND_NAME);
        assert_eq!(config.version(), BACKEND_VERSION);
        assert_eq!(config.cold_atom_type(), Some("fermion"));
        assert!(config.is_simulator());
        assert!(config.is_local());
        assert!(config.coupling_map().is_none());
        assert_eq!(config.n_qubits(), 8);
        assert_eq!(config.num_sites(), 4);
        assert_eq!(config.max_shots(), 1_000_000);
        assert_eq!(config.max_experiments(), 10);
        assert!(config.supports("FH"));
        assert!(config.gate("FH").is_none());
        assert!(
            config
                .gate("fer_rx")
                .unwrap()
                .description()
                .starts_with("x-rotation")
        );
    }

    #[test]
    fn test_custom_limits() {
        let config = TweezerChain::new()
            .with_max_shots(500)
            .with_max_experiments(3)
            .build(2)
            .unwrap();
        assert_eq!(config.max_shots(), 500);
        assert_eq!(config.max_experiments(), 3);
    }

    #[test]
    fn test_site_count_upper_bound() {
        let max = i64::from(TweezerChain::MAX_TWEEZERS);
        assert!(build(max).is_ok());
        assert!(matches!(build(max + 1), Err(HalError::InvalidTopology(_))));
        assert!(matches!(
            build(i64::from(u32::MAX / 2)),
            Err(HalError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_neighbouring_unallocatable() {
        assert!(matches!(
            neighbouring_site_couplings(u32::MAX / 2),
            Err(HalError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = TweezerChain::new().with_max_shots(0).build(2);
        assert!(matches!(
            result,
            Err(HalError::Configuration(_))
        ));
    }
}
