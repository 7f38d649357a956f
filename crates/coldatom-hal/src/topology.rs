//! Topology strategies.
//!
//! A [`TopologyBuilder`] turns a site count into a complete
//! [`BackendConfig`]. Backends hold the resulting record and never see the
//! builder again, so topology logic can be swapped without touching the
//! simulation engine.

use crate::capability::BackendConfig;
use crate::error::{HalError, HalResult};

/// Derives a backend configuration from a site count.
///
/// Implementations must be pure: the same `n_sites` always yields an equal
/// configuration, and nothing is observed or mutated along the way.
pub trait TopologyBuilder: Send + Sync {
    /// Short name of the topology (e.g. `"tweezer_chain"`).
    fn name(&self) -> &str;

    /// Build the configuration for `n_sites` sites.
    ///
    /// Returns [`HalError::InvalidTopology`] if `n_sites` is not a positive
    /// integer the topology can represent.
    fn build(&self, n_sites: i64) -> HalResult<BackendConfig>;
}

/// Validate a site count for a register of `species` wires per site.
///
/// Accepts any `n >= 1` whose `n * species` wires fit in a `u32`.
pub fn site_count(n_sites: i64, species: u32) -> HalResult<u32> {
    if n_sites < 1 {
        return Err(HalError::InvalidTopology(format!(
            "site count must be a positive integer, got {n_sites}"
        )));
    }
    let max_sites = i64::from(u32::MAX / species.max(1));
    if n_sites > max_sites {
        return Err(HalError::InvalidTopology(format!(
            "site count {n_sites} exceeds the largest representable register ({max_sites} sites)"
        )));
    }
    u32::try_from(n_sites).map_err(|_| {
        HalError::InvalidTopology(format!("site count {n_sites} does not fit in u32"))
    })
}
