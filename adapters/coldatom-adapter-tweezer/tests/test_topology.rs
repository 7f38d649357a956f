//! Tests for tweezer-chain coupling-map derivation.

use coldatom_adapter_tweezer::{
    HalError, TopologyBuilder, TweezerChain, build, global_site_couplings,
    neighbouring_site_couplings, single_site_couplings,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn four_tweezers_neighbouring_order() {
    let config = build(4).unwrap();
    let hop = config.gate("hop").unwrap();
    let expected: Vec<Vec<u32>> = vec![
        vec![0, 1, 4, 5],
        vec![1, 2, 5, 6],
        vec![2, 3, 6, 7],
        vec![0, 1, 2, 4, 5, 6],
        vec![1, 2, 3, 5, 6, 7],
        vec![0, 1, 2, 3, 4, 5, 6, 7],
    ];
    assert_eq!(hop.coupling_map().entries(), expected.as_slice());
}

#[test]
fn four_tweezers_global_and_single_site() {
    let config = build(4).unwrap();

    let global: Vec<Vec<u32>> = vec![(0..8).collect()];
    assert_eq!(
        config.gate("int").unwrap().coupling_map().entries(),
        global.as_slice()
    );

    let single: Vec<Vec<u32>> = vec![vec![0, 4], vec![1, 5], vec![2, 6], vec![3, 7]];
    for name in ["phase", "fer_rx", "fer_ry", "fer_rz"] {
        assert_eq!(
            config.gate(name).unwrap().coupling_map().entries(),
            single.as_slice(),
            "gate {name}"
        );
    }
}

#[test]
fn single_tweezer_is_trivial_device() {
    let config = build(1).unwrap();
    assert_eq!(config.n_qubits(), 2);
    assert!(config.gate("hop").unwrap().coupling_map().is_empty());

    let pair: Vec<Vec<u32>> = vec![vec![0, 1]];
    assert_eq!(
        config.gate("int").unwrap().coupling_map().entries(),
        pair.as_slice()
    );
    assert_eq!(
        config.gate("phase").unwrap().coupling_map().entries(),
        pair.as_slice()
    );
}

#[test]
fn non_positive_sites_rejected() {
    assert!(matches!(build(0), Err(HalError::InvalidTopology(_))));
    assert!(matches!(build(-1), Err(HalError::InvalidTopology(_))));
    assert!(matches!(build(i64::MIN), Err(HalError::InvalidTopology(_))));
}

#[test]
fn oversized_chain_rejected_without_panic() {
    assert!(matches!(
        build(i64::from(u32::MAX / 2)),
        Err(HalError::InvalidTopology(_))
    ));
    assert!(matches!(
        TweezerChain::new().build(i64::from(TweezerChain::MAX_TWEEZERS) + 1),
        Err(HalError::InvalidTopology(_))
    ));
}

#[test]
fn default_site_count_matches_chain_default() {
    let config = TweezerChain::default()
        .build(TweezerChain::DEFAULT_TWEEZERS)
        .unwrap();
    assert_eq!(config, build(4).unwrap());
}

// ---------------------------------------------------------------------------
// Properties over n
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn neighbouring_count_is_triangular(n in 1_u32..=40) {
        let map = neighbouring_site_couplings(n).unwrap();
        prop_assert_eq!(map.len() as u32, n * (n - 1) / 2);
    }

    #[test]
    fn neighbouring_entries_pair_up_and_down(n in 2_u32..=30) {
        let map = neighbouring_site_couplings(n).unwrap();
        let mut last_size = 0;
        let mut last_start = None;
        for entry in &map {
            let size = entry.len() / 2;
            let (up, down) = entry.split_at(size);
            prop_assert!(size >= 2);
            prop_assert!(up.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert!(up.iter().zip(down).all(|(u, d)| *d == u + n));
            prop_assert!(up[size - 1] < n);

            // Ordered by size, then by start offset.
            if size == last_size {
                prop_assert!(Some(up[0]) > last_start);
            } else {
                prop_assert!(size > last_size);
            }
            last_size = size;
            last_start = Some(up[0]);
        }
    }

    #[test]
    fn global_covers_every_wire_once(n in 1_u32..=40) {
        let map = global_site_couplings(n);
        prop_assert_eq!(map.len(), 1);
        let expected: Vec<u32> = (0..2 * n).collect();
        prop_assert_eq!(&map.entries()[0], &expected);
    }

    #[test]
    fn single_site_pairs_partners(n in 1_u32..=40) {
        let map = single_site_couplings(n);
        prop_assert_eq!(map.len(), n as usize);
        for (i, entry) in map.iter().enumerate() {
            let i = i as u32;
            prop_assert_eq!(entry, &vec![i, i + n]);
        }
    }

    #[test]
    fn build_is_deterministic(n in 1_i64..=20) {
        prop_assert_eq!(build(n).unwrap(), build(n).unwrap());
    }

    #[test]
    fn build_register_is_two_wires_per_site(n in 1_i64..=20) {
        let config = build(n).unwrap();
        prop_assert_eq!(i64::from(config.n_qubits()), 2 * n);
        prop_assert_eq!(i64::from(config.num_sites()), n);
    }

    #[test]
    fn build_rejects_non_positive(n in i64::MIN..=0) {
        prop_assert!(matches!(build(n), Err(HalError::InvalidTopology(_))));
    }

    #[test]
    fn build_rejects_above_max(
        n in i64::from(TweezerChain::MAX_TWEEZERS) + 1..=i64::MAX
    ) {
        prop_assert!(matches!(build(n), Err(HalError::InvalidTopology(_))));
    }
}
