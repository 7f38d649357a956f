//! Tests for the tweezer backend against its generated configuration.

use std::sync::Arc;
use std::thread;

use coldatom_adapter_tweezer::{
    Backend, BackendConfig, FermionEngine, FermionicTweezerBackend, HalError, HalResult, build,
};
use coldatom_hal::{Counts, Experiment, Instruction};

/// Engine that reports the loaded wires as occupied on every shot.
struct LoadedEngine;

impl FermionEngine for LoadedEngine {
    fn simulate(
        &self,
        config: &BackendConfig,
        experiment: &Experiment,
        shots: u32,
        _seed: Option<u64>,
    ) -> HalResult<Counts> {
        let mut bits = vec!['0'; config.n_qubits() as usize];
        for inst in experiment.instructions.iter().filter(|i| i.name == "load") {
            for &w in &inst.wires {
                bits[w as usize] = '1';
            }
        }
        let mut counts = Counts::new();
        counts.insert(bits.into_iter().collect::<String>(), u64::from(shots));
        Ok(counts)
    }
}

fn fermi_hubbard_step(n: u32) -> Experiment {
    Experiment::new("fh_step", 2 * n)
        .with(Instruction::load(0))
        .with(Instruction::load(n))
        .with(Instruction::new("hop", vec![0, 1, n, n + 1], vec![0.5]))
        .with(Instruction::new("int", (0..2 * n).collect(), vec![1.0]))
        .with(Instruction::new("phase", vec![1, n + 1], vec![0.2]))
        .with(Instruction::new("fer_rx", vec![0, n], vec![0.1]))
        .with(Instruction::measure((0..2 * n).collect()))
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn config_json_uses_engine_field_names() {
    let config = build(4).unwrap();
    let value: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();

    assert_eq!(value["backend_name"], "fermionic_tweezer_simulator");
    assert_eq!(value["backend_version"], "0.0.1");
    assert_eq!(value["cold_atom_type"], "fermion");
    assert_eq!(value["simulator"], true);
    assert_eq!(value["local"], true);
    assert!(value["coupling_map"].is_null());
    assert_eq!(value["n_qubits"], 8);
    assert_eq!(value["num_species"], 2);
    assert_eq!(value["max_shots"], 1_000_000);
    assert_eq!(value["max_experiments"], 10);
    assert_eq!(value["conditional"], false);
    assert_eq!(value["open_pulse"], false);
    assert_eq!(
        value["basis_gates"],
        serde_json::json!(["hop", "int", "phase", "FH", "fer_rx", "fer_ry", "fer_rz", "load"])
    );
    assert_eq!(
        value["supported_instructions"],
        serde_json::json!([
            "load", "measure", "barrier", "hop", "int", "phase", "FH", "fer_rx", "fer_ry",
            "fer_rz"
        ])
    );
    assert_eq!(
        value["gates"][2]["coupling_map"],
        serde_json::json!([[0, 4], [1, 5], [2, 6], [3, 7]])
    );
}

#[test]
fn config_json_reload_is_identical() {
    let config = build(3).unwrap();
    let reloaded = BackendConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(config, reloaded);
}

// ---------------------------------------------------------------------------
// Validation and execution
// ---------------------------------------------------------------------------

#[test]
fn valid_experiment_runs() {
    let backend = FermionicTweezerBackend::new(4, LoadedEngine).unwrap();
    let result = backend.run(&[fermi_hubbard_step(4)], 1000, Some(1)).unwrap();

    let counts = &result.get("fh_step").unwrap().counts;
    assert_eq!(counts.total(), 1000);
    assert_eq!(counts.most_frequent(), Some(("10001000", 1000)));
}

#[test]
fn hop_on_non_contiguous_sites_rejected() {
    let backend = FermionicTweezerBackend::new(4, LoadedEngine).unwrap();
    let exp = Experiment::new("gap", 8).with(Instruction::new("hop", vec![0, 2, 4, 6], vec![0.5]));

    let validation = backend.validate(&[exp], 10);
    assert!(!validation.is_valid());
    assert!(validation.reasons()[0].contains("hop"));
}

#[test]
fn rotation_across_sites_rejected() {
    let backend = FermionicTweezerBackend::new(4, LoadedEngine).unwrap();
    let exp = Experiment::new("cross", 8).with(Instruction::new("fer_rz", vec![0, 5], vec![0.1]));
    assert!(matches!(
        backend.run(&[exp], 10, None),
        Err(HalError::InvalidExperiment { .. })
    ));
}

#[test]
fn limits_enforced() {
    let backend = FermionicTweezerBackend::new(2, LoadedEngine).unwrap();
    let exp = fermi_hubbard_step(2);

    assert!(!backend.validate(&[exp.clone()], 1_000_001).is_valid());

    let batch = vec![exp; 11];
    assert!(!backend.validate(&batch, 10).is_valid());
    assert!(backend.validate(&batch[..10], 10).is_valid());
}

#[test]
fn config_shared_across_threads() {
    let backend = Arc::new(FermionicTweezerBackend::new(3, LoadedEngine).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                backend
                    .run(&[fermi_hubbard_step(3)], 100, None)
                    .map(|r| r.results[0].counts.total())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 100);
    }
}
