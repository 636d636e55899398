//! Property-based tests for the builder, injector and sampler invariants.

use proptest::prelude::*;

use qharness_ir::NoiseSpec;
use qharness_sim::ansatz::{AngleList, LayeredAnsatz};
use qharness_sim::{Sampler, ZString, estimate, inject, sample};

fn arb_angles() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0_f64..10.0, 1..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Rotation and entangler counts follow the layer shape.
    #[test]
    fn build_gate_counts(n_qubits in 1_u32..=12, n_layers in 0_u32..=6, angles in arb_angles()) {
        let circuit = LayeredAnsatz::new(n_qubits, n_layers)
            .build(&mut AngleList::new(angles))
            .unwrap();
        let ops = circuit.count_ops();
        let rotations = ops.get("rx").copied().unwrap_or(0) + ops.get("ry").copied().unwrap_or(0);
        let entanglers = ops.get("cx").copied().unwrap_or(0);

        prop_assert_eq!(rotations, (n_layers * n_qubits * 2) as usize);
        prop_assert_eq!(entanglers, (n_layers * (n_qubits / 2)) as usize);
        prop_assert_eq!(circuit.num_ops(), rotations + entanglers);
    }

    /// Injection keeps the original gate list as an exact prefix.
    #[test]
    fn inject_preserves_prefix(n_qubits in 1_u32..=20, n_layers in 0_u32..=3, p in 0.0_f64..=1.0) {
        let circuit = LayeredAnsatz::new(n_qubits, n_layers)
            .build(&mut AngleList::new(vec![0.3, 1.7, 4.0]))
            .unwrap();
        let (noisy, noise) = inject(&circuit, p).unwrap();

        prop_assert_eq!(&noisy.instructions()[..circuit.num_ops()], circuit.instructions());
        prop_assert_eq!(noisy.num_ops() - circuit.num_ops(), n_qubits.div_ceil(5) as usize);
        prop_assert_eq!(noise.gate_error("rx"), Some(p));
    }

    /// Probabilities outside [0, 1] are always rejected.
    #[test]
    fn inject_rejects_out_of_range(p in prop_oneof![1.0001_f64..100.0, -100.0_f64..-0.0001]) {
        let circuit = LayeredAnsatz::new(2, 1)
            .build(&mut AngleList::new(vec![0.0]))
            .unwrap();
        prop_assert!(inject(&circuit, p).is_err());
    }

    /// Every requested shot is accounted for.
    #[test]
    fn sample_total_equals_shots(
        n_qubits in 1_u32..=8,
        n_layers in 0_u32..=3,
        p in 0.0_f64..=1.0,
        shots in 1_u64..=500,
        seed in any::<u64>(),
    ) {
        let circuit = LayeredAnsatz::new(n_qubits, n_layers)
            .build(&mut AngleList::new(vec![0.9, 2.2]))
            .unwrap();
        let (noisy, noise) = inject(&circuit, p).unwrap();
        let counts = sample(&noisy, &noise, shots, seed).unwrap();

        prop_assert_eq!(counts.total_shots(), shots);
        prop_assert!(counts.is_complete());
        prop_assert!(counts.iter().all(|(b, _)| b.len() == n_qubits as usize));
    }

    /// Noiseless sampling always lands on the reference outcome.
    #[test]
    fn noiseless_sampling_is_deterministic(
        n_qubits in 1_u32..=10,
        n_layers in 0_u32..=4,
        angles in arb_angles(),
        seed in any::<u64>(),
    ) {
        let circuit = LayeredAnsatz::new(n_qubits, n_layers)
            .build(&mut AngleList::new(angles))
            .unwrap();
        let a = sample(&circuit, &NoiseSpec::noiseless(), 64, seed).unwrap();
        let b = sample(&circuit, &NoiseSpec::noiseless(), 64, seed).unwrap();
        let reference = Sampler::reference_bitstring(&circuit);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.get(&reference), 64);
    }

    /// Parity estimates stay in [-1, 1] with a finite, non-negative error.
    #[test]
    fn estimate_is_bounded(p in 0.0_f64..=1.0, seed in any::<u64>()) {
        let circuit = LayeredAnsatz::new(5, 2)
            .build(&mut AngleList::new(vec![0.0]))
            .unwrap();
        let (noisy, noise) = inject(&circuit, p).unwrap();
        let counts = sample(&noisy, &noise, 200, seed).unwrap();
        let est = estimate(&counts, &ZString::parity()).unwrap();

        prop_assert!((-1.0..=1.0).contains(&est.mean));
        prop_assert!(est.stderr.is_finite() && est.stderr >= 0.0);
    }
}
