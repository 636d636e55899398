//! `qharness-sim`: layered ansatz construction and noisy sampling.
//!
//! The pipeline runs strictly downward, each stage a pure function of its
//! inputs:
//!
//! 1. [`ansatz`] builds a rotation/entanglement circuit from an injected
//!    angle source
//! 2. [`inject`] returns a copy with a stabilizer block appended and a
//!    depolarizing [`NoiseSpec`](qharness_ir::NoiseSpec) for the rotations
//! 3. [`sampler`] draws shots under a classical bit-flip model
//! 4. [`estimate`] turns the histogram into `⟨O⟩ ± stderr`
//!
//! # Quick start
//!
//! ```rust
//! use qharness_sim::ansatz::{self, constant};
//! use qharness_sim::{ZString, estimate, inject, sample};
//!
//! let circuit = ansatz::build(4, 2, &mut constant(0.0)).unwrap();
//! let (noisy, noise) = inject(&circuit, 0.0).unwrap();
//! let counts = sample(&noisy, &noise, 256, 42).unwrap();
//! let est = estimate(&counts, &ZString::parity()).unwrap();
//! assert_eq!(est.mean, 1.0);
//! ```

pub mod ansatz;
pub mod counts;
pub mod error;
pub mod estimate;
pub mod inject;
pub mod observable;
pub mod sampler;

pub use ansatz::{
    AngleList, AngleSource, DEFAULT_MAX_GATES, DEFAULT_MAX_QUBITS, LayeredAnsatz, SeededAngles,
};
pub use counts::OutcomeCounts;
pub use error::{SimError, SimResult};
pub use estimate::{Estimate, estimate, fidelity_proxy};
pub use inject::{STABILIZER_STRIDE, inject};
pub use observable::{Observable, ZString};
pub use sampler::{DEFAULT_MAX_SHOTS, Sampler, sample};
