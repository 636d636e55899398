//! Diagonal observables over measured bitstrings.

use serde::{Deserialize, Serialize};

/// A diagonal observable: assigns a real weight to every measured bitstring.
pub trait Observable {
    /// Weight of one outcome. Character `i` of `bitstring` is qubit `i`.
    fn weight(&self, bitstring: &str) -> f64;

    /// Highest qubit index the observable reads, if it is restricted.
    fn max_qubit(&self) -> Option<u32> {
        None
    }
}

impl<F: Fn(&str) -> f64> Observable for F {
    fn weight(&self, bitstring: &str) -> f64 {
        self(bitstring)
    }
}

/// A weighted Z⊗Z⊗…⊗Z string: `coeff · (-1)^(number of 1s on the support)`.
///
/// With no explicit support it covers every measured qubit, which is the
/// all-qubit parity observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawZString")]
pub struct ZString {
    /// Qubits carrying a Z, sorted ascending; `None` means all qubits.
    support: Option<Vec<u32>>,
    /// Real coefficient.
    coeff: f64,
}

/// Serialized form; the support is normalized on the way in.
#[derive(Deserialize)]
struct RawZString {
    #[serde(default)]
    support: Option<Vec<u32>>,
    #[serde(default = "unit_coeff")]
    coeff: f64,
}

fn unit_coeff() -> f64 {
    1.0
}

impl From<RawZString> for ZString {
    fn from(raw: RawZString) -> Self {
        let z = match raw.support {
            Some(qubits) => ZString::on(qubits),
            None => ZString::parity(),
        };
        z.with_coeff(raw.coeff)
    }
}

impl ZString {
    /// Parity of every qubit, coefficient 1.
    pub fn parity() -> Self {
        Self {
            support: None,
            coeff: 1.0,
        }
    }

    /// Z on each of the given qubits, coefficient 1.
    pub fn on(qubits: impl IntoIterator<Item = u32>) -> Self {
        let mut v: Vec<u32> = qubits.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self {
            support: Some(v),
            coeff: 1.0,
        }
    }

    /// Scale by a real coefficient.
    #[must_use]
    pub fn with_coeff(mut self, coeff: f64) -> Self {
        self.coeff = coeff;
        self
    }

    /// The coefficient.
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// Explicit support, or `None` for all qubits.
    pub fn support(&self) -> Option<&[u32]> {
        self.support.as_deref()
    }
}

impl Observable for ZString {
    fn weight(&self, bitstring: &str) -> f64 {
        let bytes = bitstring.as_bytes();
        let ones = match &self.support {
            None => bytes.iter().filter(|&&b| b == b'1').count(),
            Some(qubits) => qubits
                .iter()
                .filter(|&&q| bytes.get(q as usize) == Some(&b'1'))
                .count(),
        };
        if ones % 2 == 0 { self.coeff } else { -self.coeff }
    }

    fn max_qubit(&self) -> Option<u32> {
        self.support.as_ref().and_then(|v| v.last().copied())
    }
}
