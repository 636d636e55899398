//! Noise specification attached to a circuit.
//!
//! A [`NoiseSpec`] maps gate names to a depolarizing error probability. The
//! simulator consults it after every instruction: gates whose name carries
//! an entry suffer an error on each qubit they touch with that probability.
//! Gates without an entry are noiseless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{IrError, IrResult};

/// Per-gate depolarizing error rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNoiseSpec")]
pub struct NoiseSpec {
    /// Error probability keyed by gate name (e.g., "rx" → 0.001).
    #[serde(default)]
    pub gate_errors: BTreeMap<String, f64>,
}

#[derive(Deserialize)]
struct RawNoiseSpec {
    #[serde(default)]
    gate_errors: BTreeMap<String, f64>,
}

impl TryFrom<RawNoiseSpec> for NoiseSpec {
    type Error = IrError;

    fn try_from(raw: RawNoiseSpec) -> IrResult<Self> {
        for &p in raw.gate_errors.values() {
            check_probability(p)?;
        }
        Ok(Self {
            gate_errors: raw.gate_errors,
        })
    }
}

impl NoiseSpec {
    /// A specification with no noisy gates.
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Uniform depolarizing probability `p` on each of `gates`.
    pub fn depolarizing<'a>(p: f64, gates: impl IntoIterator<Item = &'a str>) -> IrResult<Self> {
        check_probability(p)?;
        Ok(Self {
            gate_errors: gates.into_iter().map(|g| (g.to_string(), p)).collect(),
        })
    }

    /// Get the error rate for a specific gate, if known.
    pub fn gate_error(&self, gate_name: &str) -> Option<f64> {
        self.gate_errors.get(gate_name).copied()
    }
}

impl std::fmt::Display for NoiseSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.gate_errors.is_empty() {
            return write!(f, "noiseless");
        }
        let parts: Vec<String> = self
            .gate_errors
            .iter()
            .map(|(gate, p)| format!("{gate}:depolarizing(p={p:.4})"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

fn check_probability(p: f64) -> IrResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(IrError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noiseless() {
        let spec = NoiseSpec::noiseless();
        assert!(spec.gate_errors.is_empty());
        assert_eq!(spec.gate_error("rx"), None);
        assert_eq!(format!("{spec}"), "noiseless");
    }

    #[test]
    fn test_depolarizing_uniform() {
        let spec = NoiseSpec::depolarizing(0.01, ["rx", "ry"]).unwrap();
        assert_eq!(spec.gate_error("rx"), Some(0.01));
        assert_eq!(spec.gate_error("ry"), Some(0.01));
        assert_eq!(spec.gate_error("cx"), None);
    }

    #[test]
    fn test_probability_bounds() {
        assert!(NoiseSpec::depolarizing(1.0, ["rx"]).is_ok());
        assert!(matches!(
            NoiseSpec::depolarizing(1.5, ["rx"]),
            Err(IrError::InvalidProbability(_))
        ));
        assert!(NoiseSpec::depolarizing(-0.1, ["rx"]).is_err());
        assert!(NoiseSpec::depolarizing(f64::NAN, ["rx"]).is_err());
    }

    #[test]
    fn test_display() {
        let spec = NoiseSpec::depolarizing(0.03, ["rx"]).unwrap();
        assert_eq!(format!("{spec}"), "rx:depolarizing(p=0.0300)");
    }

    #[test]
    fn test_serialization() {
        let spec = NoiseSpec::depolarizing(0.02, ["ry"]).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let back: NoiseSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gate_error("ry"), Some(0.02));
    }

    #[test]
    fn test_deserialize_rejects_bad_rate() {
        let result = serde_json::from_str::<NoiseSpec>(r#"{"gate_errors":{"rx":5.0}}"#);
        assert!(result.unwrap_err().to_string().contains("outside [0, 1]"));
    }
}
