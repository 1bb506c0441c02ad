use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How the reader reports circuit output values once a run succeeds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum OutputMode {
    /// Print every output wire with its value as a plain integer.
    #[serde(rename = "readable_output", alias = "readable")]
    #[strum(to_string = "readable_output", serialize = "readable")]
    Readable,
    /// Print nothing.
    #[default]
    #[serde(rename = "compact_output", alias = "compact")]
    #[strum(to_string = "compact_output", serialize = "compact")]
    Compact,
}

impl OutputMode {
    pub fn prints_outputs(&self) -> bool {
        matches!(self, OutputMode::Readable)
    }
}

/// Runtime configuration of a single reader run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub output_mode: OutputMode,
    /// Re-verify that every constraint only references in-range variables
    /// before checking satisfiability.
    pub check_structure: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::default(),
            check_structure: true,
        }
    }
}

impl ReaderConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Pairing-friendly curve whose scalar field carries the circuit arithmetic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Curve {
    #[strum(to_string = "bn254", serialize = "alt_bn128", serialize = "bn128")]
    Bn254,
    #[strum(to_string = "bls12-381", serialize = "bls12_381")]
    Bls12_381,
}

/// The proof systems a reader run can hand its constraint system to.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ProofSystem {
    /// Pinocchio-style preprocessing zkSNARK.
    #[strum(to_string = "R1CS_PPZKSNARK", serialize = "ppzksnark")]
    R1csPpzksnark,
    /// Groth16.
    #[default]
    #[strum(to_string = "R1CS_GG_PPZKSNARK", serialize = "gg")]
    R1csGgPpzksnark,
    /// Groth-Maller simulation-extractable zkSNARK.
    #[strum(to_string = "R1CS_SE_PPZKSNARK", serialize = "se")]
    R1csSePpzksnark,
}

impl ProofSystem {
    /// The curve the system's keys and proofs are defined over. All three
    /// variants share the default pairing parameterization.
    pub fn curve(&self) -> Curve {
        match self {
            ProofSystem::R1csPpzksnark
            | ProofSystem::R1csGgPpzksnark
            | ProofSystem::R1csSePpzksnark => Curve::Bn254,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn proof_system_aliases() {
        assert_eq!(
            ProofSystem::from_str("R1CS_GG_PPZKSNARK").unwrap(),
            ProofSystem::R1csGgPpzksnark
        );
        assert_eq!(
            ProofSystem::from_str("gg").unwrap(),
            ProofSystem::R1csGgPpzksnark
        );
        assert_eq!(
            ProofSystem::from_str("se").unwrap(),
            ProofSystem::R1csSePpzksnark
        );
        assert_eq!(
            ProofSystem::from_str("R1CS_PPZKSNARK").unwrap(),
            ProofSystem::R1csPpzksnark
        );
        assert!(ProofSystem::from_str("plonk").is_err());
    }

    #[test]
    fn proof_systems_share_one_curve() {
        let curves: Vec<Curve> = ProofSystem::iter().map(|s| s.curve()).collect();
        assert!(curves.iter().all(|c| *c == Curve::Bn254));
    }

    #[test]
    fn reader_config_from_json() {
        let config = ReaderConfig::from_json(r#"{"output_mode": "readable_output"}"#).unwrap();
        assert_eq!(config.output_mode, OutputMode::Readable);
        assert!(config.check_structure);

        let config =
            ReaderConfig::from_json(r#"{"output_mode": "compact", "check_structure": false}"#)
                .unwrap();
        assert_eq!(config.output_mode, OutputMode::Compact);
        assert!(!config.check_structure);
    }

    #[test]
    fn output_mode_round_trips_through_display() {
        for mode in [OutputMode::Readable, OutputMode::Compact] {
            assert_eq!(OutputMode::from_str(&mode.to_string()).unwrap(), mode);
        }
        assert_eq!(Curve::from_str("alt_bn128").unwrap(), Curve::Bn254);
    }
}
