//! Hand-off of a checked [`R1CSExample`] to a zkSNARK.
//!
//! Key generation, proving and verification are treated as a black box that
//! either accepts the example or not.

use common::config::{Curve, ProofSystem};

use crate::field::CircuitField;
use crate::r1cs::inputs::R1CSExample;
use crate::utils::errors::CircuitError;

#[cfg(feature = "groth16")]
pub mod groth16;

pub trait ProofBackend<F: CircuitField> {
    fn name(&self) -> &'static str;

    fn proof_system(&self) -> ProofSystem;

    fn curve(&self) -> Curve {
        self.proof_system().curve()
    }

    /// Runs key generation, proving and verification on `example`. Returns
    /// whether the proof verified.
    fn prove_and_verify(&self, example: &R1CSExample<F>) -> Result<bool, CircuitError>;
}

/// Stands in for a proof system that has no prover linked into this build.
#[derive(Clone, Copy, Debug)]
pub struct UnlinkedBackend {
    system: ProofSystem,
}

impl UnlinkedBackend {
    pub fn new(system: ProofSystem) -> Self {
        Self { system }
    }
}

impl<F: CircuitField> ProofBackend<F> for UnlinkedBackend {
    fn name(&self) -> &'static str {
        "unlinked"
    }

    fn proof_system(&self) -> ProofSystem {
        self.system
    }

    fn prove_and_verify(&self, _example: &R1CSExample<F>) -> Result<bool, CircuitError> {
        Err(CircuitError::ProofBackend(format!(
            "no prover linked for {}",
            self.system
        )))
    }
}

/// Fields that know which backend serves each proof system.
pub trait BackendField: CircuitField {
    fn backend(system: ProofSystem) -> Box<dyn ProofBackend<Self>>;
}

impl BackendField for ark_bn254::Fr {
    fn backend(system: ProofSystem) -> Box<dyn ProofBackend<Self>> {
        match system {
            #[cfg(feature = "groth16")]
            ProofSystem::R1csGgPpzksnark => Box::new(groth16::Groth16Backend),
            _ => Box::new(UnlinkedBackend::new(system)),
        }
    }
}

impl BackendField for ark_bls12_381::Fr {
    fn backend(system: ProofSystem) -> Box<dyn ProofBackend<Self>> {
        Box::new(UnlinkedBackend::new(system))
    }
}

/// The circuit's field has to be the scalar field of the curve the proof
/// system is instantiated over.
pub fn check_parameterization(field: Curve, system: ProofSystem) -> Result<(), CircuitError> {
    let backend = system.curve();
    if field != backend {
        return Err(CircuitError::IncompatibleParameterization {
            field,
            system,
            backend,
        });
    }
    Ok(())
}

/// Runs the backend selected by `system` on a checked example.
#[tracing::instrument(skip_all, name = "ProofBackend::run")]
pub fn run_backend<F: BackendField>(
    system: ProofSystem,
    example: &R1CSExample<F>,
) -> Result<(), CircuitError> {
    check_parameterization(F::CURVE, system)?;
    if !example.constraint_system.is_valid() {
        return Err(CircuitError::MalformedConstraintSystem(
            "constraint references a variable outside the assignment".to_string(),
        ));
    }
    let backend = F::backend(system);
    tracing::info!(
        backend = backend.name(),
        proof_system = %backend.proof_system(),
        curve = %backend.curve(),
        "Running proof backend"
    );
    if backend.prove_and_verify(example)? {
        tracing::info!("Proof verified");
        Ok(())
    } else {
        Err(CircuitError::ProofBackend(format!(
            "{} proof did not verify",
            backend.proof_system()
        )))
    }
}
