use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError,
    Variable as ArkVariable,
};
use ark_snark::SNARK;
use common::config::ProofSystem;

use super::ProofBackend;
use crate::r1cs::inputs::R1CSExample;
use crate::r1cs::ops::{Variable, LC};
use crate::utils::errors::CircuitError;

/// Groth16 over BN254.
#[derive(Clone, Copy, Debug, Default)]
pub struct Groth16Backend;

/// Replays an [`R1CSExample`] into an arkworks constraint system.
#[derive(Clone, Copy)]
struct ExampleCircuit<'a> {
    example: &'a R1CSExample<Fr>,
}

impl ConstraintSynthesizer<Fr> for ExampleCircuit<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Arkworks allocates the one-wire as the first instance variable.
        let instance = self
            .example
            .primary_input
            .iter()
            .map(|&value| cs.new_input_variable(|| Ok(value)))
            .collect::<Result<Vec<_>, _>>()?;
        let witness = self
            .example
            .auxiliary_input
            .iter()
            .map(|&value| cs.new_witness_variable(|| Ok(value)))
            .collect::<Result<Vec<_>, _>>()?;

        let make_lc = |lc: &LC<Fr>| -> Result<LinearCombination<Fr>, SynthesisError> {
            lc.terms().iter().try_fold(LinearCombination::zero(), |acc, term| {
                let variable = match term.0 {
                    Variable::Input(i) => *instance.get(i).ok_or(SynthesisError::AssignmentMissing)?,
                    Variable::Auxiliary(j) => {
                        *witness.get(j).ok_or(SynthesisError::AssignmentMissing)?
                    }
                    Variable::Constant => ArkVariable::One,
                };
                Ok(acc + (term.1, variable))
            })
        };

        for constraint in &self.example.constraint_system.constraints {
            cs.enforce_constraint(
                make_lc(&constraint.a)?,
                make_lc(&constraint.b)?,
                make_lc(&constraint.c)?,
            )?;
        }
        Ok(())
    }
}

impl ProofBackend<Fr> for Groth16Backend {
    fn name(&self) -> &'static str {
        "ark-groth16"
    }

    fn proof_system(&self) -> ProofSystem {
        ProofSystem::R1csGgPpzksnark
    }

    #[tracing::instrument(skip_all, name = "Groth16Backend::prove_and_verify")]
    fn prove_and_verify(&self, example: &R1CSExample<Fr>) -> Result<bool, CircuitError> {
        let circuit = ExampleCircuit { example };
        let mut rng = rand::thread_rng();
        let backend_error = |e: SynthesisError| CircuitError::ProofBackend(e.to_string());

        let (pk, vk) = {
            let _span = tracing::info_span!("Groth16::setup").entered();
            Groth16::<Bn254>::circuit_specific_setup(circuit, &mut rng).map_err(backend_error)?
        };
        let proof = {
            let _span = tracing::info_span!("Groth16::prove").entered();
            Groth16::<Bn254>::prove(&pk, circuit, &mut rng).map_err(backend_error)?
        };
        let _span = tracing::info_span!("Groth16::verify").entered();
        Groth16::<Bn254>::verify(&vk, &example.primary_input, &proof).map_err(backend_error)
    }
}
