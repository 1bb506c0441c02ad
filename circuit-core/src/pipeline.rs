//! One end-to-end run: load, evaluate, emit, split, validate, check.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use common::config::{OutputMode, ReaderConfig};
use itertools::Itertools;

use crate::circuit::evaluator::evaluate;
use crate::circuit::reader;
use crate::circuit::{Circuit, InputValues};
use crate::field::CircuitField;
use crate::r1cs::constraints::emit_circuit;
use crate::r1cs::inputs::{split_assignment, R1CSExample, VariableLayout};
use crate::utils::errors::CircuitError;

/// Values of the circuit's output wires, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputReport<F> {
    pub outputs: Vec<(usize, F)>,
}

impl<F: CircuitField> OutputReport<F> {
    /// The report as printed in `mode`, or `None` if the mode suppresses it.
    pub fn render(&self, mode: OutputMode) -> Option<String> {
        mode.prints_outputs().then(|| self.to_string())
    }
}

impl<F: CircuitField> fmt::Display for OutputReport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (wire, value) in &self.outputs {
            writeln!(f, "[output] Value of Wire # {wire} :: {value}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOutput<F> {
    pub example: R1CSExample<F>,
    pub report: OutputReport<F>,
}

/// A loaded circuit with its inputs, ready to be run.
#[derive(Clone, Debug)]
pub struct CircuitPipeline<F> {
    circuit: Circuit<F>,
    inputs: InputValues<F>,
    config: ReaderConfig,
}

impl<F: CircuitField> CircuitPipeline<F> {
    /// Builds a pipeline from an in-memory circuit. The parts get the same
    /// checks the loader applies to circuit and input files.
    pub fn from_parts(
        circuit: Circuit<F>,
        inputs: InputValues<F>,
        config: ReaderConfig,
    ) -> Result<Self, CircuitError> {
        circuit.validate()?;
        inputs.validate(&circuit)?;
        Ok(Self {
            circuit,
            inputs,
            config,
        })
    }

    pub fn from_readers(
        circuit_source: impl BufRead,
        input_source: impl BufRead,
        config: ReaderConfig,
    ) -> Result<Self, CircuitError> {
        let (circuit, inputs) = reader::load(circuit_source, input_source)?;
        Ok(Self {
            circuit,
            inputs,
            config,
        })
    }

    pub fn from_paths(
        circuit_path: impl AsRef<Path>,
        input_path: impl AsRef<Path>,
        config: ReaderConfig,
    ) -> Result<Self, CircuitError> {
        let (circuit, inputs) = reader::load_files(circuit_path, input_path)?;
        Ok(Self {
            circuit,
            inputs,
            config,
        })
    }

    pub fn circuit(&self) -> &Circuit<F> {
        &self.circuit
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Evaluates the circuit, emits its constraints and splits the
    /// assignment. The result is not checked yet.
    #[tracing::instrument(skip_all, name = "CircuitPipeline::assemble")]
    pub fn assemble(&self) -> Result<PipelineOutput<F>, CircuitError> {
        let table = evaluate(&self.circuit, &self.inputs)?;

        let layout = VariableLayout::new(&self.circuit)?;
        let constraint_system = emit_circuit(&self.circuit, &layout)?;

        let full_assignment = layout.full_assignment(&table)?;
        let (primary_input, auxiliary_input) =
            split_assignment(&full_assignment, layout.num_inputs(), layout.num_outputs())?;

        let report = OutputReport {
            outputs: self
                .circuit
                .outputs
                .iter()
                .copied()
                .zip_eq(primary_input[layout.num_inputs()..].iter().copied())
                .collect(),
        };

        let example = R1CSExample::new(constraint_system, primary_input, auxiliary_input);
        Ok(PipelineOutput { example, report })
    }

    /// Structural check (unless disabled) followed by the satisfiability
    /// check.
    pub fn check(&self, output: &PipelineOutput<F>) -> Result<(), CircuitError> {
        if self.config.check_structure {
            output.example.check_structure()?;
        } else {
            tracing::debug!("Skipping structural check");
        }
        output.example.check_satisfaction()
    }

    /// Runs every stage to completion and returns the checked example.
    #[tracing::instrument(skip_all, name = "CircuitPipeline::run")]
    pub fn run(&self) -> Result<PipelineOutput<F>, CircuitError> {
        let output = self.assemble()?;
        self.check(&output)?;
        Ok(output)
    }
}
