use common::config::{Curve, ProofSystem};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Reference to undeclared wire {wire}")]
    UndefinedWire { wire: usize },
    #[error("Gate {gate} is malformed: {message}")]
    MalformedGate { gate: usize, message: String },
    #[error("Cannot allocate storage for {num_wires} wires")]
    WireAllocation { num_wires: usize },
    #[error("Input count mismatch, expected {expected} values but got {actual}")]
    InputCountMismatch { expected: usize, actual: usize },
    #[error("Gate {gate} read wire {wire} before it was assigned")]
    EvaluationOrderViolation { gate: usize, wire: usize },
    #[error("Wire {wire} assigned more than once")]
    WireReassigned { wire: usize },
    #[error("Declared {declared} public wires but only {assigned} wires are assigned")]
    SplitOutOfRange { declared: usize, assigned: usize },
    #[error("Malformed constraint system: {0}")]
    MalformedConstraintSystem(String),
    #[error("Constraint {row} is not satisfied by the assignment")]
    UnsatisfiedConstraint { row: usize },
    #[error("Field parameterization {field} is incompatible with {system} over {backend}")]
    IncompatibleParameterization {
        field: Curve,
        system: ProofSystem,
        backend: Curve,
    },
    #[error("Proof backend failed: {0}")]
    ProofBackend(String),
}

impl CircuitError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CircuitError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_gate(gate: usize, message: impl Into<String>) -> Self {
        CircuitError::MalformedGate {
            gate,
            message: message.into(),
        }
    }
}
