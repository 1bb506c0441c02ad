//! In-memory form of an arithmetic circuit: the gate list in evaluation order
//! plus the declared input, private input and output wires.

use std::fmt;

use common::constants;

pub mod evaluator;
pub mod reader;
pub mod wires;

/// Operation performed by a gate. Every variant has its own evaluation rule
/// (see `evaluator`) and its own constraint-emission rule (see
/// `r1cs::constraints`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateKind<F> {
    /// `out = sum(in)`
    Add,
    /// `out = in0 * in1`
    Mul,
    /// `out = k * in0`. Negated constants are folded in when parsing.
    ConstMul(F),
    /// `out = in0 + in1 - 2 * in0 * in1`
    Xor,
    /// `out = in0 + in1 - in0 * in1`
    Or,
    /// Enforces `in0 * in1 = out0` on an already assigned `out0`.
    Assert,
    /// Zero test. `out1 = (in0 != 0)`, `out0` holds the inverse witness.
    ZeroP,
    /// Little-endian bit decomposition of `in0` into the output wires.
    Split,
    /// `out = sum(in_i * 2^i)`
    Pack,
}

/// Allowed number of wires on one side of a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == *k,
            Arity::AtLeast(k) => n >= *k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(k) => write!(f, "{k}"),
            Arity::AtLeast(k) => write!(f, "at least {k}"),
        }
    }
}

impl<F> GateKind<F> {
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Add => constants::ADD,
            GateKind::Mul => constants::MUL,
            GateKind::ConstMul(_) => "const-mul",
            GateKind::Xor => constants::XOR,
            GateKind::Or => constants::OR,
            GateKind::Assert => constants::ASSERT,
            GateKind::ZeroP => constants::ZEROP,
            GateKind::Split => constants::SPLIT,
            GateKind::Pack => constants::PACK,
        }
    }

    /// (input arity, output arity)
    pub fn arity(&self) -> (Arity, Arity) {
        use Arity::*;
        match self {
            GateKind::Add => (AtLeast(1), Exactly(1)),
            GateKind::Mul | GateKind::Xor | GateKind::Or | GateKind::Assert => {
                (Exactly(2), Exactly(1))
            }
            GateKind::ConstMul(_) => (Exactly(1), Exactly(1)),
            GateKind::ZeroP => (Exactly(1), Exactly(2)),
            GateKind::Split => (Exactly(1), AtLeast(1)),
            GateKind::Pack => (AtLeast(1), Exactly(1)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate<F> {
    pub kind: GateKind<F>,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

impl<F> Gate<F> {
    pub fn new(kind: GateKind<F>, inputs: Vec<usize>, outputs: Vec<usize>) -> Self {
        Self {
            kind,
            inputs,
            outputs,
        }
    }

    /// Checks the wire counts against the gate kind.
    pub fn check_arity(&self) -> Result<(), String> {
        let (ins, outs) = self.kind.arity();
        if !ins.accepts(self.inputs.len()) {
            return Err(format!(
                "{} gate takes {} inputs, got {}",
                self.kind.name(),
                ins,
                self.inputs.len()
            ));
        }
        if !outs.accepts(self.outputs.len()) {
            return Err(format!(
                "{} gate takes {} outputs, got {}",
                self.kind.name(),
                outs,
                self.outputs.len()
            ));
        }
        Ok(())
    }

    /// Wires this gate writes.
    pub fn defined_wires(&self) -> &[usize] {
        match self.kind {
            GateKind::Assert => &[],
            _ => &self.outputs,
        }
    }

    /// Wires that must hold a value before this gate runs.
    pub fn used_wires(&self) -> impl Iterator<Item = usize> + '_ {
        let referenced: &[usize] = match self.kind {
            GateKind::Assert => &self.outputs,
            _ => &[],
        };
        self.inputs.iter().chain(referenced.iter()).copied()
    }
}

/// A loaded circuit. Gates are in an order where every used wire is defined
/// by an input declaration or an earlier gate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit<F> {
    /// Upper bound (exclusive) on wire ids.
    pub num_wires: usize,
    /// Public inputs, in declaration order.
    pub inputs: Vec<usize>,
    /// Private inputs, in declaration order.
    pub nizk_inputs: Vec<usize>,
    /// Public outputs, in declaration order.
    pub outputs: Vec<usize>,
    pub gates: Vec<Gate<F>>,
}

impl<F> Circuit<F> {
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of values the input source has to supply.
    pub fn num_supplied_inputs(&self) -> usize {
        self.inputs.len() + self.nizk_inputs.len()
    }

    pub fn is_input(&self, wire: usize) -> bool {
        self.inputs.contains(&wire) || self.nizk_inputs.contains(&wire)
    }

    /// Every wire that receives a value during evaluation, ascending.
    pub fn assigned_wires(&self) -> Vec<usize> {
        let mut wires: Vec<usize> = self
            .inputs
            .iter()
            .chain(self.nizk_inputs.iter())
            .copied()
            .chain(self.gates.iter().flat_map(|g| g.defined_wires().iter().copied()))
            .collect();
        wires.sort_unstable();
        wires.dedup();
        wires
    }
}

/// Values bound to the input and private input wires, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputValues<F> {
    values: Vec<(usize, F)>,
}

impl<F> InputValues<F> {
    pub fn new(values: Vec<(usize, F)>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, F)> {
        self.values.iter()
    }
}
