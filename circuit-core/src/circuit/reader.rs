//! Loader for the `.arith` circuit format and its companion input file.
//!
//! A circuit file starts with a `total <N>` header followed by one statement
//! per line:
//!
//! ```text
//! total 5
//! input 0                          # public input
//! nizkinput 1                      # private input
//! mul in 2 <0 1> out 1 <2>
//! const-mul-neg-1 in 1 <2> out 1 <3>
//! add in 2 <1 3> out 1 <4>
//! output 4
//! ```
//!
//! The input file binds a hexadecimal value to every `input` and `nizkinput`
//! wire, one `<wire> <hex>` pair per line.
//!
//! The loader guarantees that the returned gate list is in evaluation order:
//! every wire a gate reads was declared as an input or written by an earlier
//! gate.

use std::collections::{HashSet, TryReserveError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use common::constants;

use super::{Circuit, Gate, GateKind, InputValues};
use crate::field::CircuitField;
use crate::utils::alloc::try_allocate_vec;
use crate::utils::errors::CircuitError;

/// Parses a circuit and its input values from two sources.
pub fn load<F: CircuitField>(
    circuit_source: impl BufRead,
    input_source: impl BufRead,
) -> Result<(Circuit<F>, InputValues<F>), CircuitError> {
    let circuit = parse_circuit(circuit_source)?;
    let inputs = parse_inputs(input_source, &circuit)?;
    Ok((circuit, inputs))
}

pub fn load_files<F: CircuitField>(
    circuit_path: impl AsRef<Path>,
    input_path: impl AsRef<Path>,
) -> Result<(Circuit<F>, InputValues<F>), CircuitError> {
    let circuit_file = BufReader::new(File::open(circuit_path)?);
    let input_file = BufReader::new(File::open(input_path)?);
    load(circuit_file, input_file)
}

/// Yields `(line_number, content)` for every non-blank line with comments
/// stripped. Line numbers are 1-based.
fn statements(
    source: impl BufRead,
) -> impl Iterator<Item = Result<(usize, String), CircuitError>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Err(e) => Some(Err(CircuitError::from(e))),
            Ok(line) => {
                let content = match line.find(constants::COMMENT) {
                    Some(pos) => &line[..pos],
                    None => line.as_str(),
                };
                let content = content.trim();
                if content.is_empty() {
                    None
                } else {
                    Some(Ok((index + 1, content.to_string())))
                }
            }
        })
}

fn parse_usize(line: usize, token: &str, what: &str) -> Result<usize, CircuitError> {
    token
        .parse::<usize>()
        .map_err(|_| CircuitError::parse(line, format!("invalid {what} '{token}'")))
}

#[tracing::instrument(skip_all, name = "CircuitReader::parse_circuit")]
pub fn parse_circuit<F: CircuitField>(source: impl BufRead) -> Result<Circuit<F>, CircuitError> {
    let mut lines = statements(source);

    let (line, header) = match lines.next() {
        Some(statement) => statement?,
        None => return Err(CircuitError::parse(0, "empty circuit description")),
    };
    let num_wires = match header.split_whitespace().collect::<Vec<_>>().as_slice() {
        [keyword, count] if *keyword == constants::TOTAL => {
            parse_usize(line, count, "wire count")?
        }
        _ => {
            return Err(CircuitError::parse(
                line,
                format!("expected '{} <N>' header", constants::TOTAL),
            ))
        }
    };

    let wires = WireCheck::new(num_wires).map_err(|_| {
        CircuitError::parse(line, format!("cannot allocate {num_wires} wires"))
    })?;
    let mut state = CircuitState {
        circuit: Circuit {
            num_wires,
            ..Default::default()
        },
        wires,
    };
    for statement in lines {
        let (line, content) = statement?;
        state.statement(line, &content)?;
    }
    state.wires.check_outputs_assigned(&state.circuit.outputs)?;
    let circuit = state.circuit;

    tracing::info!(
        num_wires = circuit.num_wires,
        num_inputs = circuit.num_inputs(),
        num_nizk_inputs = circuit.nizk_inputs.len(),
        num_outputs = circuit.num_outputs(),
        num_gates = circuit.gates.len(),
        "Circuit loaded"
    );
    Ok(circuit)
}

impl<F: CircuitField> Circuit<F> {
    /// Applies the loader's wire and arity checks to a circuit that was not
    /// read from a file.
    ///
    /// Declarations are replayed inputs first, then private inputs, outputs
    /// and gates. Declaration conflicts are reported on line 0.
    pub fn validate(&self) -> Result<(), CircuitError> {
        let mut wires = WireCheck::new(self.num_wires).map_err(|_| {
            CircuitError::WireAllocation {
                num_wires: self.num_wires,
            }
        })?;
        for &wire in self.inputs.iter().chain(self.nizk_inputs.iter()) {
            wires.declare_input(0, wire)?;
        }
        for &wire in &self.outputs {
            wires.declare_output(0, wire)?;
        }
        for (index, gate) in self.gates.iter().enumerate() {
            gate.check_arity()
                .map_err(|message| CircuitError::malformed_gate(index, message))?;
            wires.gate(gate)?;
        }
        wires.check_outputs_assigned(&self.outputs)
    }
}

/// Role of one wire while a circuit is being read.
#[derive(Clone, Copy, Debug, Default)]
struct WireFlags {
    defined: bool,
    input: bool,
    output: bool,
}

/// Per-wire bookkeeping shared by the loader and [`Circuit::validate`].
struct WireCheck {
    flags: Vec<WireFlags>,
}

impl WireCheck {
    fn new(num_wires: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            flags: try_allocate_vec(num_wires, WireFlags::default())?,
        })
    }

    fn entry(&mut self, wire: usize) -> Result<&mut WireFlags, CircuitError> {
        self.flags
            .get_mut(wire)
            .ok_or(CircuitError::UndefinedWire { wire })
    }

    fn define(&mut self, wire: usize) -> Result<(), CircuitError> {
        let flags = self.entry(wire)?;
        if flags.defined {
            return Err(CircuitError::WireReassigned { wire });
        }
        flags.defined = true;
        Ok(())
    }

    fn declare_input(&mut self, line: usize, wire: usize) -> Result<(), CircuitError> {
        self.define(wire)?;
        let flags = self.entry(wire)?;
        if flags.output {
            return Err(CircuitError::parse(
                line,
                format!("wire {wire} declared as both input and output"),
            ));
        }
        flags.input = true;
        Ok(())
    }

    fn declare_output(&mut self, line: usize, wire: usize) -> Result<(), CircuitError> {
        let flags = self.entry(wire)?;
        if flags.input {
            return Err(CircuitError::parse(
                line,
                format!("wire {wire} declared as both input and output"),
            ));
        }
        if flags.output {
            return Err(CircuitError::parse(
                line,
                format!("wire {wire} declared as output twice"),
            ));
        }
        flags.output = true;
        Ok(())
    }

    /// Wire checks for a gate whose arity is already known to be valid.
    fn gate<F>(&mut self, gate: &Gate<F>) -> Result<(), CircuitError> {
        for wire in gate.used_wires() {
            if !self.entry(wire)?.defined {
                return Err(CircuitError::UndefinedWire { wire });
            }
        }
        for &wire in gate.defined_wires() {
            self.define(wire)?;
        }
        Ok(())
    }

    fn check_outputs_assigned(&self, outputs: &[usize]) -> Result<(), CircuitError> {
        match outputs
            .iter()
            .find(|&&wire| !self.flags.get(wire).is_some_and(|flags| flags.defined))
        {
            Some(&wire) => Err(CircuitError::UndefinedWire { wire }),
            None => Ok(()),
        }
    }
}

/// A circuit being read together with its wire bookkeeping.
struct CircuitState<F> {
    circuit: Circuit<F>,
    wires: WireCheck,
}

impl<F: CircuitField> CircuitState<F> {
    fn statement(&mut self, line: usize, content: &str) -> Result<(), CircuitError> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        match tokens.as_slice() {
            [keyword, wire]
                if *keyword == constants::INPUT || *keyword == constants::NIZK_INPUT =>
            {
                let wire = parse_usize(line, wire, "wire id")?;
                self.wires.declare_input(line, wire)?;
                if *keyword == constants::INPUT {
                    self.circuit.inputs.push(wire);
                } else {
                    self.circuit.nizk_inputs.push(wire);
                }
                Ok(())
            }
            [keyword, wire] if *keyword == constants::OUTPUT => {
                let wire = parse_usize(line, wire, "wire id")?;
                self.wires.declare_output(line, wire)?;
                self.circuit.outputs.push(wire);
                Ok(())
            }
            _ => {
                let gate = parse_gate::<F>(line, content)?;
                gate.check_arity()
                    .map_err(|message| CircuitError::parse(line, message))?;
                self.wires.gate(&gate)?;
                tracing::trace!(line, kind = gate.kind.name(), "gate");
                self.circuit.gates.push(gate);
                Ok(())
            }
        }
    }
}

fn parse_opcode<F: CircuitField>(line: usize, opcode: &str) -> Result<GateKind<F>, CircuitError> {
    let kind = match opcode {
        constants::ADD => GateKind::Add,
        constants::MUL => GateKind::Mul,
        constants::XOR => GateKind::Xor,
        constants::OR => GateKind::Or,
        constants::ASSERT => GateKind::Assert,
        constants::ZEROP => GateKind::ZeroP,
        constants::SPLIT => GateKind::Split,
        constants::PACK => GateKind::Pack,
        _ => {
            // The negated prefix must be tried first, it extends the plain one.
            let (hex, negate) = if let Some(hex) = opcode.strip_prefix(constants::CONST_MUL_NEG_PREFIX)
            {
                (hex, true)
            } else if let Some(hex) = opcode.strip_prefix(constants::CONST_MUL_PREFIX) {
                (hex, false)
            } else {
                return Err(CircuitError::parse(
                    line,
                    format!("unknown gate type '{opcode}'"),
                ));
            };
            let constant = F::from_hex(hex).ok_or_else(|| {
                CircuitError::parse(line, format!("invalid constant '{hex}' in '{opcode}'"))
            })?;
            GateKind::ConstMul(if negate { -constant } else { constant })
        }
    };
    Ok(kind)
}

/// Parses `<opcode> in <n> <w1 .. wn> out <m> <v1 .. vm>`.
fn parse_gate<F: CircuitField>(line: usize, content: &str) -> Result<Gate<F>, CircuitError> {
    let spaced = content.replace('<', " < ").replace('>', " > ");
    let mut tokens = spaced.split_whitespace();

    let opcode = tokens
        .next()
        .ok_or_else(|| CircuitError::parse(line, "missing gate type"))?;
    let kind = parse_opcode::<F>(line, opcode)?;
    let inputs = parse_wire_list(line, &mut tokens, constants::GATE_INPUTS)?;
    let outputs = parse_wire_list(line, &mut tokens, constants::GATE_OUTPUTS)?;
    if let Some(extra) = tokens.next() {
        return Err(CircuitError::parse(
            line,
            format!("unexpected token '{extra}' after gate"),
        ));
    }
    Ok(Gate::new(kind, inputs, outputs))
}

/// Parses `<keyword> <count> < w1 .. wcount >`.
fn parse_wire_list<'a>(
    line: usize,
    tokens: &mut impl Iterator<Item = &'a str>,
    keyword: &str,
) -> Result<Vec<usize>, CircuitError> {
    let mut expect_token = |expected: &str| match tokens.next() {
        Some(token) if token == expected => Ok(()),
        Some(token) => Err(CircuitError::parse(
            line,
            format!("expected '{expected}', found '{token}'"),
        )),
        None => Err(CircuitError::parse(
            line,
            format!("expected '{expected}', found end of line"),
        )),
    };
    expect_token(keyword)?;
    let count = tokens
        .next()
        .ok_or_else(|| CircuitError::parse(line, format!("missing {keyword} count")))
        .and_then(|token| parse_usize(line, token, "wire count"))?;
    if tokens.next() != Some("<") {
        return Err(CircuitError::parse(line, format!("expected '<' after {keyword} count")));
    }

    let mut wires = Vec::with_capacity(count);
    loop {
        match tokens.next() {
            Some(">") => break,
            Some(token) => wires.push(parse_usize(line, token, "wire id")?),
            None => return Err(CircuitError::parse(line, "unterminated wire list")),
        }
    }
    if wires.len() != count {
        return Err(CircuitError::parse(
            line,
            format!(
                "{keyword} count is {count} but {} wires are listed",
                wires.len()
            ),
        ));
    }
    Ok(wires)
}

/// Parses the input file against an already loaded circuit.
///
/// The supplied value count is checked against the declared inputs before
/// any wire is looked up, so a short or long input file is always reported as
/// [`CircuitError::InputCountMismatch`].
#[tracing::instrument(skip_all, name = "CircuitReader::parse_inputs")]
pub fn parse_inputs<F: CircuitField>(
    source: impl BufRead,
    circuit: &Circuit<F>,
) -> Result<InputValues<F>, CircuitError> {
    let mut entries = Vec::new();
    for statement in statements(source) {
        let (line, content) = statement?;
        let tokens: Vec<&str> = content.split_whitespace().collect();
        let [wire, value] = tokens.as_slice() else {
            return Err(CircuitError::parse(line, "expected '<wire> <hex value>'"));
        };
        let wire = parse_usize(line, wire, "wire id")?;
        let value = F::from_hex(value).ok_or_else(|| {
            CircuitError::parse(line, format!("invalid field element '{value}'"))
        })?;
        entries.push((wire, value));
    }

    let inputs = InputValues::new(entries);
    inputs.validate(circuit)?;
    tracing::debug!(num_values = inputs.len(), "Inputs loaded");
    Ok(inputs)
}

impl<F> InputValues<F> {
    /// Checks that the values cover exactly the declared input and private
    /// input wires of `circuit`, each once.
    pub fn validate(&self, circuit: &Circuit<F>) -> Result<(), CircuitError> {
        let expected = circuit.num_supplied_inputs();
        if self.len() != expected {
            return Err(CircuitError::InputCountMismatch {
                expected,
                actual: self.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.len());
        for &(wire, _) in self.iter() {
            if !circuit.is_input(wire) {
                return Err(CircuitError::UndefinedWire { wire });
            }
            if !seen.insert(wire) {
                return Err(CircuitError::WireReassigned { wire });
            }
        }
        Ok(())
    }
}
