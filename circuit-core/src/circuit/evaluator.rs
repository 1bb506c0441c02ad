use super::wires::WireTable;
use super::{Circuit, Gate, GateKind, InputValues};
use crate::field::CircuitField;
use crate::utils::errors::CircuitError;

/// Runs every gate of `circuit` in order and returns the populated wire table.
///
/// Gates only ever read wires that already hold a value; the loader orders
/// gates so that this holds, and a violation is reported as
/// [`CircuitError::EvaluationOrderViolation`] rather than silently reading
/// zero.
#[tracing::instrument(skip_all, name = "Evaluator::evaluate")]
pub fn evaluate<F: CircuitField>(
    circuit: &Circuit<F>,
    inputs: &InputValues<F>,
) -> Result<WireTable<F>, CircuitError> {
    let mut table = WireTable::new(circuit.num_wires)?;
    for &(wire, value) in inputs.iter() {
        table.assign(wire, value)?;
    }
    for (index, gate) in circuit.gates.iter().enumerate() {
        evaluate_gate(index, gate, &mut table)?;
    }
    tracing::info!(
        num_gates = circuit.gates.len(),
        num_assigned = table.num_assigned(),
        "Circuit evaluated"
    );
    Ok(table)
}

fn evaluate_gate<F: CircuitField>(
    index: usize,
    gate: &Gate<F>,
    table: &mut WireTable<F>,
) -> Result<(), CircuitError> {
    gate.check_arity()
        .map_err(|message| CircuitError::malformed_gate(index, message))?;
    let inputs = gate
        .inputs
        .iter()
        .map(|&wire| table.read(index, wire))
        .collect::<Result<Vec<F>, _>>()?;

    match &gate.kind {
        GateKind::Add => table.assign(gate.outputs[0], inputs.iter().sum()),
        GateKind::Mul => table.assign(gate.outputs[0], inputs[0] * inputs[1]),
        GateKind::ConstMul(k) => table.assign(gate.outputs[0], *k * inputs[0]),
        GateKind::Xor => {
            let (a, b) = (inputs[0], inputs[1]);
            let ab = a * b;
            table.assign(gate.outputs[0], a + b - ab - ab)
        }
        GateKind::Or => {
            let (a, b) = (inputs[0], inputs[1]);
            table.assign(gate.outputs[0], a + b - a * b)
        }
        GateKind::Assert => {
            let c = table.read(index, gate.outputs[0])?;
            if inputs[0] * inputs[1] != c {
                tracing::warn!(gate = index, "assertion does not hold on this assignment");
            }
            Ok(())
        }
        GateKind::ZeroP => {
            let a = inputs[0];
            let (m, y) = match CircuitField::inverse(&a) {
                Some(inv) => (inv, F::one()),
                None => (F::zero(), F::zero()),
            };
            table.assign(gate.outputs[0], m)?;
            table.assign(gate.outputs[1], y)
        }
        GateKind::Split => {
            let a = inputs[0];
            let width = gate.outputs.len();
            if a.num_bits() as usize > width {
                tracing::warn!(
                    gate = index,
                    width,
                    num_bits = a.num_bits(),
                    "split input wider than its outputs, high bits are dropped"
                );
            }
            let bits = a.bits_le();
            for (i, &wire) in gate.outputs.iter().enumerate() {
                let bit = bits.get(i).copied().unwrap_or(false);
                table.assign(wire, if bit { F::one() } else { F::zero() })?;
            }
            Ok(())
        }
        GateKind::Pack => {
            let mut packed = F::zero();
            let mut weight = F::one();
            for bit in &inputs {
                packed += *bit * weight;
                weight = weight + weight;
            }
            table.assign(gate.outputs[0], packed)
        }
    }?;

    tracing::debug!(gate = index, kind = gate.kind.name(), "evaluated");
    Ok(())
}
