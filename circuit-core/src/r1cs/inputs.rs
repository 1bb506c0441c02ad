//! Maps circuit wires onto R1CS variables and splits an evaluated wire table
//! into the primary and auxiliary inputs of a constraint system.

use super::key::ConstraintSystem;
use super::ops::Variable;
use crate::circuit::wires::WireTable;
use crate::circuit::Circuit;
use crate::field::CircuitField;
use crate::utils::alloc::try_allocate_vec;
use crate::utils::errors::CircuitError;

/// Wire id → variable map shared by the constraint emitter and the
/// assignment splitter.
///
/// Primary variables are the public input wires in declaration order followed
/// by the output wires in declaration order. Every other assigned wire,
/// private inputs included, is auxiliary in ascending wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableLayout {
    variables: Vec<Option<Variable>>,
    /// Wire behind each variable: primary first, then auxiliary.
    wires: Vec<usize>,
    num_inputs: usize,
    num_outputs: usize,
}

impl VariableLayout {
    pub fn new<F>(circuit: &Circuit<F>) -> Result<Self, CircuitError> {
        let num_wires = circuit.num_wires;
        let mut variables: Vec<Option<Variable>> = try_allocate_vec(num_wires, None)
            .map_err(|_| CircuitError::WireAllocation { num_wires })?;
        let mut wires = Vec::new();

        for (i, &wire) in circuit
            .inputs
            .iter()
            .chain(circuit.outputs.iter())
            .enumerate()
        {
            *variable_slot(&mut variables, wire)? = Some(Variable::Input(i));
            wires.push(wire);
        }

        let mut num_auxiliary = 0;
        for wire in circuit.assigned_wires() {
            let entry = variable_slot(&mut variables, wire)?;
            if entry.is_none() {
                *entry = Some(Variable::Auxiliary(num_auxiliary));
                wires.push(wire);
                num_auxiliary += 1;
            }
        }

        Ok(Self {
            variables,
            wires,
            num_inputs: circuit.num_inputs(),
            num_outputs: circuit.num_outputs(),
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn num_primary(&self) -> usize {
        self.num_inputs + self.num_outputs
    }

    pub fn num_auxiliary(&self) -> usize {
        self.wires.len() - self.num_primary()
    }

    pub fn variable(&self, wire: usize) -> Result<Variable, CircuitError> {
        self.variables
            .get(wire)
            .copied()
            .flatten()
            .ok_or(CircuitError::UndefinedWire { wire })
    }

    /// The assignment in variable order (primary then auxiliary), without
    /// the leading one-wire.
    pub fn full_assignment<F: CircuitField>(
        &self,
        table: &WireTable<F>,
    ) -> Result<Vec<F>, CircuitError> {
        self.wires
            .iter()
            .map(|&wire| table.get(wire).ok_or(CircuitError::UndefinedWire { wire }))
            .collect()
    }
}

fn variable_slot(
    variables: &mut [Option<Variable>],
    wire: usize,
) -> Result<&mut Option<Variable>, CircuitError> {
    variables
        .get_mut(wire)
        .ok_or(CircuitError::UndefinedWire { wire })
}

/// Splits an assignment into `(primary, auxiliary)`. The first
/// `num_inputs + num_outputs` entries are primary.
pub fn split_assignment<F: Clone>(
    full: &[F],
    num_inputs: usize,
    num_outputs: usize,
) -> Result<(Vec<F>, Vec<F>), CircuitError> {
    let declared = num_inputs + num_outputs;
    if declared > full.len() {
        return Err(CircuitError::SplitOutOfRange {
            declared,
            assigned: full.len(),
        });
    }
    let (primary, auxiliary) = full.split_at(declared);
    Ok((primary.to_vec(), auxiliary.to_vec()))
}

/// A constraint system together with a (claimed) satisfying assignment, the
/// hand-off value to a proof backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1CSExample<F> {
    pub constraint_system: ConstraintSystem<F>,
    pub primary_input: Vec<F>,
    pub auxiliary_input: Vec<F>,
}

impl<F: CircuitField> R1CSExample<F> {
    pub fn new(
        constraint_system: ConstraintSystem<F>,
        primary_input: Vec<F>,
        auxiliary_input: Vec<F>,
    ) -> Self {
        Self {
            constraint_system,
            primary_input,
            auxiliary_input,
        }
    }

    pub fn check_structure(&self) -> Result<(), CircuitError> {
        self.constraint_system
            .check_structure(&self.primary_input, &self.auxiliary_input)
    }

    pub fn is_satisfied(&self) -> bool {
        self.constraint_system
            .is_satisfied(&self.primary_input, &self.auxiliary_input)
    }

    pub fn check_satisfaction(&self) -> Result<(), CircuitError> {
        self.constraint_system
            .check_satisfaction(&self.primary_input, &self.auxiliary_input)
    }

    /// `z = [1] ++ primary ++ auxiliary`
    pub fn full_assignment(&self) -> Vec<F> {
        std::iter::once(F::one())
            .chain(self.primary_input.iter().copied())
            .chain(self.auxiliary_input.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Gate, GateKind};
    use ark_bn254::Fr;

    fn fr(n: u64) -> Fr {
        Fr::from(n)
    }

    fn circuit() -> Circuit<Fr> {
        // in: 0, 4 ; nizk: 2 ; out: 5, 1
        Circuit {
            num_wires: 7,
            inputs: vec![4, 0],
            nizk_inputs: vec![2],
            outputs: vec![5, 1],
            gates: vec![
                Gate::new(GateKind::Mul, vec![0, 4], vec![3]),
                Gate::new(GateKind::Add, vec![3, 2], vec![5]),
                Gate::new(GateKind::Add, vec![5], vec![1]),
            ],
        }
    }

    #[test]
    fn layout_orders_primary_then_auxiliary() {
        let layout = VariableLayout::new(&circuit()).unwrap();
        assert_eq!(layout.num_primary(), 4);
        assert_eq!(layout.num_auxiliary(), 2);
        assert_eq!(layout.variable(4).unwrap(), Variable::Input(0));
        assert_eq!(layout.variable(0).unwrap(), Variable::Input(1));
        assert_eq!(layout.variable(5).unwrap(), Variable::Input(2));
        assert_eq!(layout.variable(1).unwrap(), Variable::Input(3));
        assert_eq!(layout.variable(2).unwrap(), Variable::Auxiliary(0));
        assert_eq!(layout.variable(3).unwrap(), Variable::Auxiliary(1));
        assert!(matches!(
            layout.variable(6),
            Err(CircuitError::UndefinedWire { wire: 6 })
        ));
        assert!(matches!(
            layout.variable(60),
            Err(CircuitError::UndefinedWire { wire: 60 })
        ));
    }

    #[test]
    fn layout_rejects_wires_beyond_total() {
        let mut c = circuit();
        c.outputs.push(9);
        assert!(matches!(
            VariableLayout::new(&c),
            Err(CircuitError::UndefinedWire { wire: 9 })
        ));
    }

    #[test]
    fn assignment_follows_layout() {
        let c = circuit();
        let layout = VariableLayout::new(&c).unwrap();
        let mut table = WireTable::new(c.num_wires).unwrap();
        for wire in c.assigned_wires() {
            table.assign(wire, fr(10 + wire as u64)).unwrap();
        }
        let full = layout.full_assignment(&table).unwrap();
        assert_eq!(full, vec![fr(14), fr(10), fr(15), fr(11), fr(12), fr(13)]);

        let (primary, auxiliary) =
            split_assignment(&full, layout.num_inputs(), layout.num_outputs()).unwrap();
        assert_eq!(primary, vec![fr(14), fr(10), fr(15), fr(11)]);
        assert_eq!(auxiliary, vec![fr(12), fr(13)]);
    }

    #[test]
    fn unassigned_wire_in_layout() {
        let c = circuit();
        let layout = VariableLayout::new(&c).unwrap();
        let table = WireTable::<Fr>::new(c.num_wires).unwrap();
        assert!(matches!(
            layout.full_assignment(&table),
            Err(CircuitError::UndefinedWire { wire: 4 })
        ));
    }

    #[test]
    fn split_out_of_range() {
        let full = vec![fr(1), fr(2)];
        assert!(matches!(
            split_assignment(&full, 2, 1),
            Err(CircuitError::SplitOutOfRange {
                declared: 3,
                assigned: 2
            })
        ));
        let (primary, auxiliary) = split_assignment(&full, 1, 1).unwrap();
        assert_eq!(primary.len(), 2);
        assert!(auxiliary.is_empty());
    }
}
