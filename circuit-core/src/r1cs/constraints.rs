use super::{
    builder::R1CSBuilder,
    inputs::VariableLayout,
    key::ConstraintSystem,
    ops::{Term, Variable, LC},
};
use crate::circuit::{Circuit, Gate, GateKind};
use crate::field::CircuitField;
use crate::utils::errors::CircuitError;

impl<F: CircuitField> Gate<F> {
    /// Appends the constraints that pin this gate's outputs to its inputs.
    /// The gate's arity must already be checked.
    pub(crate) fn emit_constraints(
        &self,
        layout: &VariableLayout,
        cs: &mut R1CSBuilder<F>,
    ) -> Result<(), CircuitError> {
        let ins = self
            .inputs
            .iter()
            .map(|&wire| layout.variable(wire))
            .collect::<Result<Vec<Variable>, _>>()?;
        let outs = self
            .outputs
            .iter()
            .map(|&wire| layout.variable(wire))
            .collect::<Result<Vec<Variable>, _>>()?;
        let one = Variable::Constant;

        match &self.kind {
            GateKind::Add => {
                let sum: LC<F> = ins.iter().map(|&v| LC::<F>::from(v)).sum();
                cs.constrain_eq(sum, outs[0]);
            }
            GateKind::Mul => cs.constrain_prod(ins[0], ins[1], outs[0]),
            GateKind::ConstMul(k) => cs.constrain_eq(Term(ins[0], *k), outs[0]),
            GateKind::Xor => {
                // 2a * b == a + b - out
                let two = F::from_u64(2);
                cs.constrain_prod(
                    Term(ins[0], two),
                    ins[1],
                    LC::<F>::from(ins[0]) + ins[1] - outs[0],
                );
            }
            GateKind::Or => {
                // a * b == a + b - out
                cs.constrain_prod(ins[0], ins[1], LC::<F>::from(ins[0]) + ins[1] - outs[0]);
            }
            GateKind::Assert => cs.constrain_prod(ins[0], ins[1], outs[0]),
            GateKind::ZeroP => {
                let (m, y) = (outs[0], outs[1]);
                // a * m == y
                cs.constrain_prod(ins[0], m, y);
                // a * (1 - y) == 0
                cs.constrain_prod(ins[0], LC::<F>::from(one) - y, LC::zero());
            }
            GateKind::Split => {
                for &bit in &outs {
                    cs.constrain_binary(bit);
                }
                cs.constrain_pack_le(&outs, ins[0]);
            }
            GateKind::Pack => cs.constrain_pack_le(&ins, outs[0]),
        }
        Ok(())
    }
}

/// Emits the constraints of every gate in order.
#[tracing::instrument(skip_all, name = "ConstraintEmitter::emit_circuit")]
pub fn emit_circuit<F: CircuitField>(
    circuit: &Circuit<F>,
    layout: &VariableLayout,
) -> Result<ConstraintSystem<F>, CircuitError> {
    let mut builder = R1CSBuilder::new();
    for (index, gate) in circuit.gates.iter().enumerate() {
        gate.check_arity()
            .map_err(|message| CircuitError::malformed_gate(index, message))?;
        let before = builder.num_constraints();
        gate.emit_constraints(layout, &mut builder)?;
        tracing::debug!(
            gate = index,
            kind = gate.kind.name(),
            num_constraints = builder.num_constraints() - before,
            "emitted"
        );
    }
    tracing::info!(
        num_gates = circuit.gates.len(),
        num_constraints = builder.num_constraints(),
        num_primary = layout.num_primary(),
        num_auxiliary = layout.num_auxiliary(),
        "Constraint system built"
    );
    Ok(builder.into_constraint_system(layout.num_primary(), layout.num_auxiliary()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::evaluator::evaluate;
    use crate::circuit::reader::load;
    use crate::r1cs::inputs::split_assignment;
    use ark_bn254::Fr;

    struct Emitted {
        cs: ConstraintSystem<Fr>,
        layout: VariableLayout,
        primary: Vec<Fr>,
        auxiliary: Vec<Fr>,
    }

    impl Emitted {
        fn build(circuit: &str, inputs: &str) -> Self {
            let (circuit, inputs) = load::<Fr>(circuit.as_bytes(), inputs.as_bytes()).unwrap();
            let table = evaluate(&circuit, &inputs).unwrap();
            let layout = VariableLayout::new(&circuit).unwrap();
            let cs = emit_circuit(&circuit, &layout).unwrap();
            let full = layout.full_assignment(&table).unwrap();
            let (primary, auxiliary) =
                split_assignment(&full, layout.num_inputs(), layout.num_outputs()).unwrap();
            Self {
                cs,
                layout,
                primary,
                auxiliary,
            }
        }

        fn is_satisfied(&self) -> bool {
            self.cs.is_satisfied(&self.primary, &self.auxiliary)
        }

        /// Overwrites the value of `wire` in the assignment.
        fn set(&mut self, wire: usize, value: Fr) {
            match self.layout.variable(wire).unwrap() {
                Variable::Input(i) => self.primary[i] = value,
                Variable::Auxiliary(j) => self.auxiliary[j] = value,
                Variable::Constant => unreachable!(),
            }
        }

        fn get(&self, wire: usize) -> Fr {
            match self.layout.variable(wire).unwrap() {
                Variable::Input(i) => self.primary[i],
                Variable::Auxiliary(j) => self.auxiliary[j],
                Variable::Constant => unreachable!(),
            }
        }

        /// The honest assignment satisfies the system and bumping `wire` by
        /// one breaks it.
        fn assert_sound_at(mut self, wire: usize) {
            assert!(self.is_satisfied());
            let value = self.get(wire);
            self.set(wire, value + Fr::from(1u64));
            assert!(!self.is_satisfied(), "wire {wire} is unconstrained");
        }
    }

    #[test]
    fn add_gate() {
        let e = Emitted::build(
            "total 4\ninput 0\ninput 1\ninput 2\nadd in 3 <0 1 2> out 1 <3>\noutput 3\n",
            "0 1\n1 2\n2 3\n",
        );
        assert_eq!(e.cs.num_constraints(), 1);
        assert_eq!(e.get(3), Fr::from(6u64));
        e.assert_sound_at(3);
    }

    #[test]
    fn mul_gate() {
        let e = Emitted::build(
            "total 3\ninput 0\ninput 1\nmul in 2 <0 1> out 1 <2>\noutput 2\n",
            "0 4\n1 5\n",
        );
        assert_eq!(e.cs.num_constraints(), 1);
        e.assert_sound_at(2);
    }

    #[test]
    fn const_mul_gates() {
        let src = "total 3\ninput 0\nconst-mul-ff in 1 <0> out 1 <1>\nconst-mul-neg-1 in 1 <1> out 1 <2>\noutput 2\n";
        let e = Emitted::build(src, "0 2\n");
        assert_eq!(e.get(2), -Fr::from(510u64));
        assert_eq!(e.cs.num_constraints(), 2);
        e.assert_sound_at(2);
        Emitted::build(src, "0 2\n").assert_sound_at(1);
    }

    #[test]
    fn xor_and_or_gates() {
        for (a, b) in [(0u64, 0u64), (0, 1), (1, 0), (1, 1)] {
            let inputs = format!("0 {a}\n1 {b}\n");
            Emitted::build(
                "total 3\ninput 0\ninput 1\nxor in 2 <0 1> out 1 <2>\noutput 2\n",
                &inputs,
            )
            .assert_sound_at(2);
            Emitted::build(
                "total 3\ninput 0\ninput 1\nor in 2 <0 1> out 1 <2>\noutput 2\n",
                &inputs,
            )
            .assert_sound_at(2);
        }
    }

    #[test]
    fn assert_gate() {
        let src = "total 4\ninput 0\ninput 1\nmul in 2 <0 1> out 1 <2>\nassert in 2 <0 1> out 1 <2>\noutput 2\n";
        let e = Emitted::build(src, "0 6\n1 7\n");
        assert_eq!(e.cs.num_constraints(), 2);
        assert!(e.is_satisfied());

        // Asserting a product that does not hold is caught by the checker.
        let src = "total 4\ninput 0\ninput 1\nadd in 2 <0 1> out 1 <2>\nassert in 2 <0 1> out 1 <2>\noutput 2\n";
        let e = Emitted::build(src, "0 6\n1 7\n");
        assert!(matches!(
            e.cs.check_satisfaction(&e.primary, &e.auxiliary),
            Err(CircuitError::UnsatisfiedConstraint { row: 1 })
        ));
    }

    #[test]
    fn zerop_gate() {
        let src = "total 3\ninput 0\nzerop in 1 <0> out 2 <1 2>\noutput 2\n";
        for value in ["0", "9"] {
            let e = Emitted::build(src, &format!("0 {value}\n"));
            assert_eq!(e.cs.num_constraints(), 2);
            e.assert_sound_at(2);
        }
        // The inverse witness is only pinned when the input is non-zero.
        Emitted::build(src, "0 9\n").assert_sound_at(1);
    }

    #[test]
    fn split_gate() {
        let src = "total 5\ninput 0\nsplit in 1 <0> out 3 <1 2 3>\noutput 1\noutput 2\noutput 3\n";
        let e = Emitted::build(src, "0 5\n");
        // one booleanity constraint per bit plus the reconstruction
        assert_eq!(e.cs.num_constraints(), 4);
        for wire in 1..=3 {
            Emitted::build(src, "0 5\n").assert_sound_at(wire);
        }
        assert!(e.is_satisfied());

        // A value wider than the declared bits cannot be reconstructed.
        let e = Emitted::build(src, "0 d\n");
        assert!(matches!(
            e.cs.check_satisfaction(&e.primary, &e.auxiliary),
            Err(CircuitError::UnsatisfiedConstraint { row: 3 })
        ));
    }

    #[test]
    fn split_rejects_non_boolean_bits() {
        let src = "total 4\ninput 0\nsplit in 1 <0> out 2 <1 2>\noutput 1\noutput 2\n";
        let mut e = Emitted::build(src, "0 2\n");
        // bits (2, 0) reconstruct 2 but are not boolean
        e.set(1, Fr::from(2u64));
        e.set(2, Fr::from(0u64));
        assert!(!e.is_satisfied());
    }

    #[test]
    fn pack_gate() {
        let e = Emitted::build(
            "total 4\ninput 0\ninput 1\ninput 2\npack in 3 <0 1 2> out 1 <3>\noutput 3\n",
            "0 1\n1 1\n2 1\n",
        );
        assert_eq!(e.get(3), Fr::from(7u64));
        e.assert_sound_at(3);
    }

    #[test]
    fn wrong_arity_is_rejected_before_emitting() {
        let (mut circuit, _) = load::<Fr>(
            "total 3\ninput 0\nmul in 2 <0 0> out 1 <1>\noutput 1\n".as_bytes(),
            "0 2\n".as_bytes(),
        )
        .unwrap();
        let layout = VariableLayout::new(&circuit).unwrap();
        circuit.gates.push(Gate::new(GateKind::Or, vec![0], vec![1]));
        assert!(matches!(
            emit_circuit(&circuit, &layout),
            Err(CircuitError::MalformedGate { gate: 1, .. })
        ));
    }
}
