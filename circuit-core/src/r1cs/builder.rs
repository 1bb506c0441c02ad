use std::fmt::Write as _;

use super::{
    key::ConstraintSystem,
    ops::{Term, Variable, LC},
};
use crate::field::CircuitField;

/// A single row `(A·z) * (B·z) = C·z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint<F> {
    pub a: LC<F>,
    pub b: LC<F>,
    pub c: LC<F>,
}

impl<F: CircuitField> Constraint<F> {
    /// Returns `(A·z, B·z, C·z)`.
    pub fn evaluate(&self, primary: &[F], auxiliary: &[F]) -> (F, F, F) {
        (
            self.a.evaluate(primary, auxiliary),
            self.b.evaluate(primary, auxiliary),
            self.c.evaluate(primary, auxiliary),
        )
    }

    pub fn is_satisfied(&self, primary: &[F], auxiliary: &[F]) -> bool {
        let (az, bz, cz) = self.evaluate(primary, auxiliary);
        az * bz == cz
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.a
            .variables()
            .chain(self.b.variables())
            .chain(self.c.variables())
    }

    /// Formats the constraint followed by the value of every variable it
    /// touches.
    pub fn pretty_fmt(&self, f: &mut String, primary: &[F], auxiliary: &[F]) -> std::fmt::Result {
        write!(f, "(")?;
        self.a.pretty_fmt(f)?;
        write!(f, ") ⋅ (")?;
        self.b.pretty_fmt(f)?;
        write!(f, ") == ")?;
        self.c.pretty_fmt(f)?;
        writeln!(f)?;

        let mut variables: Vec<Variable> = self.variables().collect();
        variables.sort();
        variables.dedup();
        for variable in variables {
            match variable {
                Variable::Input(i) => match primary.get(i) {
                    Some(value) => writeln!(f, "    x{i} = {value}")?,
                    None => writeln!(f, "    x{i} = <out of range>")?,
                },
                Variable::Auxiliary(j) => match auxiliary.get(j) {
                    Some(value) => writeln!(f, "    w{j} = {value}")?,
                    None => writeln!(f, "    w{j} = <out of range>")?,
                },
                Variable::Constant => {}
            }
        }
        Ok(())
    }
}

/// Append-only list of constraints.
#[derive(Clone, Debug, Default)]
pub struct R1CSBuilder<F> {
    pub(crate) constraints: Vec<Constraint<F>>,
}

impl<F: CircuitField> R1CSBuilder<F> {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Constrain left == right, as `left * 1 == right`.
    pub fn constrain_eq(&mut self, left: impl Into<LC<F>>, right: impl Into<LC<F>>) {
        self.constraints.push(Constraint {
            a: left.into(),
            b: Variable::Constant.into(),
            c: right.into(),
        });
    }

    pub fn constrain_binary(&mut self, value: impl Into<LC<F>>) {
        let one: LC<F> = Variable::Constant.into();
        let a: LC<F> = value.into();
        let b = one - a.clone();
        // value * (1 - value) == 0
        self.constraints.push(Constraint {
            a,
            b,
            c: LC::zero(),
        });
    }

    /// Constrain x * y == z
    pub fn constrain_prod(
        &mut self,
        x: impl Into<LC<F>>,
        y: impl Into<LC<F>>,
        z: impl Into<LC<F>>,
    ) {
        self.constraints.push(Constraint {
            a: x.into(),
            b: y.into(),
            c: z.into(),
        });
    }

    /// `unpacked[0] + 2 * unpacked[1] + 4 * unpacked[2] + ...`
    pub fn pack_le(unpacked: &[Variable]) -> LC<F> {
        let mut weight = F::one();
        let mut packed = Vec::with_capacity(unpacked.len());
        for &variable in unpacked {
            packed.push(Term(variable, weight));
            weight = weight + weight;
        }
        packed.into()
    }

    pub fn constrain_pack_le(&mut self, unpacked: &[Variable], result: impl Into<LC<F>>) {
        self.constrain_eq(Self::pack_le(unpacked), result);
    }

    pub fn get_constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn into_constraint_system(
        self,
        num_primary: usize,
        num_auxiliary: usize,
    ) -> ConstraintSystem<F> {
        ConstraintSystem {
            constraints: self.constraints,
            num_primary,
            num_auxiliary,
        }
    }
}
