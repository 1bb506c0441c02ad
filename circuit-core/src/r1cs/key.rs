use super::builder::Constraint;
use super::ops::Variable;
use crate::field::CircuitField;
use crate::utils::errors::CircuitError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ordered constraints over `z = [1] ++ primary ++ auxiliary`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem<F> {
    pub constraints: Vec<Constraint<F>>,
    pub num_primary: usize,
    pub num_auxiliary: usize,
}

impl<F: CircuitField> ConstraintSystem<F> {
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of variables excluding the one-wire.
    pub fn num_variables(&self) -> usize {
        self.num_primary + self.num_auxiliary
    }

    fn variable_in_range(&self, variable: Variable) -> bool {
        match variable {
            Variable::Input(i) => i < self.num_primary,
            Variable::Auxiliary(j) => j < self.num_auxiliary,
            Variable::Constant => true,
        }
    }

    /// First `(row, variable)` referencing a variable outside the system.
    fn first_out_of_range(&self) -> Option<(usize, Variable)> {
        self.constraints.iter().enumerate().find_map(|(row, constraint)| {
            constraint
                .variables()
                .find(|&v| !self.variable_in_range(v))
                .map(|variable| (row, variable))
        })
    }

    /// Every variable referenced by every constraint is in range.
    pub fn is_valid(&self) -> bool {
        self.first_out_of_range().is_none()
    }

    /// Structural check of the system against an assignment: variable
    /// indices in range and vector lengths equal to the declared counts.
    #[tracing::instrument(skip_all, name = "ConstraintSystem::check_structure")]
    pub fn check_structure(&self, primary: &[F], auxiliary: &[F]) -> Result<(), CircuitError> {
        if primary.len() != self.num_primary {
            return Err(CircuitError::MalformedConstraintSystem(format!(
                "primary input has {} entries, expected {}",
                primary.len(),
                self.num_primary
            )));
        }
        if auxiliary.len() != self.num_auxiliary {
            return Err(CircuitError::MalformedConstraintSystem(format!(
                "auxiliary input has {} entries, expected {}",
                auxiliary.len(),
                self.num_auxiliary
            )));
        }
        match self.first_out_of_range() {
            Some((row, variable)) => Err(CircuitError::MalformedConstraintSystem(format!(
                "constraint {row} references {variable:?} outside of {} primary and {} auxiliary variables",
                self.num_primary, self.num_auxiliary
            ))),
            None => Ok(()),
        }
    }

    /// Check if the R1CS is satisfied: Az ∘ Bz = Cz
    pub fn is_satisfied(&self, primary: &[F], auxiliary: &[F]) -> bool {
        self.first_unsatisfied(primary, auxiliary).is_none()
    }

    /// Check satisfaction and return the first failing constraint index if any
    #[tracing::instrument(skip_all, name = "ConstraintSystem::check_satisfaction")]
    pub fn check_satisfaction(&self, primary: &[F], auxiliary: &[F]) -> Result<(), CircuitError> {
        match self.first_unsatisfied(primary, auxiliary) {
            None => {
                tracing::info!(
                    num_constraints = self.num_constraints(),
                    "Constraint system satisfied"
                );
                Ok(())
            }
            Some(row) => {
                let mut description = String::new();
                if self.constraints[row]
                    .pretty_fmt(&mut description, primary, auxiliary)
                    .is_ok()
                {
                    tracing::error!(row, "Unsatisfied constraint:\n{description}");
                }
                Err(CircuitError::UnsatisfiedConstraint { row })
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn first_unsatisfied(&self, primary: &[F], auxiliary: &[F]) -> Option<usize> {
        self.constraints
            .iter()
            .position(|constraint| !constraint.is_satisfied(primary, auxiliary))
    }

    #[cfg(feature = "parallel")]
    fn first_unsatisfied(&self, primary: &[F], auxiliary: &[F]) -> Option<usize> {
        self.constraints
            .par_iter()
            .position_first(|constraint| !constraint.is_satisfied(primary, auxiliary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::builder::R1CSBuilder;
    use crate::r1cs::ops::LC;
    use ark_bn254::Fr;

    fn fr(n: i64) -> Fr {
        <Fr as CircuitField>::from_i64(n)
    }

    /// x0 * x0 = w0 ; w0 * 1 = x1
    fn square_system() -> ConstraintSystem<Fr> {
        let mut builder = R1CSBuilder::new();
        builder.constrain_prod(Variable::Input(0), Variable::Input(0), Variable::Auxiliary(0));
        builder.constrain_eq(Variable::Auxiliary(0), Variable::Input(1));
        builder.into_constraint_system(2, 1)
    }

    #[test]
    fn satisfied_and_first_failure() {
        let cs = square_system();
        assert!(cs.is_satisfied(&[fr(3), fr(9)], &[fr(9)]));
        assert!(cs.check_satisfaction(&[fr(3), fr(9)], &[fr(9)]).is_ok());

        assert!(matches!(
            cs.check_satisfaction(&[fr(3), fr(9)], &[fr(8)]),
            Err(CircuitError::UnsatisfiedConstraint { row: 0 })
        ));
        assert!(matches!(
            cs.check_satisfaction(&[fr(3), fr(10)], &[fr(9)]),
            Err(CircuitError::UnsatisfiedConstraint { row: 1 })
        ));
    }

    #[test]
    fn lowest_failing_row_is_reported() {
        let mut builder = R1CSBuilder::<Fr>::new();
        for _ in 0..64 {
            builder.constrain_eq(Variable::Input(0), LC::constant(fr(1)));
        }
        builder.constrain_eq(Variable::Input(0), LC::constant(fr(2)));
        builder.constrain_eq(Variable::Input(0), LC::constant(fr(3)));
        let cs = builder.into_constraint_system(1, 0);
        assert!(matches!(
            cs.check_satisfaction(&[fr(1)], &[]),
            Err(CircuitError::UnsatisfiedConstraint { row: 64 })
        ));
    }

    #[test]
    fn structural_checks() {
        let cs = square_system();
        assert!(cs.is_valid());
        assert!(cs.check_structure(&[fr(3), fr(9)], &[fr(9)]).is_ok());
        assert!(matches!(
            cs.check_structure(&[fr(3)], &[fr(9)]),
            Err(CircuitError::MalformedConstraintSystem(_))
        ));
        assert!(matches!(
            cs.check_structure(&[fr(3), fr(9)], &[]),
            Err(CircuitError::MalformedConstraintSystem(_))
        ));

        let mut builder = R1CSBuilder::<Fr>::new();
        builder.constrain_eq(Variable::Auxiliary(4), Variable::Input(0));
        let cs = builder.into_constraint_system(1, 1);
        assert!(!cs.is_valid());
        assert!(matches!(
            cs.check_structure(&[fr(1)], &[fr(1)]),
            Err(CircuitError::MalformedConstraintSystem(_))
        ));
    }
}
