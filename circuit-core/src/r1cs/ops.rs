//! Defines the Linear Combination (LC) object and associated operations.
//! A LinearCombination is a vector of Terms, where each Term is a pair of a Variable and a field coefficient.

use std::fmt::Write as _;

use crate::field::CircuitField;

/// Index into the full assignment `z = [1] ++ primary ++ auxiliary`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    /// i-th primary (public) entry.
    Input(usize),
    /// j-th auxiliary (private) entry.
    Auxiliary(usize),
    /// The one-wire, `z[0]`.
    Constant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term<F>(pub Variable, pub F);

/// Linear Combination of terms. Terms are kept sorted by variable with no
/// duplicate variables and no zero coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LC<F>(Vec<Term<F>>);

impl<F: CircuitField> LC<F> {
    pub fn new(terms: Vec<Term<F>>) -> Self {
        let mut terms = terms;
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged: Vec<Term<F>> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if last.0 == term.0 => last.1 += term.1,
                _ => merged.push(term),
            }
        }
        merged.retain(|term| !term.1.is_zero());
        LC(merged)
    }

    pub fn zero() -> Self {
        LC(vec![])
    }

    pub fn constant(value: F) -> Self {
        LC::new(vec![Term(Variable::Constant, value)])
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.0
    }

    pub fn num_terms(&self) -> usize {
        self.0.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.0.iter().map(|term| term.0)
    }

    /// Evaluates the combination against `z = [1] ++ primary ++ auxiliary`.
    ///
    /// Panics if a variable is out of range of the supplied vectors; callers
    /// that cannot rule this out run the structural check first.
    pub fn evaluate(&self, primary: &[F], auxiliary: &[F]) -> F {
        let mut result = F::zero();
        for term in self.terms() {
            let value = match term.0 {
                Variable::Input(i) => primary[i],
                Variable::Auxiliary(j) => auxiliary[j],
                Variable::Constant => F::one(),
            };
            result += value * term.1;
        }
        result
    }

    pub fn pretty_fmt(&self, f: &mut String) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        for (index, term) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " + ")?;
            }
            match term.0 {
                Variable::Input(i) => write!(f, "{}*x{}", term.1, i)?,
                Variable::Auxiliary(j) => write!(f, "{}*w{}", term.1, j)?,
                Variable::Constant => write!(f, "{}", term.1)?,
            }
        }
        Ok(())
    }
}

// Arithmetic for LC

impl<F: CircuitField, T: Into<LC<F>>> std::ops::Add<T> for LC<F> {
    type Output = Self;

    fn add(self, other: T) -> Self::Output {
        let mut combined_terms = self.0;
        combined_terms.extend(other.into().0);
        LC::new(combined_terms)
    }
}

impl<F: CircuitField> std::ops::Neg for LC<F> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        LC(self.0.into_iter().map(|term| -term).collect())
    }
}

impl<F: CircuitField, T: Into<LC<F>>> std::ops::Sub<T> for LC<F> {
    type Output = Self;

    fn sub(self, other: T) -> Self::Output {
        let other: LC<F> = other.into();
        self + (-other)
    }
}

impl<F: CircuitField> std::ops::Mul<F> for LC<F> {
    type Output = Self;

    fn mul(self, scalar: F) -> Self::Output {
        LC::new(
            self.0
                .into_iter()
                .map(|term| Term(term.0, term.1 * scalar))
                .collect(),
        )
    }
}

impl<F: CircuitField> std::iter::Sum for LC<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        LC::new(iter.flat_map(|lc| lc.0).collect())
    }
}

// Arithmetic for Term<F>

impl<F: CircuitField, T: Into<LC<F>>> std::ops::Add<T> for Term<F> {
    type Output = LC<F>;

    fn add(self, other: T) -> Self::Output {
        LC::from(self) + other
    }
}

impl<F: CircuitField, T: Into<LC<F>>> std::ops::Sub<T> for Term<F> {
    type Output = LC<F>;

    fn sub(self, other: T) -> Self::Output {
        LC::from(self) - other
    }
}

impl<F: CircuitField> std::ops::Neg for Term<F> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Term(self.0, -self.1)
    }
}

impl<F: CircuitField> From<Variable> for Term<F> {
    fn from(val: Variable) -> Self {
        Term(val, F::one())
    }
}

impl<F: CircuitField> From<(Variable, F)> for Term<F> {
    fn from(val: (Variable, F)) -> Self {
        Term(val.0, val.1)
    }
}

// Into<LC<F>>

impl<F: CircuitField> From<Variable> for LC<F> {
    fn from(val: Variable) -> Self {
        LC::new(vec![Term(val, F::one())])
    }
}

impl<F: CircuitField> From<Term<F>> for LC<F> {
    fn from(val: Term<F>) -> Self {
        LC::new(vec![val])
    }
}

impl<F: CircuitField> From<Vec<Term<F>>> for LC<F> {
    fn from(val: Vec<Term<F>>) -> Self {
        LC::new(val)
    }
}
