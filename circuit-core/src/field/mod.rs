use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use ark_std::{One, Zero};
use common::config::Curve;

pub mod ark;

pub trait FieldOps<Rhs = Self, Output = Self>:
    Add<Rhs, Output = Output> + Sub<Rhs, Output = Output> + Mul<Rhs, Output = Output>
{
}

/// Prime field every wire value and constraint coefficient lives in.
pub trait CircuitField:
    'static
    + Sized
    + Zero
    + One
    + Neg<Output = Self>
    + FieldOps<Self, Self>
    + for<'a> FieldOps<&'a Self, Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + core::iter::Sum<Self>
    + for<'a> core::iter::Sum<&'a Self>
    + Clone
    + Copy
    + Default
    + Debug
    + Display
    + Eq
    + Hash
    + Send
    + Sync
{
    /// Curve whose scalar field this is. Proof systems are only compatible with
    /// fields of their own curve.
    const CURVE: Curve;

    fn from_u64(n: u64) -> Self;
    fn from_i64(val: i64) -> Self;
    /// Parses a hexadecimal literal (no `0x` prefix). Returns `None` for
    /// malformed digits and for values that are not canonical, i.e. `>= p`.
    fn from_hex(hex: &str) -> Option<Self>;
    fn inverse(&self) -> Option<Self>;
    /// Little-endian bits of the canonical representative.
    fn bits_le(&self) -> Vec<bool>;
    fn num_bits(&self) -> u32;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    use ark_bn254::Fr;

    #[test]
    fn implicit_montgomery_conversion() {
        let a = <Fr as CircuitField>::from_u64(7);
        let b = <Fr as CircuitField>::from_u64(9);
        assert_eq!(a * b, <Fr as CircuitField>::from_u64(63));
    }

    #[test]
    fn from_i64_wraps_negatives() {
        let minus_one = <Fr as CircuitField>::from_i64(-1);
        assert_eq!(minus_one + Fr::one(), Fr::zero());
        assert_eq!(minus_one, -Fr::one());
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Fr::from_hex("ff"), Some(<Fr as CircuitField>::from_u64(255)));
        assert_eq!(Fr::from_hex("0"), Some(Fr::zero()));
        assert_eq!(Fr::from_hex("1F"), Some(<Fr as CircuitField>::from_u64(31)));
        assert_eq!(Fr::from_hex(""), None);
        assert_eq!(Fr::from_hex("xyz"), None);
        // BN254 scalar field modulus itself is not canonical.
        let modulus = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";
        assert_eq!(Fr::from_hex(modulus), None);
        let modulus_minus_one = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000000";
        assert_eq!(Fr::from_hex(modulus_minus_one), Some(-Fr::one()));
    }

    #[test]
    fn bit_decomposition() {
        let x = <Fr as CircuitField>::from_u64(0b1011);
        let bits = x.bits_le();
        assert_eq!(&bits[..5], &[true, true, false, true, false]);
        assert_eq!(x.num_bits(), 4);
        assert_eq!(Fr::zero().num_bits(), 0);
    }

    #[test]
    fn inverse_of_zero_is_none() {
        assert_eq!(CircuitField::inverse(&Fr::zero()), None);
        let three = <Fr as CircuitField>::from_u64(3);
        let inv = CircuitField::inverse(&three).unwrap();
        assert_eq!(inv * three, Fr::one());
    }
}
