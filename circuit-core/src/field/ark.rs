use ark_ff::{BigInteger, PrimeField};
use common::config::Curve;
use num_bigint::BigUint;

use super::{CircuitField, FieldOps};

macro_rules! impl_circuit_field {
    ($field:ty, $curve:expr) => {
        impl FieldOps for $field {}
        impl FieldOps<&$field, $field> for $field {}

        impl CircuitField for $field {
            const CURVE: Curve = $curve;

            #[inline]
            fn from_u64(n: u64) -> Self {
                <$field>::from(n)
            }

            fn from_i64(val: i64) -> Self {
                if val.is_negative() {
                    -<Self as CircuitField>::from_u64(val.unsigned_abs())
                } else {
                    <Self as CircuitField>::from_u64(val as u64)
                }
            }

            fn from_hex(hex: &str) -> Option<Self> {
                if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                let value = BigUint::parse_bytes(hex.as_bytes(), 16)?;
                let modulus = BigUint::from(<$field as PrimeField>::MODULUS);
                if value >= modulus {
                    return None;
                }
                Some(<$field as From<BigUint>>::from(value))
            }

            fn inverse(&self) -> Option<Self> {
                <Self as ark_ff::Field>::inverse(self)
            }

            fn bits_le(&self) -> Vec<bool> {
                self.into_bigint().to_bits_le()
            }

            fn num_bits(&self) -> u32 {
                self.into_bigint().num_bits()
            }
        }
    };
}

impl_circuit_field!(ark_bn254::Fr, Curve::Bn254);
impl_circuit_field!(ark_bls12_381::Fr, Curve::Bls12_381);

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::{One, Zero};

    #[test]
    fn curves() {
        assert_eq!(<ark_bn254::Fr as CircuitField>::CURVE, Curve::Bn254);
        assert_eq!(<ark_bls12_381::Fr as CircuitField>::CURVE, Curve::Bls12_381);
    }

    #[test]
    fn bls_negative_one() {
        type F = ark_bls12_381::Fr;
        let minus_one = <F as CircuitField>::from_i64(-1);
        assert!((minus_one + F::one()).is_zero());
        // BLS12-381 scalar field modulus minus one.
        let hex = "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000000";
        assert_eq!(F::from_hex(hex), Some(minus_one));
    }
}
