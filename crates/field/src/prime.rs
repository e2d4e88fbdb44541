// Copyright 2025 Irreducible Inc.

use std::fmt::{Debug, Display};

use rand::RngCore;

use crate::error::Error;

/// Arithmetic context for the prime field Z/p with a runtime modulus.
///
/// An instance of an implementing type *is* the context: every operation takes
/// `&self`, elements are plain data carrying no modulus of their own, and a
/// value produced under one context must never be fed to another. There is no
/// global or thread-local modulus state anywhere in this workspace.
///
/// The trait is implemented exactly three times, once per numeric regime:
///
/// * [`WordPrimeField`](crate::WordPrimeField) for primes fitting a machine
///   word,
/// * [`BigPrimeField`](crate::BigPrimeField) for arbitrary-precision primes,
/// * [`BinaryPrimeField`](crate::BinaryPrimeField) for characteristic 2.
///
/// Downstream code is generic over this trait (and over [`PolyRing`], which
/// extends it with polynomial algorithms), selecting the regime once at field
/// construction time.
///
/// [`PolyRing`]: crate::PolyRing
pub trait PrimeField: Clone + Eq + Debug + Send + Sync + 'static {
	/// Element representation. Not `Copy`: the big backend stores heap
	/// integers, so generic code clones explicitly.
	type Elem: Clone + Eq + Debug + Display + Send + Sync + 'static;
	/// Native integer type of the characteristic.
	type Char: Clone + Eq + Debug + Display + Send + Sync + 'static;

	/// The characteristic p.
	fn characteristic(&self) -> Self::Char;

	/// The characteristic if it fits in a machine word.
	fn characteristic_word(&self) -> Option<u64>;

	/// Little-endian 64-bit limbs of the characteristic, for use as an
	/// exponent.
	fn characteristic_limbs(&self) -> Vec<u64>;

	/// The characteristic reduced mod `n`.
	fn characteristic_mod(&self, n: u64) -> u64;

	/// Whether the characteristic passes a primality test. The binary backend
	/// answers without testing anything.
	fn characteristic_is_prime(&self) -> bool;

	fn zero(&self) -> Self::Elem;

	fn one(&self) -> Self::Elem;

	fn is_zero(&self, a: &Self::Elem) -> bool;

	/// Canonical image of a signed integer.
	fn from_i64(&self, val: i64) -> Self::Elem;

	fn add(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

	fn sub(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

	fn neg(&self, a: &Self::Elem) -> Self::Elem;

	fn mul(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

	/// Multiplicative inverse, `None` for zero (and for non-units, should the
	/// context have been built on a composite modulus).
	fn invert(&self, a: &Self::Elem) -> Option<Self::Elem>;

	/// Exponentiation. Negative exponents invert the base first and fail on
	/// zero with [`Error::ZeroToNegativePower`].
	fn pow(&self, a: &Self::Elem, exp: i64) -> Result<Self::Elem, Error> {
		let base = if exp < 0 {
			self.invert(a).ok_or(Error::ZeroToNegativePower)?
		} else {
			a.clone()
		};
		Ok(self.pow_limbs(&base, &[exp.unsigned_abs()]))
	}

	/// a^exp for an unsigned exponent in little-endian 64-bit limbs.
	fn pow_limbs(&self, a: &Self::Elem, exp: &[u64]) -> Self::Elem {
		let mut acc = self.one();
		for &limb in exp.iter().rev() {
			for bit in (0..64).rev() {
				acc = self.mul(&acc, &acc);
				if (limb >> bit) & 1 == 1 {
					acc = self.mul(&acc, a);
				}
			}
		}
		acc
	}

	/// Uniformly random element.
	fn random(&self, rng: impl RngCore) -> Self::Elem;
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;
	use crate::{BigPrimeField, BinaryPrimeField, WordPrimeField};

	fn check_axioms<A: PrimeField>(fp: &A) {
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..32 {
			let a = fp.random(&mut rng);
			let b = fp.random(&mut rng);
			let c = fp.random(&mut rng);

			assert_eq!(fp.add(&a, &b), fp.add(&b, &a));
			assert_eq!(fp.mul(&a, &b), fp.mul(&b, &a));
			assert_eq!(
				fp.mul(&a, &fp.add(&b, &c)),
				fp.add(&fp.mul(&a, &b), &fp.mul(&a, &c))
			);
			assert_eq!(fp.add(&a, &fp.neg(&a)), fp.zero());
			assert_eq!(fp.sub(&a, &b), fp.add(&a, &fp.neg(&b)));
			assert_eq!(fp.mul(&a, &fp.one()), a);

			if !fp.is_zero(&a) {
				let inv = fp.invert(&a).unwrap();
				assert_eq!(fp.mul(&a, &inv), fp.one());
			}
		}
		assert_eq!(fp.invert(&fp.zero()), None);
	}

	#[test]
	fn test_word_axioms() {
		check_axioms(&WordPrimeField::new(65537).unwrap());
		check_axioms(&WordPrimeField::new(3).unwrap());
	}

	#[test]
	fn test_big_axioms() {
		use num_bigint::BigUint;
		// 2^89 - 1, a Mersenne prime.
		let p = (BigUint::from(1u64) << 89) - 1u64;
		check_axioms(&BigPrimeField::new(p).unwrap());
	}

	#[test]
	fn test_binary_axioms() {
		check_axioms(&BinaryPrimeField::new());
	}

	#[test]
	fn test_pow_negative_exponent() {
		let fp = WordPrimeField::new(11).unwrap();
		let a = fp.from_i64(3);
		let a2 = fp.pow(&a, 2).unwrap();
		let a_inv2 = fp.pow(&a, -2).unwrap();
		assert_eq!(fp.mul(&a2, &a_inv2), fp.one());
		assert_matches!(fp.pow(&fp.zero(), -1), Err(Error::ZeroToNegativePower));
	}

	#[test]
	fn test_from_i64_wraps() {
		let fp = WordPrimeField::new(7).unwrap();
		assert_eq!(fp.from_i64(-1), fp.from_i64(6));
		assert_eq!(fp.from_i64(15), fp.from_i64(1));
	}
}
