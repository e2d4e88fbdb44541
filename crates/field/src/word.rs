// Copyright 2025 Irreducible Inc.

use rand::{Rng, RngCore};

use crate::{error::Error, prime::PrimeField};

/// Z/p for a modulus fitting a machine word.
///
/// Elements are canonical residues in `0..p` stored as `u64`; products go
/// through `u128` widening. This is the workhorse backend: towers over small
/// odd characteristics live here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WordPrimeField {
	p: u64,
}

impl WordPrimeField {
	/// Context for arithmetic mod `p`. Primality is deliberately not checked
	/// here; field constructors decide whether to test.
	pub fn new(p: u64) -> Result<Self, Error> {
		if p < 2 {
			return Err(Error::CharacteristicTooSmall);
		}
		Ok(Self { p })
	}

	pub fn modulus(&self) -> u64 {
		self.p
	}

	// Only called when p < 2^62, so the cast to i64 is lossless.
	fn reduce_i64(&self, val: i64) -> u64 {
		val.rem_euclid(self.p as i64) as u64
	}
}

impl PrimeField for WordPrimeField {
	type Elem = u64;
	type Char = u64;

	fn characteristic(&self) -> u64 {
		self.p
	}

	fn characteristic_word(&self) -> Option<u64> {
		Some(self.p)
	}

	fn characteristic_limbs(&self) -> Vec<u64> {
		vec![self.p]
	}

	fn characteristic_mod(&self, n: u64) -> u64 {
		self.p % n
	}

	fn characteristic_is_prime(&self) -> bool {
		crate::primes::is_prime_u64(self.p)
	}

	fn zero(&self) -> u64 {
		0
	}

	fn one(&self) -> u64 {
		1 % self.p
	}

	fn is_zero(&self, a: &u64) -> bool {
		*a == 0
	}

	fn from_i64(&self, val: i64) -> u64 {
		if self.p < (1 << 62) {
			self.reduce_i64(val)
		} else {
			// p close to 2^64: i64 arithmetic could overflow, go via u128.
			let p = self.p as u128;
			let r = (val as i128).rem_euclid(p as i128);
			r as u64
		}
	}

	fn add(&self, a: &u64, b: &u64) -> u64 {
		let (sum, overflow) = a.overflowing_add(*b);
		if overflow || sum >= self.p {
			sum.wrapping_sub(self.p)
		} else {
			sum
		}
	}

	fn sub(&self, a: &u64, b: &u64) -> u64 {
		if a >= b {
			a - b
		} else {
			a.wrapping_sub(*b).wrapping_add(self.p)
		}
	}

	fn neg(&self, a: &u64) -> u64 {
		if *a == 0 {
			0
		} else {
			self.p - a
		}
	}

	fn mul(&self, a: &u64, b: &u64) -> u64 {
		((*a as u128 * *b as u128) % self.p as u128) as u64
	}

	fn invert(&self, a: &u64) -> Option<u64> {
		if *a == 0 {
			return None;
		}
		// Extended Euclid over i128; valid for composite moduli too, where
		// non-units come back as None.
		let (mut r0, mut r1) = (self.p as i128, *a as i128);
		let (mut t0, mut t1) = (0i128, 1i128);
		while r1 != 0 {
			let q = r0 / r1;
			(r0, r1) = (r1, r0 - q * r1);
			(t0, t1) = (t1, t0 - q * t1);
		}
		if r0 != 1 {
			return None;
		}
		Some(t0.rem_euclid(self.p as i128) as u64)
	}

	fn random(&self, mut rng: impl RngCore) -> u64 {
		rng.gen_range(0..self.p)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejects_tiny_modulus() {
		assert!(WordPrimeField::new(0).is_err());
		assert!(WordPrimeField::new(1).is_err());
		assert!(WordPrimeField::new(2).is_ok());
	}

	#[test]
	fn test_invert_composite_modulus() {
		// 15 = 3 * 5: units invert, zero divisors do not.
		let zn = WordPrimeField::new(15).unwrap();
		assert_eq!(zn.invert(&2), Some(8));
		assert_eq!(zn.invert(&3), None);
		assert_eq!(zn.invert(&5), None);
	}

	#[test]
	fn test_large_modulus_arithmetic() {
		// Largest prime below 2^64.
		let p = 18_446_744_073_709_551_557_u64;
		let fp = WordPrimeField::new(p).unwrap();
		let a = p - 1;
		assert_eq!(fp.add(&a, &a), p - 2);
		assert_eq!(fp.mul(&a, &a), 1);
		assert_eq!(fp.from_i64(-1), a);
	}
}
