// Copyright 2025 Irreducible Inc.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::RngCore;

use crate::{error::Error, prime::PrimeField};

/// Z/p for an arbitrary-precision modulus.
///
/// Elements are canonical `BigUint` residues. Towers cannot be built over a
/// characteristic beyond a machine word (the constructions need to index base-p
/// digits), but base-field arithmetic at cryptographic sizes lives here.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BigPrimeField {
	p: BigUint,
}

impl BigPrimeField {
	/// Context for arithmetic mod `p`. Primality is deliberately not checked
	/// here; field constructors decide whether to test.
	pub fn new(p: BigUint) -> Result<Self, Error> {
		if p < BigUint::from(2u64) {
			return Err(Error::CharacteristicTooSmall);
		}
		Ok(Self { p })
	}

	pub fn modulus(&self) -> &BigUint {
		&self.p
	}
}

impl PrimeField for BigPrimeField {
	type Elem = BigUint;
	type Char = BigUint;

	fn characteristic(&self) -> BigUint {
		self.p.clone()
	}

	fn characteristic_word(&self) -> Option<u64> {
		self.p.to_u64()
	}

	fn characteristic_limbs(&self) -> Vec<u64> {
		self.p.to_u64_digits()
	}

	fn characteristic_mod(&self, n: u64) -> u64 {
		(&self.p % n).to_u64().expect("residue mod a u64 fits a u64")
	}

	fn characteristic_is_prime(&self) -> bool {
		crate::primes::is_prime_biguint(&self.p)
	}

	fn zero(&self) -> BigUint {
		BigUint::zero()
	}

	fn one(&self) -> BigUint {
		BigUint::one()
	}

	fn is_zero(&self, a: &BigUint) -> bool {
		a.is_zero()
	}

	fn from_i64(&self, val: i64) -> BigUint {
		let v = BigInt::from(val) % BigInt::from_biguint(Sign::Plus, self.p.clone());
		let v = if v.is_negative() {
			v + BigInt::from_biguint(Sign::Plus, self.p.clone())
		} else {
			v
		};
		v.to_biguint().expect("made non-negative above")
	}

	fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
		let sum = a + b;
		if sum >= self.p {
			sum - &self.p
		} else {
			sum
		}
	}

	fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
		if a >= b {
			a - b
		} else {
			a + &self.p - b
		}
	}

	fn neg(&self, a: &BigUint) -> BigUint {
		if a.is_zero() {
			BigUint::zero()
		} else {
			&self.p - a
		}
	}

	fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
		(a * b) % &self.p
	}

	fn invert(&self, a: &BigUint) -> Option<BigUint> {
		if a.is_zero() {
			return None;
		}
		// Extended Euclid over signed bignums; valid for composite moduli too.
		let p = BigInt::from_biguint(Sign::Plus, self.p.clone());
		let mut r0 = p.clone();
		let mut r1 = BigInt::from_biguint(Sign::Plus, a.clone());
		let mut t0 = BigInt::zero();
		let mut t1 = BigInt::one();
		while !r1.is_zero() {
			let q = &r0 / &r1;
			let r2 = &r0 - &q * &r1;
			r0 = std::mem::replace(&mut r1, r2);
			let t2 = &t0 - &q * &t1;
			t0 = std::mem::replace(&mut t1, t2);
		}
		if !r0.is_one() {
			return None;
		}
		let t0 = ((t0 % &p) + &p) % &p;
		t0.to_biguint()
	}

	fn pow_limbs(&self, a: &BigUint, exp: &[u64]) -> BigUint {
		// BigUint::new takes 32-bit limbs, lowest first.
		let e = BigUint::new(
			exp.iter()
				.flat_map(|limb| [*limb as u32, (limb >> 32) as u32])
				.collect(),
		);
		a.modpow(&e, &self.p)
	}

	fn random(&self, mut rng: impl RngCore) -> BigUint {
		let mut bytes = vec![0u8; (self.p.bits() as usize).div_ceil(8) + 8];
		rng.fill_bytes(&mut bytes);
		BigUint::from_bytes_le(&bytes) % &self.p
	}
}
