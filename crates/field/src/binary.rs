// Copyright 2025 Irreducible Inc.

use std::fmt;

use rand::{Rng, RngCore};

use crate::prime::PrimeField;

/// A GF(2) element.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Bit(pub bool);

impl fmt::Display for Bit {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0 as u8)
	}
}

/// The characteristic-2 backend.
///
/// The characteristic is fixed by the type, so this context cannot be
/// constructed over anything but 2 and never runs a primality test. Towers in
/// characteristic 2 follow their own defining-polynomial conventions (see the
/// construction module in `schreier_tower`); the arithmetic here is plain
/// xor/and on bits.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BinaryPrimeField;

impl BinaryPrimeField {
	pub fn new() -> Self {
		Self
	}
}

impl PrimeField for BinaryPrimeField {
	type Elem = Bit;
	type Char = u64;

	fn characteristic(&self) -> u64 {
		2
	}

	fn characteristic_word(&self) -> Option<u64> {
		Some(2)
	}

	fn characteristic_limbs(&self) -> Vec<u64> {
		vec![2]
	}

	fn characteristic_mod(&self, n: u64) -> u64 {
		2 % n
	}

	fn characteristic_is_prime(&self) -> bool {
		true
	}

	fn zero(&self) -> Bit {
		Bit(false)
	}

	fn one(&self) -> Bit {
		Bit(true)
	}

	fn is_zero(&self, a: &Bit) -> bool {
		!a.0
	}

	fn from_i64(&self, val: i64) -> Bit {
		Bit(val & 1 == 1)
	}

	fn add(&self, a: &Bit, b: &Bit) -> Bit {
		Bit(a.0 ^ b.0)
	}

	fn sub(&self, a: &Bit, b: &Bit) -> Bit {
		Bit(a.0 ^ b.0)
	}

	fn neg(&self, a: &Bit) -> Bit {
		*a
	}

	fn mul(&self, a: &Bit, b: &Bit) -> Bit {
		Bit(a.0 & b.0)
	}

	fn invert(&self, a: &Bit) -> Option<Bit> {
		a.0.then_some(Bit(true))
	}

	fn random(&self, mut rng: impl RngCore) -> Bit {
		Bit(rng.gen())
	}
}
