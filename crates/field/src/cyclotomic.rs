// Copyright 2025 Irreducible Inc.

use crate::{
	error::Error,
	poly::{Poly, PolyRing},
	primes::distinct_prime_factors,
};

/// The n-th cyclotomic polynomial over the prime field, via the Moebius
/// product: the (X^(n/d) - 1) over squarefree divisors d split by the sign of
/// mu(d), with one exact division at the end.
///
/// Requires n >= 1 and n coprime to the characteristic, so the result is
/// separable of degree phi(n).
pub fn cyclotomic_poly<A: PolyRing>(fp: &A, n: u64) -> Result<Poly<A>, Error> {
	if n == 0 {
		return Err(Error::BadCyclotomicIndex);
	}
	let primes = distinct_prime_factors(n);
	// The characteristic divides n exactly when it shows up among n's prime
	// factors.
	if primes.iter().any(|&q| fp.characteristic_mod(q) == 0) {
		return Err(Error::BadCyclotomicIndex);
	}
	let mut num = fp.poly_one();
	let mut den = fp.poly_one();
	for subset in 0u32..1 << primes.len() {
		let d: u64 = primes
			.iter()
			.enumerate()
			.filter(|(i, _)| subset >> i & 1 == 1)
			.map(|(_, p)| p)
			.product();
		let binomial = fp.poly_sub(
			&fp.poly_monomial(fp.one(), (n / d) as usize),
			&fp.poly_one(),
		);
		if subset.count_ones() % 2 == 0 {
			num = fp.poly_mul(&num, &binomial);
		} else {
			den = fp.poly_mul(&den, &binomial);
		}
	}
	let (quot, rem) = fp.poly_divrem(&num, &den)?;
	debug_assert!(rem.is_zero());
	Ok(quot)
}
