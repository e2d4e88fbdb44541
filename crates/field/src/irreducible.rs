// Copyright 2025 Irreducible Inc.

use rand::RngCore;

use crate::{
	error::Error,
	modulus::PolyModulus,
	poly::{Poly, PolyRing},
	primes::distinct_prime_factors,
};

/// Rabin's irreducibility test.
///
/// A monic q of degree n over F_p is irreducible iff x^(p^n) = x mod q and,
/// for every prime r dividing n, x^(p^(n/r)) - x is coprime to q. The
/// Frobenius powers are walked by composing with x^p mod q one level at a
/// time.
pub fn is_irreducible<A: PolyRing>(fp: &A, modulus: &PolyModulus<A>) -> Result<bool, Error> {
	let n = modulus.deg();
	let x = modulus.rem(fp, &fp.poly_x());
	let xp = modulus.powmod(fp, &x, &fp.characteristic_limbs());

	let checkpoints: Vec<usize> = distinct_prime_factors(n as u64)
		.into_iter()
		.map(|r| n / r as usize)
		.collect();

	let mut cur = x.clone();
	for k in 1..=n {
		cur = modulus.compose_mod(fp, &cur, &xp);
		if checkpoints.contains(&k) {
			let g = fp.poly_gcd(&fp.poly_sub(&cur, &x), modulus.q())?;
			if g.deg() != Some(0) {
				return Ok(false);
			}
		}
	}
	Ok(cur == x)
}

/// Uniformly samples monic polynomials of degree d until one passes
/// [`is_irreducible`]. Roughly one in d candidates does.
pub fn random_monic_irreducible<A: PolyRing>(
	fp: &A,
	d: usize,
	mut rng: impl RngCore,
) -> Result<Poly<A>, Error> {
	debug_assert!(d >= 1);
	loop {
		let q = fp.poly_random_monic(d, &mut rng);
		let modulus = PolyModulus::new(fp, &q)?;
		if is_irreducible(fp, &modulus)? {
			return Ok(q);
		}
	}
}
