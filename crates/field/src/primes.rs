// Copyright 2025 Irreducible Inc.

//! Primality testing and integer factorization for tower bookkeeping.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Witnesses that make Miller-Rabin deterministic over the full u64 range.
const MILLER_RABIN_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
	(u128::from(a) * u128::from(b) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
	let mut acc = 1 % m;
	base %= m;
	while exp > 0 {
		if exp & 1 == 1 {
			acc = mul_mod(acc, base, m);
		}
		base = mul_mod(base, base, m);
		exp >>= 1;
	}
	acc
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
	while b != 0 {
		a %= b;
		std::mem::swap(&mut a, &mut b);
	}
	a
}

/// Deterministic Miller-Rabin primality test.
pub fn is_prime_u64(n: u64) -> bool {
	if n < 2 {
		return false;
	}
	for &p in &MILLER_RABIN_BASES {
		if n == p {
			return true;
		}
		if n % p == 0 {
			return false;
		}
	}
	let s = (n - 1).trailing_zeros();
	let d = (n - 1) >> s;
	'witness: for &a in &MILLER_RABIN_BASES {
		let mut x = pow_mod(a, d, n);
		if x == 1 || x == n - 1 {
			continue;
		}
		for _ in 1..s {
			x = mul_mod(x, x, n);
			if x == n - 1 {
				continue 'witness;
			}
		}
		return false;
	}
	true
}

/// Miller-Rabin with small prime bases. Word-sized inputs are dispatched to
/// the deterministic test; beyond that no composite passing all of these
/// bases is known.
pub fn is_prime_biguint(n: &BigUint) -> bool {
	if let Some(word) = n.to_u64() {
		return is_prime_u64(word);
	}
	if (n % 2u32).is_zero() {
		return false;
	}
	let n_minus_1 = n - 1u32;
	let s = n_minus_1.trailing_zeros().expect("n > 1");
	let d = &n_minus_1 >> s;
	'witness: for &a in &MILLER_RABIN_BASES {
		let mut x = BigUint::from(a).modpow(&d, n);
		if x.is_one() || x == n_minus_1 {
			continue;
		}
		for _ in 1..s {
			x = (&x * &x) % n;
			if x == n_minus_1 {
				continue 'witness;
			}
		}
		return false;
	}
	true
}

/// Brent's variant of Pollard's rho. Returns a nontrivial factor of an odd
/// composite n.
fn pollard_rho(n: u64, rng: &mut StdRng) -> u64 {
	debug_assert!(n > 3 && n % 2 == 1 && !is_prime_u64(n));
	let advance =
		|x: u64, c: u64| ((u128::from(x) * u128::from(x) + u128::from(c)) % u128::from(n)) as u64;
	loop {
		let c = rng.gen_range(1..n);
		let mut y = rng.gen_range(0..n);
		let mut x = 0;
		let mut ys = 0;
		let mut g = 1;
		let mut q = 1;
		let mut r = 1usize;
		let m = 128;
		while g == 1 {
			x = y;
			for _ in 0..r {
				y = advance(y, c);
			}
			let mut k = 0;
			while k < r && g == 1 {
				ys = y;
				for _ in 0..m.min(r - k) {
					y = advance(y, c);
					q = mul_mod(q, x.abs_diff(y), n);
				}
				g = gcd(q, n);
				k += m;
			}
			r *= 2;
		}
		if g == n {
			// The batched gcd overshot; walk the last block one step at a
			// time.
			g = 1;
			while g == 1 {
				ys = advance(ys, c);
				g = gcd(x.abs_diff(ys), n);
			}
		}
		if g != n {
			return g;
		}
	}
}

/// Prime factorization of n, as (prime, multiplicity) pairs in increasing
/// order of prime.
pub fn factor_u64(mut n: u64) -> Vec<(u64, u32)> {
	let mut factors = Vec::new();
	if n < 2 {
		return factors;
	}
	for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47] {
		if n % p == 0 {
			let mut mult = 0;
			while n % p == 0 {
				n /= p;
				mult += 1;
			}
			factors.push((p, mult));
		}
	}
	if n > 1 {
		let mut rng = StdRng::seed_from_u64(n);
		let mut stack = vec![n];
		let mut found = Vec::new();
		while let Some(v) = stack.pop() {
			if is_prime_u64(v) {
				found.push(v);
			} else {
				let d = pollard_rho(v, &mut rng);
				stack.push(d);
				stack.push(v / d);
			}
		}
		found.sort_unstable();
		for prime in found {
			match factors.last_mut() {
				Some((p, mult)) if *p == prime => *mult += 1,
				_ => factors.push((prime, 1)),
			}
		}
	}
	factors
}

/// The distinct primes dividing n.
pub fn distinct_prime_factors(n: u64) -> Vec<u64> {
	factor_u64(n).into_iter().map(|(p, _)| p).collect()
}

/// Number of base-p digits of n; zero has none.
pub fn num_pits(mut n: u64, p: u64) -> u32 {
	debug_assert!(p >= 2);
	let mut digits = 0;
	while n > 0 {
		n /= p;
		digits += 1;
	}
	digits
}
