// Copyright 2025 Irreducible Inc.

use getset::{CopyGetters, Getters};

use crate::{
	error::Error,
	poly::{Poly, PolyRing},
};

/// A monic modulus bundled with the precomputation that makes repeated
/// reduction cheap: the power series inverse of its coefficient reversal,
/// which turns every `rem` into two truncated products (Barrett reduction).
///
/// Residues are polynomials of degree below [`deg`](Self::deg).
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct PolyModulus<A: PolyRing> {
	/// The monic defining polynomial.
	#[get = "pub"]
	q: Poly<A>,
	/// Degree of the modulus.
	#[get_copy = "pub"]
	deg: usize,
	/// Inverse of rev(q) as a power series, to precision `deg`.
	qrev_inv: Poly<A>,
}

impl<A: PolyRing> PolyModulus<A> {
	/// Builds a modulus from a nonconstant polynomial, normalizing it to be
	/// monic.
	pub fn new(fp: &A, q: &Poly<A>) -> Result<Self, Error> {
		let deg = match q.deg() {
			None | Some(0) => return Err(Error::ConstantModulus),
			Some(d) => d,
		};
		let q = fp.poly_monic(q)?;
		let qrev = fp.poly_reverse(&q, deg);
		let qrev_inv = fp.poly_inv_series(&qrev, deg)?;
		Ok(Self { q, deg, qrev_inv })
	}

	/// Remainder of f modulo q, for f of any degree.
	pub fn rem(&self, fp: &A, f: &Poly<A>) -> Poly<A> {
		let n = self.deg;
		if f.len() <= n {
			return f.clone();
		}
		if n == 1 {
			// Residues are scalars: f mod (X - c) = f(c).
			let c = fp.neg(&fp.poly_coeff(&self.q, 0));
			return fp.poly_scalar(fp.poly_eval(f, &c));
		}
		let mut f = f.clone();
		// Fold the top 2n-1 coefficients down until one window is left.
		while f.len() > 2 * n - 1 {
			let split = f.len() - (2 * n - 1);
			let top = fp.poly_from_coeffs(f.coeffs()[split..].to_vec());
			let lo = fp.poly_truncate(&f, split);
			let top_red = self.rem_window(fp, &top);
			f = fp.poly_add(&lo, &fp.poly_shift(&top_red, split));
		}
		self.rem_window(fp, &f)
	}

	/// Barrett step for deg f <= 2·deg q - 2: the quotient is recovered from
	/// a truncated product with the precomputed series inverse.
	fn rem_window(&self, fp: &A, f: &Poly<A>) -> Poly<A> {
		let n = self.deg;
		debug_assert!(f.len() <= 2 * n - 1);
		if f.len() <= n {
			return f.clone();
		}
		let frev = fp.poly_reverse(f, 2 * n - 2);
		let urev = fp.poly_truncate(&fp.poly_mul(&frev, &self.qrev_inv), n - 1);
		let u = fp.poly_reverse(&urev, n - 2);
		let r = fp.poly_sub(f, &fp.poly_mul(&u, &self.q));
		debug_assert!(r.len() <= n);
		r
	}

	pub fn mulmod(&self, fp: &A, f: &Poly<A>, g: &Poly<A>) -> Poly<A> {
		self.rem(fp, &fp.poly_mul(f, g))
	}

	/// f^exp mod q, exponent given as little-endian machine words.
	pub fn powmod(&self, fp: &A, f: &Poly<A>, exp: &[u64]) -> Poly<A> {
		let base = self.rem(fp, f);
		let mut acc = fp.poly_one();
		let mut started = false;
		for limb in exp.iter().rev() {
			for shift in (0..64).rev() {
				if started {
					acc = self.mulmod(fp, &acc, &acc);
				}
				if (limb >> shift) & 1 == 1 {
					acc = if started {
						self.mulmod(fp, &acc, &base)
					} else {
						started = true;
						base.clone()
					};
				}
			}
		}
		acc
	}

	/// f(g) mod q by Horner over residues.
	pub fn compose_mod(&self, fp: &A, f: &Poly<A>, g: &Poly<A>) -> Poly<A> {
		let g = self.rem(fp, g);
		let mut acc = Poly::zero();
		for c in f.coeffs().iter().rev() {
			acc = self.mulmod(fp, &acc, &g);
			acc = fp.poly_add(&acc, &fp.poly_scalar(c.clone()));
		}
		acc
	}

	/// Projections of the powers of x under a functional on residues: given
	/// lam with lam\[c\] = l(x^c) for c < deg, extends to l(x^c mod q) for all
	/// c < out_len through the linear recurrence the modulus imposes.
	pub fn trans_rem(&self, fp: &A, lam: &[A::Elem], out_len: usize) -> Vec<A::Elem> {
		let n = self.deg;
		debug_assert_eq!(lam.len(), n);
		let mut out: Vec<A::Elem> = lam
			.iter()
			.cloned()
			.chain(std::iter::repeat_with(|| fp.zero()))
			.take(out_len.max(n))
			.collect();
		for c in n..out_len {
			// x^c = -sum_j q_j x^(c-n+j) mod q.
			let mut acc = fp.zero();
			for (j, q_j) in self.q.coeffs().iter().take(n).enumerate() {
				acc = fp.add(&acc, &fp.mul(q_j, &out[c - n + j]));
			}
			out[c] = fp.neg(&acc);
		}
		out.truncate(out_len);
		out
	}

	/// Traces of the powers of x: the generating series sum_c Tr(x^c)·X^c
	/// equals rev(q')/rev(q), expanded here to `len` terms.
	pub fn trace_vector(&self, fp: &A, len: usize) -> Result<Vec<A::Elem>, Error> {
		let n = self.deg;
		let num = fp.poly_reverse(&fp.poly_derivative(&self.q), n - 1);
		let den = fp.poly_reverse(&self.q, n);
		let inv = fp.poly_inv_series(&den, len)?;
		let series = fp.poly_truncate(&fp.poly_mul(&num, &inv), len);
		Ok((0..len).map(|c| fp.poly_coeff(&series, c)).collect())
	}
}

/// Transposed modular multiplication by a fixed functional.
///
/// Holds the projections l(x^c mod q) for c < 2n-1, which is exactly enough
/// to evaluate l against any product of two residues. [`apply`](Self::apply)
/// then computes j -> l(x^j·f mod q) for all j < n with a single transposed
/// product, instead of n modular multiplications.
#[derive(Clone, Debug)]
pub struct TransMultiplier<A: PolyRing> {
	ext: Vec<A::Elem>,
	n: usize,
}

impl<A: PolyRing> TransMultiplier<A> {
	/// Extends the functional lam (lam\[c\] = l(x^c), c < n) across one
	/// product's worth of powers.
	pub fn new(fp: &A, modulus: &PolyModulus<A>, lam: &[A::Elem]) -> Self {
		let n = modulus.deg();
		let ext = modulus.trans_rem(fp, lam, 2 * n - 1);
		Self { ext, n }
	}

	pub fn n(&self) -> usize {
		self.n
	}

	/// The stored projections l(x^c mod q), c < 2n-1.
	pub fn projections(&self) -> &[A::Elem] {
		&self.ext
	}

	/// Returns the vector (l(x^j·f mod q))_{j < n}.
	pub fn apply(&self, fp: &A, f: &Poly<A>) -> Vec<A::Elem> {
		fp.poly_mul_trans(f, &self.ext, self.n)
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;
	use crate::{prime::PrimeField, word::WordPrimeField};

	fn poly(fp: &WordPrimeField, coeffs: &[i64]) -> Poly<WordPrimeField> {
		fp.poly_from_coeffs(coeffs.iter().map(|&c| fp.from_i64(c)).collect())
	}

	#[test]
	fn test_rejects_constant_modulus() {
		let fp = WordPrimeField::new(17).unwrap();
		assert_matches!(
			PolyModulus::new(&fp, &fp.poly_one()),
			Err(Error::ConstantModulus)
		);
		assert_matches!(
			PolyModulus::new(&fp, &Poly::zero()),
			Err(Error::ConstantModulus)
		);
	}

	#[test]
	fn test_rem_matches_divrem() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		for deg in [1usize, 2, 3, 7] {
			let q = fp.poly_random_monic(deg, &mut rng);
			let modulus = PolyModulus::new(&fp, &q).unwrap();
			for len in [0usize, 1, deg, 2 * deg, 5 * deg + 3] {
				let f = fp.poly_random(len, &mut rng);
				let want = fp.poly_rem(&f, &q).unwrap();
				assert_eq!(modulus.rem(&fp, &f), want, "deg={deg} len={len}");
			}
		}
	}

	#[test]
	fn test_powmod_matches_repeated_mul() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		let q = fp.poly_random_monic(4, &mut rng);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let f = fp.poly_random(4, &mut rng);
		let mut by_mul = fp.poly_one();
		for exp in 0u64..20 {
			assert_eq!(modulus.powmod(&fp, &f, &[exp]), by_mul, "exp={exp}");
			by_mul = modulus.mulmod(&fp, &by_mul, &f);
		}
	}

	#[test]
	fn test_powmod_multi_limb_exponent() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(2);
		let q = fp.poly_random_monic(3, &mut rng);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let f = fp.poly_random(3, &mut rng);
		// f^(2^64 + 5) = (f^(2^32))^(2^32) · f^5.
		let direct = modulus.powmod(&fp, &f, &[5, 1]);
		let half = modulus.powmod(&fp, &f, &[1 << 32]);
		let stacked = modulus.mulmod(
			&fp,
			&modulus.powmod(&fp, &half, &[1 << 32]),
			&modulus.powmod(&fp, &f, &[5]),
		);
		assert_eq!(direct, stacked);
	}

	#[test]
	fn test_compose_mod() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(3);
		let q = fp.poly_random_monic(5, &mut rng);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let f = fp.poly_random(9, &mut rng);
		let g = fp.poly_random(5, &mut rng);
		let want = fp.poly_rem(&fp.poly_compose(&f, &g), &q).unwrap();
		assert_eq!(modulus.compose_mod(&fp, &f, &g), want);
	}

	#[test]
	fn test_trans_rem_projects_powers() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(4);
		let q = fp.poly_random_monic(4, &mut rng);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let lam: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng))
			.take(4)
			.collect();
		let out = modulus.trans_rem(&fp, &lam, 15);
		for (c, out_c) in out.iter().enumerate() {
			let xc = modulus.rem(&fp, &fp.poly_monomial(fp.one(), c));
			let want = (0..4).fold(fp.zero(), |acc, i| {
				fp.add(&acc, &fp.mul(&lam[i], &fp.poly_coeff(&xc, i)))
			});
			assert_eq!(*out_c, want, "power {c}");
		}
	}

	#[test]
	fn test_trace_vector_fibonacci_modulus() {
		// q = X^2 - X - 1 over F_5 is irreducible; Tr(x^c) follows the Lucas
		// sequence 2, 1, 3, 4, 2, ... reduced mod 5.
		let fp = WordPrimeField::new(5).unwrap();
		let q = poly(&fp, &[-1, -1, 1]);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let t = modulus.trace_vector(&fp, 8).unwrap();
		let lucas = [2u64, 1, 3, 4, 2, 1, 3, 4];
		assert_eq!(t, lucas.iter().map(|&v| v % 5).collect::<Vec<_>>());
	}

	#[test]
	fn test_trace_vector_matches_conjugate_sum() {
		// For irreducible q of degree 2 over F_5 the trace of a residue a is
		// a + a^5 mod q, which must land in the prime field.
		let fp = WordPrimeField::new(5).unwrap();
		let q = poly(&fp, &[-1, -1, 1]);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let t = modulus.trace_vector(&fp, 10).unwrap();
		for (c, t_c) in t.iter().enumerate() {
			let xc = modulus.powmod(&fp, &fp.poly_x(), &[c as u64]);
			let frob = modulus.powmod(&fp, &xc, &[5]);
			let sum = fp.poly_add(&xc, &frob);
			assert!(sum.deg().is_none_or(|d| d == 0));
			assert_eq!(fp.poly_coeff(&sum, 0), *t_c, "power {c}");
		}
	}

	#[test]
	fn test_trans_multiplier_matches_direct_products() {
		let fp = WordPrimeField::new(17).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		let q = fp.poly_random_monic(6, &mut rng);
		let modulus = PolyModulus::new(&fp, &q).unwrap();
		let lam: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng))
			.take(6)
			.collect();
		let mult = TransMultiplier::new(&fp, &modulus, &lam);
		let f = fp.poly_random(6, &mut rng);
		let out = mult.apply(&fp, &f);
		for (j, out_j) in out.iter().enumerate() {
			let prod = modulus.mulmod(&fp, &fp.poly_monomial(fp.one(), j), &f);
			let want = (0..6).fold(fp.zero(), |acc, i| {
				fp.add(&acc, &fp.mul(&lam[i], &fp.poly_coeff(&prod, i)))
			});
			assert_eq!(*out_j, want, "shift {j}");
		}
	}
}
