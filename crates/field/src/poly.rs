// Copyright 2025 Irreducible Inc.

use std::fmt;

use itertools::{EitherOrBoth, Itertools};
use rand::RngCore;

use crate::{
	big::BigPrimeField, binary::BinaryPrimeField, error::Error, prime::PrimeField,
	word::WordPrimeField,
};

/// Products below this size stay schoolbook.
const KARATSUBA_THRESHOLD: usize = 32;

/// Dense univariate polynomial over a prime-field backend, lowest coefficient
/// first.
///
/// Invariant: no trailing zero coefficients, so the zero polynomial is the
/// empty vector and `PartialEq` is coefficient equality. All arithmetic lives
/// on the [`PolyRing`] context trait; the struct itself only exposes
/// representation accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<A: PrimeField> {
	coeffs: Vec<A::Elem>,
}

impl<A: PrimeField> Poly<A> {
	pub fn zero() -> Self {
		Self { coeffs: Vec::new() }
	}

	/// Wraps a coefficient vector already known to have no trailing zeros.
	pub(crate) fn from_raw(coeffs: Vec<A::Elem>) -> Self {
		Self { coeffs }
	}

	pub fn is_zero(&self) -> bool {
		self.coeffs.is_empty()
	}

	/// Degree, `None` for the zero polynomial.
	pub fn deg(&self) -> Option<usize> {
		self.coeffs.len().checked_sub(1)
	}

	/// Number of coefficients (degree plus one, or zero).
	pub fn len(&self) -> usize {
		self.coeffs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.coeffs.is_empty()
	}

	pub fn coeffs(&self) -> &[A::Elem] {
		&self.coeffs
	}

	pub fn into_coeffs(self) -> Vec<A::Elem> {
		self.coeffs
	}

	pub fn get(&self, i: usize) -> Option<&A::Elem> {
		self.coeffs.get(i)
	}

	/// Leading coefficient; nonzero by the representation invariant.
	pub fn leading(&self) -> Option<&A::Elem> {
		self.coeffs.last()
	}
}

impl<A: PrimeField> fmt::Display for Poly<A> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "[{}]", self.coeffs.iter().format(", "))
	}
}

/// Polynomial arithmetic over a [`PrimeField`] context.
///
/// Every algorithm is a provided method, and the trait is implemented once per
/// backend so that a regime can override individual entry points (the
/// characteristic-2 impl does). This is the capability surface the tower crate
/// builds on: ring and euclidean operations, structural maps
/// (compose/expand/contract/Taylor shift) together with their transposes, and
/// randomized constructions.
pub trait PolyRing: PrimeField {
	/// Normalizing constructor: drops trailing zeros.
	fn poly_from_coeffs(&self, mut coeffs: Vec<Self::Elem>) -> Poly<Self> {
		while coeffs.last().is_some_and(|c| self.is_zero(c)) {
			coeffs.pop();
		}
		Poly::from_raw(coeffs)
	}

	fn poly_scalar(&self, c: Self::Elem) -> Poly<Self> {
		self.poly_from_coeffs(vec![c])
	}

	fn poly_one(&self) -> Poly<Self> {
		Poly::from_raw(vec![self.one()])
	}

	/// The monomial c·X^k.
	fn poly_monomial(&self, c: Self::Elem, k: usize) -> Poly<Self> {
		if self.is_zero(&c) {
			return Poly::zero();
		}
		let mut coeffs = vec![self.zero(); k + 1];
		coeffs[k] = c;
		Poly::from_raw(coeffs)
	}

	fn poly_x(&self) -> Poly<Self> {
		self.poly_monomial(self.one(), 1)
	}

	/// Coefficient of X^i, zero when absent.
	fn poly_coeff(&self, f: &Poly<Self>, i: usize) -> Self::Elem {
		f.get(i).cloned().unwrap_or_else(|| self.zero())
	}

	fn poly_add(&self, f: &Poly<Self>, g: &Poly<Self>) -> Poly<Self> {
		let coeffs = f
			.coeffs()
			.iter()
			.zip_longest(g.coeffs().iter())
			.map(|pair| match pair {
				EitherOrBoth::Both(a, b) => self.add(a, b),
				EitherOrBoth::Left(a) => a.clone(),
				EitherOrBoth::Right(b) => b.clone(),
			})
			.collect();
		self.poly_from_coeffs(coeffs)
	}

	fn poly_sub(&self, f: &Poly<Self>, g: &Poly<Self>) -> Poly<Self> {
		let coeffs = f
			.coeffs()
			.iter()
			.zip_longest(g.coeffs().iter())
			.map(|pair| match pair {
				EitherOrBoth::Both(a, b) => self.sub(a, b),
				EitherOrBoth::Left(a) => a.clone(),
				EitherOrBoth::Right(b) => self.neg(b),
			})
			.collect();
		self.poly_from_coeffs(coeffs)
	}

	fn poly_neg(&self, f: &Poly<Self>) -> Poly<Self> {
		Poly::from_raw(f.coeffs().iter().map(|c| self.neg(c)).collect())
	}

	fn poly_scale(&self, f: &Poly<Self>, c: &Self::Elem) -> Poly<Self> {
		self.poly_from_coeffs(f.coeffs().iter().map(|a| self.mul(a, c)).collect())
	}

	/// X^k·f.
	fn poly_shift(&self, f: &Poly<Self>, k: usize) -> Poly<Self> {
		if f.is_zero() {
			return Poly::zero();
		}
		let mut coeffs = vec![self.zero(); k];
		coeffs.extend_from_slice(f.coeffs());
		Poly::from_raw(coeffs)
	}

	fn poly_mul(&self, f: &Poly<Self>, g: &Poly<Self>) -> Poly<Self> {
		if f.is_zero() || g.is_zero() {
			return Poly::zero();
		}
		self.poly_from_coeffs(mul_slices(self, f.coeffs(), g.coeffs()))
	}

	/// f mod X^n.
	fn poly_truncate(&self, f: &Poly<Self>, n: usize) -> Poly<Self> {
		self.poly_from_coeffs(f.coeffs().iter().take(n).cloned().collect())
	}

	/// Coefficient reversal at degree `hi`: X^hi·f(1/X). Requires deg f <= hi.
	fn poly_reverse(&self, f: &Poly<Self>, hi: usize) -> Poly<Self> {
		debug_assert!(f.deg().is_none_or(|d| d <= hi));
		let coeffs = (0..=hi).rev().map(|i| self.poly_coeff(f, i)).collect();
		self.poly_from_coeffs(coeffs)
	}

	fn poly_eval(&self, f: &Poly<Self>, x: &Self::Elem) -> Self::Elem {
		let mut acc = self.zero();
		for c in f.coeffs().iter().rev() {
			acc = self.add(&self.mul(&acc, x), c);
		}
		acc
	}

	fn poly_derivative(&self, f: &Poly<Self>) -> Poly<Self> {
		let coeffs = f
			.coeffs()
			.iter()
			.enumerate()
			.skip(1)
			.map(|(i, c)| self.mul(&self.from_i64(i as i64), c))
			.collect();
		self.poly_from_coeffs(coeffs)
	}

	/// Scales to leading coefficient one.
	fn poly_monic(&self, f: &Poly<Self>) -> Result<Poly<Self>, Error> {
		let lead = f.leading().ok_or(Error::DivisionByZero)?;
		let inv = self
			.invert(lead)
			.ok_or(Error::NonInvertibleLeadingCoefficient)?;
		Ok(self.poly_scale(f, &inv))
	}

	fn poly_divrem(&self, f: &Poly<Self>, g: &Poly<Self>) -> Result<(Poly<Self>, Poly<Self>), Error> {
		let g_deg = g.deg().ok_or(Error::DivisionByZero)?;
		let Some(f_deg) = f.deg() else {
			return Ok((Poly::zero(), Poly::zero()));
		};
		if f_deg < g_deg {
			return Ok((Poly::zero(), f.clone()));
		}
		let lead_inv = self
			.invert(g.leading().expect("g has a degree"))
			.ok_or(Error::NonInvertibleLeadingCoefficient)?;

		let mut rem = f.coeffs().to_vec();
		let mut quot = vec![self.zero(); f_deg - g_deg + 1];
		for i in (0..=f_deg - g_deg).rev() {
			let c = self.mul(&rem[i + g_deg], &lead_inv);
			if self.is_zero(&c) {
				continue;
			}
			for (j, g_j) in g.coeffs().iter().enumerate() {
				rem[i + j] = self.sub(&rem[i + j], &self.mul(&c, g_j));
			}
			quot[i] = c;
		}
		Ok((self.poly_from_coeffs(quot), self.poly_from_coeffs(rem)))
	}

	fn poly_rem(&self, f: &Poly<Self>, g: &Poly<Self>) -> Result<Poly<Self>, Error> {
		Ok(self.poly_divrem(f, g)?.1)
	}

	/// Monic greatest common divisor.
	fn poly_gcd(&self, f: &Poly<Self>, g: &Poly<Self>) -> Result<Poly<Self>, Error> {
		let mut a = f.clone();
		let mut b = g.clone();
		while !b.is_zero() {
			let r = self.poly_rem(&a, &b)?;
			a = std::mem::replace(&mut b, r);
		}
		if a.is_zero() {
			Ok(a)
		} else {
			self.poly_monic(&a)
		}
	}

	/// Extended euclidean algorithm: returns monic (d, s, t) with
	/// s·f + t·g = d = gcd(f, g).
	fn poly_xgcd(
		&self,
		f: &Poly<Self>,
		g: &Poly<Self>,
	) -> Result<(Poly<Self>, Poly<Self>, Poly<Self>), Error> {
		let mut r0 = f.clone();
		let mut r1 = g.clone();
		let mut s0 = self.poly_one();
		let mut s1 = Poly::zero();
		let mut t0 = Poly::zero();
		let mut t1 = self.poly_one();
		while !r1.is_zero() {
			let (q, r2) = self.poly_divrem(&r0, &r1)?;
			r0 = std::mem::replace(&mut r1, r2);
			let s2 = self.poly_sub(&s0, &self.poly_mul(&q, &s1));
			s0 = std::mem::replace(&mut s1, s2);
			let t2 = self.poly_sub(&t0, &self.poly_mul(&q, &t1));
			t0 = std::mem::replace(&mut t1, t2);
		}
		if r0.is_zero() {
			return Ok((r0, s0, t0));
		}
		let lead_inv = self
			.invert(r0.leading().expect("nonzero"))
			.ok_or(Error::NonInvertibleLeadingCoefficient)?;
		Ok((
			self.poly_scale(&r0, &lead_inv),
			self.poly_scale(&s0, &lead_inv),
			self.poly_scale(&t0, &lead_inv),
		))
	}

	/// Inverse of f modulo m, `None` when they share a factor.
	fn poly_inverse_mod(
		&self,
		f: &Poly<Self>,
		m: &Poly<Self>,
	) -> Result<Option<Poly<Self>>, Error> {
		let (d, s, _) = self.poly_xgcd(f, m)?;
		if d.deg() == Some(0) {
			Ok(Some(self.poly_rem(&s, m)?))
		} else {
			Ok(None)
		}
	}

	/// Power series inverse of f to precision n (f must have an invertible
	/// constant term). Newton iteration, doubling the precision each round.
	fn poly_inv_series(&self, f: &Poly<Self>, n: usize) -> Result<Poly<Self>, Error> {
		let c0 = self.poly_coeff(f, 0);
		let c0_inv = self.invert(&c0).ok_or(Error::DivisionByZero)?;
		let mut g = self.poly_scalar(c0_inv);
		let mut prec = 1;
		let two = self.poly_scalar(self.from_i64(2));
		while prec < n {
			prec = (prec * 2).min(n);
			// g <- g·(2 - f·g) mod X^prec
			let fg = self.poly_truncate(&self.poly_mul(&self.poly_truncate(f, prec), &g), prec);
			let corr = self.poly_sub(&two, &fg);
			g = self.poly_truncate(&self.poly_mul(&g, &corr), prec);
		}
		Ok(g)
	}

	/// f(g) by Horner.
	fn poly_compose(&self, f: &Poly<Self>, g: &Poly<Self>) -> Poly<Self> {
		let mut acc = Poly::zero();
		for c in f.coeffs().iter().rev() {
			acc = self.poly_mul(&acc, g);
			acc = self.poly_add(&acc, &self.poly_scalar(c.clone()));
		}
		acc
	}

	/// f(X^n).
	fn poly_expand(&self, f: &Poly<Self>, n: usize) -> Poly<Self> {
		debug_assert!(n >= 1);
		let Some(d) = f.deg() else {
			return Poly::zero();
		};
		let mut coeffs = vec![self.zero(); d * n + 1];
		for (i, c) in f.coeffs().iter().enumerate() {
			coeffs[i * n] = c.clone();
		}
		Poly::from_raw(coeffs)
	}

	/// Inverse of [`poly_expand`](Self::poly_expand): fails unless f is a
	/// polynomial in X^n.
	fn poly_contract(&self, f: &Poly<Self>, n: usize) -> Result<Poly<Self>, Error> {
		debug_assert!(n >= 1);
		let mut coeffs = Vec::with_capacity(f.len() / n + 1);
		for (i, c) in f.coeffs().iter().enumerate() {
			if i % n == 0 {
				coeffs.push(c.clone());
			} else if !self.is_zero(c) {
				return Err(Error::ContractionMismatch { n });
			}
		}
		Ok(self.poly_from_coeffs(coeffs))
	}

	/// f(X + c) by repeated synthetic division.
	fn poly_taylor_shift(&self, f: &Poly<Self>, c: &Self::Elem) -> Poly<Self> {
		let mut a = f.coeffs().to_vec();
		let n = a.len();
		for k in 0..n {
			for i in (k..n - 1).rev() {
				a[i] = self.add(&a[i], &self.mul(c, &a[i + 1]));
			}
		}
		self.poly_from_coeffs(a)
	}

	/// Transpose of [`poly_taylor_shift`](Self::poly_taylor_shift) on
	/// coefficient vectors of length `n`: the elementary update
	/// `a[i] += c·a[i+1]` becomes `a[i+1] += c·a[i]` and the whole schedule
	/// runs backwards.
	fn poly_taylor_shift_transpose(
		&self,
		lam: &[Self::Elem],
		c: &Self::Elem,
		n: usize,
	) -> Vec<Self::Elem> {
		let mut a: Vec<_> = lam
			.iter()
			.cloned()
			.chain(std::iter::repeat_with(|| self.zero()))
			.take(n)
			.collect();
		for k in (0..n).rev() {
			for i in k..n.saturating_sub(1) {
				a[i + 1] = self.add(&a[i + 1], &self.mul(c, &a[i]));
			}
		}
		a
	}

	/// Transposed multiplication: out[j] = Σ_k f_k·proj[j + k] for
	/// j < out_len. This is the transpose of `g ↦ f·g` acting on functionals,
	/// computed through one ordinary product of the reversed operand.
	fn poly_mul_trans(
		&self,
		f: &Poly<Self>,
		proj: &[Self::Elem],
		out_len: usize,
	) -> Vec<Self::Elem> {
		if f.is_zero() || proj.is_empty() {
			return vec![self.zero(); out_len];
		}
		let n = f.len();
		let rev: Vec<_> = f.coeffs().iter().rev().cloned().collect();
		let prod = mul_slices(self, &rev, proj);
		(0..out_len)
			.map(|j| {
				prod.get(n - 1 + j)
					.cloned()
					.unwrap_or_else(|| self.zero())
			})
			.collect()
	}

	/// Random polynomial of degree < len.
	fn poly_random(&self, len: usize, mut rng: impl RngCore) -> Poly<Self> {
		let coeffs = std::iter::repeat_with(|| self.random(&mut rng))
			.take(len)
			.collect();
		self.poly_from_coeffs(coeffs)
	}

	/// Random monic polynomial of degree exactly d.
	fn poly_random_monic(&self, d: usize, mut rng: impl RngCore) -> Poly<Self> {
		let mut coeffs: Vec<_> = std::iter::repeat_with(|| self.random(&mut rng))
			.take(d)
			.collect();
		coeffs.push(self.one());
		Poly::from_raw(coeffs)
	}
}

impl PolyRing for WordPrimeField {}

impl PolyRing for BigPrimeField {}

impl PolyRing for BinaryPrimeField {
	// In characteristic 2 the derivative keeps exactly the odd-degree
	// coefficients, one slot down.
	fn poly_derivative(&self, f: &Poly<Self>) -> Poly<Self> {
		let mut coeffs = vec![self.zero(); f.len().saturating_sub(1)];
		for (i, c) in f.coeffs().iter().enumerate().skip(1).step_by(2) {
			coeffs[i - 1] = *c;
		}
		self.poly_from_coeffs(coeffs)
	}
}

fn mul_schoolbook<A: PrimeField>(fp: &A, a: &[A::Elem], b: &[A::Elem]) -> Vec<A::Elem> {
	let mut out = vec![fp.zero(); a.len() + b.len() - 1];
	for (i, a_i) in a.iter().enumerate() {
		if fp.is_zero(a_i) {
			continue;
		}
		for (j, b_j) in b.iter().enumerate() {
			out[i + j] = fp.add(&out[i + j], &fp.mul(a_i, b_j));
		}
	}
	out
}

fn add_assign_at<A: PrimeField>(fp: &A, acc: &mut Vec<A::Elem>, src: &[A::Elem], offset: usize) {
	if acc.len() < offset + src.len() {
		acc.resize(offset + src.len(), fp.zero());
	}
	for (i, s) in src.iter().enumerate() {
		acc[offset + i] = fp.add(&acc[offset + i], s);
	}
}

fn add_slices<A: PrimeField>(fp: &A, a: &[A::Elem], b: &[A::Elem]) -> Vec<A::Elem> {
	let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
	let mut out = long.to_vec();
	for (i, s) in short.iter().enumerate() {
		out[i] = fp.add(&out[i], s);
	}
	out
}

fn sub_assign_at<A: PrimeField>(fp: &A, acc: &mut Vec<A::Elem>, src: &[A::Elem], offset: usize) {
	if acc.len() < offset + src.len() {
		acc.resize(offset + src.len(), fp.zero());
	}
	for (i, s) in src.iter().enumerate() {
		acc[offset + i] = fp.sub(&acc[offset + i], s);
	}
}

/// Product of two nonempty coefficient slices, Karatsuba above the threshold.
/// The result has length a.len() + b.len() - 1 and may carry trailing zeros.
pub(crate) fn mul_slices<A: PrimeField>(fp: &A, a: &[A::Elem], b: &[A::Elem]) -> Vec<A::Elem> {
	if a.is_empty() || b.is_empty() {
		return Vec::new();
	}
	if a.len().min(b.len()) <= KARATSUBA_THRESHOLD {
		return mul_schoolbook(fp, a, b);
	}
	let h = a.len().max(b.len()) / 2;
	let (a0, a1) = a.split_at(h.min(a.len()));
	let (b0, b1) = b.split_at(h.min(b.len()));

	let z0 = mul_slices(fp, a0, b0);
	let z2 = if a1.is_empty() || b1.is_empty() {
		Vec::new()
	} else {
		mul_slices(fp, a1, b1)
	};
	let a01 = add_slices(fp, a0, a1);
	let b01 = add_slices(fp, b0, b1);
	let mut z1 = mul_slices(fp, &a01, &b01);
	sub_assign_at(fp, &mut z1, &z0, 0);
	sub_assign_at(fp, &mut z1, &z2, 0);

	let mut out = vec![fp.zero(); a.len() + b.len() - 1];
	add_assign_at(fp, &mut out, &z0, 0);
	add_assign_at(fp, &mut out, &z1, h);
	add_assign_at(fp, &mut out, &z2, 2 * h);
	out.truncate(a.len() + b.len() - 1);
	out
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use proptest::prelude::*;
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;

	fn f17() -> WordPrimeField {
		WordPrimeField::new(17).unwrap()
	}

	fn poly(fp: &WordPrimeField, coeffs: &[i64]) -> Poly<WordPrimeField> {
		fp.poly_from_coeffs(coeffs.iter().map(|&c| fp.from_i64(c)).collect())
	}

	#[test]
	fn test_normalization() {
		let fp = f17();
		assert_eq!(poly(&fp, &[1, 2, 0, 0]), poly(&fp, &[1, 2]));
		assert!(poly(&fp, &[0, 0]).is_zero());
		assert_eq!(poly(&fp, &[0, 0]).deg(), None);
	}

	#[test]
	fn test_divrem_reconstructs() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..50 {
			let f = fp.poly_random(20, &mut rng);
			let g = fp.poly_random_monic(7, &mut rng);
			let (q, r) = fp.poly_divrem(&f, &g).unwrap();
			assert!(r.deg() < g.deg());
			assert_eq!(fp.poly_add(&fp.poly_mul(&q, &g), &r), f);
		}
	}

	#[test]
	fn test_divrem_by_zero() {
		let fp = f17();
		assert_matches!(
			fp.poly_divrem(&fp.poly_one(), &Poly::zero()),
			Err(Error::DivisionByZero)
		);
	}

	#[test]
	fn test_gcd_of_common_multiple() {
		let fp = f17();
		let a = poly(&fp, &[1, 1]); // X + 1
		let f = fp.poly_mul(&a, &poly(&fp, &[3, 0, 1]));
		let g = fp.poly_mul(&a, &poly(&fp, &[5, 2]));
		let d = fp.poly_gcd(&f, &g).unwrap();
		assert_eq!(fp.poly_rem(&d, &a).unwrap(), Poly::zero());
		assert_eq!(d.deg(), Some(1));
	}

	#[test]
	fn test_xgcd_bezout() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..20 {
			let f = fp.poly_random(9, &mut rng);
			let g = fp.poly_random(6, &mut rng);
			if f.is_zero() && g.is_zero() {
				continue;
			}
			let (d, s, t) = fp.poly_xgcd(&f, &g).unwrap();
			let combo = fp.poly_add(&fp.poly_mul(&s, &f), &fp.poly_mul(&t, &g));
			assert_eq!(combo, d);
		}
	}

	#[test]
	fn test_inverse_mod() {
		let fp = f17();
		let m = poly(&fp, &[3, 1, 0, 1]);
		let f = poly(&fp, &[2, 5]);
		let inv = fp.poly_inverse_mod(&f, &m).unwrap().unwrap();
		let prod = fp.poly_rem(&fp.poly_mul(&f, &inv), &m).unwrap();
		assert_eq!(prod, fp.poly_one());
	}

	#[test]
	fn test_inv_series() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(2);
		for _ in 0..20 {
			let mut f = fp.poly_random(12, &mut rng);
			if fp.is_zero(&fp.poly_coeff(&f, 0)) {
				f = fp.poly_add(&f, &fp.poly_one());
			}
			let g = fp.poly_inv_series(&f, 25).unwrap();
			let prod = fp.poly_truncate(&fp.poly_mul(&f, &g), 25);
			assert_eq!(prod, fp.poly_one());
		}
	}

	#[test]
	fn test_compose_matches_eval() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(3);
		let f = fp.poly_random(6, &mut rng);
		let g = fp.poly_random(4, &mut rng);
		let comp = fp.poly_compose(&f, &g);
		for x in 0..17 {
			let x = fp.from_i64(x);
			assert_eq!(fp.poly_eval(&comp, &x), fp.poly_eval(&f, &fp.poly_eval(&g, &x)));
		}
	}

	#[test]
	fn test_expand_contract_roundtrip() {
		let fp = f17();
		let f = poly(&fp, &[4, 0, 9, 1]);
		let e = fp.poly_expand(&f, 5);
		assert_eq!(e.deg(), Some(15));
		assert_eq!(fp.poly_contract(&e, 5).unwrap(), f);
		let shifted = fp.poly_add(&e, &fp.poly_x());
		assert_matches!(
			fp.poly_contract(&shifted, 5),
			Err(Error::ContractionMismatch { n: 5 })
		);
	}

	#[test]
	fn test_taylor_shift_roundtrip() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(4);
		let f = fp.poly_random(9, &mut rng);
		let c = fp.from_i64(5);
		let shifted = fp.poly_taylor_shift(&f, &c);
		// Spot check at a point: shifted(x) == f(x + c).
		let x = fp.from_i64(11);
		assert_eq!(fp.poly_eval(&shifted, &x), fp.poly_eval(&f, &fp.add(&x, &c)));
		assert_eq!(fp.poly_taylor_shift(&shifted, &fp.neg(&c)), f);
	}

	#[test]
	fn test_taylor_shift_transpose_is_transpose() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(5);
		let n = 8;
		let c = fp.from_i64(3);
		// <T(f), l> == <f, T^t(l)> for random f, l.
		for _ in 0..10 {
			let f = fp.poly_random(n, &mut rng);
			let lam: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng))
				.take(n)
				.collect();
			let tf = fp.poly_taylor_shift(&f, &c);
			let ttl = fp.poly_taylor_shift_transpose(&lam, &c, n);
			let lhs = (0..n).fold(fp.zero(), |acc, i| {
				fp.add(&acc, &fp.mul(&fp.poly_coeff(&tf, i), &lam[i]))
			});
			let rhs = (0..n).fold(fp.zero(), |acc, i| {
				fp.add(&acc, &fp.mul(&fp.poly_coeff(&f, i), &ttl[i]))
			});
			assert_eq!(lhs, rhs);
		}
	}

	#[test]
	fn test_mul_trans_matches_naive() {
		let fp = f17();
		let mut rng = StdRng::seed_from_u64(6);
		let f = fp.poly_random(7, &mut rng);
		let proj: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng))
			.take(13)
			.collect();
		let out = fp.poly_mul_trans(&f, &proj, 7);
		for (j, out_j) in out.iter().enumerate() {
			let mut want = fp.zero();
			for (k, f_k) in f.coeffs().iter().enumerate() {
				if j + k < proj.len() {
					want = fp.add(&want, &fp.mul(f_k, &proj[j + k]));
				}
			}
			assert_eq!(*out_j, want);
		}
	}

	#[test]
	fn test_binary_derivative() {
		let f2 = BinaryPrimeField::new();
		// X^5 + X^4 + X^2 + 1 -> 5X^4 + 4X^3 + 2X = X^4
		let f = f2.poly_from_coeffs(
			[1i64, 0, 1, 0, 1, 1].iter().map(|&c| f2.from_i64(c)).collect(),
		);
		let d = f2.poly_derivative(&f);
		assert_eq!(d, f2.poly_monomial(f2.one(), 4));
	}

	proptest! {
		#[test]
		fn test_karatsuba_matches_schoolbook(a_len in 1usize..90, b_len in 1usize..90, seed in any::<u64>()) {
			let fp = f17();
			let mut rng = StdRng::seed_from_u64(seed);
			let a: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng)).take(a_len).collect();
			let b: Vec<_> = std::iter::repeat_with(|| fp.random(&mut rng)).take(b_len).collect();
			let fast = mul_slices(&fp, &a, &b);
			let slow = mul_schoolbook(&fp, &a, &b);
			prop_assert_eq!(fast, slow);
		}

		#[test]
		fn test_mul_commutes(a_len in 0usize..40, b_len in 0usize..40, seed in any::<u64>()) {
			let fp = f17();
			let mut rng = StdRng::seed_from_u64(seed);
			let f = fp.poly_random(a_len, &mut rng);
			let g = fp.poly_random(b_len, &mut rng);
			prop_assert_eq!(fp.poly_mul(&f, &g), fp.poly_mul(&g, &f));
		}

		#[test]
		fn test_mul_distributes(len in 0usize..30, seed in any::<u64>()) {
			let fp = f17();
			let mut rng = StdRng::seed_from_u64(seed);
			let f = fp.poly_random(len, &mut rng);
			let g = fp.poly_random(len, &mut rng);
			let h = fp.poly_random(len, &mut rng);
			let lhs = fp.poly_mul(&f, &fp.poly_add(&g, &h));
			let rhs = fp.poly_add(&fp.poly_mul(&f, &g), &fp.poly_mul(&f, &h));
			prop_assert_eq!(lhs, rhs);
		}
	}
}
