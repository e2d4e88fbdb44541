// Copyright 2025 Irreducible Inc.

//! Change of coordinates between a field and its subfield.
//!
//! A tower step K/L with relation x^p - x = y rewrites the univariate basis
//! {x^c} of K into the mixed basis {y^a x^j}, j < p. Push-down is a
//! divide-and-conquer on blocks of p-power size driven by the identity
//! X^(p^k) = X + S_k(Y) with S_k(Y) = Y + Y^p + ... + Y^(p^(k-1)); lift-up
//! runs the exact transpose of that recursion on trace projections and
//! finishes with a power-projection reconstruction, so both directions cost
//! softly linear time.

use schreier_field::{primes::num_pits, Poly, PolyRing};

use crate::{
	element::FieldElement,
	error::Error,
	tower::{FieldId, Tower},
};

fn add_into<A: PolyRing>(fp: &A, dst: &mut [A::Elem], src: &[A::Elem]) {
	for (d, s) in dst.iter_mut().zip(src) {
		*d = fp.add(d, s);
	}
}

/// dst[a + s] += src[a]. Content shifted past the end must be zero.
fn shift_add<A: PolyRing>(fp: &A, dst: &mut [A::Elem], src: &[A::Elem], s: usize) {
	let cap = dst.len();
	for (a, v) in src.iter().enumerate() {
		if a + s < cap {
			dst[a + s] = fp.add(&dst[a + s], v);
		} else {
			debug_assert!(fp.is_zero(v));
		}
	}
}

/// dst[a] += src[a + s], the transpose of [`shift_add`].
fn unshift_add<A: PolyRing>(fp: &A, dst: &mut [A::Elem], src: &[A::Elem], s: usize) {
	for a in 0..dst.len() {
		if a + s < src.len() {
			dst[a] = fp.add(&dst[a], &src[a + s]);
		}
	}
}

/// Multiplies a mixed representation by X + S_t(Y). The X-shift wraps the
/// top digit through X^p = X + Y.
fn mul_step<A: PolyRing>(fp: &A, p: usize, digits: &[Vec<A::Elem>], t: usize) -> Vec<Vec<A::Elem>> {
	let cap = digits[0].len();
	let mut out: Vec<Vec<A::Elem>> = (0..p).map(|_| vec![fp.zero(); cap]).collect();
	shift_add(fp, &mut out[0], &digits[p - 1], 1);
	add_into(fp, &mut out[1], &digits[p - 1]);
	for j in 1..p {
		add_into(fp, &mut out[j], &digits[j - 1]);
	}
	for (j, digit) in digits.iter().enumerate() {
		for u in 0..t {
			shift_add(fp, &mut out[j], digit, p.pow(u as u32));
		}
	}
	out
}

/// Transpose of [`mul_step`]: same data flow with every elementary update
/// reversed.
fn trans_mul_step<A: PolyRing>(
	fp: &A,
	p: usize,
	lam: &[Vec<A::Elem>],
	t: usize,
) -> Vec<Vec<A::Elem>> {
	let cap = lam[0].len();
	let mut out: Vec<Vec<A::Elem>> = (0..p).map(|_| vec![fp.zero(); cap]).collect();
	unshift_add(fp, &mut out[p - 1], &lam[0], 1);
	add_into(fp, &mut out[p - 1], &lam[1]);
	for j in 1..p {
		add_into(fp, &mut out[j - 1], &lam[j]);
	}
	for (j, l) in lam.iter().enumerate() {
		for u in 0..t {
			unshift_add(fp, &mut out[j], l, p.pow(u as u32));
		}
	}
	out
}

/// Rewrites a block of p^k univariate coefficients into p digit rows of
/// Y-coefficients with capacity p^(k-1) each.
///
/// The Horner scheme over the p sub-blocks accumulates
/// sum_i T^i(G_i) where T multiplies by X^(p^(k-1)) = X + S_(k-1)(Y).
fn push_down_rec<A: PolyRing>(fp: &A, p: usize, f: &[A::Elem], k: usize) -> Vec<Vec<A::Elem>> {
	if k == 0 {
		let mut digits: Vec<Vec<A::Elem>> = (0..p).map(|_| vec![fp.zero(); 1]).collect();
		digits[0][0] = f[0].clone();
		return digits;
	}
	let block = f.len() / p;
	let mut acc: Vec<Vec<A::Elem>> = push_down_rec(fp, p, &f[(p - 1) * block..], k - 1)
		.into_iter()
		.map(|mut d| {
			d.resize(block, fp.zero());
			d
		})
		.collect();
	for i in (0..p - 1).rev() {
		acc = mul_step(fp, p, &acc, k - 1);
		let g = push_down_rec(fp, p, &f[i * block..(i + 1) * block], k - 1);
		for (d, gd) in acc.iter_mut().zip(&g) {
			add_into(fp, d, gd);
		}
	}
	acc
}

/// Transpose of [`push_down_rec`] acting on dual digit vectors: the chunk
/// dual for block i is the restriction of (T^t)^i applied to the input.
fn trans_push_down_rec<A: PolyRing>(
	fp: &A,
	p: usize,
	lam: Vec<Vec<A::Elem>>,
	k: usize,
) -> Vec<A::Elem> {
	if k == 0 {
		return vec![lam[0][0].clone()];
	}
	let cap = lam[0].len();
	let sub_cap = (cap / p).max(1);
	let restrict =
		|l: &[Vec<A::Elem>]| -> Vec<Vec<A::Elem>> { l.iter().map(|d| d[..sub_cap].to_vec()).collect() };
	let mut lam = lam;
	let mut chunks = Vec::with_capacity(p);
	for _ in 0..p - 1 {
		chunks.push(restrict(&lam));
		lam = trans_mul_step(fp, p, &lam, k - 1);
	}
	chunks.push(restrict(&lam));
	let mut out = Vec::with_capacity(cap * p);
	for chunk in chunks {
		out.extend(trans_push_down_rec(fp, p, chunk, k - 1));
	}
	out
}

impl<A: PolyRing> Tower<A> {
	/// Digits of a stem-field residue over its subfield, constant digit
	/// first, each reduced in the subfield.
	pub(crate) fn push_down_raw(&self, fid: FieldId, f: &Poly<A>) -> Result<Vec<Poly<A>>, Error> {
		let node = self.node(fid)?;
		debug_assert!(node.is_stem());
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let p = self.char_usize()?;
		let n = node.modulus.deg();
		let k = num_pits((n - 1) as u64, p as u64) as usize;
		let mut buf = vec![self.fp.zero(); p.pow(k as u32)];
		for (slot, c) in buf.iter_mut().zip(f.coeffs()) {
			*slot = c.clone();
		}
		let digits = push_down_rec(&self.fp, p, &buf, k);
		let sub_node = &self.nodes[sub.0];
		let out = digits
			.into_iter()
			.map(|d| {
				let v = self.fp.poly_from_coeffs(d);
				if node.plusone {
					// The relation was shifted: Y stands for x_sub + 1.
					self.fp.poly_taylor_shift(&v, &self.fp.one())
				} else if node.twopminusone {
					// The relation was twisted: Y stands for x_sub^(2p-1).
					sub_node
						.modulus
						.rem(&self.fp, &self.fp.poly_expand(&v, 2 * p - 1))
				} else {
					v
				}
			})
			.collect();
		Ok(out)
	}

	/// Inverse of [`push_down_raw`]: rebuilds the residue from p subfield
	/// digits.
	///
	/// Works in the dual: the digits are twisted into per-digit trace
	/// functionals (Tr(x^(j+k)) vanishes except at p-1 and 2p-2, hence the
	/// negated reversal with a wrapped corner), pushed through the
	/// transposed recursion to power projections Tr(e·x^c), and the element
	/// is recovered from those by a reversed product with rev(Q) and a
	/// division by Q'.
	pub(crate) fn lift_up_raw(&self, fid: FieldId, digits: &[Poly<A>]) -> Result<Poly<A>, Error> {
		let node = self.node(fid)?;
		debug_assert!(node.is_stem());
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let p = self.char_usize()?;
		debug_assert_eq!(digits.len(), p);
		let n = node.modulus.deg();
		let m = self.nodes[sub.0].modulus.deg();

		let mut w = Vec::with_capacity(p);
		for j in 0..p - 1 {
			w.push(self.fp.poly_neg(&digits[p - 1 - j]));
		}
		w.push(
			self.fp
				.poly_neg(&self.fp.poly_add(&digits[0], &digits[p - 1])),
		);

		let tm = self.trace_mult(sub)?;
		let sub_node = &self.nodes[sub.0];
		let mu: Vec<Vec<A::Elem>> = w
			.iter()
			.map(|wj| {
				let beta = tm.apply(&self.fp, wj);
				if node.plusone {
					self.fp.poly_taylor_shift_transpose(&beta, &self.fp.one(), m)
				} else if node.twopminusone {
					let need = (2 * p - 1) * (m - 1) + 1;
					let ext = sub_node.modulus.trans_rem(&self.fp, &beta, need);
					(0..m).map(|a| ext[(2 * p - 1) * a].clone()).collect()
				} else {
					beta
				}
			})
			.collect();

		let k = num_pits((n - 1) as u64, p as u64) as usize;
		let cap = p.pow((k - 1) as u32);
		let lam: Vec<Vec<A::Elem>> = mu
			.into_iter()
			.map(|mut v| {
				v.resize(cap, self.fp.zero());
				v
			})
			.collect();
		let pi = trans_push_down_rec(&self.fp, p, lam, k);

		let pi_poly = self.fp.poly_from_coeffs(pi[..n].to_vec());
		let qrev = self.fp.poly_reverse(node.modulus.q(), n);
		let prod = self.fp.poly_truncate(&self.fp.poly_mul(&pi_poly, &qrev), n);
		let amend = self.fp.poly_reverse(&prod, n - 1);
		let inv_d = self.inv_derivative(fid)?;
		Ok(node.modulus.mulmod(&self.fp, &amend, inv_d))
	}

	/// Writes a stem-field element as p digits over the subfield. Only stem
	/// fields carry the digit recursion; extended twins are served by
	/// [`to_bivariate`](Self::to_bivariate).
	pub fn push_down(&self, a: &FieldElement<A>) -> Result<Vec<FieldElement<A>>, Error> {
		let fid = a.field.ok_or(Error::NoSubField)?;
		let node = self.node(fid)?;
		if !node.is_stem() {
			return Err(Error::NoSubField);
		}
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let digits = self.push_down_raw(fid, &a.poly)?;
		Ok(digits
			.into_iter()
			.map(|d| FieldElement::attached(sub, d))
			.collect())
	}

	/// Rebuilds an element of the overfield from p digits; the digits'
	/// shared parent decides which tower step to climb. Missing trailing
	/// digits count as zero and entries past the p-th are ignored.
	pub fn lift_up(&self, digits: &[FieldElement<A>]) -> Result<FieldElement<A>, Error> {
		let p = self.char_usize()?;
		let mut lower = None;
		for d in digits.iter().take(p) {
			lower = self.joint2(lower, d.field)?;
		}
		let lower = lower.ok_or(Error::NoOverField)?;
		let upper = self.nodes[lower.0].overfield.ok_or(Error::NoOverField)?;
		let mut polys: Vec<Poly<A>> = digits.iter().take(p).map(|d| d.poly.clone()).collect();
		polys.resize(p, Poly::zero());
		Ok(FieldElement::attached(
			upper,
			self.lift_up_raw(upper, &polys)?,
		))
	}

	/// Coordinates of an element over its subfield, virtual or not. Stem
	/// fields go through [`push_down`](Self::push_down); extended fields take
	/// the dual-basis expansion along powers of rho, one relative trace per
	/// coefficient.
	pub fn to_bivariate(&self, a: &FieldElement<A>) -> Result<Vec<FieldElement<A>>, Error> {
		let fid = a.field.ok_or(Error::NoSubField)?;
		let node = self.node(fid)?;
		let Some(stem) = node.stem else {
			return self.push_down(a);
		};
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let rho = node.rho.as_ref().ok_or(Error::NotSupported)?;
		let p = self.char_usize()?;
		let stem_mod = &self.nodes[stem.0].modulus;

		// t_i = Tr(e·rho^i) down one tower step.
		let mut t = Vec::with_capacity(p);
		let mut w = a.poly.clone();
		for i in 0..p {
			let digs = self.push_down_raw(stem, &w)?;
			t.push(self.fp.poly_neg(&digs[p - 1]));
			if i + 1 < p {
				w = stem_mod.mulmod(&self.fp, &w, rho);
			}
		}

		// Z^p - Z - alpha has derivative -1, and its quotient by (Z - rho)
		// yields the dual basis of {rho^j}: c_0 = t_0 - t_{p-1} and
		// c_j = -t_{p-1-j} for j >= 1.
		let mut out = Vec::with_capacity(p);
		out.push(FieldElement::attached(
			sub,
			self.fp.poly_sub(&t[0], &t[p - 1]),
		));
		for j in 1..p {
			out.push(FieldElement::attached(sub, self.fp.poly_neg(&t[p - 1 - j])));
		}
		Ok(out)
	}

	/// Inverse of [`to_bivariate`]: assembles an element from coefficients
	/// over the subfield. Stem fields go through the lift-up transform;
	/// extended fields run Horner in rho. Length follows the
	/// [`lift_up`](Self::lift_up) rule, padding short inputs with zeros and
	/// ignoring entries past the p-th.
	pub fn to_univariate(
		&self,
		field: FieldId,
		coeffs: &[FieldElement<A>],
	) -> Result<FieldElement<A>, Error> {
		let node = self.node(field)?;
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let p = self.char_usize()?;
		for c in coeffs.iter().take(p) {
			self.joint2(Some(sub), c.field)?;
		}
		let mut polys: Vec<Poly<A>> = coeffs.iter().take(p).map(|c| c.poly.clone()).collect();
		polys.resize(p, Poly::zero());
		let Some(stem) = node.stem else {
			return Ok(FieldElement::attached(
				field,
				self.lift_up_raw(field, &polys)?,
			));
		};
		let rho = node.rho.as_ref().ok_or(Error::NotSupported)?;
		let stem_mod = &self.nodes[stem.0].modulus;
		let mut acc = Poly::zero();
		for c in polys.iter().rev() {
			acc = stem_mod.mulmod(&self.fp, &acc, rho);
			if !c.is_zero() {
				let mut digs = vec![Poly::zero(); p];
				digs[0] = c.clone();
				acc = self.fp.poly_add(&acc, &self.lift_up_raw(stem, &digs)?);
			}
		}
		Ok(FieldElement::attached(field, acc))
	}
}
