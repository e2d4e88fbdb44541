// Copyright 2025 Irreducible Inc.

//! Artin-Schreier roots: solving z^p - z = alpha inside a tower field.
//!
//! A root exists exactly when the absolute trace of alpha vanishes. At height
//! 0 the additive operator z -> z^p - z is a small F_p-linear system. Above
//! that the solver follows Couveignes: with sigma the relative Frobenius of
//! the top step, any root satisfies sigma(z) - z = beta for a computable
//! beta, the x-digits of that difference equation form a triangular system,
//! and what remains of alpha after subtracting the digit solution lives one
//! level down, where the same routine recurses.

use schreier_field::{Matrix, Poly, PolyRing};
use tracing::instrument;

use crate::{
	element::FieldElement,
	error::Error,
	tower::{FieldId, Tower},
};

impl<A: PolyRing> Tower<A> {
	/// Finds z in `field` with z^p - z = alpha.
	///
	/// Alpha may live in `field` itself, in any field on its subfield chain,
	/// or be a prime-field scalar; for a strict subfield a root always
	/// exists, otherwise the absolute trace of alpha must vanish. The target
	/// must be a stem field. Which of the p roots is returned is unspecified.
	#[instrument("Tower::couveignes", skip_all, level = "debug")]
	pub fn couveignes(
		&self,
		field: FieldId,
		alpha: &FieldElement<A>,
	) -> Result<FieldElement<A>, Error> {
		let node = self.node(field)?;
		if !node.is_stem() {
			return Err(Error::NotSupported);
		}
		let afield = match alpha.field {
			None | Some(FieldId::PRIME) => field,
			Some(f) => f,
		};
		if afield == field {
			let z = self.couveignes_same(field, &alpha.poly)?;
			return Ok(FieldElement::attached(field, z));
		}
		if !self.on_chain(afield, field) {
			return Err(Error::NotInSameField);
		}
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let p = self.char_usize()?;
		if afield == sub {
			// Split off a scalar multiple of the generator: for z = u + s·x,
			// z^p - z = (u^p - u) + s·eta, and s = Tr(alpha)/Tr(eta) leaves a
			// trace-zero remainder that is solvable in the subfield.
			let c = self.rel_trace_const(field)?;
			let t = self.trace_scalar(sub, &alpha.poly)?;
			let cinv = self.fp.invert(&c).ok_or(Error::DivisionByZero)?;
			let s = self.fp.mul(&t, &cinv);
			let eta = node.eta.as_ref().ok_or(Error::NoSubField)?;
			let rest = self.fp.poly_sub(&alpha.poly, &self.fp.poly_scale(eta, &s));
			let u = self.couveignes_same(sub, &rest)?;
			let mut digits = vec![Poly::zero(); p];
			digits[0] = u;
			let up = self.lift_up_raw(field, &digits)?;
			let x = node.modulus.rem(&self.fp, &self.fp.poly_x());
			let z = self.fp.poly_add(&up, &self.fp.poly_scale(&x, &s));
			return Ok(FieldElement::attached(field, z));
		}
		// Roots embed along the chain, so solve further down and lift.
		let below = self.couveignes(sub, alpha)?;
		let mut digits = vec![Poly::zero(); p];
		digits[0] = below.poly;
		let z = self.lift_up_raw(field, &digits)?;
		Ok(FieldElement::attached(field, z))
	}

	/// Root of z^p - z = alpha for a reduced residue of `fid`.
	pub(crate) fn couveignes_same(&self, fid: FieldId, alpha: &Poly<A>) -> Result<Poly<A>, Error> {
		let t = self.trace_scalar(fid, alpha)?;
		if !self.fp.is_zero(&t) {
			// X^p - X - alpha is then irreducible, so no root exists here.
			return Err(Error::IsIrreducible);
		}
		let node = self.node(fid)?;
		let _span = tracing::debug_span!(
			"couveignes step",
			height = node.height,
			degree = node.modulus.deg()
		)
		.entered();
		if node.height == 0 {
			return self.artin_root(fid, alpha);
		}
		let p = self.char_usize()?;
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let m = self.nodes[sub.0].modulus.deg();

		// Any root satisfies sigma(z) - z = beta with beta the sum of the
		// first m Frobenius iterates of alpha. sigma fixes the subfield and
		// maps x to x + c, so digit i of beta is
		// sum_{j > i} C(j, i)·c^(j-i)·b_j, a triangular system in the digits
		// b_j of z that we solve top down with b_0 pinned to zero.
		let beta = self.sum_frobenius(fid, alpha, m as u64, 1)?;
		let c = self.rel_trace_const(fid)?;
		let beta_digits = self.push_down_raw(fid, &beta)?;
		debug_assert!(beta_digits[p - 1].is_zero());

		let mut binom = vec![vec![self.fp.zero(); p]; p];
		for j in 0..p {
			binom[j][0] = self.fp.one();
			for i in 1..=j {
				binom[j][i] = self.fp.add(&binom[j - 1][i - 1], &binom[j - 1][i]);
			}
		}
		let mut cpow = vec![self.fp.one(); p + 1];
		for i in 1..=p {
			cpow[i] = self.fp.mul(&cpow[i - 1], &c);
		}

		let cinv = self.fp.invert(&c).ok_or(Error::DivisionByZero)?;
		let mut b = vec![Poly::zero(); p];
		for j in (1..p).rev() {
			let mut rhs = beta_digits[j - 1].clone();
			for jp in j + 1..p {
				let w = self.fp.mul(&binom[jp][j - 1], &cpow[jp - j + 1]);
				rhs = self.fp.poly_sub(&rhs, &self.fp.poly_scale(&b[jp], &w));
			}
			let jinv = self
				.fp
				.invert(&self.fp.from_i64(j as i64))
				.ok_or(Error::DivisionByZero)?;
			b[j] = self.fp.poly_scale(&rhs, &self.fp.mul(&jinv, &cinv));
		}
		let z0 = self.lift_up_raw(fid, &b)?;

		// What z0 misses of alpha is fixed by sigma, hence lies one level
		// down.
		let pz0 = self.fp.poly_sub(
			&node
				.modulus
				.powmod(&self.fp, &z0, &self.fp.characteristic_limbs()),
			&z0,
		);
		let eps = self.fp.poly_sub(alpha, &pz0);
		let eps_digits = self.push_down_raw(fid, &eps)?;
		for d in &eps_digits[1..] {
			debug_assert!(d.is_zero());
		}
		let u = self.couveignes_same(sub, &eps_digits[0])?;
		let mut lift = vec![Poly::zero(); p];
		lift[0] = u;
		let up = self.lift_up_raw(fid, &lift)?;
		Ok(self.fp.poly_add(&z0, &up))
	}

	/// Height-0 case: invert the additive operator z -> z^p - z directly.
	///
	/// The operator's kernel is F_p and its image is the trace-zero
	/// hyperplane, so dropping the constant coordinate and one well-chosen
	/// row leaves an invertible (d-1)-square system, cached per node.
	fn artin_root(&self, fid: FieldId, alpha: &Poly<A>) -> Result<Poly<A>, Error> {
		let node = self.node(fid)?;
		let d = node.modulus.deg();
		if d == 1 {
			// Zero is the only trace-zero scalar; its roots are scalars and
			// we pick zero.
			return Ok(Poly::zero());
		}
		let (inv, row) = self.artin_data(fid)?;
		let mut rhs = vec![self.fp.zero(); d - 1];
		for i in 0..d {
			if i == *row {
				continue;
			}
			let pos = if i < *row { i } else { i - 1 };
			rhs[pos] = self.fp.poly_coeff(alpha, i);
		}
		let mut sol = vec![self.fp.zero(); d - 1];
		inv.mul_vec_into(&self.fp, &rhs, &mut sol);
		let mut coeffs = vec![self.fp.zero(); d];
		coeffs[1..].clone_from_slice(&sol);
		let z = self.fp.poly_from_coeffs(coeffs);
		debug_assert_eq!(
			self.fp.poly_sub(
				&node
					.modulus
					.powmod(&self.fp, &z, &self.fp.characteristic_limbs()),
				&z,
			),
			alpha.clone()
		);
		Ok(z)
	}

	fn artin_data(&self, fid: FieldId) -> Result<&(Matrix<A>, usize), Error> {
		let node = self.node(fid)?;
		if let Some(data) = node.artin.get() {
			return Ok(data);
		}
		let d = node.modulus.deg();
		let limbs = self.fp.characteristic_limbs();
		let cols: Vec<Poly<A>> = (1..d)
			.map(|j| {
				let xj = self.fp.poly_monomial(self.fp.one(), j);
				self.fp
					.poly_sub(&node.modulus.powmod(&self.fp, &xj, &limbs), &xj)
			})
			.collect();
		for row in 0..d {
			let mut entries = Vec::with_capacity((d - 1) * (d - 1));
			for i in 0..d {
				if i == row {
					continue;
				}
				for col in &cols {
					entries.push(self.fp.poly_coeff(col, i));
				}
			}
			let m = Matrix::new(d - 1, d - 1, &entries)?;
			let mut inv = Matrix::zeros(&self.fp, d - 1, d - 1);
			if m.inverse_into(&self.fp, &mut inv).is_ok() {
				return Ok(node.artin.get_or_init(|| (inv, row)));
			}
		}
		// Reachable only if the modulus was not irreducible after all.
		Err(Error::NotIrreducible)
	}
}
