// Copyright 2025 Irreducible Inc.

use std::fmt;

use itertools::Itertools;
use schreier_field::{Poly, PolyRing};

use crate::{
	error::Error,
	tower::{FieldId, Tower},
};

/// An element of one field in a tower, tagged with its parent.
///
/// The representation is a reduced residue: for stem fields a polynomial in
/// the field's own generator, for extended fields a polynomial in the stem
/// twin's generator. A `None` parent marks the generic zero (and its powers),
/// which combines with elements of any field.
///
/// There is no `PartialEq`: equality depends on the coercion rules and goes
/// through [`Tower::eq`].
#[derive(Clone, Debug)]
pub struct FieldElement<A: PolyRing> {
	pub(crate) field: Option<FieldId>,
	pub(crate) poly: Poly<A>,
}

impl<A: PolyRing> FieldElement<A> {
	/// The generic zero, usable with elements of any field.
	pub fn zero() -> Self {
		Self {
			field: None,
			poly: Poly::zero(),
		}
	}

	pub(crate) fn attached(field: FieldId, poly: Poly<A>) -> Self {
		Self {
			field: Some(field),
			poly,
		}
	}

	pub fn field(&self) -> Option<FieldId> {
		self.field
	}

	pub fn is_zero(&self) -> bool {
		self.poly.is_zero()
	}

	/// Coordinates over the parent's polynomial basis, lowest first.
	pub fn coeffs(&self) -> &[A::Elem] {
		self.poly.coeffs()
	}
}

impl<A: PolyRing> fmt::Display for FieldElement<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.poly)
	}
}

/// Dense polynomial whose coefficients live in one field of a tower.
///
/// Used for explicit moduli, defining polynomials and evaluation; this is a
/// container, not an arithmetic ring.
#[derive(Clone, Debug)]
pub struct FieldPolynomial<A: PolyRing> {
	field: Option<FieldId>,
	coeffs: Vec<FieldElement<A>>,
}

impl<A: PolyRing> FieldPolynomial<A> {
	/// Builds a polynomial after checking that all coefficients share a
	/// parent (prime-field values and generic zeros coerce). Trailing zeros
	/// are dropped.
	pub fn from_coeffs(
		tower: &Tower<A>,
		mut coeffs: Vec<FieldElement<A>>,
	) -> Result<Self, Error> {
		let mut field = None;
		for c in &coeffs {
			field = tower.joint2(field, c.field)?;
		}
		while coeffs.last().is_some_and(|c| c.is_zero()) {
			coeffs.pop();
		}
		Ok(Self { field, coeffs })
	}

	pub(crate) fn from_parts(field: Option<FieldId>, coeffs: Vec<FieldElement<A>>) -> Self {
		Self { field, coeffs }
	}

	/// The shared coefficient field, `None` when every coefficient is a
	/// generic zero.
	pub fn field(&self) -> Option<FieldId> {
		self.field
	}

	pub fn degree(&self) -> Option<usize> {
		self.coeffs.len().checked_sub(1)
	}

	pub fn coeffs(&self) -> &[FieldElement<A>] {
		&self.coeffs
	}

	/// Horner evaluation under the tower's coercion rules.
	pub fn eval(&self, tower: &Tower<A>, x: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let mut acc = FieldElement::zero();
		for c in self.coeffs.iter().rev() {
			acc = tower.add(&tower.mul(&acc, x)?, c)?;
		}
		Ok(acc)
	}
}

impl<A: PolyRing> fmt::Display for FieldPolynomial<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]", self.coeffs.iter().map(|c| &c.poly).format("; "))
	}
}

impl<A: PolyRing> Tower<A> {
	/// Merges the parents of two operands: equal fields stay, a generic zero
	/// yields to anything, prime-field values coerce up into any field of the
	/// tower. Everything else is a mismatch.
	pub(crate) fn joint2(
		&self,
		a: Option<FieldId>,
		b: Option<FieldId>,
	) -> Result<Option<FieldId>, Error> {
		match (a, b) {
			(None, f) | (f, None) => {
				if let Some(id) = f {
					self.node(id)?;
				}
				Ok(f)
			}
			(Some(x), Some(y)) if x == y => {
				self.node(x)?;
				Ok(Some(x))
			}
			(Some(x), Some(y)) => {
				self.node(x)?;
				self.node(y)?;
				if x == FieldId::PRIME {
					Ok(Some(y))
				} else if y == FieldId::PRIME {
					Ok(Some(x))
				} else {
					Err(Error::NotInSameField)
				}
			}
		}
	}

	pub fn add(&self, a: &FieldElement<A>, b: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let field = self.joint2(a.field, b.field)?;
		Ok(FieldElement {
			field,
			poly: self.fp.poly_add(&a.poly, &b.poly),
		})
	}

	pub fn sub(&self, a: &FieldElement<A>, b: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let field = self.joint2(a.field, b.field)?;
		Ok(FieldElement {
			field,
			poly: self.fp.poly_sub(&a.poly, &b.poly),
		})
	}

	pub fn neg(&self, a: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		if let Some(id) = a.field {
			self.node(id)?;
		}
		Ok(FieldElement {
			field: a.field,
			poly: self.fp.poly_neg(&a.poly),
		})
	}

	pub fn mul(&self, a: &FieldElement<A>, b: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let field = self.joint2(a.field, b.field)?;
		let poly = match field {
			Some(fid) => self.nodes[fid.0]
				.modulus
				.mulmod(&self.fp, &a.poly, &b.poly),
			None => self.fp.poly_mul(&a.poly, &b.poly),
		};
		Ok(FieldElement { field, poly })
	}

	pub fn invert(&self, a: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let Some(fid) = a.field else {
			return Err(Error::DivisionByZero);
		};
		self.node(fid)?;
		if a.poly.is_zero() {
			return Err(Error::DivisionByZero);
		}
		let inv = self
			.fp
			.poly_inverse_mod(&a.poly, self.nodes[fid.0].modulus.q())?
			.ok_or(Error::DivisionByZero)?;
		Ok(FieldElement::attached(fid, inv))
	}

	/// a/b; a zero divisor is reported before any field mismatch.
	pub fn div(&self, a: &FieldElement<A>, b: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let binv = self.invert(b)?;
		self.mul(a, &binv)
	}

	/// a^exp; negative exponents invert the base first.
	pub fn pow(&self, a: &FieldElement<A>, exp: i64) -> Result<FieldElement<A>, Error> {
		let base = if exp < 0 { self.invert(a)? } else { a.clone() };
		let e = exp.unsigned_abs();
		match base.field {
			Some(fid) => {
				self.node(fid)?;
				let poly = self.nodes[fid.0]
					.modulus
					.powmod(&self.fp, &base.poly, &[e]);
				Ok(FieldElement::attached(fid, poly))
			}
			None => Ok(FieldElement {
				field: None,
				poly: if e == 0 {
					self.fp.poly_one()
				} else {
					Poly::zero()
				},
			}),
		}
	}

	/// Semantic equality under the coercion rules. Comparing elements of two
	/// unrelated fields is an error, not `false`.
	pub fn eq(&self, a: &FieldElement<A>, b: &FieldElement<A>) -> Result<bool, Error> {
		self.joint2(a.field, b.field)?;
		Ok(a.poly == b.poly)
	}

	pub fn is_one(&self, a: &FieldElement<A>) -> bool {
		a.poly.len() == 1 && a.poly.coeffs()[0] == self.fp.one()
	}

	/// k-th power of the absolute Frobenius x -> x^p.
	pub fn frobenius(&self, a: &FieldElement<A>, k: usize) -> Result<FieldElement<A>, Error> {
		let Some(fid) = a.field else {
			return Ok(a.clone());
		};
		let poly = self.apply_frobenius(fid, &a.poly, k)?;
		Ok(FieldElement::attached(fid, poly))
	}

	/// Absolute trace down to the prime field.
	pub fn trace(&self, a: &FieldElement<A>) -> Result<FieldElement<A>, Error> {
		let Some(fid) = a.field else {
			return Ok(FieldElement::attached(FieldId::PRIME, Poly::zero()));
		};
		let t = self.trace_scalar(fid, &a.poly)?;
		Ok(FieldElement::attached(
			FieldId::PRIME,
			self.fp.poly_scalar(t),
		))
	}

	/// Relative trace onto a subfield of the element's parent, one digit
	/// extraction per tower step.
	pub fn trace_over(&self, a: &FieldElement<A>, sub: FieldId) -> Result<FieldElement<A>, Error> {
		self.node(sub)?;
		let Some(mut cur) = a.field else {
			return Ok(FieldElement::attached(sub, Poly::zero()));
		};
		self.node(cur)?;
		if sub == FieldId::PRIME {
			return self.trace(a);
		}
		let p = self.char_usize()?;
		let mut poly = a.poly.clone();
		loop {
			if cur == sub {
				return Ok(FieldElement::attached(sub, poly));
			}
			let Some(next) = self.nodes[cur.0].subfield else {
				return Err(Error::NoSubField);
			};
			// Only the top digit of the mixed representation survives the
			// relative trace: Tr(x^j) = -1 for j = p-1 and 0 below.
			let digits = self.push_down_raw(self.stem_id(cur), &poly)?;
			poly = self.fp.poly_neg(&digits[p - 1]);
			cur = next;
		}
	}

	/// Pseudotrace T_{p^j}: the sum of the first p^j Frobenius iterates.
	pub fn pseudotrace(&self, a: &FieldElement<A>, j: u32) -> Result<FieldElement<A>, Error> {
		let Some(fid) = a.field else {
			return Ok(a.clone());
		};
		let p = self.char_word()?;
		let n = self.node(fid)?.modulus.deg() as u64;
		let mut cur = a.poly.clone();
		let mut stride = 1u64;
		for _ in 0..j {
			cur = self.sum_frobenius(fid, &cur, p, stride as usize)?;
			stride = (stride as u128 * (p % n) as u128 % n as u128) as u64;
		}
		Ok(FieldElement::attached(fid, cur))
	}
}
