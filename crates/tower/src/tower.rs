// Copyright 2025 Irreducible Inc.

use std::sync::OnceLock;

use rand::RngCore;
use schreier_field::{cyclotomic_poly, Matrix, Poly, PolyModulus, PolyRing, TransMultiplier};

use crate::{
	element::{FieldElement, FieldPolynomial},
	error::Error,
};

/// Stable handle to a field node inside one [`Tower`].
///
/// Ids are only meaningful for the tower that issued them; feeding an id to
/// another tower is caught by a range check at best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
	/// Node 0 of every tower is the prime field itself.
	pub(crate) const PRIME: FieldId = FieldId(0);
}

/// One field in the lattice, flattened into the tower arena.
///
/// Stem nodes hold the canonical Artin-Schreier chain; an extended node
/// (`stem` is `Some`) reuses the modulus of its stem twin and remembers the
/// generator `rho` that identifies the two. The `plusone` and `twopminusone`
/// flags describe how the defining relation of the step *down* from this node
/// was adjusted, which is all the embedding code needs.
#[derive(Debug)]
pub(crate) struct FieldNode<A: PolyRing> {
	pub(crate) height: usize,
	pub(crate) modulus: PolyModulus<A>,
	pub(crate) plusone: bool,
	pub(crate) twopminusone: bool,
	pub(crate) subfield: Option<FieldId>,
	pub(crate) overfield: Option<FieldId>,
	pub(crate) stem: Option<FieldId>,
	pub(crate) rho: Option<Poly<A>>,
	/// Right-hand side of the defining relation `x^p - x = eta`, expressed in
	/// the coordinates of `subfield`.
	pub(crate) eta: Option<Poly<A>>,
	pub(crate) inv_derivative: OnceLock<Poly<A>>,
	pub(crate) trace_mult: OnceLock<TransMultiplier<A>>,
	pub(crate) frob_squares: OnceLock<Vec<Poly<A>>>,
	pub(crate) artin: OnceLock<(Matrix<A>, usize)>,
	pub(crate) rel_trace: OnceLock<A::Elem>,
}

impl<A: PolyRing> FieldNode<A> {
	pub(crate) fn new(height: usize, modulus: PolyModulus<A>) -> Self {
		Self {
			height,
			modulus,
			plusone: false,
			twopminusone: false,
			subfield: None,
			overfield: None,
			stem: None,
			rho: None,
			eta: None,
			inv_derivative: OnceLock::new(),
			trace_mult: OnceLock::new(),
			frob_squares: OnceLock::new(),
			artin: OnceLock::new(),
			rel_trace: OnceLock::new(),
		}
	}

	pub(crate) fn is_stem(&self) -> bool {
		self.stem.is_none()
	}
}

/// Arena of finite fields in characteristic p, linked by Artin-Schreier
/// extension steps.
///
/// The tower owns every field it ever creates and hands out [`FieldId`]
/// handles. Construction needs `&mut self`; element arithmetic, embeddings
/// and root finding work through `&self`, with per-node caches filled lazily
/// behind [`OnceLock`]s.
///
/// The prime field is materialized as node 0 with modulus `X - 1`, so the
/// first tower step composes to `X^p - X - 1` exactly like every later step.
#[derive(Debug)]
pub struct Tower<A: PolyRing> {
	pub(crate) fp: A,
	pub(crate) nodes: Vec<FieldNode<A>>,
	pub(crate) cyclo: OnceLock<PolyModulus<A>>,
}

impl<A: PolyRing> Tower<A> {
	/// Builds a tower over the given prime-field context, checking that the
	/// characteristic is actually prime.
	pub fn new(fp: A) -> Result<Self, Error> {
		if !fp.characteristic_is_prime() {
			return Err(Error::NotPrime);
		}
		Self::new_unchecked(fp)
	}

	/// Like [`new`](Self::new) but skips the primality test. On a composite
	/// characteristic every later operation is allowed to misbehave.
	pub fn new_unchecked(fp: A) -> Result<Self, Error> {
		let q = fp.poly_from_coeffs(vec![fp.neg(&fp.one()), fp.one()]);
		let modulus = PolyModulus::new(&fp, &q)?;
		let nodes = vec![FieldNode::new(0, modulus)];
		Ok(Self {
			fp,
			nodes,
			cyclo: OnceLock::new(),
		})
	}

	/// The backend arithmetic context.
	pub fn context(&self) -> &A {
		&self.fp
	}

	pub fn prime_field(&self) -> Field<'_, A> {
		Field {
			tower: self,
			id: FieldId::PRIME,
		}
	}

	/// Resolves an id into a handle, rejecting ids from other towers as far
	/// as a range check can.
	pub fn field(&self, id: FieldId) -> Result<Field<'_, A>, Error> {
		self.node(id)?;
		Ok(Field { tower: self, id })
	}

	pub(crate) fn node(&self, id: FieldId) -> Result<&FieldNode<A>, Error> {
		self.nodes.get(id.0).ok_or(Error::NoSuchField)
	}

	pub(crate) fn stem_id(&self, id: FieldId) -> FieldId {
		self.nodes[id.0].stem.unwrap_or(id)
	}

	/// Whether `low` appears on the subfield chain of `high` (inclusive).
	pub(crate) fn on_chain(&self, low: FieldId, high: FieldId) -> bool {
		let mut cur = high;
		loop {
			if cur == low {
				return true;
			}
			match self.nodes[cur.0].subfield {
				Some(next) => cur = next,
				None => return low == FieldId::PRIME,
			}
		}
	}

	pub(crate) fn char_word(&self) -> Result<u64, Error> {
		self.fp
			.characteristic_word()
			.ok_or(Error::CharacteristicTooLarge)
	}

	pub(crate) fn char_usize(&self) -> Result<usize, Error> {
		usize::try_from(self.char_word()?).map_err(|_| Error::CharacteristicTooLarge)
	}

	/// Cyclotomic context Fp[Z]/Phi_{2p-1}(Z) shared by every Cantor
	/// construction step in this tower.
	pub(crate) fn cantor_modulus(&self) -> Result<&PolyModulus<A>, Error> {
		if let Some(m) = self.cyclo.get() {
			return Ok(m);
		}
		let p = self.char_word()?;
		let phi = cyclotomic_poly(&self.fp, 2 * p - 1)?;
		let m = PolyModulus::new(&self.fp, &phi)?;
		Ok(self.cyclo.get_or_init(|| m))
	}

	/// Transposed-product multiplier for the absolute trace form of a node.
	pub(crate) fn trace_mult(&self, id: FieldId) -> Result<&TransMultiplier<A>, Error> {
		let node = self.node(id)?;
		if let Some(tm) = node.trace_mult.get() {
			return Ok(tm);
		}
		let n = node.modulus.deg();
		let lam = node.modulus.trace_vector(&self.fp, n)?;
		let tm = TransMultiplier::new(&self.fp, &node.modulus, &lam);
		Ok(node.trace_mult.get_or_init(|| tm))
	}

	/// (Q')^{-1} mod Q, the constant piece of the lift-up reconstruction.
	pub(crate) fn inv_derivative(&self, id: FieldId) -> Result<&Poly<A>, Error> {
		let node = self.node(id)?;
		if let Some(inv) = node.inv_derivative.get() {
			return Ok(inv);
		}
		let dq = self.fp.poly_derivative(node.modulus.q());
		let inv = self
			.fp
			.poly_inverse_mod(&dq, node.modulus.q())?
			.ok_or(Error::NotIrreducible)?;
		Ok(node.inv_derivative.get_or_init(|| inv))
	}

	/// Iterated-Frobenius table: entry t is x^(p^(2^t)) mod Q. Composing a
	/// subset of entries reaches x^(p^e) for any e < deg Q.
	fn frob_squares(&self, id: FieldId) -> Result<&Vec<Poly<A>>, Error> {
		let node = self.node(id)?;
		if let Some(sq) = node.frob_squares.get() {
			return Ok(sq);
		}
		let n = node.modulus.deg();
		let count = if n <= 2 {
			1
		} else {
			(n - 1).ilog2() as usize + 1
		};
		let x = node.modulus.rem(&self.fp, &self.fp.poly_x());
		let mut sq = Vec::with_capacity(count);
		sq.push(
			node.modulus
				.powmod(&self.fp, &x, &self.fp.characteristic_limbs()),
		);
		for t in 1..count {
			let prev = &sq[t - 1];
			sq.push(node.modulus.compose_mod(&self.fp, prev, prev));
		}
		Ok(node.frob_squares.get_or_init(|| sq))
	}

	/// x^(p^e) mod Q, with e reduced modulo the degree.
	pub(crate) fn frobenius_power(&self, id: FieldId, e: usize) -> Result<Poly<A>, Error> {
		let node = self.node(id)?;
		let n = node.modulus.deg();
		let e = e % n;
		if e == 0 {
			return Ok(node.modulus.rem(&self.fp, &self.fp.poly_x()));
		}
		let sq = self.frob_squares(id)?;
		let tz = e.trailing_zeros() as usize;
		let mut acc = sq[tz].clone();
		for (t, entry) in sq.iter().enumerate().skip(tz + 1) {
			if e >> t & 1 == 1 {
				acc = node.modulus.compose_mod(&self.fp, &acc, entry);
			}
		}
		Ok(acc)
	}

	/// Applies the e-th Frobenius power to a reduced residue.
	pub(crate) fn apply_frobenius(&self, id: FieldId, f: &Poly<A>, e: usize) -> Result<Poly<A>, Error> {
		let node = self.node(id)?;
		let n = node.modulus.deg();
		if e % n == 0 {
			return Ok(f.clone());
		}
		let power = self.frobenius_power(id, e)?;
		Ok(node.modulus.compose_mod(&self.fp, f, &power))
	}

	/// Sum of `count` Frobenius iterates with the given stride:
	/// f + F^t(f) + F^(2t)(f) + ... by doubling, so the cost is logarithmic
	/// in `count`.
	pub(crate) fn sum_frobenius(
		&self,
		id: FieldId,
		f: &Poly<A>,
		count: u64,
		stride: usize,
	) -> Result<Poly<A>, Error> {
		let n = self.node(id)?.modulus.deg();
		if count == 0 {
			return Ok(Poly::zero());
		}
		if count == 1 {
			return Ok(f.clone());
		}
		let half = count / 2;
		let g = self.sum_frobenius(id, f, half, stride)?;
		let jump = ((half % n as u64) as u128 * (stride % n) as u128 % n as u128) as usize;
		let mut out = self.fp.poly_add(&g, &self.apply_frobenius(id, &g, jump)?);
		if count % 2 == 1 {
			let last =
				(((count - 1) % n as u64) as u128 * (stride % n) as u128 % n as u128) as usize;
			out = self.fp.poly_add(&out, &self.apply_frobenius(id, f, last)?);
		}
		Ok(out)
	}

	/// Absolute trace of a reduced residue, as a prime-field scalar.
	pub(crate) fn trace_scalar(&self, id: FieldId, f: &Poly<A>) -> Result<A::Elem, Error> {
		let tm = self.trace_mult(id)?;
		let proj = tm.projections();
		let mut acc = self.fp.zero();
		for (c, l) in f.coeffs().iter().zip(proj) {
			acc = self.fp.add(&acc, &self.fp.mul(c, l));
		}
		Ok(acc)
	}

	/// The scalar c = Tr(eta) of a node's defining relation. The relative
	/// Frobenius of the step sends the generator x to x + c.
	pub(crate) fn rel_trace_const(&self, id: FieldId) -> Result<A::Elem, Error> {
		let node = self.node(id)?;
		if let Some(c) = node.rel_trace.get() {
			return Ok(c.clone());
		}
		let sub = node.subfield.ok_or(Error::NoSubField)?;
		let eta = node.eta.as_ref().ok_or(Error::NoSubField)?;
		let c = self.trace_scalar(sub, eta)?;
		Ok(node.rel_trace.get_or_init(|| c).clone())
	}
}

/// Borrowed view of one field in a tower.
///
/// Handles are cheap to copy and only navigate; anything that grows the tower
/// goes through `&mut Tower`.
pub struct Field<'a, A: PolyRing> {
	pub(crate) tower: &'a Tower<A>,
	pub(crate) id: FieldId,
}

impl<A: PolyRing> Clone for Field<'_, A> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<A: PolyRing> Copy for Field<'_, A> {}

impl<A: PolyRing> PartialEq for Field<'_, A> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && std::ptr::eq(self.tower, other.tower)
	}
}

impl<A: PolyRing> Eq for Field<'_, A> {}

impl<A: PolyRing> std::fmt::Debug for Field<'_, A> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("id", &self.id)
			.field("degree", &self.degree())
			.field("height", &self.node().height)
			.finish()
	}
}

impl<'a, A: PolyRing> Field<'a, A> {
	fn node(&self) -> &'a FieldNode<A> {
		&self.tower.nodes[self.id.0]
	}

	fn handle(&self, id: FieldId) -> Field<'a, A> {
		Field {
			tower: self.tower,
			id,
		}
	}

	pub fn id(&self) -> FieldId {
		self.id
	}

	pub fn context(&self) -> &'a A {
		&self.tower.fp
	}

	pub fn characteristic(&self) -> A::Char {
		self.tower.fp.characteristic()
	}

	/// Extension degree over the prime field.
	pub fn degree(&self) -> usize {
		self.node().modulus.deg()
	}

	/// Number of Artin-Schreier steps below this field.
	pub fn artin_schreier_height(&self) -> usize {
		self.node().height
	}

	pub fn is_prime_field(&self) -> bool {
		self.id == FieldId::PRIME
	}

	pub fn is_base_field(&self) -> bool {
		self.node().height == 0
	}

	/// Whether this field sits on the canonical chain rather than being an
	/// [`extend_with`](Tower::extend_with) construction.
	pub fn is_stem_field(&self) -> bool {
		self.node().is_stem()
	}

	pub fn sub_field(&self) -> Result<Field<'a, A>, Error> {
		self.node()
			.subfield
			.map(|id| self.handle(id))
			.ok_or(Error::NoSubField)
	}

	pub fn over_field(&self) -> Result<Field<'a, A>, Error> {
		self.node()
			.overfield
			.map(|id| self.handle(id))
			.ok_or(Error::NoOverField)
	}

	/// The stem twin; identity on stem fields.
	pub fn stem_field(&self) -> Field<'a, A> {
		self.handle(self.tower.stem_id(self.id))
	}

	/// The height-0 field at the bottom of the stem chain.
	pub fn base_field(&self) -> Field<'a, A> {
		let mut cur = self.tower.stem_id(self.id);
		while let Some(next) = self.tower.nodes[cur.0].subfield {
			cur = next;
		}
		self.handle(cur)
	}

	pub fn prime_field(&self) -> Field<'a, A> {
		self.handle(FieldId::PRIME)
	}

	/// Non-strict lattice order: true when `self` appears on `other`'s
	/// subfield chain. The prime field is below everything.
	pub fn is_sub_field_of(&self, other: &Field<'_, A>) -> bool {
		std::ptr::eq(self.tower, other.tower) && self.tower.on_chain(self.id, other.id)
	}

	pub fn is_over_field_of(&self, other: &Field<'_, A>) -> bool {
		other.is_sub_field_of(self)
	}

	/// Two fields are isomorphic exactly when they share a stem twin.
	pub fn is_isomorphic(&self, other: &Field<'_, A>) -> bool {
		std::ptr::eq(self.tower, other.tower)
			&& self.tower.stem_id(self.id) == self.tower.stem_id(other.id)
	}

	/// The univariate modulus Q over the prime field.
	pub fn modulus_polynomial(&self) -> FieldPolynomial<A> {
		let fp = &self.tower.fp;
		let coeffs = self
			.node()
			.modulus
			.q()
			.coeffs()
			.iter()
			.map(|c| FieldElement::attached(FieldId::PRIME, fp.poly_scalar(c.clone())))
			.collect();
		FieldPolynomial::from_parts(Some(FieldId::PRIME), coeffs)
	}

	/// The defining polynomial over the subfield: `X^p - X - eta` for tower
	/// steps, the plain modulus for height-0 fields.
	pub fn defining_polynomial(&self) -> Result<FieldPolynomial<A>, Error> {
		let node = self.node();
		let (Some(sub), Some(eta)) = (node.subfield, node.eta.as_ref()) else {
			return Ok(self.modulus_polynomial());
		};
		let fp = &self.tower.fp;
		let p = self.tower.char_usize()?;
		let mut coeffs = vec![FieldElement::attached(sub, Poly::zero()); p + 1];
		coeffs[0] = FieldElement::attached(sub, fp.poly_neg(eta));
		coeffs[1] = FieldElement::attached(sub, fp.poly_scalar(fp.neg(&fp.one())));
		coeffs[p] = FieldElement::attached(sub, fp.poly_one());
		Ok(FieldPolynomial::from_parts(Some(sub), coeffs))
	}

	pub fn zero(&self) -> FieldElement<A> {
		FieldElement::attached(self.id, Poly::zero())
	}

	pub fn one(&self) -> FieldElement<A> {
		FieldElement::attached(self.id, self.tower.fp.poly_one())
	}

	/// Canonical image of a signed integer.
	pub fn scalar(&self, val: i64) -> FieldElement<A> {
		FieldElement::attached(self.id, self.tower.fp.poly_scalar(self.tower.fp.from_i64(val)))
	}

	pub fn random(&self, rng: impl RngCore) -> FieldElement<A> {
		FieldElement::attached(self.id, self.tower.fp.poly_random(self.degree(), rng))
	}

	/// The Artin-Schreier generator: the residue of X for stem fields, the
	/// adjoined root rho for extended fields.
	pub fn generator(&self) -> FieldElement<A> {
		let node = self.node();
		let poly = match &node.rho {
			Some(rho) => rho.clone(),
			None => node.modulus.rem(&self.tower.fp, &self.tower.fp.poly_x()),
		};
		FieldElement::attached(self.id, poly)
	}

	/// An element whose powers span the field over the prime field. For
	/// extended fields this is the residue of X of the stem twin.
	pub fn primitive_element(&self) -> FieldElement<A> {
		let node = self.node();
		FieldElement::attached(self.id, node.modulus.rem(&self.tower.fp, &self.tower.fp.poly_x()))
	}
}
