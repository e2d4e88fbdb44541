// Copyright 2025 Irreducible Inc.

//! Growing a tower: base fields and Artin-Schreier extension steps.
//!
//! Every step adjoins a root of X^p - X - eta for some eta in the current
//! field, and the new field again gets a univariate modulus over F_p so the
//! dense arithmetic stays flat. The modulus of the step is q(X^p - X) where q
//! is the minimal polynomial of eta; that composition is irreducible exactly
//! when the absolute trace of eta is nonzero, so the three recipes below only
//! differ in how they repair a vanishing trace.

use rand::RngCore;
use schreier_field::{is_irreducible, random_monic_irreducible, Poly, PolyModulus, PolyRing};
use tracing::instrument;

use crate::{
	element::{FieldElement, FieldPolynomial},
	error::Error,
	tower::{FieldId, FieldNode, Tower},
};

impl<A: PolyRing> Tower<A> {
	/// Creates a height-0 field of the given degree from a random monic
	/// irreducible modulus. Degree 1 is the prime field itself.
	#[instrument("Tower::create_field", skip_all, level = "debug")]
	pub fn create_field(&mut self, degree: usize, rng: impl RngCore) -> Result<FieldId, Error> {
		match degree {
			0 => Err(Error::BadParameters(
				"field degree must be positive".to_string(),
			)),
			1 => Ok(FieldId::PRIME),
			_ => {
				let q = random_monic_irreducible(&self.fp, degree, rng)?;
				let modulus = PolyModulus::new(&self.fp, &q)?;
				let id = FieldId(self.nodes.len());
				self.nodes.push(FieldNode::new(0, modulus));
				Ok(id)
			}
		}
	}

	/// Creates a height-0 field from an explicit modulus with prime-field
	/// coefficients. The polynomial is normalized to be monic; a linear
	/// modulus resolves to the prime field.
	#[instrument("Tower::create_field_with", skip_all, level = "debug")]
	pub fn create_field_with(&mut self, poly: &FieldPolynomial<A>) -> Result<FieldId, Error> {
		let mut joint = None;
		for c in poly.coeffs() {
			joint = self.joint2(joint, c.field())?;
		}
		if !matches!(joint, None | Some(FieldId::PRIME)) {
			return Err(Error::NotInSameField);
		}
		let coeffs = poly
			.coeffs()
			.iter()
			.map(|c| self.fp.poly_coeff(&c.poly, 0))
			.collect();
		let raw = self.fp.poly_from_coeffs(coeffs);
		match raw.deg() {
			None | Some(0) => Err(Error::BadParameters(
				"modulus must have positive degree".to_string(),
			)),
			Some(1) => Ok(FieldId::PRIME),
			Some(_) => {
				let q = self.fp.poly_monic(&raw)?;
				let modulus = PolyModulus::new(&self.fp, &q)?;
				if !is_irreducible(&self.fp, &modulus)? {
					return Err(Error::NotIrreducible);
				}
				let id = FieldId(self.nodes.len());
				self.nodes.push(FieldNode::new(0, modulus));
				Ok(id)
			}
		}
	}

	/// The canonical degree-p extension of a field, memoized per node.
	///
	/// Writing gamma for the current generator and t for its absolute trace,
	/// the step adjoins a root of X^p - X - eta with
	///
	///   - eta = gamma when t != 0 (direct composition),
	///   - eta = gamma + 1 when t = 0 at height 0 and p does not divide the
	///     degree (height 0 with p | degree is not supported),
	///   - eta = gamma^(2p-1) otherwise (Cantor's twist, whose trace is
	///     nonzero at every height >= 1).
	///
	/// Extended fields are normalized to their stem twin first.
	#[instrument("Tower::extend", skip_all, level = "debug")]
	pub fn extend(&mut self, field: FieldId) -> Result<FieldId, Error> {
		self.node(field)?;
		let fid = self.stem_id(field);
		if let Some(over) = self.nodes[fid.0].overfield {
			return Ok(over);
		}
		let p = self.char_usize()?;
		let q = self.nodes[fid.0].modulus.q().clone();
		let height = self.nodes[fid.0].height;
		let n = self.nodes[fid.0].modulus.deg();
		let t = self.fp.neg(&self.fp.poly_coeff(&q, n - 1));

		let (q_new, plusone, twopminusone, eta) = if !self.fp.is_zero(&t) {
			let eta = self.nodes[fid.0].modulus.rem(&self.fp, &self.fp.poly_x());
			(self.compose_pkernel(&q, p), false, false, eta)
		} else if height == 0 {
			if n % p == 0 {
				// Tr(gamma + c) = t + n·c stays zero for every shift c.
				return Err(Error::NotSupported);
			}
			let shifted = self.fp.poly_taylor_shift(&q, &self.fp.neg(&self.fp.one()));
			let xplus1 = self.fp.poly_add(&self.fp.poly_x(), &self.fp.poly_one());
			let eta = self.nodes[fid.0].modulus.rem(&self.fp, &xplus1);
			(self.compose_pkernel(&shifted, p), true, false, eta)
		} else {
			let qstar = self.cantor_step(&q, p)?;
			let power = self.fp.poly_monomial(self.fp.one(), 2 * p - 1);
			let eta = self.nodes[fid.0].modulus.rem(&self.fp, &power);
			(self.compose_pkernel(&qstar, p), false, true, eta)
		};

		let _span = tracing::debug_span!(
			"extension step",
			height = height + 1,
			degree = n * p,
			plusone,
			twopminusone
		)
		.entered();
		let modulus = PolyModulus::new(&self.fp, &q_new)?;
		debug_assert!(matches!(is_irreducible(&self.fp, &modulus), Ok(true)));

		let id = FieldId(self.nodes.len());
		let mut node = FieldNode::new(height + 1, modulus);
		node.subfield = Some(fid);
		node.plusone = plusone;
		node.twopminusone = twopminusone;
		node.eta = Some(eta);
		self.nodes.push(node);
		self.nodes[fid.0].overfield = Some(id);
		Ok(id)
	}

	/// Adjoins a root of X^p - X - alpha for an explicit alpha, which must
	/// have nonzero absolute trace. The new field shares the representation
	/// of the canonical extension and remembers the root rho identifying the
	/// two, so it is isomorphic but not identical to the stem.
	#[instrument("Tower::extend_with", skip_all, level = "debug")]
	pub fn extend_with(
		&mut self,
		field: FieldId,
		alpha: &FieldElement<A>,
	) -> Result<FieldId, Error> {
		let node = self.node(field)?;
		if !node.is_stem() {
			return Err(Error::NotSupported);
		}
		let height = node.height;
		let joint = self.joint2(Some(field), alpha.field)?;
		if joint != Some(field) {
			return Err(Error::NotInSameField);
		}
		let alpha_poly = alpha.poly.clone();
		let t = self.trace_scalar(field, &alpha_poly)?;
		if self.fp.is_zero(&t) {
			return Err(Error::NotIrreducible);
		}
		let p = self.char_usize()?;
		let stem_up = self.extend(field)?;
		let mut digits = vec![Poly::zero(); p];
		digits[0] = alpha_poly.clone();
		let alpha_up = self.lift_up_raw(stem_up, &digits)?;
		// Solvable in the extension: the relative trace of the lift is
		// p·alpha = 0.
		let rho = self.couveignes_same(stem_up, &alpha_up)?;

		let id = FieldId(self.nodes.len());
		let modulus = self.nodes[stem_up.0].modulus.clone();
		let mut node = FieldNode::new(height + 1, modulus);
		node.subfield = Some(field);
		node.stem = Some(stem_up);
		node.rho = Some(rho);
		node.eta = Some(alpha_poly);
		self.nodes.push(node);
		Ok(id)
	}

	/// q(X^p - X) by Horner directly on the p-kernel.
	fn compose_pkernel(&self, q: &Poly<A>, p: usize) -> Poly<A> {
		let mut acc = Poly::zero();
		for c in q.coeffs().iter().rev() {
			let shifted = self
				.fp
				.poly_sub(&self.fp.poly_shift(&acc, p), &self.fp.poly_shift(&acc, 1));
			acc = self.fp.poly_add(&shifted, &self.fp.poly_scalar(c.clone()));
		}
		acc
	}

	/// Minimal polynomial of gamma^(2p-1), as the contraction of the product
	/// of q(w^i Y) over all (2p-1)-th roots of unity w^i.
	///
	/// The product is invariant under Y -> wY, so only coefficients at
	/// multiples of 2p-1 survive, and invariance under every automorphism
	/// z -> z^u of the cyclotomic context brings them down into F_p.
	#[instrument("Tower::cantor_step", skip_all, level = "debug")]
	fn cantor_step(&self, q: &Poly<A>, p: usize) -> Result<Poly<A>, Error> {
		let r = 2 * p - 1;
		let cyclo = self.cantor_modulus()?;
		let omega: Vec<Poly<A>> = (0..r)
			.map(|t| cyclo.rem(&self.fp, &self.fp.poly_monomial(self.fp.one(), t)))
			.collect();

		let mut acc: Vec<Poly<A>> = vec![self.fp.poly_one()];
		for i in 0..r {
			let factor: Vec<Poly<A>> = q
				.coeffs()
				.iter()
				.enumerate()
				.map(|(j, c)| self.fp.poly_scale(&omega[i * j % r], c))
				.collect();
			let mut next = vec![Poly::zero(); acc.len() + factor.len() - 1];
			for (a, ca) in acc.iter().enumerate() {
				if ca.is_zero() {
					continue;
				}
				for (b, cb) in factor.iter().enumerate() {
					if cb.is_zero() {
						continue;
					}
					let prod = cyclo.mulmod(&self.fp, ca, cb);
					next[a + b] = self.fp.poly_add(&next[a + b], &prod);
				}
			}
			acc = next;
		}

		let mut coeffs = Vec::with_capacity(acc.len() / r + 1);
		for (d, c) in acc.iter().enumerate() {
			if d % r == 0 {
				debug_assert!(c.len() <= 1);
				coeffs.push(self.fp.poly_coeff(c, 0));
			} else {
				debug_assert!(c.is_zero());
			}
		}
		Ok(self.fp.poly_from_coeffs(coeffs))
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use rand::{rngs::StdRng, SeedableRng};
	use schreier_field::{BinaryPrimeField, WordPrimeField};

	use crate::{element::FieldPolynomial, error::Error, tower::Tower};

	fn prime_coeffs<A: schreier_field::PolyRing>(
		tower: &Tower<A>,
		coeffs: &[i64],
	) -> FieldPolynomial<A> {
		let els = coeffs
			.iter()
			.map(|&c| tower.prime_field().scalar(c))
			.collect();
		FieldPolynomial::from_coeffs(tower, els).unwrap()
	}

	#[test]
	fn test_extend_multiplies_degree() {
		let mut tower = Tower::new(WordPrimeField::new(3).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		let k0 = tower.create_field(2, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let k2 = tower.extend(k1).unwrap();

		let f0 = tower.field(k0).unwrap();
		let f1 = tower.field(k1).unwrap();
		let f2 = tower.field(k2).unwrap();
		assert_eq!((f0.degree(), f0.artin_schreier_height()), (2, 0));
		assert_eq!((f1.degree(), f1.artin_schreier_height()), (6, 1));
		assert_eq!((f2.degree(), f2.artin_schreier_height()), (18, 2));
		assert_eq!(f1.sub_field().unwrap(), f0);
		assert_eq!(f1.over_field().unwrap(), f2);
		assert_eq!(f2.base_field(), f0);
	}

	#[test]
	fn test_extend_is_memoized() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		let k0 = tower.create_field(2, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		assert_eq!(tower.extend(k0).unwrap(), k1);
	}

	#[test]
	fn test_first_step_over_prime_field() {
		// Starting from F_5 the first modulus is X^5 - X - 1.
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(2);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let f1 = tower.field(k1).unwrap();
		assert_eq!(f1.degree(), 5);

		let q = f1.modulus_polynomial();
		let expect = prime_coeffs(&tower, &[-1, -1, 0, 0, 0, 1]);
		assert_eq!(q.degree(), expect.degree());
		for (a, b) in q.coeffs().iter().zip(expect.coeffs()) {
			assert!(tower.eq(a, b).unwrap());
		}
	}

	#[test]
	fn test_binary_tower_classical_moduli() {
		let mut tower = Tower::new(BinaryPrimeField::new()).unwrap();
		let mut rng = StdRng::seed_from_u64(3);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let k2 = tower.extend(k1).unwrap();
		let k3 = tower.extend(k2).unwrap();
		assert_eq!(tower.field(k1).unwrap().degree(), 2);
		assert_eq!(tower.field(k2).unwrap().degree(), 4);
		assert_eq!(tower.field(k3).unwrap().degree(), 8);

		// X^2 + X + 1, then its composition X^4 + X + 1.
		let q1 = tower.field(k1).unwrap().modulus_polynomial();
		let e1 = prime_coeffs(&tower, &[1, 1, 1]);
		for (a, b) in q1.coeffs().iter().zip(e1.coeffs()) {
			assert!(tower.eq(a, b).unwrap());
		}
		let q2 = tower.field(k2).unwrap().modulus_polynomial();
		let e2 = prime_coeffs(&tower, &[1, 1, 0, 0, 1]);
		for (a, b) in q2.coeffs().iter().zip(e2.coeffs()) {
			assert!(tower.eq(a, b).unwrap());
		}

		// Height 2 in characteristic 2 runs out of trace and needs the
		// gamma^3 twist.
		assert!(tower.nodes[k3.0].twopminusone);
	}

	#[test]
	fn test_trace_zero_base_takes_shifted_relation() {
		// X^2 + 1 over F_3 has a trace-zero root, so the step adjoins a root
		// of X^3 - X - (gamma + 1).
		let mut tower = Tower::new(WordPrimeField::new(3).unwrap()).unwrap();
		let m = prime_coeffs(&tower, &[1, 0, 1]);
		let k0 = tower.create_field_with(&m).unwrap();
		let k1 = tower.extend(k0).unwrap();
		assert!(tower.nodes[k1.0].plusone);
		assert_eq!(tower.field(k1).unwrap().degree(), 6);

		let mut rng = StdRng::seed_from_u64(4);
		let f1 = tower.field(k1).unwrap();
		for _ in 0..4 {
			let a = f1.random(&mut rng);
			let digits = tower.push_down(&a).unwrap();
			let back = tower.lift_up(&digits).unwrap();
			assert!(tower.eq(&back, &a).unwrap());
		}
	}

	#[test]
	fn test_trace_zero_with_p_dividing_degree_unsupported() {
		// X^3 - X + 1 over F_3: trace zero and 3 | 3, nothing to shift by.
		let mut tower = Tower::new(WordPrimeField::new(3).unwrap()).unwrap();
		let m = prime_coeffs(&tower, &[1, -1, 0, 1]);
		let k0 = tower.create_field_with(&m).unwrap();
		assert_matches!(tower.extend(k0), Err(Error::NotSupported));
	}

	#[test]
	fn test_cantor_twist_above_height_one() {
		let mut tower = Tower::new(WordPrimeField::new(3).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let k2 = tower.extend(k1).unwrap();
		assert_eq!(tower.field(k2).unwrap().degree(), 9);
		assert!(tower.nodes[k2.0].twopminusone);

		let f2 = tower.field(k2).unwrap();
		for _ in 0..4 {
			let a = f2.random(&mut rng);
			let digits = tower.push_down(&a).unwrap();
			let back = tower.lift_up(&digits).unwrap();
			assert!(tower.eq(&back, &a).unwrap());
		}
	}

	#[test]
	fn test_defining_relation_holds() {
		// At every level, gen^p - gen pushes down to [eta, 0, ..., 0].
		let mut tower = Tower::new(WordPrimeField::new(3).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(6);
		let k0 = tower.create_field(2, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let k2 = tower.extend(k1).unwrap();
		for k in [k1, k2] {
			let kf = tower.field(k).unwrap();
			let g = kf.generator();
			let peg = tower.sub(&tower.pow(&g, 3).unwrap(), &g).unwrap();
			let digits = tower.push_down(&peg).unwrap();

			let def = kf.defining_polynomial().unwrap();
			let eta = tower.neg(&def.coeffs()[0]).unwrap();
			assert!(tower.eq(&digits[0], &eta).unwrap());
			for d in &digits[1..] {
				assert!(d.is_zero());
			}
		}
	}

	#[test]
	fn test_defining_polynomial_vanishes_at_generator() {
		// Over the prime field the coefficients coerce, so we can evaluate.
		let mut tower = Tower::new(WordPrimeField::new(7).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let f1 = tower.field(k1).unwrap();
		let def = f1.defining_polynomial().unwrap();
		assert_eq!(def.degree(), Some(7));
		let at_gen = def.eval(&tower, &f1.generator()).unwrap();
		assert!(at_gen.is_zero());
	}

	#[test]
	fn test_create_field_rejects_degree_zero() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(8);
		assert_matches!(
			tower.create_field(0, &mut rng),
			Err(Error::BadParameters(_))
		);
	}

	#[test]
	fn test_create_field_with_accepts_and_normalizes() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		// 2·(X^2 - X - 1), not monic on purpose.
		let m = prime_coeffs(&tower, &[-2, -2, 2]);
		let k = tower.create_field_with(&m).unwrap();
		let kf = tower.field(k).unwrap();
		assert_eq!(kf.degree(), 2);
		assert!(kf.is_base_field());
	}

	#[test]
	fn test_create_field_with_rejects_reducible() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let m = prime_coeffs(&tower, &[-1, 0, 1]);
		assert_matches!(tower.create_field_with(&m), Err(Error::NotIrreducible));
	}

	#[test]
	fn test_create_field_with_rejects_constant() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let m = prime_coeffs(&tower, &[3]);
		assert_matches!(
			tower.create_field_with(&m),
			Err(Error::BadParameters(_))
		);
	}

	#[test]
	fn test_create_field_with_linear_is_prime_field() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let m = prime_coeffs(&tower, &[3, 1]);
		let k = tower.create_field_with(&m).unwrap();
		assert!(tower.field(k).unwrap().is_prime_field());
	}

	#[test]
	fn test_create_field_with_rejects_extension_coefficients() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(9);
		let k = tower.create_field(2, &mut rng).unwrap();
		let gen = tower.field(k).unwrap().generator();
		let m = FieldPolynomial::from_coeffs(
			&tower,
			vec![gen, tower.prime_field().one(), tower.prime_field().one()],
		)
		.unwrap();
		assert_matches!(tower.create_field_with(&m), Err(Error::NotInSameField));
	}

	#[test]
	fn test_extend_with_builds_isomorphic_twin() {
		let mut tower = Tower::new(BinaryPrimeField::new()).unwrap();
		let mut rng = StdRng::seed_from_u64(10);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		let alpha = tower.field(k1).unwrap().generator();
		let e = tower.extend_with(k1, &alpha).unwrap();

		let ef = tower.field(e).unwrap();
		assert_eq!(ef.degree(), 4);
		assert_eq!(ef.artin_schreier_height(), 2);
		assert!(!ef.is_stem_field());
		assert_eq!(ef.sub_field().unwrap().id(), k1);

		let stem = tower.extend(k1).unwrap();
		let ef = tower.field(e).unwrap();
		assert!(ef.is_isomorphic(&tower.field(stem).unwrap()));

		// The adjoined generator satisfies rho^2 - rho = alpha.
		let g = ef.generator();
		let peg = tower.sub(&tower.pow(&g, 2).unwrap(), &g).unwrap();
		let coords = tower.to_bivariate(&peg).unwrap();
		assert!(tower.eq(&coords[0], &alpha).unwrap());
		assert!(coords[1].is_zero());
	}

	#[test]
	fn test_extend_with_rejects_trace_zero() {
		let mut tower = Tower::new(BinaryPrimeField::new()).unwrap();
		let mut rng = StdRng::seed_from_u64(11);
		let k0 = tower.create_field(1, &mut rng).unwrap();
		let k1 = tower.extend(k0).unwrap();
		// Tr(1) = [GF(4) : F_2] = 0 in characteristic 2.
		let one = tower.field(k1).unwrap().one();
		assert_matches!(tower.extend_with(k1, &one), Err(Error::NotIrreducible));
	}

	#[test]
	fn test_extend_with_rejects_foreign_alpha() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let mut rng = StdRng::seed_from_u64(12);
		let k1 = tower.create_field(2, &mut rng).unwrap();
		let k2 = tower.create_field(3, &mut rng).unwrap();
		let alpha = tower.field(k2).unwrap().generator();
		assert_matches!(tower.extend_with(k1, &alpha), Err(Error::NotInSameField));
	}

	#[test]
	fn test_extend_with_scalar_over_prime_field() {
		let mut tower = Tower::new(WordPrimeField::new(5).unwrap()).unwrap();
		let one = tower.prime_field().one();
		let k0 = crate::tower::FieldId::PRIME;
		let e = tower.extend_with(k0, &one).unwrap();
		let ef = tower.field(e).unwrap();
		assert_eq!(ef.degree(), 5);
		// Adjoining a root of X^5 - X - 1 over F_5 lands on the stem itself
		// up to isomorphism.
		let stem = tower.extend(k0).unwrap();
		let ef = tower.field(e).unwrap();
		assert!(ef.is_isomorphic(&tower.field(stem).unwrap()));
	}
}
