// Copyright 2025 Irreducible Inc.

use std::{
	iter::repeat_with,
	ops::{Index, IndexMut},
};

use getset::CopyGetters;
use rand::RngCore;

use crate::{error::Error, prime::PrimeField};

/// A row-major matrix over a prime-field backend.
///
/// Element arithmetic goes through an explicit context argument, so the
/// backend element type only has to be cloneable.
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct Matrix<A: PrimeField> {
	#[getset(get_copy = "pub")]
	m: usize,
	#[getset(get_copy = "pub")]
	n: usize,
	elements: Box<[A::Elem]>,
}

impl<A: PrimeField> Matrix<A> {
	pub fn new(m: usize, n: usize, elements: &[A::Elem]) -> Result<Self, Error> {
		if elements.len() != m * n {
			return Err(Error::IncorrectArgumentLength {
				arg: "elements".into(),
				expected: m * n,
			});
		}
		Ok(Self {
			m,
			n,
			elements: elements.into(),
		})
	}

	pub fn zeros(fp: &A, m: usize, n: usize) -> Self {
		Self {
			m,
			n,
			elements: vec![fp.zero(); m * n].into_boxed_slice(),
		}
	}

	pub fn identity(fp: &A, n: usize) -> Self {
		let mut out = Self::zeros(fp, n, n);
		for i in 0..n {
			out[(i, i)] = fp.one();
		}
		out
	}

	fn fill_identity(&mut self, fp: &A) {
		assert_eq!(self.m, self.n);
		self.elements.fill(fp.zero());
		for i in 0..self.n {
			self[(i, i)] = fp.one();
		}
	}

	pub fn elements(&self) -> &[A::Elem] {
		&self.elements
	}

	pub fn random(fp: &A, m: usize, n: usize, mut rng: impl RngCore) -> Self {
		Self {
			m,
			n,
			elements: repeat_with(|| fp.random(&mut rng)).take(m * n).collect(),
		}
	}

	pub fn dim(&self) -> (usize, usize) {
		(self.m, self.n)
	}

	pub fn mul_into(fp: &A, a: &Self, b: &Self, c: &mut Self) {
		assert_eq!(a.n(), b.m());
		assert_eq!(a.m(), c.m());
		assert_eq!(b.n(), c.n());

		for i in 0..c.m() {
			for j in 0..c.n() {
				c[(i, j)] = (0..a.n()).fold(fp.zero(), |acc, k| {
					fp.add(&acc, &fp.mul(&a[(i, k)], &b[(k, j)]))
				});
			}
		}
	}

	pub fn mul_vec_into(&self, fp: &A, x: &[A::Elem], y: &mut [A::Elem]) {
		assert_eq!(self.n(), x.len());
		assert_eq!(self.m(), y.len());

		for (i, y_i) in y.iter_mut().enumerate() {
			*y_i = (0..self.n).fold(fp.zero(), |acc, j| {
				fp.add(&acc, &fp.mul(&x[j], &self[(i, j)]))
			});
		}
	}

	/// Invert a square matrix by Gauss-Jordan elimination.
	///
	/// ## Throws
	///
	/// * [`Error::MatrixNotSquare`]
	/// * [`Error::MatrixIsSingular`]
	///
	/// ## Preconditions
	///
	/// * `out` - must have the same dimensions as `self`
	pub fn inverse_into(&self, fp: &A, out: &mut Self) -> Result<(), Error> {
		assert_eq!(self.dim(), out.dim());

		if self.m != self.n {
			return Err(Error::MatrixNotSquare);
		}

		let n = self.n;

		let mut tmp = self.clone();
		out.fill_identity(fp);

		for i in 0..n {
			// Find the pivot row
			let pivot = (i..n)
				.find(|&pivot| !fp.is_zero(&tmp[(pivot, i)]))
				.ok_or(Error::MatrixIsSingular)?;
			if pivot != i {
				tmp.swap_rows(i, pivot);
				out.swap_rows(i, pivot);
			}

			// Normalize the pivot
			let scalar = fp.invert(&tmp[(i, i)]).ok_or(Error::MatrixIsSingular)?;
			tmp.scale_row(fp, i, &scalar);
			out.scale_row(fp, i, &scalar);

			// Clear the pivot column
			for j in (0..i).chain(i + 1..n) {
				let scalar = tmp[(j, i)].clone();
				tmp.sub_pivot_row(fp, j, i, &scalar);
				out.sub_pivot_row(fp, j, i, &scalar);
			}
		}

		debug_assert_eq!(tmp, Self::identity(fp, n));

		Ok(())
	}

	fn swap_rows(&mut self, i0: usize, i1: usize) {
		assert!(i0 < self.m);
		assert!(i1 < self.m);

		if i0 == i1 {
			return;
		}

		for j in 0..self.n {
			self.elements.swap(i0 * self.n + j, i1 * self.n + j);
		}
	}

	fn scale_row(&mut self, fp: &A, i: usize, scalar: &A::Elem) {
		assert!(i < self.m);

		for j in 0..self.n {
			self[(i, j)] = fp.mul(&self[(i, j)], scalar);
		}
	}

	fn sub_pivot_row(&mut self, fp: &A, i0: usize, i1: usize, scalar: &A::Elem) {
		assert!(i0 < self.m);
		assert!(i1 < self.m);

		for j in 0..self.n {
			let x = fp.mul(&self[(i1, j)], scalar);
			self[(i0, j)] = fp.sub(&self[(i0, j)], &x);
		}
	}
}

impl<A: PrimeField> Index<(usize, usize)> for Matrix<A> {
	type Output = A::Elem;

	fn index(&self, index: (usize, usize)) -> &Self::Output {
		let (i, j) = index;
		assert!(i < self.m);
		assert!(j < self.n);
		&self.elements[i * self.n + j]
	}
}

impl<A: PrimeField> IndexMut<(usize, usize)> for Matrix<A> {
	fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
		let (i, j) = index;
		assert!(i < self.m);
		assert!(j < self.n);
		&mut self.elements[i * self.n + j]
	}
}
