// Copyright 2025 Irreducible Inc.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("the characteristic must be at least 2")]
	CharacteristicTooSmall,
	#[error("the modulus must have degree at least 1")]
	ConstantModulus,
	#[error("the leading coefficient is not invertible")]
	NonInvertibleLeadingCoefficient,
	#[error("division by zero")]
	DivisionByZero,
	#[error("argument {arg} does not have expected length {expected}")]
	IncorrectArgumentLength { arg: String, expected: usize },
	#[error("the matrix is not square")]
	MatrixNotSquare,
	#[error("the matrix is singular")]
	MatrixIsSingular,
	#[error("the polynomial is not a polynomial in X^{n}")]
	ContractionMismatch { n: usize },
	#[error("the cyclotomic index must be nonzero and coprime to the characteristic")]
	BadCyclotomicIndex,
	#[error("exponentiation of zero to a negative power")]
	ZeroToNegativePower,
}
