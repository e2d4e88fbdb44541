// Copyright 2025 Irreducible Inc.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("the backend characteristic is not a prime number")]
	NotPrime,
	#[error("the polynomial is reducible")]
	NotIrreducible,
	#[error("the polynomial is irreducible, so the equation has no root")]
	IsIrreducible,
	#[error("bad parameters: {0}")]
	BadParameters(String),
	#[error("the field has no subfield in its tower")]
	NoSubField,
	#[error("the field has no overfield yet")]
	NoOverField,
	#[error("the elements belong to different fields")]
	NotInSameField,
	#[error("no field with this id lives in the tower")]
	NoSuchField,
	#[error("division by zero")]
	DivisionByZero,
	#[error("the construction is not supported for these parameters")]
	NotSupported,
	#[error("the characteristic does not fit in a machine word")]
	CharacteristicTooLarge,
	#[error("field arithmetic error: {0}")]
	Field(#[from] schreier_field::Error),
}
