// Copyright 2025 Irreducible Inc.

//! Towers of Artin-Schreier extensions over prime fields.
//!
//! In characteristic p every degree-p Galois extension is generated by a root
//! of X^p - X - alpha. This crate grows such extensions level by level into a
//! [`Tower`]: base fields of arbitrary degree, canonical degree-p steps on
//! top of them, and user-chosen steps through an explicit alpha. Every field
//! keeps a flat univariate representation over F_p so element arithmetic
//! stays dense, while [`Tower::push_down`] and [`Tower::lift_up`] convert
//! between a field and p digits over its subfield in softly linear time.
//! [`Tower::couveignes`] inverts the additive operator z -> z^p - z, the
//! primitive the constructions themselves are built from.

mod construction;
mod element;
mod embedding;
mod error;
mod roots;
mod tower;

pub use element::{FieldElement, FieldPolynomial};
pub use error::Error;
pub use tower::{Field, FieldId, Tower};
