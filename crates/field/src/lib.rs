// Copyright 2025 Irreducible Inc.

//! Prime-field backends and univariate polynomial arithmetic for
//! Artin-Schreier towers.
//!
//! The crate is organized around two context traits. [`PrimeField`] abstracts
//! the coefficient field F_p over three regimes: word-sized primes,
//! arbitrary-precision primes, and characteristic 2. [`PolyRing`] layers
//! dense polynomial arithmetic on top, including the transposed variants of
//! multiplication, remainder, and Taylor shift that the tower embeddings are
//! built from. [`PolyModulus`] packages a monic modulus with the
//! precomputation for fast reduction, and [`TransMultiplier`] the analogous
//! precomputation for projecting against a fixed functional.

mod big;
mod binary;
mod cyclotomic;
mod error;
mod irreducible;
mod matrix;
mod modulus;
mod poly;
mod prime;
pub mod primes;
mod word;

pub use big::*;
pub use binary::*;
pub use cyclotomic::*;
pub use error::*;
pub use irreducible::*;
pub use matrix::*;
pub use modulus::*;
pub use poly::*;
pub use prime::*;
pub use word::*;
