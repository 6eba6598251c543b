//! Fixed-width 128-bit integers built from two 64-bit limbs
//!
//! This library provides two integer types sharing one carry-chain core:
//!
//! - **`Uint128`**: unsigned
//!   - Range: 0 ..= 340,282,366,920,938,463,463,374,607,431,768,211,455 (2^128 - 1)
//!   - Ordering: borrow flag of a 128-bit subtraction
//!
//! - **`Int128`**: signed, two's-complement
//!   - Range: -2^127 ..= 2^127 - 1
//!   - Ordering: sign and overflow flags of a 128-bit subtraction
//!
//! ## Wrapping arithmetic
//!
//! Addition, subtraction and negation **never fail and never panic**. Every
//! result is taken modulo 2^128, exactly like a hardware ALU, and that holds
//! for `Int128` as well: `Int128::MAX + Int128::ONE == Int128::MIN`, and
//! negating `Int128::MIN` returns `Int128::MIN`. The carry or borrow out of
//! the top limb is available from `add_with_carry` / `sub_with_borrow` when
//! a caller needs to detect it.
//!
//! Parsing is the exception: decimal text whose value does not fit the target
//! type is rejected with [`IntError::Overflow`] instead of wrapping.
//!
//! ## Features
//!
//! - **no_std**: no allocation anywhere in the crate
//! - **Big-number-free decimal conversion**: Horner parsing and long-division
//!   formatting run directly on the limb pair
//! - **Fixed 16-byte codecs**: little-endian and big-endian, array based
//! - **Serde support** (`serde` feature): decimal strings for JSON and other
//!   human-readable formats, native 128-bit integers for binary formats
//! - **Bare JSON numerals** (`serde-arbitrary-precision` feature): unquoted
//!   numbers across the full 128-bit range through serde_json's
//!   `arbitrary_precision` mode
//!
//! ## Example
//!
//! ```rust
//! use core::str::FromStr;
//! use fixint::{Int128, Uint128};
//!
//! let a = Uint128::from_str("340282366920938463463374607431768211455").unwrap();
//! let (sum, carry) = a.add_with_carry(Uint128::ONE, 0);
//! assert_eq!(sum, Uint128::ZERO);
//! assert_eq!(carry, 1);
//!
//! let min = Int128::from_str("-170141183460469231731687303715884105728").unwrap();
//! assert_eq!(-min, min);
//! assert!(min < Int128::ZERO);
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
extern crate std;

mod decimal;
mod int128;
mod limb;
#[cfg(feature = "serde-arbitrary-precision")]
mod serde_number;
mod uint128;

pub use int128::{Int128, compare_int128, less_int128};
pub use uint128::{Uint128, compare_uint128, less_uint128};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntError {
    #[error("invalid string format")]
    InvalidFormat,

    #[error("overflow: value out of range for the target type")]
    Overflow,

    #[error("invalid value")]
    InvalidValue,
}

pub type Result<T> = core::result::Result<T, IntError>;
