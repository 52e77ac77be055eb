//! DEC64 decimal arithmetic on a single 64-bit word.
//!
//! A [`Dec64`] packs a 56-bit signed decimal coefficient and an 8-bit signed
//! exponent into one `i64`, representing `coefficient × 10^exponent`. All
//! arithmetic is exact base-10 integer arithmetic — there are no binary
//! fraction artifacts, so `0.1 + 0.2` is exactly `0.3`.
//!
//! ## Features
//!
//! - **Exact decimal math**: results are decimal-correct, rounded half away
//!   from zero only when a result exceeds 17 significant digits
//! - **One machine word**: values are `Copy` scalars; no allocation anywhere
//! - **Total operators**: every operation is defined for every input and
//!   signals failure through a NaN sentinel instead of panicking
//! - **no_std compatible**: pure `core`, usable in embedded and WebAssembly
//! - **Serde support**: optional bit-level serialization of the packed word
//!
//! ## Example
//!
//! ```rust
//! use dec64::Dec64;
//!
//! let price = Dec64::new(12345, -2); // 123.45
//! let quantity = Dec64::from(100);
//! let total = price * quantity;
//! assert_eq!(total, Dec64::from(12345));
//!
//! // Repeating expansions keep 17 significant digits.
//! let third = Dec64::ONE / Dec64::new(3, 0);
//! assert_eq!(third, Dec64::new(33333333333333333, -17));
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

mod dec64;

pub use dec64::Dec64;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dec64Error {
    #[error("overflow: value too large to represent")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("precision loss: integer exceeds the 56-bit coefficient range")]
    PrecisionLoss,
}

pub type Result<T> = core::result::Result<T, Dec64Error>;
