//! # flakeid
//!
//! Sortable 128-bit Snowflake-style identifiers ("flakes").
//!
//! A flake packs, from the most significant bit down:
//!
//! ```text
//!  +---------------+--------------+------------------+---------------------+
//!  | timestamp (T) | sequence (S) | secondary id (D) | identity (8 * I)    |
//!  +---------------+--------------+------------------+---------------------+
//!  |<- MSB ---------------------- 128 bits ----------------------- LSB ->|
//! ```
//!
//! The widths, time unit and sequence policy are fixed per [`FlakeLayout`].
//! Three layouts ship with the crate:
//!
//! | Layout              | T (unit) | S  | D  | I |
//! |---------------------|----------|----|----|---|
//! | [`WideSidLayout`]   | 41 (ms)  | 11 | 20 | 7 |
//! | [`NarrowSidLayout`] | 41 (ms)  | 10 | 13 | 8 |
//! | [`MicrosLayout`]    | 52 (µs)  | 12 | 0  | 8 |
//!
//! ```
//! use flakeid::WideSidGenerator;
//!
//! let generator = WideSidGenerator::new(b"hello12", 1211).unwrap();
//! let flake = generator.next_flake();
//!
//! assert_eq!(flake.id().as_bytes(), b"hello12");
//! assert_eq!(flake.secondary_id(), 1211);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod entropy;
mod error;
mod flake;
mod generator;
mod layout;
mod sequence;
mod time;

pub use crate::entropy::*;
pub use crate::error::*;
pub use crate::flake::*;
pub use crate::generator::*;
pub use crate::layout::*;
pub use crate::sequence::*;
pub use crate::time::*;
