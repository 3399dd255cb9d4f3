//! Binary header decoders.
//!
//! Each vendor format has its own set of header records. Field names often
//! coincide between formats but widths and orders do not, so no record type
//! is shared across formats.

pub mod cc;
pub mod cursor;
pub mod pa;
pub mod sab;
pub mod standard;

pub use cursor::{ByteCursor, Decode};
