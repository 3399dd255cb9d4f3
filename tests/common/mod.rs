//! Common test utilities for cinrad.
//!
//! Synthetic volume files in every supported layout and float assertions.

#![allow(dead_code)]

pub mod assertions;
pub mod test_data;
