//! Common utilities for srdtool.
//!
//! This crate provides the foundational types used across the srdtool crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`BinaryWriter`] - Growable binary output buffer
//! - [`Error`] / [`Result`] - Shared error type for cursor operations

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
