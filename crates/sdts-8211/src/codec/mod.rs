//! Wire-level encode/decode machinery.
//!
//! The converter layer turns subfield values into bytes and back; the
//! registry hands out one shared converter per type name; the leader
//! and directory entries describe where each field's bytes live inside
//! a record.

pub mod converter;
pub mod leader;
pub mod registry;

pub use converter::{Converter, FIELD_TERMINATOR, UNIT_TERMINATOR};
pub use leader::{DirEntry, Leader};
pub use registry::ConverterRegistry;
