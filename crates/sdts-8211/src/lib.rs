//! Self-describing ISO/IEC 8211 record codec and typed SDTS module builders.
//!
//! This crate provides the building blocks for reading and writing
//! SDTS (Spatial Data Transfer Standard) vector-geometry transfers: the
//! per-type subfield converters, the record/field/subfield containers,
//! declarative field-format schemas, the record leader and directory
//! machinery, and a typed builder per module that marshals between the
//! generic record tree and domain values.
//!
//! # Overview
//!
//! An ISO 8211 transfer is a sequence of self-describing records. A
//! record is a tree: ordered fields, each an ordered list of run-time
//! typed subfields. On top of that generic tree, each SDTS module
//! (LINE, POLY, RING, ...) defines which fields appear and what they
//! mean; the builders in [`modules`] give those records a typed API.
//!
//! # Quick Start
//!
//! ```rust
//! use sdts_8211::model::{ForeignID, SpatialAddress};
//! use sdts_8211::modules::{Line, ModuleBuilder};
//!
//! // Build a line record
//! let mut line = Line::new();
//! line.set_module_name("LE01");
//! line.set_record_id(7);
//! line.set_object_representation("1");
//! line.add_attribute_id(ForeignID::attribute("AP01", 3));
//! line.add_spatial_address(SpatialAddress::from_xy(10.0, 20.0));
//!
//! // Project it into a generic record and read it back
//! let record = line.emit().unwrap();
//! let mut decoded = Line::new();
//! decoded.ingest(&record).unwrap();
//! assert_eq!(decoded.spatial_addresses()[0].xy(), Some((10.0, 20.0)));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Record tree, subfield values, foreign identifiers,
//!   spatial addresses
//! - [`codec`]: Converters, converter registry, leader and directory
//!   entries
//! - [`schema`]: Declarative field formats
//! - [`modules`]: Typed per-module builders
//! - [`error`]: Error types
//!
//! # Wire Format
//!
//! Character subfields are delimiter-terminated text (unit separator
//! `0x1F`, field terminator `0x1E`); binary subfields are fixed-width
//! big-endian. A record opens with a 24-byte leader whose directory
//! column widths are negotiated while entries are registered, so
//! serialization is a two-pass affair.

pub mod codec;
pub mod error;
pub mod model;
pub mod modules;
pub mod schema;

// Re-export commonly used types at crate root
pub use codec::{Converter, ConverterRegistry, DirEntry, Leader, FIELD_TERMINATOR, UNIT_TERMINATOR};
pub use error::{DecodeError, EmitError, EncodeError, IngestError, SchemaError};
pub use model::{
    AttributeID, Field, ForeignID, Record, SpatialAddress, Subfield, SubfieldType, SubfieldValue,
    Usage,
};
pub use modules::{builder_for_tag, ModuleBuilder, ModuleKind};
pub use schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
