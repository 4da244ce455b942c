//! Error types for subfield conversion, schema construction, and the
//! typed module-builder layer.

use thiserror::Error;

use crate::model::SubfieldType;

/// Error while decoding raw subfield bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The caller asked for a width the converter cannot honor, e.g. a
    /// 16-bit slice handed to a 32-bit binary converter. Distinct from
    /// [`DecodeError::UnexpectedEof`], which means the buffer itself
    /// ran out.
    #[error("length mismatch for {kind:?}: requested {requested} bytes, type needs {intrinsic}")]
    LengthMismatch {
        kind: SubfieldType,
        requested: usize,
        intrinsic: usize,
    },

    #[error("unexpected end of input while reading {context}: needed {needed} bytes, had {available}")]
    UnexpectedEof {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("invalid {kind:?} number: {text:?}")]
    InvalidNumber { kind: SubfieldType, text: String },

    #[error("invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },
}

/// Error while encoding a subfield back into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Binary subfield types are fixed-width by construction; asking
    /// for a declared fixed width is a schema configuration error.
    #[error("fixed-width encode is unsupported for binary type {kind:?}")]
    FixedWidthUnsupported { kind: SubfieldType },

    /// A fixed-width column cannot represent "no value at all".
    #[error("cannot encode an unvalued {kind:?} subfield at fixed width {width}")]
    UnvaluedFixedWidth { kind: SubfieldType, width: usize },

    /// A numeric rendering needs more characters than the declared
    /// fixed width; truncating would silently lose digits.
    #[error("{kind:?} value needs {needed} characters, fixed width is {width}")]
    FixedWidthOverflow {
        kind: SubfieldType,
        width: usize,
        needed: usize,
    },

    /// A leader column's value cannot be rendered in its fixed
    /// character width.
    #[error("leader {column} value {value} does not fit in {width} characters")]
    LeaderOverflow {
        column: &'static str,
        value: usize,
        width: usize,
    },
}

/// Error while building or querying a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The converter registry had no entry for a type-name string.
    /// Callers must treat this as a configuration error, never default.
    #[error("unknown converter type {name:?}")]
    UnknownConverterType { name: String },

    #[error("schema for {module} is empty")]
    SchemaEmpty { module: &'static str },
}

/// Error while ingesting a generic record into a typed module builder.
///
/// Ingestion fails fast: the first error aborts the whole ingest and
/// the builder keeps its prior state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The record's primary field does not carry this module's tag.
    #[error("record is not a {expected} module record")]
    NotThisModuleType { expected: &'static str },

    #[error("{module} record is missing mandatory subfield {mnemonic}")]
    MissingMandatoryField {
        module: &'static str,
        mnemonic: &'static str,
    },

    /// A field in a foreign-identifier group did not parse as a
    /// module-name + record-id pair.
    #[error("invalid foreign identifier in {mnemonic} field: {reason}")]
    InvalidForeignIdentifier { mnemonic: String, reason: String },

    /// A spatial-address field carried a subfield that is neither X
    /// nor Y.
    #[error("invalid {mnemonic} spatial group: unexpected subfield {found:?}")]
    InvalidSpatialGroup { mnemonic: String, found: String },

    #[error("subfield {mnemonic} has the wrong type: expected {expected:?}")]
    WrongSubfieldType {
        mnemonic: String,
        expected: SubfieldType,
    },
}

/// Error while emitting a typed builder back into a generic record.
///
/// Emission is a pure projection and only fails when a structurally
/// mandatory value (a module's defining geometry) has no safe
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("{module} record cannot be emitted without {mnemonic}")]
    MissingMandatoryField {
        module: &'static str,
        mnemonic: &'static str,
    },
}
