//! Declarative field-format schemas.
//!
//! A schema describes the wire shape of a module's record: one
//! [`FieldFormat`] per field, each carrying an ordered list of
//! [`SubfieldFormat`]s with their bound converters. Builders construct
//! their schema lazily and idempotently; a writer walks it to lay the
//! record out.

use std::cmp::Ordering;

use crate::codec::{Converter, ConverterRegistry};
use crate::error::SchemaError;
use crate::model::SubfieldType;

/// Reserved tag for the record-identifier field some transfers prepend.
pub const RECORD_IDENTIFIER_TAG: &str = "0001";

/// Whether a subfield's byte width comes from the declaration or from
/// a delimiter at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthMode {
    Fixed(usize),
    Variable,
}

/// ISO 8211 field structure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructCode {
    Elementary,
    Vector,
    Array,
    Concatenated,
}

/// ISO 8211 field data-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    CharString,
    ImplicitPoint,
    ExplicitPoint,
    ExplicitPointScaled,
    CharBitString,
    BitString,
    MixedDataType,
}

/// One column of a field: its label, type, width mode, and the
/// converter that reads and writes it.
#[derive(Debug, Clone)]
pub struct SubfieldFormat {
    label: String,
    kind: SubfieldType,
    width: WidthMode,
    converter: &'static Converter,
}

impl SubfieldFormat {
    /// Builds a format whose converter is resolved through `registry`
    /// by the type's wire name.
    pub fn new(
        label: impl Into<String>,
        kind: SubfieldType,
        width: WidthMode,
        registry: &ConverterRegistry,
    ) -> Result<Self, SchemaError> {
        let converter = registry.get(kind.name())?;
        Ok(SubfieldFormat {
            label: label.into(),
            kind,
            width,
            converter,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> SubfieldType {
        self.kind
    }

    pub fn width(&self) -> WidthMode {
        self.width
    }

    pub fn converter(&self) -> &'static Converter {
        self.converter
    }
}

/// The wire shape of one field: tag, name, codes, repeat flag, and its
/// ordered subfield formats.
///
/// Equality and ordering are defined by tag alone, so formats can be
/// looked up in a schema without comparing their full contents.
#[derive(Debug, Clone)]
pub struct FieldFormat {
    tag: String,
    name: String,
    struct_code: StructCode,
    type_code: TypeCode,
    is_repeating: bool,
    subfields: Vec<SubfieldFormat>,
}

impl FieldFormat {
    pub fn new(
        tag: impl Into<String>,
        name: impl Into<String>,
        struct_code: StructCode,
        type_code: TypeCode,
    ) -> Self {
        FieldFormat {
            tag: tag.into(),
            name: name.into(),
            struct_code,
            type_code,
            is_repeating: false,
            subfields: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn struct_code(&self) -> StructCode {
        self.struct_code
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    pub fn is_repeating(&self) -> bool {
        self.is_repeating
    }

    pub fn set_repeating(&mut self, repeating: bool) {
        self.is_repeating = repeating;
    }

    pub fn push(&mut self, subfield: SubfieldFormat) {
        self.subfields.push(subfield);
    }

    pub fn subfields(&self) -> &[SubfieldFormat] {
        &self.subfields
    }
}

impl PartialEq for FieldFormat {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for FieldFormat {}

impl PartialOrd for FieldFormat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldFormat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag)
    }
}

/// An ordered sequence of field formats.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    formats: Vec<FieldFormat>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, format: FieldFormat) {
        self.formats.push(format);
    }

    pub fn formats(&self) -> &[FieldFormat] {
        &self.formats
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldFormat> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn clear(&mut self) {
        self.formats.clear();
    }

    /// A built schema is never empty; writers receiving one from
    /// elsewhere check the invariant before laying out a record.
    pub fn ensure_non_empty(&self, module: &'static str) -> Result<(), SchemaError> {
        if self.is_empty() {
            return Err(SchemaError::SchemaEmpty { module });
        }
        Ok(())
    }

    /// First format with the given tag, if any.
    pub fn find(&self, tag: &str) -> Option<&FieldFormat> {
        self.formats.iter().find(|f| f.tag() == tag)
    }

    /// Prepends the reserved record-identifier field (tag "0001") that
    /// some enclosing transfers expect as the first directory entry.
    pub fn push_record_identifier(&mut self, registry: &ConverterRegistry) -> Result<(), SchemaError> {
        let mut format = FieldFormat::new(
            RECORD_IDENTIFIER_TAG,
            "DDF RECORD IDENTIFIER",
            StructCode::Elementary,
            TypeCode::ImplicitPoint,
        );
        format.push(SubfieldFormat::new(
            "",
            SubfieldType::I,
            WidthMode::Variable,
            registry,
        )?);
        self.formats.insert(0, format);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldFormat;
    type IntoIter = std::slice::Iter<'a, FieldFormat>;

    fn into_iter(self) -> Self::IntoIter {
        self.formats.iter()
    }
}
