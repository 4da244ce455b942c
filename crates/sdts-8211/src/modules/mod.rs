//! Typed per-module builders.
//!
//! Each module (LINE, POLY, RING, ...) gets a builder that owns the
//! module's domain attributes, knows its wire schema, and marshals to
//! and from the generic [`Record`] tree. Ingestion is atomic: a record
//! that fails to parse leaves the builder untouched.

pub mod clrx;
pub mod comp;
pub mod dddf;
pub mod ddom;
pub mod line;
pub mod pnts;
pub mod poly;
pub mod ring;
pub mod spdm;

pub use clrx::Clrx;
pub use comp::Comp;
pub use dddf::Dddf;
pub use ddom::Ddom;
pub use line::Line;
pub use pnts::Pnts;
pub use poly::Poly;
pub use ring::Ring;
pub use spdm::Spdm;

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, ForeignID, Record, Subfield, SubfieldType};
use crate::schema::Schema;

/// The capability every module builder exposes.
pub trait ModuleBuilder {
    /// The four-letter module tag ("LINE", "POLY", ...).
    fn module_tag(&self) -> &'static str;

    /// Builds the module's wire schema. Rebuilding always starts from
    /// scratch, so repeated calls never duplicate field formats.
    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError>;

    /// Replaces the builder's state with the contents of `record`.
    /// On error the builder keeps its previous state.
    fn ingest(&mut self, record: &Record) -> Result<(), IngestError>;

    /// Projects the builder's state into a generic record.
    fn emit(&self) -> Result<Record, EmitError>;

    /// Returns the builder to its freshly-constructed state so the
    /// allocation can be reused.
    fn reset(&mut self);
}

/// The module types this crate has builders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Line,
    Poly,
    Ring,
    Pnts,
    Comp,
    Ddom,
    Dddf,
    Spdm,
    Clrx,
}

impl ModuleKind {
    pub fn tag(self) -> &'static str {
        match self {
            ModuleKind::Line => "LINE",
            ModuleKind::Poly => "POLY",
            ModuleKind::Ring => "RING",
            ModuleKind::Pnts => "PNTS",
            ModuleKind::Comp => "COMP",
            ModuleKind::Ddom => "DDOM",
            ModuleKind::Dddf => "DDDF",
            ModuleKind::Spdm => "SPDM",
            ModuleKind::Clrx => "CLRX",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ModuleKind> {
        match tag {
            "LINE" => Some(ModuleKind::Line),
            "POLY" => Some(ModuleKind::Poly),
            "RING" => Some(ModuleKind::Ring),
            "PNTS" => Some(ModuleKind::Pnts),
            "COMP" => Some(ModuleKind::Comp),
            "DDOM" => Some(ModuleKind::Ddom),
            "DDDF" => Some(ModuleKind::Dddf),
            "SPDM" => Some(ModuleKind::Spdm),
            "CLRX" => Some(ModuleKind::Clrx),
            _ => None,
        }
    }

    /// A fresh builder for this module type.
    pub fn builder(self) -> Box<dyn ModuleBuilder> {
        match self {
            ModuleKind::Line => Box::new(Line::new()),
            ModuleKind::Poly => Box::new(Poly::new()),
            ModuleKind::Ring => Box::new(Ring::new()),
            ModuleKind::Pnts => Box::new(Pnts::new()),
            ModuleKind::Comp => Box::new(Comp::new()),
            ModuleKind::Ddom => Box::new(Ddom::new()),
            ModuleKind::Dddf => Box::new(Dddf::new()),
            ModuleKind::Spdm => Box::new(Spdm::new()),
            ModuleKind::Clrx => Box::new(Clrx::new()),
        }
    }
}

/// Builder for an arbitrary module tag, if one is known.
pub fn builder_for_tag(tag: &str) -> Option<Box<dyn ModuleBuilder>> {
    Some(ModuleKind::from_tag(tag)?.builder())
}

// =============================================================================
// SHARED INGEST/EMIT MACHINERY
// =============================================================================

/// Forward-only scan over a record's fields.
///
/// Repeating groups must appear in the schema's declared order; a
/// group that sits before the cursor is simply not found, never
/// searched for backwards.
pub(crate) struct Cursor<'a> {
    fields: &'a [Field],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(record: &'a Record) -> Self {
        Cursor {
            fields: record.fields(),
            pos: 0,
        }
    }

    /// Consumes the maximal contiguous run of fields with the given
    /// mnemonic at or after the cursor. Returns an empty slice (and
    /// leaves the cursor alone) when no such field remains.
    pub(crate) fn take_run(&mut self, mnemonic: &str) -> &'a [Field] {
        let Some(offset) = self.fields[self.pos..]
            .iter()
            .position(|f| f.mnemonic() == mnemonic)
        else {
            return &[];
        };
        let start = self.pos + offset;
        let mut end = start;
        while end < self.fields.len() && self.fields[end].mnemonic() == mnemonic {
            end += 1;
        }
        self.pos = end;
        &self.fields[start..end]
    }

    /// Like [`take_run`](Cursor::take_run) but stops after the first
    /// matching field, for groups declared non-repeating.
    pub(crate) fn take_one(&mut self, mnemonic: &str) -> Option<&'a Field> {
        let offset = self.fields[self.pos..]
            .iter()
            .position(|f| f.mnemonic() == mnemonic)?;
        let at = self.pos + offset;
        self.pos = at + 1;
        Some(&self.fields[at])
    }
}

/// Scans one contiguous foreign-id run into `out`, relabelling each
/// parsed reference with the group's field labels.
pub(crate) fn take_foreign_id_run(
    cursor: &mut Cursor<'_>,
    mnemonic: &str,
    out: &mut Vec<ForeignID>,
) -> Result<(), IngestError> {
    for field in cursor.take_run(mnemonic) {
        out.push(ForeignID::from_field(field)?);
    }
    Ok(())
}

/// Scans an optional single foreign-id field.
pub(crate) fn take_foreign_id(
    cursor: &mut Cursor<'_>,
    mnemonic: &str,
) -> Result<Option<ForeignID>, IngestError> {
    match cursor.take_one(mnemonic) {
        Some(field) => Ok(Some(ForeignID::from_field(field)?)),
        None => Ok(None),
    }
}

/// Finds the primary field (mnemonic == module tag) or fails with
/// `NotThisModuleType`.
pub(crate) fn primary_field<'a>(record: &'a Record, tag: &'static str) -> Result<&'a Field, IngestError> {
    record
        .field(tag)
        .ok_or(IngestError::NotThisModuleType { expected: tag })
}

/// Reads the optional MODN/RCID overrides out of a primary field.
pub(crate) fn read_module_header(field: &Field, module_name: &mut String, record_id: &mut i64) {
    if let Some(name) = field.subfield("MODN").and_then(Subfield::as_str) {
        *module_name = name.to_string();
    }
    if let Some(id) = field.subfield("RCID").and_then(Subfield::as_int) {
        *record_id = id;
    }
}

/// A mandatory text subfield of the primary field.
pub(crate) fn mandatory_str(
    field: &Field,
    module: &'static str,
    mnemonic: &'static str,
) -> Result<String, IngestError> {
    field
        .subfield(mnemonic)
        .and_then(Subfield::as_str)
        .map(str::to_string)
        .ok_or(IngestError::MissingMandatoryField { module, mnemonic })
}

/// An optional text subfield; present-but-unvalued reads as unset.
pub(crate) fn optional_str(field: &Field, mnemonic: &str) -> Option<String> {
    field.subfield(mnemonic).and_then(Subfield::as_str).map(str::to_string)
}

/// An optional real subfield. A present, valued subfield that is not
/// numeric is an error rather than a silently dropped value.
pub(crate) fn optional_double(field: &Field, mnemonic: &str) -> Result<Option<f64>, IngestError> {
    match field.subfield(mnemonic) {
        None => Ok(None),
        Some(sf) if sf.is_unvalued() => Ok(None),
        Some(sf) => sf
            .as_double()
            .map(Some)
            .ok_or_else(|| IngestError::WrongSubfieldType {
                mnemonic: mnemonic.to_string(),
                expected: SubfieldType::R,
            }),
    }
}

/// Appends a text subfield; unset attributes become typed-but-unvalued
/// placeholders so the schema's column always exists in the output.
pub(crate) fn push_str_subfield(field: &mut Field, name: &str, mnemonic: &str, value: Option<&str>) {
    let mut subfield = Subfield::empty(mnemonic, SubfieldType::A);
    subfield.set_name(name);
    if let Some(v) = value {
        subfield.set_a(v);
    }
    field.push(subfield);
}

/// Appends an integer subfield, placeholder when unset.
pub(crate) fn push_int_subfield(field: &mut Field, name: &str, mnemonic: &str, value: Option<i64>) {
    let mut subfield = Subfield::empty(mnemonic, SubfieldType::I);
    subfield.set_name(name);
    if let Some(v) = value {
        subfield.set_i(v);
    }
    field.push(subfield);
}

/// Appends a real subfield, placeholder when unset.
pub(crate) fn push_double_subfield(field: &mut Field, name: &str, mnemonic: &str, value: Option<f64>) {
    let mut subfield = Subfield::empty(mnemonic, SubfieldType::R);
    subfield.set_name(name);
    if let Some(v) = value {
        subfield.set_r(v);
    }
    field.push(subfield);
}

/// Emits one field per reference, relabelled to the group's labels so
/// the output is schema-consistent regardless of source labels.
pub(crate) fn push_foreign_id_fields(
    record: &mut Record,
    name: &str,
    mnemonic: &str,
    ids: &[ForeignID],
) {
    for id in ids {
        let mut relabelled = id.clone();
        relabelled.set_labels(name, mnemonic);
        record.push(relabelled.to_field());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;

    fn atid_field(id: i64) -> Field {
        ForeignID::attribute("AP01", id).to_field()
    }

    fn cpid_field() -> Field {
        let mut fid = ForeignID::new("CP01", 1, Usage::None);
        fid.set_labels("COMPOSITE ID", "CPID");
        fid.to_field()
    }

    #[test]
    fn test_cursor_takes_maximal_contiguous_run() {
        let mut record = Record::new();
        record.push(atid_field(1));
        record.push(atid_field(2));
        record.push(atid_field(3));
        record.push(cpid_field());

        let mut cursor = Cursor::new(&record);
        let run = cursor.take_run("ATID");
        assert_eq!(run.len(), 3);

        // The CPID field must not be swallowed by the ATID run.
        let run = cursor.take_run("CPID");
        assert_eq!(run.len(), 1);
    }

    #[test]
    fn test_cursor_never_scans_backwards() {
        let mut record = Record::new();
        record.push(cpid_field());
        record.push(atid_field(1));

        let mut cursor = Cursor::new(&record);
        assert_eq!(cursor.take_run("ATID").len(), 1);
        // CPID sits before the cursor now, so the group reads as absent.
        assert!(cursor.take_run("CPID").is_empty());
    }

    #[test]
    fn test_cursor_split_runs_only_take_the_first() {
        let mut record = Record::new();
        record.push(atid_field(1));
        record.push(cpid_field());
        record.push(atid_field(2));

        let mut cursor = Cursor::new(&record);
        assert_eq!(cursor.take_run("ATID").len(), 1);
        assert_eq!(cursor.take_run("CPID").len(), 1);
        assert_eq!(cursor.take_run("ATID").len(), 1);
    }

    #[test]
    fn test_builder_for_tag() {
        assert_eq!(builder_for_tag("LINE").map(|b| b.module_tag()), Some("LINE"));
        assert_eq!(builder_for_tag("SPDM").map(|b| b.module_tag()), Some("SPDM"));
        assert!(builder_for_tag("NOPE").is_none());
    }
}
