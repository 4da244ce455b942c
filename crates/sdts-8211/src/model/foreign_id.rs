//! Cross-module record references.
//!
//! A foreign identifier points at a record in another (or the same)
//! module. On the wire it is either a two/three-subfield field (MODN +
//! RCID + optional USAG) or one packed string such as `"LE01#7L"`.

use crate::codec::ConverterRegistry;
use crate::error::{IngestError, SchemaError};
use crate::model::record::Field;
use crate::model::subfield::{Subfield, SubfieldType};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

/// Role modifier attached to a reference, encoded as a single trailing
/// character in the packed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Usage {
    #[default]
    None,
    StartNode,
    EndNode,
    LeftPolygon,
    RightPolygon,
    ForwardOrientation,
    BackwardOrientation,
    InteriorPolygon,
    ExteriorPolygon,
}

impl Usage {
    /// The packed-form character; `None` usage has no character.
    pub fn as_char(self) -> Option<char> {
        match self {
            Usage::None => None,
            Usage::StartNode => Some('S'),
            Usage::EndNode => Some('E'),
            Usage::LeftPolygon => Some('L'),
            Usage::RightPolygon => Some('R'),
            Usage::ForwardOrientation => Some('F'),
            Usage::BackwardOrientation => Some('B'),
            Usage::InteriorPolygon => Some('I'),
            Usage::ExteriorPolygon => Some('X'),
        }
    }

    pub fn from_char(c: char) -> Option<Usage> {
        match c {
            'S' => Some(Usage::StartNode),
            'E' => Some(Usage::EndNode),
            'L' => Some(Usage::LeftPolygon),
            'R' => Some(Usage::RightPolygon),
            'F' => Some(Usage::ForwardOrientation),
            'B' => Some(Usage::BackwardOrientation),
            'I' => Some(Usage::InteriorPolygon),
            'X' => Some(Usage::ExteriorPolygon),
            _ => None,
        }
    }
}

/// A reference to a record in some module.
///
/// `name` and `mnemonic` label the field this reference travels in;
/// the default labels mark a generic foreign identifier and
/// [`ForeignID::attribute`] swaps in the attribute-reference labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignID {
    name: String,
    mnemonic: String,
    module_name: String,
    record_id: i64,
    usage: Usage,
}

/// An attribute reference is a foreign identifier with different
/// labels.
pub type AttributeID = ForeignID;

impl Default for ForeignID {
    fn default() -> Self {
        ForeignID {
            name: "FOREIGN ID".to_string(),
            mnemonic: "FRID".to_string(),
            module_name: String::new(),
            record_id: 0,
            usage: Usage::None,
        }
    }
}

impl ForeignID {
    pub fn new(module_name: impl Into<String>, record_id: i64, usage: Usage) -> Self {
        ForeignID {
            module_name: module_name.into(),
            record_id,
            usage,
            ..Self::default()
        }
    }

    /// A reference into an attribute module ("ATTRIBUTE ID" / "ATID").
    pub fn attribute(module_name: impl Into<String>, record_id: i64) -> Self {
        ForeignID {
            name: "ATTRIBUTE ID".to_string(),
            mnemonic: "ATID".to_string(),
            module_name: module_name.into(),
            record_id,
            usage: Usage::None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn set_labels(&mut self, name: impl Into<String>, mnemonic: impl Into<String>) {
        self.name = name.into();
        self.mnemonic = mnemonic.into();
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn set_module_name(&mut self, module_name: impl Into<String>) {
        self.module_name = module_name.into();
    }

    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn set_record_id(&mut self, record_id: i64) {
        self.record_id = record_id;
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn set_usage(&mut self, usage: Usage) {
        self.usage = usage;
    }

    /// The packed single-string form: `"<module>#<id>"` with the usage
    /// character appended when one applies (`"LE01#7L"`).
    pub fn packed(&self) -> String {
        let mut out = format!("{}#{}", self.module_name, self.record_id);
        if let Some(c) = self.usage.as_char() {
            out.push(c);
        }
        out
    }

    /// Parses the packed form back into a reference. The labels come
    /// out as the defaults; callers relabel if they know better.
    pub fn parse_packed(text: &str) -> Result<Self, IngestError> {
        let (module_name, rest) = text.split_once('#').ok_or_else(|| {
            IngestError::InvalidForeignIdentifier {
                mnemonic: "FRID".to_string(),
                reason: format!("packed form {text:?} has no '#' separator"),
            }
        })?;

        let (id_part, usage) = match rest.chars().last().and_then(Usage::from_char) {
            Some(usage) if !rest.ends_with(|c: char| c.is_ascii_digit()) => {
                (&rest[..rest.len() - 1], usage)
            }
            _ => (rest, Usage::None),
        };

        let record_id = id_part
            .parse::<i64>()
            .map_err(|_| IngestError::InvalidForeignIdentifier {
                mnemonic: "FRID".to_string(),
                reason: format!("packed form {text:?} has a malformed record id"),
            })?;

        Ok(ForeignID::new(module_name, record_id, usage))
    }

    /// Reads a reference out of a MODN/RCID(/USAG) field. The field's
    /// own labels are kept so the round trip preserves them.
    pub fn from_field(field: &Field) -> Result<Self, IngestError> {
        let module_name = field
            .subfield("MODN")
            .and_then(Subfield::as_str)
            .ok_or_else(|| IngestError::InvalidForeignIdentifier {
                mnemonic: field.mnemonic().to_string(),
                reason: "missing MODN subfield".to_string(),
            })?
            .to_string();

        let record_id = field
            .subfield("RCID")
            .and_then(Subfield::as_int)
            .ok_or_else(|| IngestError::InvalidForeignIdentifier {
                mnemonic: field.mnemonic().to_string(),
                reason: "missing RCID subfield".to_string(),
            })?;

        let usage = match field.subfield("USAG").and_then(Subfield::as_str) {
            Some(text) => match text.chars().next() {
                Some(c) => Usage::from_char(c).ok_or_else(|| {
                    IngestError::InvalidForeignIdentifier {
                        mnemonic: field.mnemonic().to_string(),
                        reason: format!("unknown usage modifier {text:?}"),
                    }
                })?,
                None => Usage::None,
            },
            None => Usage::None,
        };

        Ok(ForeignID {
            name: field.name().to_string(),
            mnemonic: field.mnemonic().to_string(),
            module_name,
            record_id,
            usage,
        })
    }

    /// Projects the reference back into its field form.
    pub fn to_field(&self) -> Field {
        let mut field = Field::new(&self.name, &self.mnemonic);

        let mut modn = Subfield::new("MODULE NAME", "MODN");
        modn.set_a(&self.module_name);
        field.push(modn);

        let mut rcid = Subfield::new("RECORD ID", "RCID");
        rcid.set_i(self.record_id);
        field.push(rcid);

        if let Some(c) = self.usage.as_char() {
            let mut usag = Subfield::new("USAGE", "USAG");
            usag.set_a(c.to_string());
            field.push(usag);
        }

        field
    }

    /// Appends the MODN+RCID field format this reference travels in to
    /// `schema`, tagged with `mnemonic`.
    pub fn add_field_to_schema(
        schema: &mut Schema,
        name: &str,
        mnemonic: &str,
        is_repeating: bool,
        registry: &ConverterRegistry,
    ) -> Result<(), SchemaError> {
        let mut format = FieldFormat::new(mnemonic, name, StructCode::Vector, TypeCode::MixedDataType);
        format.set_repeating(is_repeating);
        format.push(SubfieldFormat::new(
            "MODN",
            SubfieldType::A,
            WidthMode::Variable,
            registry,
        )?);
        format.push(SubfieldFormat::new(
            "RCID",
            SubfieldType::I,
            WidthMode::Variable,
            registry,
        )?);
        schema.push(format);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_form() {
        let id = ForeignID::new("LE01", 7, Usage::LeftPolygon);
        assert_eq!(id.packed(), "LE01#7L");

        let id = ForeignID::new("LE01", 7, Usage::None);
        assert_eq!(id.packed(), "LE01#7");
    }

    #[test]
    fn test_packed_roundtrip() {
        for usage in [Usage::None, Usage::StartNode, Usage::ExteriorPolygon] {
            let id = ForeignID::new("PC01", 42, usage);
            let back = ForeignID::parse_packed(&id.packed()).unwrap();
            assert_eq!(back.module_name(), "PC01");
            assert_eq!(back.record_id(), 42);
            assert_eq!(back.usage(), usage);
        }
    }

    #[test]
    fn test_parse_packed_rejects_garbage() {
        assert!(ForeignID::parse_packed("LE017").is_err());
        assert!(ForeignID::parse_packed("LE01#x7").is_err());
    }

    #[test]
    fn test_field_roundtrip_keeps_labels_and_usage() {
        let mut id = ForeignID::attribute("AP01", 9);
        id.set_usage(Usage::RightPolygon);

        let field = id.to_field();
        assert_eq!(field.mnemonic(), "ATID");
        assert_eq!(field.subfield("USAG").and_then(Subfield::as_str), Some("R"));

        let back = ForeignID::from_field(&field).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_field_requires_modn_and_rcid() {
        let mut field = Field::new("ATTRIBUTE ID", "ATID");
        let mut rcid = Subfield::new("RECORD ID", "RCID");
        rcid.set_i(3);
        field.push(rcid);

        let err = ForeignID::from_field(&field).unwrap_err();
        assert!(matches!(err, IngestError::InvalidForeignIdentifier { .. }));
    }

    #[test]
    fn test_add_field_to_schema() {
        let registry = ConverterRegistry::new();
        let mut schema = Schema::new();
        ForeignID::add_field_to_schema(&mut schema, "ATTRIBUTE ID", "ATID", true, &registry).unwrap();

        let format = schema.find("ATID").unwrap();
        assert!(format.is_repeating());
        assert_eq!(format.subfields().len(), 2);
        assert_eq!(format.subfields()[0].label(), "MODN");
        assert_eq!(format.subfields()[1].kind(), SubfieldType::I);
    }
}
