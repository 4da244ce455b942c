//! The RING module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, ForeignID, Record, SubfieldType};
use crate::modules::{
    mandatory_str, primary_field, push_int_subfield, push_str_subfield, read_module_header,
    take_foreign_id, Cursor, ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "RING";

/// A ring record: object representation plus optional references to
/// the chain-or-arc list and the polygon the ring bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    module_name: String,
    record_id: i64,
    object_representation: Option<String>,
    chain_or_arc_id: Option<ForeignID>,
    polygon_id: Option<ForeignID>,
}

impl Default for Ring {
    fn default() -> Self {
        Ring {
            module_name: TAG.to_string(),
            record_id: 1,
            object_representation: None,
            chain_or_arc_id: None,
            polygon_id: None,
        }
    }
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn set_module_name(&mut self, name: impl Into<String>) {
        self.module_name = name.into();
    }

    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn set_record_id(&mut self, id: i64) {
        self.record_id = id;
    }

    pub fn object_representation(&self) -> Option<&str> {
        self.object_representation.as_deref()
    }

    pub fn set_object_representation(&mut self, obrp: impl Into<String>) {
        self.object_representation = Some(obrp.into());
    }

    pub fn chain_or_arc_id(&self) -> Option<&ForeignID> {
        self.chain_or_arc_id.as_ref()
    }

    pub fn set_chain_or_arc_id(&mut self, mut id: ForeignID) {
        id.set_labels("LINE OR ARC ID", "LAID");
        self.chain_or_arc_id = Some(id);
    }

    pub fn polygon_id(&self) -> Option<&ForeignID> {
        self.polygon_id.as_ref()
    }

    pub fn set_polygon_id(&mut self, mut id: ForeignID) {
        id.set_labels("POLYGON ID", "PLID");
        self.polygon_id = Some(id);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut ring = Ring::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut ring.module_name, &mut ring.record_id);
        ring.object_representation = Some(mandatory_str(primary, TAG, "OBRP")?);

        let mut cursor = Cursor::new(record);
        ring.chain_or_arc_id = take_foreign_id(&mut cursor, "LAID")?;
        ring.polygon_id = take_foreign_id(&mut cursor, "PLID")?;

        Ok(ring)
    }
}

impl ModuleBuilder for Ring {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(TAG, "RING", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("OBRP", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        ForeignID::add_field_to_schema(&mut schema, "LINE OR ARC ID", "LAID", false, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "POLYGON ID", "PLID", false, registry)?;

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("RING", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(
            &mut primary,
            "OBJECT REPRESENTATION",
            "OBRP",
            self.object_representation.as_deref(),
        );
        record.push(primary);

        for id in [&self.chain_or_arc_id, &self.polygon_id].into_iter().flatten() {
            record.push(id.to_field());
        }

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Ring::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;

    #[test]
    fn test_roundtrip() {
        let mut ring = Ring::new();
        ring.set_module_name("RU01");
        ring.set_record_id(3);
        ring.set_object_representation("3");
        ring.set_chain_or_arc_id(ForeignID::new("LE01", 12, Usage::None));
        ring.set_polygon_id(ForeignID::new("PC01", 4, Usage::None));

        let mut back = Ring::new();
        back.ingest(&ring.emit().unwrap()).unwrap();
        assert_eq!(back, ring);
    }

    #[test]
    fn test_references_are_optional() {
        let mut ring = Ring::new();
        ring.set_object_representation("3");

        let mut back = Ring::new();
        back.ingest(&ring.emit().unwrap()).unwrap();
        assert!(back.chain_or_arc_id().is_none());
        assert!(back.polygon_id().is_none());
    }
}
