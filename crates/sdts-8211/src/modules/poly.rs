//! The POLY (polygon) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{AttributeID, Field, ForeignID, Record, SubfieldType};
use crate::modules::{
    mandatory_str, primary_field, push_foreign_id_fields, push_int_subfield, push_str_subfield,
    read_module_header, take_foreign_id_run, Cursor, ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "POLY";

/// A polygon record: object representation plus its attribute, ring,
/// chain, composite, and representation references.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    module_name: String,
    record_id: i64,
    object_representation: Option<String>,
    attribute_ids: Vec<AttributeID>,
    ring_ids: Vec<ForeignID>,
    chain_ids: Vec<ForeignID>,
    composite_ids: Vec<ForeignID>,
    representation_module_ids: Vec<ForeignID>,
}

impl Default for Poly {
    fn default() -> Self {
        Poly {
            module_name: TAG.to_string(),
            record_id: 1,
            object_representation: None,
            attribute_ids: Vec::new(),
            ring_ids: Vec::new(),
            chain_ids: Vec::new(),
            composite_ids: Vec::new(),
            representation_module_ids: Vec::new(),
        }
    }
}

impl Poly {
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

    pub fn attribute_ids(&self) -> &[AttributeID] {
        &self.attribute_ids
    }

    pub fn add_attribute_id(&mut self, mut id: AttributeID) {
        id.set_labels("ATTRIBUTE ID", "ATID");
        self.attribute_ids.push(id);
    }

    pub fn ring_ids(&self) -> &[ForeignID] {
        &self.ring_ids
    }

    pub fn add_ring_id(&mut self, mut id: ForeignID) {
        id.set_labels("RING ID", "RFID");
        self.ring_ids.push(id);
    }

    pub fn chain_ids(&self) -> &[ForeignID] {
        &self.chain_ids
    }

    pub fn add_chain_id(&mut self, mut id: ForeignID) {
        id.set_labels("CHAIN ID", "CHID");
        self.chain_ids.push(id);
    }

    pub fn composite_ids(&self) -> &[ForeignID] {
        &self.composite_ids
    }

    pub fn add_composite_id(&mut self, mut id: ForeignID) {
        id.set_labels("COMPOSITE ID", "CPID");
        self.composite_ids.push(id);
    }

    pub fn representation_module_ids(&self) -> &[ForeignID] {
        &self.representation_module_ids
    }

    pub fn add_representation_module_id(&mut self, mut id: ForeignID) {
        id.set_labels("REPRESENTATION MODULE ID", "RPID");
        self.representation_module_ids.push(id);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut poly = Poly::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut poly.module_name, &mut poly.record_id);
        poly.object_representation = Some(mandatory_str(primary, TAG, "OBRP")?);

        let mut cursor = Cursor::new(record);
        take_foreign_id_run(&mut cursor, "ATID", &mut poly.attribute_ids)?;
        take_foreign_id_run(&mut cursor, "RFID", &mut poly.ring_ids)?;
        take_foreign_id_run(&mut cursor, "CHID", &mut poly.chain_ids)?;
        take_foreign_id_run(&mut cursor, "CPID", &mut poly.composite_ids)?;
        take_foreign_id_run(&mut cursor, "RPID", &mut poly.representation_module_ids)?;

        Ok(poly)
    }
}

impl ModuleBuilder for Poly {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(TAG, "POLYGON", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("OBRP", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        ForeignID::add_field_to_schema(&mut schema, "ATTRIBUTE ID", "ATID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "RING ID", "RFID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "CHAIN ID", "CHID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "COMPOSITE ID", "CPID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "REPRESENTATION MODULE ID", "RPID", true, registry)?;

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("POLYGON", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(
            &mut primary,
            "OBJECT REPRESENTATION",
            "OBRP",
            self.object_representation.as_deref(),
        );
        record.push(primary);

        push_foreign_id_fields(&mut record, "ATTRIBUTE ID", "ATID", &self.attribute_ids);
        push_foreign_id_fields(&mut record, "RING ID", "RFID", &self.ring_ids);
        push_foreign_id_fields(&mut record, "CHAIN ID", "CHID", &self.chain_ids);
        push_foreign_id_fields(&mut record, "COMPOSITE ID", "CPID", &self.composite_ids);
        push_foreign_id_fields(
            &mut record,
            "REPRESENTATION MODULE ID",
            "RPID",
            &self.representation_module_ids,
        );

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Poly::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;

    fn sample() -> Poly {
        let mut poly = Poly::new();
        poly.set_module_name("PC01");
        poly.set_record_id(4);
        poly.set_object_representation("2");
        poly.add_attribute_id(ForeignID::attribute("AP01", 8));
        poly.add_ring_id(ForeignID::new("RU01", 5, Usage::ExteriorPolygon));
        poly
    }

    #[test]
    fn test_roundtrip() {
        let poly = sample();
        let mut back = Poly::new();
        back.ingest(&poly.emit().unwrap()).unwrap();
        assert_eq!(back, poly);
    }

    #[test]
    fn test_ingest_requires_obrp() {
        let mut source = sample();
        source.object_representation = None;
        let record = source.emit().unwrap();

        let mut poly = Poly::new();
        let err = poly.ingest(&record).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingMandatoryField { mnemonic: "OBRP", .. }
        ));
    }

    #[test]
    fn test_groups_are_optional() {
        let mut source = Poly::new();
        source.set_object_representation("2");
        let record = source.emit().unwrap();

        let mut poly = Poly::new();
        poly.ingest(&record).unwrap();
        assert!(poly.attribute_ids().is_empty());
        assert!(poly.ring_ids().is_empty());
    }
}
