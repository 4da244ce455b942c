//! The PNTS (point-node) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{AttributeID, Field, ForeignID, Record, SpatialAddress, SubfieldType};
use crate::modules::{
    mandatory_str, primary_field, push_foreign_id_fields, push_int_subfield, push_str_subfield,
    read_module_header, take_foreign_id_run, Cursor, ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "PNTS";

/// A point-node record: one spatial address plus attribute, composite,
/// and representation references, and the symbol-orientation spatial
/// addresses used to rotate point symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct Pnts {
    module_name: String,
    record_id: i64,
    object_representation: Option<String>,
    spatial_address: Option<SpatialAddress>,
    attribute_ids: Vec<AttributeID>,
    composite_ids: Vec<ForeignID>,
    representation_module_ids: Vec<ForeignID>,
    symbol_orientation_addresses: Vec<SpatialAddress>,
}

impl Default for Pnts {
    fn default() -> Self {
        Pnts {
            module_name: TAG.to_string(),
            record_id: 1,
            object_representation: None,
            spatial_address: None,
            attribute_ids: Vec::new(),
            composite_ids: Vec::new(),
            representation_module_ids: Vec::new(),
            symbol_orientation_addresses: Vec::new(),
        }
    }
}

impl Pnts {
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

    pub fn spatial_address(&self) -> Option<&SpatialAddress> {
        self.spatial_address.as_ref()
    }

    pub fn set_spatial_address(&mut self, address: SpatialAddress) {
        self.spatial_address = Some(address);
    }

    pub fn attribute_ids(&self) -> &[AttributeID] {
        &self.attribute_ids
    }

    pub fn add_attribute_id(&mut self, mut id: AttributeID) {
        id.set_labels("ATTRIBUTE ID", "ATID");
        self.attribute_ids.push(id);
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

    pub fn symbol_orientation_addresses(&self) -> &[SpatialAddress] {
        &self.symbol_orientation_addresses
    }

    pub fn add_symbol_orientation_address(&mut self, address: SpatialAddress) {
        self.symbol_orientation_addresses.push(address);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut pnts = Pnts::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut pnts.module_name, &mut pnts.record_id);
        pnts.object_representation = Some(mandatory_str(primary, TAG, "OBRP")?);

        let mut cursor = Cursor::new(record);
        match cursor.take_one("SADR") {
            Some(field) => {
                pnts.spatial_address =
                    Some(SpatialAddress::from_field_subfields("SADR", field.iter())?);
            }
            None => {
                return Err(IngestError::MissingMandatoryField {
                    module: TAG,
                    mnemonic: "SADR",
                });
            }
        }
        take_foreign_id_run(&mut cursor, "ATID", &mut pnts.attribute_ids)?;
        take_foreign_id_run(&mut cursor, "CPID", &mut pnts.composite_ids)?;
        take_foreign_id_run(&mut cursor, "RPID", &mut pnts.representation_module_ids)?;
        for field in cursor.take_run("SSAD") {
            pnts.symbol_orientation_addresses
                .push(SpatialAddress::from_field_subfields("SSAD", field.iter())?);
        }

        Ok(pnts)
    }
}

impl ModuleBuilder for Pnts {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(TAG, "POINT-NODE", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("OBRP", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        let mut sadr = FieldFormat::new("SADR", "SPATIAL ADDRESS", StructCode::Vector, TypeCode::MixedDataType);
        sadr.push(SubfieldFormat::new("X", SubfieldType::R, WidthMode::Variable, registry)?);
        sadr.push(SubfieldFormat::new("Y", SubfieldType::R, WidthMode::Variable, registry)?);
        schema.push(sadr);

        ForeignID::add_field_to_schema(&mut schema, "ATTRIBUTE ID", "ATID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "COMPOSITE ID", "CPID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "REPRESENTATION MODULE ID", "RPID", true, registry)?;

        let mut ssad = FieldFormat::new(
            "SSAD",
            "SYMBOL ORIENTATION SPATIAL ADDRESS",
            StructCode::Vector,
            TypeCode::MixedDataType,
        );
        ssad.set_repeating(true);
        ssad.push(SubfieldFormat::new("X", SubfieldType::R, WidthMode::Variable, registry)?);
        ssad.push(SubfieldFormat::new("Y", SubfieldType::R, WidthMode::Variable, registry)?);
        schema.push(ssad);

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let Some(address) = &self.spatial_address else {
            return Err(EmitError::MissingMandatoryField {
                module: TAG,
                mnemonic: "SADR",
            });
        };

        let mut record = Record::new();

        let mut primary = Field::new("POINT-NODE", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(
            &mut primary,
            "OBJECT REPRESENTATION",
            "OBRP",
            self.object_representation.as_deref(),
        );
        record.push(primary);

        let mut sadr = Field::new("SPATIAL ADDRESS", "SADR");
        sadr.push(address.x().clone());
        sadr.push(address.y().clone());
        record.push(sadr);

        push_foreign_id_fields(&mut record, "ATTRIBUTE ID", "ATID", &self.attribute_ids);
        push_foreign_id_fields(&mut record, "COMPOSITE ID", "CPID", &self.composite_ids);
        push_foreign_id_fields(
            &mut record,
            "REPRESENTATION MODULE ID",
            "RPID",
            &self.representation_module_ids,
        );
        for address in &self.symbol_orientation_addresses {
            let mut field = Field::new("SYMBOL ORIENTATION SPATIAL ADDRESS", "SSAD");
            field.push(address.x().clone());
            field.push(address.y().clone());
            record.push(field);
        }

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Pnts::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pnts {
        let mut pnts = Pnts::new();
        pnts.set_module_name("NO01");
        pnts.set_record_id(9);
        pnts.set_object_representation("4");
        pnts.set_spatial_address(SpatialAddress::from_xy(-3.5, 8.25));
        pnts.add_attribute_id(ForeignID::attribute("AP01", 2));
        pnts
    }

    #[test]
    fn test_roundtrip() {
        let pnts = sample();
        let mut back = Pnts::new();
        back.ingest(&pnts.emit().unwrap()).unwrap();
        assert_eq!(back, pnts);
    }

    #[test]
    fn test_symbol_orientation_roundtrip() {
        let mut pnts = sample();
        pnts.add_symbol_orientation_address(SpatialAddress::from_xy(0.0, 1.0));
        pnts.add_symbol_orientation_address(SpatialAddress::from_xy(0.5, 0.5));

        let record = pnts.emit().unwrap();
        assert_eq!(
            record.fields().iter().filter(|f| f.mnemonic() == "SSAD").count(),
            2
        );

        let mut back = Pnts::new();
        back.ingest(&record).unwrap();
        assert_eq!(back, pnts);
        assert_eq!(back.symbol_orientation_addresses().len(), 2);
    }

    #[test]
    fn test_stray_subfield_in_ssad_is_fatal() {
        let mut record = sample().emit().unwrap();

        let mut bad = Field::new("SYMBOL ORIENTATION SPATIAL ADDRESS", "SSAD");
        let mut x = crate::model::Subfield::new("X", "X");
        x.set_r(0.0);
        bad.push(x);
        let mut angle = crate::model::Subfield::new("ANGLE", "ANGL");
        angle.set_r(45.0);
        bad.push(angle);
        record.push(bad);

        let err = Pnts::new().ingest(&record).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidSpatialGroup { ref mnemonic, .. } if mnemonic == "SSAD"
        ));
    }

    #[test]
    fn test_geometry_is_mandatory_both_ways() {
        let mut pnts = Pnts::new();
        pnts.set_object_representation("4");
        assert!(matches!(
            pnts.emit().unwrap_err(),
            EmitError::MissingMandatoryField { mnemonic: "SADR", .. }
        ));

        let mut record = sample().emit().unwrap();
        // Drop the SADR field and ingestion must refuse the record.
        let fields: Vec<Field> = record
            .fields()
            .iter()
            .filter(|f| f.mnemonic() != "SADR")
            .cloned()
            .collect();
        record = Record::new();
        for field in fields {
            record.push(field);
        }
        let err = Pnts::new().ingest(&record).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingMandatoryField { mnemonic: "SADR", .. }
        ));
    }
}
