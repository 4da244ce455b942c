//! The SPDM (spatial domain) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, Record, SpatialAddress, SubfieldType};
use crate::modules::{
    optional_str, primary_field, push_int_subfield, push_str_subfield, read_module_header, Cursor,
    ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "SPDM";

/// A spatial-domain record: the domain type and the polygon of
/// domain spatial addresses that bounds the transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Spdm {
    module_name: String,
    record_id: i64,
    domain_type: Option<String>,
    domain_spatial_address_type: Option<String>,
    comment: Option<String>,
    domain_spatial_addresses: Vec<SpatialAddress>,
}

impl Default for Spdm {
    fn default() -> Self {
        Spdm {
            module_name: TAG.to_string(),
            record_id: 1,
            domain_type: None,
            domain_spatial_address_type: None,
            comment: None,
            domain_spatial_addresses: Vec::new(),
        }
    }
}

impl Spdm {
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

    pub fn domain_type(&self) -> Option<&str> {
        self.domain_type.as_deref()
    }

    pub fn set_domain_type(&mut self, v: impl Into<String>) {
        self.domain_type = Some(v.into());
    }

    pub fn domain_spatial_address_type(&self) -> Option<&str> {
        self.domain_spatial_address_type.as_deref()
    }

    pub fn set_domain_spatial_address_type(&mut self, v: impl Into<String>) {
        self.domain_spatial_address_type = Some(v.into());
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, v: impl Into<String>) {
        self.comment = Some(v.into());
    }

    pub fn domain_spatial_addresses(&self) -> &[SpatialAddress] {
        &self.domain_spatial_addresses
    }

    pub fn add_domain_spatial_address(&mut self, address: SpatialAddress) {
        self.domain_spatial_addresses.push(address);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut spdm = Spdm::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut spdm.module_name, &mut spdm.record_id);

        spdm.domain_type = optional_str(primary, "DTYP");
        spdm.domain_spatial_address_type = optional_str(primary, "DSTP");
        spdm.comment = optional_str(primary, "COMT");

        let mut cursor = Cursor::new(record);
        for field in cursor.take_run("DMSA") {
            spdm.domain_spatial_addresses
                .push(SpatialAddress::from_field_subfields("DMSA", field.iter())?);
        }

        Ok(spdm)
    }
}

impl ModuleBuilder for Spdm {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary =
            FieldFormat::new(TAG, "SPATIAL DOMAIN", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("DTYP", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("DSTP", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("COMT", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        let mut dmsa = FieldFormat::new(
            "DMSA",
            "DOMAIN SPATIAL ADDRESS",
            StructCode::Vector,
            TypeCode::MixedDataType,
        );
        dmsa.set_repeating(true);
        dmsa.push(SubfieldFormat::new("X", SubfieldType::R, WidthMode::Variable, registry)?);
        dmsa.push(SubfieldFormat::new("Y", SubfieldType::R, WidthMode::Variable, registry)?);
        schema.push(dmsa);

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("SPATIAL DOMAIN", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(&mut primary, "DOMAIN TYPE", "DTYP", self.domain_type.as_deref());
        push_str_subfield(
            &mut primary,
            "DOMAIN SPATIAL ADDRESS TYPE",
            "DSTP",
            self.domain_spatial_address_type.as_deref(),
        );
        push_str_subfield(&mut primary, "COMMENT", "COMT", self.comment.as_deref());
        record.push(primary);

        for address in &self.domain_spatial_addresses {
            let mut field = Field::new("DOMAIN SPATIAL ADDRESS", "DMSA");
            field.push(address.x().clone());
            field.push(address.y().clone());
            record.push(field);
        }

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Spdm::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subfield;

    #[test]
    fn test_roundtrip() {
        let mut spdm = Spdm::new();
        spdm.set_module_name("SP01");
        spdm.set_domain_type("RING");
        spdm.set_domain_spatial_address_type("2-TUPLE");
        spdm.add_domain_spatial_address(SpatialAddress::from_xy(0.0, 0.0));
        spdm.add_domain_spatial_address(SpatialAddress::from_xy(100.0, 0.0));
        spdm.add_domain_spatial_address(SpatialAddress::from_xy(100.0, 50.0));

        let mut back = Spdm::new();
        back.ingest(&spdm.emit().unwrap()).unwrap();
        assert_eq!(back, spdm);
        assert_eq!(back.domain_spatial_addresses().len(), 3);
    }

    #[test]
    fn test_stray_subfield_in_dmsa_is_fatal() {
        let spdm = Spdm::new();
        let mut record = spdm.emit().unwrap();

        let mut bad = Field::new("DOMAIN SPATIAL ADDRESS", "DMSA");
        let mut x = Subfield::new("X", "X");
        x.set_r(1.0);
        bad.push(x);
        let mut z = Subfield::new("ELEVATION", "ELEV");
        z.set_r(2.0);
        bad.push(z);
        record.push(bad);

        let err = Spdm::new().ingest(&record).unwrap_err();
        assert!(matches!(err, IngestError::InvalidSpatialGroup { .. }));
    }
}
