//! The COMP (composite object) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{AttributeID, Field, ForeignID, Record, SubfieldType};
use crate::modules::{
    mandatory_str, primary_field, push_foreign_id_fields, push_int_subfield, push_str_subfield,
    read_module_header, take_foreign_id_run, Cursor, ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "COMP";

/// A composite-object record: attribute references plus the foreign
/// objects the composite aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Comp {
    module_name: String,
    record_id: i64,
    object_representation: Option<String>,
    attribute_ids: Vec<AttributeID>,
    foreign_ids: Vec<ForeignID>,
    composite_ids: Vec<ForeignID>,
}

impl Default for Comp {
    fn default() -> Self {
        Comp {
            module_name: TAG.to_string(),
            record_id: 1,
            object_representation: None,
            attribute_ids: Vec::new(),
            foreign_ids: Vec::new(),
            composite_ids: Vec::new(),
        }
    }
}

impl Comp {
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

    pub fn foreign_ids(&self) -> &[ForeignID] {
        &self.foreign_ids
    }

    pub fn add_foreign_id(&mut self, mut id: ForeignID) {
        id.set_labels("FOREIGN ID", "FRID");
        self.foreign_ids.push(id);
    }

    pub fn composite_ids(&self) -> &[ForeignID] {
        &self.composite_ids
    }

    pub fn add_composite_id(&mut self, mut id: ForeignID) {
        id.set_labels("COMPOSITE ID", "CPID");
        self.composite_ids.push(id);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut comp = Comp::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut comp.module_name, &mut comp.record_id);
        comp.object_representation = Some(mandatory_str(primary, TAG, "OBRP")?);

        let mut cursor = Cursor::new(record);
        take_foreign_id_run(&mut cursor, "ATID", &mut comp.attribute_ids)?;
        take_foreign_id_run(&mut cursor, "FRID", &mut comp.foreign_ids)?;
        take_foreign_id_run(&mut cursor, "CPID", &mut comp.composite_ids)?;

        Ok(comp)
    }
}

impl ModuleBuilder for Comp {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary =
            FieldFormat::new(TAG, "COMPOSITE", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("OBRP", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        ForeignID::add_field_to_schema(&mut schema, "ATTRIBUTE ID", "ATID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "FOREIGN ID", "FRID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "COMPOSITE ID", "CPID", true, registry)?;

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("COMPOSITE", TAG);
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
        push_foreign_id_fields(&mut record, "FOREIGN ID", "FRID", &self.foreign_ids);
        push_foreign_id_fields(&mut record, "COMPOSITE ID", "CPID", &self.composite_ids);

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Comp::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;

    #[test]
    fn test_roundtrip() {
        let mut comp = Comp::new();
        comp.set_module_name("FF01");
        comp.set_record_id(11);
        comp.set_object_representation("5");
        comp.add_foreign_id(ForeignID::new("LE01", 6, Usage::ForwardOrientation));
        comp.add_foreign_id(ForeignID::new("LE01", 7, Usage::BackwardOrientation));

        let mut back = Comp::new();
        back.ingest(&comp.emit().unwrap()).unwrap();
        assert_eq!(back, comp);
    }

    #[test]
    fn test_bad_foreign_id_fails_whole_ingest() {
        let mut comp = Comp::new();
        comp.set_object_representation("5");
        let mut record = comp.emit().unwrap();

        // A FRID field missing its RCID subfield poisons the group.
        let mut broken = Field::new("FOREIGN ID", "FRID");
        let mut modn = crate::model::Subfield::new("MODULE NAME", "MODN");
        modn.set_a("LE01");
        broken.push(modn);
        record.push(broken);

        let mut target = Comp::new();
        let err = target.ingest(&record).unwrap_err();
        assert!(matches!(err, IngestError::InvalidForeignIdentifier { .. }));
        assert_eq!(target, Comp::new());
    }
}
