//! The DDDF (data dictionary / definition) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, Record, SubfieldType};
use crate::modules::{
    optional_str, primary_field, push_int_subfield, push_str_subfield, read_module_header,
    ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "DDDF";

/// A definition record: what an entity or attribute label means and
/// who says so. All columns are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Dddf {
    module_name: String,
    record_id: i64,
    entity_or_attribute: Option<String>,
    label: Option<String>,
    source: Option<String>,
    definition: Option<String>,
    authority: Option<String>,
    authority_description: Option<String>,
}

impl Default for Dddf {
    fn default() -> Self {
        Dddf {
            module_name: TAG.to_string(),
            record_id: 1,
            entity_or_attribute: None,
            label: None,
            source: None,
            definition: None,
            authority: None,
            authority_description: None,
        }
    }
}

impl Dddf {
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

    pub fn entity_or_attribute(&self) -> Option<&str> {
        self.entity_or_attribute.as_deref()
    }

    pub fn set_entity_or_attribute(&mut self, v: impl Into<String>) {
        self.entity_or_attribute = Some(v.into());
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, v: impl Into<String>) {
        self.label = Some(v.into());
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, v: impl Into<String>) {
        self.source = Some(v.into());
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn set_definition(&mut self, v: impl Into<String>) {
        self.definition = Some(v.into());
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn set_authority(&mut self, v: impl Into<String>) {
        self.authority = Some(v.into());
    }

    pub fn authority_description(&self) -> Option<&str> {
        self.authority_description.as_deref()
    }

    pub fn set_authority_description(&mut self, v: impl Into<String>) {
        self.authority_description = Some(v.into());
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut dddf = Dddf::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut dddf.module_name, &mut dddf.record_id);

        dddf.entity_or_attribute = optional_str(primary, "EORA");
        dddf.label = optional_str(primary, "EALB");
        dddf.source = optional_str(primary, "SRCE");
        dddf.definition = optional_str(primary, "DFIN");
        dddf.authority = optional_str(primary, "AUTH");
        dddf.authority_description = optional_str(primary, "ADSC");

        Ok(dddf)
    }
}

impl ModuleBuilder for Dddf {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(
            TAG,
            "DATA DICTIONARY/DEFINITION",
            StructCode::Vector,
            TypeCode::MixedDataType,
        );
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        for label in ["EORA", "EALB", "SRCE", "DFIN", "AUTH", "ADSC"] {
            primary.push(SubfieldFormat::new(label, SubfieldType::A, WidthMode::Variable, registry)?);
        }
        schema.push(primary);

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("DATA DICTIONARY/DEFINITION", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(
            &mut primary,
            "ENTITY OR ATTRIBUTE",
            "EORA",
            self.entity_or_attribute.as_deref(),
        );
        push_str_subfield(
            &mut primary,
            "ENTITY OR ATTRIBUTE LABEL",
            "EALB",
            self.label.as_deref(),
        );
        push_str_subfield(&mut primary, "SOURCE", "SRCE", self.source.as_deref());
        push_str_subfield(&mut primary, "DEFINITION", "DFIN", self.definition.as_deref());
        push_str_subfield(&mut primary, "AUTHORITY", "AUTH", self.authority.as_deref());
        push_str_subfield(
            &mut primary,
            "AUTHORITY DESCRIPTION",
            "ADSC",
            self.authority_description.as_deref(),
        );
        record.push(primary);

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Dddf::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut dddf = Dddf::new();
        dddf.set_module_name("DF01");
        dddf.set_record_id(6);
        dddf.set_entity_or_attribute("A");
        dddf.set_label("RUNWAY");
        dddf.set_definition("A defined landing area");

        let mut back = Dddf::new();
        back.ingest(&dddf.emit().unwrap()).unwrap();
        assert_eq!(back, dddf);
    }

    #[test]
    fn test_all_columns_optional() {
        let mut back = Dddf::new();
        back.ingest(&Dddf::new().emit().unwrap()).unwrap();
        assert_eq!(back, Dddf::new());
    }
}
