//! The DDOM (data dictionary / domain) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, Record, Subfield, SubfieldType};
use crate::modules::{
    optional_str, primary_field, push_int_subfield, push_str_subfield, read_module_header,
    ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "DDOM";

/// A domain record: which attribute it constrains and the domain value
/// itself.
///
/// The domain value (DVAL) is kept as a raw subfield because its type
/// follows the ADVF declaration; it can be an integer, a real, or a
/// string depending on the attribute being described.
#[derive(Debug, Clone, PartialEq)]
pub struct Ddom {
    module_name: String,
    record_id: i64,
    name: Option<String>,
    kind: Option<String>,
    attribute_label: Option<String>,
    attribute_authority: Option<String>,
    attribute_type: Option<String>,
    value_format: Option<String>,
    value_measurement_unit: Option<String>,
    range_or_value: Option<String>,
    domain_value: Option<Subfield>,
    domain_value_definition: Option<String>,
}

impl Default for Ddom {
    fn default() -> Self {
        Ddom {
            module_name: TAG.to_string(),
            record_id: 1,
            name: None,
            kind: None,
            attribute_label: None,
            attribute_authority: None,
            attribute_type: None,
            value_format: None,
            value_measurement_unit: None,
            range_or_value: None,
            domain_value: None,
            domain_value_definition: None,
        }
    }
}

impl Ddom {
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

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, v: impl Into<String>) {
        self.name = Some(v.into());
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, v: impl Into<String>) {
        self.kind = Some(v.into());
    }

    pub fn attribute_label(&self) -> Option<&str> {
        self.attribute_label.as_deref()
    }

    pub fn set_attribute_label(&mut self, v: impl Into<String>) {
        self.attribute_label = Some(v.into());
    }

    pub fn attribute_authority(&self) -> Option<&str> {
        self.attribute_authority.as_deref()
    }

    pub fn set_attribute_authority(&mut self, v: impl Into<String>) {
        self.attribute_authority = Some(v.into());
    }

    pub fn attribute_type(&self) -> Option<&str> {
        self.attribute_type.as_deref()
    }

    pub fn set_attribute_type(&mut self, v: impl Into<String>) {
        self.attribute_type = Some(v.into());
    }

    pub fn value_format(&self) -> Option<&str> {
        self.value_format.as_deref()
    }

    pub fn set_value_format(&mut self, v: impl Into<String>) {
        self.value_format = Some(v.into());
    }

    pub fn value_measurement_unit(&self) -> Option<&str> {
        self.value_measurement_unit.as_deref()
    }

    pub fn set_value_measurement_unit(&mut self, v: impl Into<String>) {
        self.value_measurement_unit = Some(v.into());
    }

    pub fn range_or_value(&self) -> Option<&str> {
        self.range_or_value.as_deref()
    }

    pub fn set_range_or_value(&mut self, v: impl Into<String>) {
        self.range_or_value = Some(v.into());
    }

    pub fn domain_value(&self) -> Option<&Subfield> {
        self.domain_value.as_ref()
    }

    /// Stores the domain value as-is, relabelled to the DVAL column.
    pub fn set_domain_value(&mut self, mut value: Subfield) {
        value.set_name("DOMAIN VALUE");
        value.set_mnemonic("DVAL");
        self.domain_value = Some(value);
    }

    pub fn domain_value_definition(&self) -> Option<&str> {
        self.domain_value_definition.as_deref()
    }

    pub fn set_domain_value_definition(&mut self, v: impl Into<String>) {
        self.domain_value_definition = Some(v.into());
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut ddom = Ddom::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut ddom.module_name, &mut ddom.record_id);

        ddom.name = optional_str(primary, "NAME");
        ddom.kind = optional_str(primary, "TYPE");
        ddom.attribute_label = optional_str(primary, "ATLB");
        ddom.attribute_authority = optional_str(primary, "AUTH");
        ddom.attribute_type = optional_str(primary, "ATYP");
        ddom.value_format = optional_str(primary, "ADVF");
        ddom.value_measurement_unit = optional_str(primary, "ADMU");
        ddom.range_or_value = optional_str(primary, "RAVA");
        ddom.domain_value = primary
            .subfield("DVAL")
            .filter(|sf| !sf.is_unvalued())
            .cloned();
        ddom.domain_value_definition = optional_str(primary, "DVDF");

        Ok(ddom)
    }
}

impl ModuleBuilder for Ddom {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(
            TAG,
            "DATA DICTIONARY/DOMAIN",
            StructCode::Vector,
            TypeCode::MixedDataType,
        );
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        for label in ["NAME", "TYPE", "ATLB", "AUTH", "ATYP", "ADVF", "ADMU", "RAVA"] {
            primary.push(SubfieldFormat::new(label, SubfieldType::A, WidthMode::Variable, registry)?);
        }
        // DVAL's declared type is whatever ADVF picks at write time;
        // text is the widest default.
        primary.push(SubfieldFormat::new("DVAL", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("DVDF", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        let mut record = Record::new();

        let mut primary = Field::new("DATA DICTIONARY/DOMAIN", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_str_subfield(&mut primary, "NAME", "NAME", self.name.as_deref());
        push_str_subfield(&mut primary, "TYPE", "TYPE", self.kind.as_deref());
        push_str_subfield(&mut primary, "ATTRIBUTE LABEL", "ATLB", self.attribute_label.as_deref());
        push_str_subfield(
            &mut primary,
            "ATTRIBUTE AUTHORITY",
            "AUTH",
            self.attribute_authority.as_deref(),
        );
        push_str_subfield(&mut primary, "ATTRIBUTE TYPE", "ATYP", self.attribute_type.as_deref());
        push_str_subfield(
            &mut primary,
            "ATTRIBUTE DOMAIN VALUE FORMAT",
            "ADVF",
            self.value_format.as_deref(),
        );
        push_str_subfield(
            &mut primary,
            "ATTRIBUTE DOMAIN VALUE MEASUREMENT UNIT",
            "ADMU",
            self.value_measurement_unit.as_deref(),
        );
        push_str_subfield(&mut primary, "RANGE OR VALUE", "RAVA", self.range_or_value.as_deref());
        match &self.domain_value {
            Some(value) => primary.push(value.clone()),
            None => primary.push(Subfield::empty("DVAL", SubfieldType::A)),
        }
        push_str_subfield(
            &mut primary,
            "DOMAIN VALUE DEFINITION",
            "DVDF",
            self.domain_value_definition.as_deref(),
        );
        record.push(primary);

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Ddom::new();
    }
}
