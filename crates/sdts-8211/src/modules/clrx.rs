//! The CLRX (color index) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{Field, Record, SubfieldType};
use crate::modules::{
    optional_double, primary_field, push_double_subfield, push_int_subfield, push_str_subfield,
    ModuleBuilder, read_module_header,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "CLRX";

/// A color-index record: CMYK-style component intensities, each a real
/// in the transfer's own scale and each independently optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Clrx {
    module_name: String,
    record_id: i64,
    red: Option<f64>,
    green: Option<f64>,
    blue: Option<f64>,
    black: Option<f64>,
}

impl Default for Clrx {
    fn default() -> Self {
        Clrx {
            module_name: TAG.to_string(),
            record_id: 1,
            red: None,
            green: None,
            blue: None,
            black: None,
        }
    }
}

impl Clrx {
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

    pub fn red(&self) -> Option<f64> {
        self.red
    }

    pub fn set_red(&mut self, v: f64) {
        self.red = Some(v);
    }

    pub fn green(&self) -> Option<f64> {
        self.green
    }

    pub fn set_green(&mut self, v: f64) {
        self.green = Some(v);
    }

    pub fn blue(&self) -> Option<f64> {
        self.blue
    }

    pub fn set_blue(&mut self, v: f64) {
        self.blue = Some(v);
    }

    pub fn black(&self) -> Option<f64> {
        self.black
    }

    pub fn set_black(&mut self, v: f64) {
        self.black = Some(v);
    }

    fn parse(record: &Record) -> Result<Self, IngestError> {
        let mut clrx = Clrx::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut clrx.module_name, &mut clrx.record_id);

        clrx.red = optional_double(primary, "RED")?;
        clrx.green = optional_double(primary, "GREN")?;
        clrx.blue = optional_double(primary, "BLUE")?;
        clrx.black = optional_double(primary, "BLCK")?;

        Ok(clrx)
    }
}

impl ModuleBuilder for Clrx {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary =
            FieldFormat::new(TAG, "COLOR INDEX", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        for label in ["RED", "GREN", "BLUE", "BLCK"] {
            primary.push(SubfieldFormat::new(label, SubfieldType::R, WidthMode::Variable, registry)?);
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

        let mut primary = Field::new("COLOR INDEX", TAG);
        push_str_subfield(&mut primary, "MODULE NAME", "MODN", Some(&self.module_name));
        push_int_subfield(&mut primary, "RECORD ID", "RCID", Some(self.record_id));
        push_double_subfield(&mut primary, "RED", "RED", self.red);
        push_double_subfield(&mut primary, "GREEN", "GREN", self.green);
        push_double_subfield(&mut primary, "BLUE", "BLUE", self.blue);
        push_double_subfield(&mut primary, "BLACK", "BLCK", self.black);
        record.push(primary);

        Ok(record)
    }

    fn reset(&mut self) {
        *self = Clrx::new();
    }
}
