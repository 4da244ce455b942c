//! The LINE (line/arc geometry) module builder.

use crate::codec::ConverterRegistry;
use crate::error::{EmitError, IngestError, SchemaError};
use crate::model::{AttributeID, Field, ForeignID, Record, SpatialAddress, SubfieldType};
use crate::modules::{
    mandatory_str, primary_field, push_foreign_id_fields, push_int_subfield, push_str_subfield,
    read_module_header, take_foreign_id, take_foreign_id_run, Cursor, ModuleBuilder,
};
use crate::schema::{FieldFormat, Schema, StructCode, SubfieldFormat, TypeCode, WidthMode};

const TAG: &str = "LINE";

/// A complete line record: its object representation, attribute and
/// topology references, and the spatial-address polyline.
///
/// All attributes start unset; geometry (at least one spatial address)
/// and the object representation are required before the record is
/// well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    module_name: String,
    record_id: i64,
    object_representation: Option<String>,
    attribute_ids: Vec<AttributeID>,
    polygon_id_left: Option<ForeignID>,
    polygon_id_right: Option<ForeignID>,
    start_node_id: Option<ForeignID>,
    end_node_id: Option<ForeignID>,
    chain_component_ids: Vec<ForeignID>,
    spatial_addresses: Vec<SpatialAddress>,
    composite_ids: Vec<ForeignID>,
    representation_module_ids: Vec<ForeignID>,
}

impl Default for Line {
    fn default() -> Self {
        Line {
            module_name: TAG.to_string(),
            record_id: 1,
            object_representation: None,
            attribute_ids: Vec::new(),
            polygon_id_left: None,
            polygon_id_right: None,
            start_node_id: None,
            end_node_id: None,
            chain_component_ids: Vec::new(),
            spatial_addresses: Vec::new(),
            composite_ids: Vec::new(),
            representation_module_ids: Vec::new(),
        }
    }
}

impl Line {
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

    pub fn polygon_id_left(&self) -> Option<&ForeignID> {
        self.polygon_id_left.as_ref()
    }

    pub fn set_polygon_id_left(&mut self, mut id: ForeignID) {
        id.set_labels("POLYGON ID LEFT", "PIDL");
        self.polygon_id_left = Some(id);
    }

    pub fn polygon_id_right(&self) -> Option<&ForeignID> {
        self.polygon_id_right.as_ref()
    }

    pub fn set_polygon_id_right(&mut self, mut id: ForeignID) {
        id.set_labels("POLYGON ID RIGHT", "PIDR");
        self.polygon_id_right = Some(id);
    }

    pub fn start_node_id(&self) -> Option<&ForeignID> {
        self.start_node_id.as_ref()
    }

    pub fn set_start_node_id(&mut self, mut id: ForeignID) {
        id.set_labels("START NODE ID", "SNID");
        self.start_node_id = Some(id);
    }

    pub fn end_node_id(&self) -> Option<&ForeignID> {
        self.end_node_id.as_ref()
    }

    pub fn set_end_node_id(&mut self, mut id: ForeignID) {
        id.set_labels("END NODE ID", "ENID");
        self.end_node_id = Some(id);
    }

    pub fn chain_component_ids(&self) -> &[ForeignID] {
        &self.chain_component_ids
    }

    pub fn add_chain_component_id(&mut self, mut id: ForeignID) {
        id.set_labels("CHAIN COMPONENT ID", "CCID");
        self.chain_component_ids.push(id);
    }

    pub fn spatial_addresses(&self) -> &[SpatialAddress] {
        &self.spatial_addresses
    }

    pub fn add_spatial_address(&mut self, address: SpatialAddress) {
        self.spatial_addresses.push(address);
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
        let mut line = Line::new();

        let primary = primary_field(record, TAG)?;
        read_module_header(primary, &mut line.module_name, &mut line.record_id);
        line.object_representation = Some(mandatory_str(primary, TAG, "OBRP")?);

        let mut cursor = Cursor::new(record);
        take_foreign_id_run(&mut cursor, "ATID", &mut line.attribute_ids)?;
        line.polygon_id_left = take_foreign_id(&mut cursor, "PIDL")?;
        line.polygon_id_right = take_foreign_id(&mut cursor, "PIDR")?;
        line.start_node_id = take_foreign_id(&mut cursor, "SNID")?;
        line.end_node_id = take_foreign_id(&mut cursor, "ENID")?;
        take_foreign_id_run(&mut cursor, "CCID", &mut line.chain_component_ids)?;

        for field in cursor.take_run("SADR") {
            line.spatial_addresses
                .push(SpatialAddress::from_field_subfields("SADR", field.iter())?);
        }
        if line.spatial_addresses.is_empty() {
            return Err(IngestError::MissingMandatoryField {
                module: TAG,
                mnemonic: "SADR",
            });
        }

        take_foreign_id_run(&mut cursor, "CPID", &mut line.composite_ids)?;
        take_foreign_id_run(&mut cursor, "RPID", &mut line.representation_module_ids)?;

        Ok(line)
    }
}

impl ModuleBuilder for Line {
    fn module_tag(&self) -> &'static str {
        TAG
    }

    fn schema(&self, registry: &ConverterRegistry) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();

        let mut primary = FieldFormat::new(TAG, "LINE OR ARC", StructCode::Vector, TypeCode::MixedDataType);
        primary.push(SubfieldFormat::new("MODN", SubfieldType::A, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("RCID", SubfieldType::I, WidthMode::Variable, registry)?);
        primary.push(SubfieldFormat::new("OBRP", SubfieldType::A, WidthMode::Variable, registry)?);
        schema.push(primary);

        ForeignID::add_field_to_schema(&mut schema, "ATTRIBUTE ID", "ATID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "POLYGON ID LEFT", "PIDL", false, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "POLYGON ID RIGHT", "PIDR", false, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "START NODE ID", "SNID", false, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "END NODE ID", "ENID", false, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "CHAIN COMPONENT ID", "CCID", true, registry)?;

        let mut sadr = FieldFormat::new("SADR", "SPATIAL ADDRESS", StructCode::Vector, TypeCode::MixedDataType);
        sadr.set_repeating(true);
        sadr.push(SubfieldFormat::new("X", SubfieldType::R, WidthMode::Variable, registry)?);
        sadr.push(SubfieldFormat::new("Y", SubfieldType::R, WidthMode::Variable, registry)?);
        schema.push(sadr);

        ForeignID::add_field_to_schema(&mut schema, "COMPOSITE ID", "CPID", true, registry)?;
        ForeignID::add_field_to_schema(&mut schema, "REPRESENTATION MODULE ID", "RPID", true, registry)?;

        Ok(schema)
    }

    fn ingest(&mut self, record: &Record) -> Result<(), IngestError> {
        *self = Self::parse(record)?;
        Ok(())
    }

    fn emit(&self) -> Result<Record, EmitError> {
        if self.spatial_addresses.is_empty() {
            return Err(EmitError::MissingMandatoryField {
                module: TAG,
                mnemonic: "SADR",
            });
        }

        let mut record = Record::new();

        let mut primary = Field::new("LINE OR ARC", TAG);
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
        for id in [
            &self.polygon_id_left,
            &self.polygon_id_right,
            &self.start_node_id,
            &self.end_node_id,
        ]
        .into_iter()
        .flatten()
        {
            record.push(id.to_field());
        }
        push_foreign_id_fields(&mut record, "CHAIN COMPONENT ID", "CCID", &self.chain_component_ids);

        for address in &self.spatial_addresses {
            let mut field = Field::new("SPATIAL ADDRESS", "SADR");
            field.push(address.x().clone());
            field.push(address.y().clone());
            record.push(field);
        }

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
        *self = Line::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usage;

    fn sample() -> Line {
        let mut line = Line::new();
        line.set_module_name("LE01");
        line.set_record_id(7);
        line.set_object_representation("1");
        line.add_attribute_id(ForeignID::attribute("AP01", 3));
        line.set_polygon_id_left(ForeignID::new("PC01", 2, Usage::LeftPolygon));
        line.add_spatial_address(SpatialAddress::from_xy(10.0, 20.0));
        line.add_spatial_address(SpatialAddress::from_xy(11.0, 21.0));
        line
    }

    #[test]
    fn test_roundtrip() {
        let line = sample();
        let record = line.emit().unwrap();

        let mut back = Line::new();
        back.ingest(&record).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_ingest_scenario() {
        let mut source = Line::new();
        source.set_object_representation("1");
        source.add_attribute_id(ForeignID::attribute("AP01", 1));
        source.add_spatial_address(SpatialAddress::from_xy(10.0, 20.0));
        let record = source.emit().unwrap();

        let mut line = Line::new();
        line.ingest(&record).unwrap();
        assert_eq!(line.object_representation(), Some("1"));
        assert_eq!(line.attribute_ids().len(), 1);
        assert_eq!(line.spatial_addresses().len(), 1);
        assert_eq!(line.spatial_addresses()[0].xy(), Some((10.0, 20.0)));
        assert!(line.polygon_id_left().is_none());
        assert!(line.polygon_id_right().is_none());
        assert!(line.start_node_id().is_none());
        assert!(line.end_node_id().is_none());
        assert!(line.chain_component_ids().is_empty());
        assert!(line.composite_ids().is_empty());
        assert!(line.representation_module_ids().is_empty());
    }

    #[test]
    fn test_ingest_requires_primary_field() {
        let mut record = Record::new();
        record.push(Field::new("POLYGON", "POLY"));

        let mut line = Line::new();
        let err = line.ingest(&record).unwrap_err();
        assert!(matches!(err, IngestError::NotThisModuleType { expected: "LINE" }));
    }

    #[test]
    fn test_ingest_requires_obrp_and_sadr() {
        let mut source = sample();
        source.object_representation = None;
        // Bypass emit's own check by clearing OBRP only.
        let record = source.emit().unwrap();
        let mut line = Line::new();
        let err = line.ingest(&record).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingMandatoryField { mnemonic: "OBRP", .. }
        ));
    }

    #[test]
    fn test_failed_ingest_leaves_state_untouched() {
        let mut line = sample();
        let bad = Record::new();
        assert!(line.ingest(&bad).is_err());
        assert_eq!(line, sample());
    }

    #[test]
    fn test_emit_without_geometry_is_an_error() {
        let mut line = Line::new();
        line.set_object_representation("1");
        let err = line.emit().unwrap_err();
        assert!(matches!(
            err,
            EmitError::MissingMandatoryField { mnemonic: "SADR", .. }
        ));
    }

    #[test]
    fn test_reset_recycles_to_empty() {
        let mut line = sample();
        line.reset();
        assert_eq!(line, Line::new());
    }

    #[test]
    fn test_schema_lists_every_field_in_order() {
        let registry = ConverterRegistry::new();
        let line = Line::new();
        let schema = line.schema(&registry).unwrap();
        let tags: Vec<&str> = schema.iter().map(FieldFormat::tag).collect();
        assert_eq!(
            tags,
            ["LINE", "ATID", "PIDL", "PIDR", "SNID", "ENID", "CCID", "SADR", "CPID", "RPID"]
        );
        assert!(schema.find("ATID").unwrap().is_repeating());
        assert!(!schema.find("PIDL").unwrap().is_repeating());

        // Rebuilding from scratch never duplicates formats.
        assert_eq!(line.schema(&registry).unwrap().len(), schema.len());
    }
}
