//! Build a LINE record, project it to the generic tree, and walk it.

use sdts_8211::modules::{Line, ModuleBuilder};
use sdts_8211::{ConverterRegistry, DirEntry, ForeignID, Leader, SpatialAddress, Usage};

fn main() {
    let mut line = Line::new();
    line.set_module_name("LE01");
    line.set_record_id(7);
    line.set_object_representation("1");
    line.add_attribute_id(ForeignID::attribute("AP01", 3));
    line.set_polygon_id_left(ForeignID::new("PC01", 2, Usage::LeftPolygon));
    line.add_spatial_address(SpatialAddress::from_xy(10.0, 20.0));
    line.add_spatial_address(SpatialAddress::from_xy(11.5, 21.25));

    let record = match line.emit() {
        Ok(record) => record,
        Err(err) => {
            eprintln!("emit failed: {err}");
            std::process::exit(1);
        }
    };

    println!("record with {} fields:", record.len());
    for field in &record {
        println!("  {} ({})", field.mnemonic(), field.name());
        for subfield in field {
            let value = subfield
                .as_str()
                .map(str::to_string)
                .or_else(|| subfield.as_double().map(|v| v.to_string()))
                .unwrap_or_else(|| "<unvalued>".to_string());
            println!("    {:4} = {}", subfield.mnemonic(), value);
        }
    }

    // Sketch the two-pass directory layout a writer would produce.
    let registry = ConverterRegistry::shared();
    let schema = match line.schema(registry) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("schema failed: {err}");
            std::process::exit(1);
        }
    };

    let mut leader = Leader::new();
    let mut position = 0usize;
    let mut entries = Vec::new();
    for field in &record {
        let length: usize = field
            .subfields()
            .iter()
            .map(|sf| sf.as_str().map_or(8, str::len) + 1)
            .sum();
        entries.push(DirEntry::register(&mut leader, field.mnemonic(), length, position));
        position += length;
    }
    leader.set_record_length(24 + position);
    leader.set_field_area_start(24 + entries.len() * (leader.size_tag() + leader.size_len() + leader.size_pos()) + 1);

    let leader_bytes = match leader.encode() {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("leader encode failed: {err}");
            std::process::exit(1);
        }
    };

    println!("\nschema declares {} fields", schema.len());
    println!("leader: {}", String::from_utf8_lossy(&leader_bytes));
    for entry in &entries {
        println!("  dir entry: {}", String::from_utf8_lossy(&entry.encode(&leader)));
    }

    // Packed foreign-id form, as it would appear in an attribute module.
    for id in line.attribute_ids() {
        println!("attribute ref: {}", id.packed());
    }
}
