//! End-to-end properties across the builder and codec layers.

use proptest::prelude::*;

use sdts_8211::modules::{Line, ModuleBuilder};
use sdts_8211::{
    ConverterRegistry, DirEntry, ForeignID, Leader, Record, SpatialAddress, Usage,
};

fn usage_strategy() -> impl Strategy<Value = Usage> {
    prop_oneof![
        Just(Usage::None),
        Just(Usage::StartNode),
        Just(Usage::EndNode),
        Just(Usage::LeftPolygon),
        Just(Usage::RightPolygon),
        Just(Usage::ForwardOrientation),
        Just(Usage::BackwardOrientation),
        Just(Usage::InteriorPolygon),
        Just(Usage::ExteriorPolygon),
    ]
}

fn foreign_id_strategy() -> impl Strategy<Value = ForeignID> {
    ("[A-Z]{2}[0-9]{2}", 0i64..100_000, usage_strategy())
        .prop_map(|(module, id, usage)| ForeignID::new(module, id, usage))
}

fn line_strategy() -> impl Strategy<Value = Line> {
    (
        "[A-Z]{2}[0-9]{2}",
        1i64..100_000,
        "[0-9A-Z]{1,2}",
        prop::collection::vec(foreign_id_strategy(), 0..4),
        prop::option::of(foreign_id_strategy()),
        prop::option::of(foreign_id_strategy()),
        prop::collection::vec((-1.0e6f64..1.0e6, -1.0e6f64..1.0e6), 1..6),
    )
        .prop_map(|(modn, rcid, obrp, atids, pidl, snid, coords)| {
            let mut line = Line::new();
            line.set_module_name(modn);
            line.set_record_id(rcid);
            line.set_object_representation(obrp);
            for id in atids {
                line.add_attribute_id(id);
            }
            if let Some(id) = pidl {
                line.set_polygon_id_left(id);
            }
            if let Some(id) = snid {
                line.set_start_node_id(id);
            }
            for (x, y) in coords {
                line.add_spatial_address(SpatialAddress::from_xy(x, y));
            }
            line
        })
}

proptest! {
    #[test]
    fn prop_line_roundtrip(line in line_strategy()) {
        let record = line.emit().unwrap();
        let mut back = Line::new();
        back.ingest(&record).unwrap();
        prop_assert_eq!(back, line);
    }

    #[test]
    fn prop_width_monotonicity(
        registrations in prop::collection::vec((0usize..10_000_000, 0usize..10_000_000), 1..20)
    ) {
        let mut leader = Leader::new();
        let mut max_len = 0usize;
        let mut max_pos = 0usize;
        let mut prev = (leader.size_len(), leader.size_pos(), leader.size_tag());

        for (length, position) in registrations {
            DirEntry::register(&mut leader, "LINE", length, position);
            max_len = max_len.max(length);
            max_pos = max_pos.max(position);

            let now = (leader.size_len(), leader.size_pos(), leader.size_tag());
            prop_assert!(now.0 >= prev.0 && now.1 >= prev.1 && now.2 >= prev.2);
            prev = now;
        }

        // Final widths are exactly the minimum that fits the maxima.
        prop_assert_eq!(leader.size_len(), max_len.to_string().len());
        prop_assert_eq!(leader.size_pos(), max_pos.to_string().len());
        prop_assert_eq!(leader.size_tag(), 4);
    }
}

#[test]
fn registry_hands_out_distinct_singletons() {
    let registry = ConverterRegistry::shared();
    let names = ["BI32", "BUI16", "BFP64", "A"];
    let converters: Vec<_> = names
        .iter()
        .map(|name| registry.get(name).unwrap() as *const _)
        .collect();
    for (i, a) in converters.iter().enumerate() {
        for b in &converters[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(registry.get("bogus").is_err());
}

#[test]
fn ingest_rejects_foreign_records() {
    let mut line = Line::new();
    assert!(line.ingest(&Record::new()).is_err());
}
