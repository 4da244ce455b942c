//! Converter lookup by type name.
//!
//! One immutable table maps the positional type-name grammar ("A",
//! "I", "BI32", "BFP64", ...) to a shared [`Converter`] singleton. The
//! registry is injected wherever schemas are built, so callers can see
//! exactly which lookup served them; an unknown name is an error, not
//! a silent default.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::codec::converter::Converter;
use crate::error::SchemaError;
use crate::model::SubfieldType;

lazy_static! {
    static ref CONVERTERS: FxHashMap<SubfieldType, Converter> = {
        let mut map = FxHashMap::default();
        for kind in SubfieldType::ALL {
            map.insert(kind, Converter::new(kind));
        }
        map
    };
}

/// Resolves type names to `&'static` converters.
///
/// Stateless; `ConverterRegistry::shared()` hands out the process-wide
/// instance, but nothing stops a caller from constructing its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConverterRegistry;

impl ConverterRegistry {
    pub const fn new() -> Self {
        ConverterRegistry
    }

    /// The process-wide registry.
    pub fn shared() -> &'static Self {
        static SHARED: ConverterRegistry = ConverterRegistry::new();
        &SHARED
    }

    /// Looks up the converter for a positional type name
    /// (case-insensitive). Unknown names yield
    /// [`SchemaError::UnknownConverterType`].
    pub fn get(&self, name: &str) -> Result<&'static Converter, SchemaError> {
        let kind = SubfieldType::parse(name).ok_or_else(|| SchemaError::UnknownConverterType {
            name: name.to_string(),
        })?;
        Ok(self.by_kind(kind))
    }

    /// Direct lookup when the type is already known.
    pub fn by_kind(&self, kind: SubfieldType) -> &'static Converter {
        &CONVERTERS[&kind]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_name_resolves() {
        let registry = ConverterRegistry::new();
        for kind in SubfieldType::ALL {
            let converter = registry.get(kind.name()).unwrap();
            assert_eq!(converter.kind(), kind);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ConverterRegistry::new();
        assert_eq!(registry.get("bui24").unwrap().kind(), SubfieldType::BUI24);
        assert_eq!(registry.get("bFp32").unwrap().kind(), SubfieldType::BFP32);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let registry = ConverterRegistry::new();
        for bad in ["", "Q", "B", "BI", "BI64", "BFP16", "AXE"] {
            assert!(matches!(
                registry.get(bad),
                Err(SchemaError::UnknownConverterType { .. })
            ));
        }
    }

    #[test]
    fn test_singletons_are_shared() {
        let registry = ConverterRegistry::shared();
        let a = registry.get("A").unwrap() as *const Converter;
        let b = registry.get("a").unwrap() as *const Converter;
        assert_eq!(a, b);
    }
}
