//! Subfield: the leaf of the record tree.
//!
//! A subfield carries a value whose type has run-time binding: using a
//! `set_*` member sets both the value and the type. A subfield can also
//! have a type but no value at all (`set_unvalued`), which is how an
//! empty-but-declared column survives a round trip.

use std::fmt;

/// The ISO 8211 data types a subfield can be encoded as.
///
/// `A` is graphic/alphanumeric characters, `I` implicit-point
/// (integer), `R` explicit-point unscaled (fixed-point real), `S`
/// explicit-point scaled (scientific notation real), `C` character-mode
/// bitfield. The `B*` family is true binary: signed/unsigned integers
/// of 8 to 32 bits and IEEE 754 floats of 32 or 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubfieldType {
    A,
    I,
    R,
    S,
    C,
    BI8,
    BI16,
    BI24,
    BI32,
    BUI8,
    BUI16,
    BUI24,
    BUI32,
    BFP32,
    BFP64,
}

impl SubfieldType {
    /// Every type, in declaration order.
    pub const ALL: [SubfieldType; 15] = [
        SubfieldType::A,
        SubfieldType::I,
        SubfieldType::R,
        SubfieldType::S,
        SubfieldType::C,
        SubfieldType::BI8,
        SubfieldType::BI16,
        SubfieldType::BI24,
        SubfieldType::BI32,
        SubfieldType::BUI8,
        SubfieldType::BUI16,
        SubfieldType::BUI24,
        SubfieldType::BUI32,
        SubfieldType::BFP32,
        SubfieldType::BFP64,
    ];

    /// Parses a wire type-name string ("A", "I", "BI32", "BUI16",
    /// "BFP64", ...).
    ///
    /// The string is read positionally: the first character selects the
    /// family, and for "B" the following characters select signedness
    /// and width. Letters are case-insensitive. Returns `None` for
    /// unknown or malformed names.
    pub fn parse(name: &str) -> Option<SubfieldType> {
        let bytes = name.as_bytes();
        match bytes.first()?.to_ascii_uppercase() {
            b'A' if bytes.len() == 1 => Some(SubfieldType::A),
            b'I' if bytes.len() == 1 => Some(SubfieldType::I),
            b'R' if bytes.len() == 1 => Some(SubfieldType::R),
            b'S' if bytes.len() == 1 => Some(SubfieldType::S),
            b'C' if bytes.len() == 1 => Some(SubfieldType::C),
            b'B' => match bytes.get(1)?.to_ascii_uppercase() {
                b'I' => match name.get(2..)? {
                    "8" => Some(SubfieldType::BI8),
                    "16" => Some(SubfieldType::BI16),
                    "24" => Some(SubfieldType::BI24),
                    "32" => Some(SubfieldType::BI32),
                    _ => None,
                },
                b'U' if bytes.get(2)?.to_ascii_uppercase() == b'I' => match name.get(3..)? {
                    "8" => Some(SubfieldType::BUI8),
                    "16" => Some(SubfieldType::BUI16),
                    "24" => Some(SubfieldType::BUI24),
                    "32" => Some(SubfieldType::BUI32),
                    _ => None,
                },
                b'F' if bytes.get(2)?.to_ascii_uppercase() == b'P' => match name.get(3..)? {
                    "32" => Some(SubfieldType::BFP32),
                    "64" => Some(SubfieldType::BFP64),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }

    /// The wire type-name string for this type.
    pub fn name(self) -> &'static str {
        match self {
            SubfieldType::A => "A",
            SubfieldType::I => "I",
            SubfieldType::R => "R",
            SubfieldType::S => "S",
            SubfieldType::C => "C",
            SubfieldType::BI8 => "BI8",
            SubfieldType::BI16 => "BI16",
            SubfieldType::BI24 => "BI24",
            SubfieldType::BI32 => "BI32",
            SubfieldType::BUI8 => "BUI8",
            SubfieldType::BUI16 => "BUI16",
            SubfieldType::BUI24 => "BUI24",
            SubfieldType::BUI32 => "BUI32",
            SubfieldType::BFP32 => "BFP32",
            SubfieldType::BFP64 => "BFP64",
        }
    }

    /// Returns true for the binary (`B*`) family, whose widths are
    /// fixed by the type itself rather than by a field declaration.
    pub fn is_binary(self) -> bool {
        !matches!(
            self,
            SubfieldType::A | SubfieldType::I | SubfieldType::R | SubfieldType::S | SubfieldType::C
        )
    }

    /// Intrinsic byte width of a binary type; `None` for character
    /// types, whose width comes from the field declaration.
    pub fn intrinsic_width(self) -> Option<usize> {
        match self {
            SubfieldType::BI8 | SubfieldType::BUI8 => Some(1),
            SubfieldType::BI16 | SubfieldType::BUI16 => Some(2),
            SubfieldType::BI24 | SubfieldType::BUI24 => Some(3),
            SubfieldType::BI32 | SubfieldType::BUI32 | SubfieldType::BFP32 => Some(4),
            SubfieldType::BFP64 => Some(8),
            _ => None,
        }
    }
}

impl fmt::Display for SubfieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A subfield's value: one variant per [`SubfieldType`], plus the
/// explicit no-value state.
///
/// `Unvalued` is distinct from any type's zero or empty value. Exhaustive
/// matching replaces the original "wrong accessor returns false"
/// access pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum SubfieldValue {
    A(String),
    I(i64),
    R(f64),
    S(f64),
    C(String),
    BI8(i8),
    BI16(i16),
    BI24(i32),
    BI32(i32),
    BUI8(u8),
    BUI16(u16),
    BUI24(u32),
    BUI32(u32),
    BFP32(f32),
    BFP64(f64),
    Unvalued,
}

impl SubfieldValue {
    /// The type this value is an instance of; `None` for `Unvalued`.
    pub fn value_type(&self) -> Option<SubfieldType> {
        match self {
            SubfieldValue::A(_) => Some(SubfieldType::A),
            SubfieldValue::I(_) => Some(SubfieldType::I),
            SubfieldValue::R(_) => Some(SubfieldType::R),
            SubfieldValue::S(_) => Some(SubfieldType::S),
            SubfieldValue::C(_) => Some(SubfieldType::C),
            SubfieldValue::BI8(_) => Some(SubfieldType::BI8),
            SubfieldValue::BI16(_) => Some(SubfieldType::BI16),
            SubfieldValue::BI24(_) => Some(SubfieldType::BI24),
            SubfieldValue::BI32(_) => Some(SubfieldType::BI32),
            SubfieldValue::BUI8(_) => Some(SubfieldType::BUI8),
            SubfieldValue::BUI16(_) => Some(SubfieldType::BUI16),
            SubfieldValue::BUI24(_) => Some(SubfieldType::BUI24),
            SubfieldValue::BUI32(_) => Some(SubfieldType::BUI32),
            SubfieldValue::BFP32(_) => Some(SubfieldType::BFP32),
            SubfieldValue::BFP64(_) => Some(SubfieldType::BFP64),
            SubfieldValue::Unvalued => None,
        }
    }
}

/// An SDTS subfield: a named, mnemonic-tagged, run-time-typed value.
///
/// Attribute subfields have their mnemonic set to the attribute field
/// tag and their name to the attribute's actual name; other subfields
/// use the fixed SDTS mnemonics ("MODN", "RCID", ...). The name need
/// not be set when read from a transfer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subfield {
    name: String,
    mnemonic: String,
    kind: Option<SubfieldType>,
    value: SubfieldValue,
}

impl Default for SubfieldValue {
    fn default() -> Self {
        SubfieldValue::Unvalued
    }
}

impl Subfield {
    /// Creates an untyped, unvalued subfield.
    pub fn new(name: impl Into<String>, mnemonic: impl Into<String>) -> Self {
        Subfield {
            name: name.into(),
            mnemonic: mnemonic.into(),
            kind: None,
            value: SubfieldValue::Unvalued,
        }
    }

    /// Creates a typed but unvalued subfield — a placeholder column.
    pub fn empty(mnemonic: impl Into<String>, kind: SubfieldType) -> Self {
        Subfield {
            name: String::new(),
            mnemonic: mnemonic.into(),
            kind: Some(kind),
            value: SubfieldValue::Unvalued,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_mnemonic(&mut self, mnemonic: impl Into<String>) {
        self.mnemonic = mnemonic.into();
    }

    /// The subfield's current type, if one has been bound.
    pub fn kind(&self) -> Option<SubfieldType> {
        self.kind
    }

    pub fn value(&self) -> &SubfieldValue {
        &self.value
    }

    /// True if the subfield has a type but no value.
    pub fn is_unvalued(&self) -> bool {
        matches!(self.value, SubfieldValue::Unvalued)
    }

    /// Sets the value, binding the subfield's type to the value's type.
    /// Setting `Unvalued` clears the value but keeps the current type.
    pub fn set_value(&mut self, value: SubfieldValue) {
        if let Some(kind) = value.value_type() {
            self.kind = Some(kind);
        }
        self.value = value;
    }

    /// Resets to the typed-but-valueless state, keeping the type.
    pub fn set_unvalued(&mut self) {
        self.value = SubfieldValue::Unvalued;
    }

    pub fn set_a(&mut self, val: impl Into<String>) {
        self.set_value(SubfieldValue::A(val.into()));
    }

    pub fn set_i(&mut self, val: i64) {
        self.set_value(SubfieldValue::I(val));
    }

    pub fn set_r(&mut self, val: f64) {
        self.set_value(SubfieldValue::R(val));
    }

    pub fn set_s(&mut self, val: f64) {
        self.set_value(SubfieldValue::S(val));
    }

    pub fn set_c(&mut self, val: impl Into<String>) {
        self.set_value(SubfieldValue::C(val.into()));
    }

    pub fn set_bi32(&mut self, val: i32) {
        self.set_value(SubfieldValue::BI32(val));
    }

    pub fn set_bfp64(&mut self, val: f64) {
        self.set_value(SubfieldValue::BFP64(val));
    }

    /// The text content, for `A` and `C` values.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            SubfieldValue::A(s) | SubfieldValue::C(s) => Some(s),
            _ => None,
        }
    }

    /// Widens any integer-bearing value to `i64`.
    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            SubfieldValue::I(v) => Some(v),
            SubfieldValue::BI8(v) => Some(v as i64),
            SubfieldValue::BI16(v) => Some(v as i64),
            SubfieldValue::BI24(v) | SubfieldValue::BI32(v) => Some(v as i64),
            SubfieldValue::BUI8(v) => Some(v as i64),
            SubfieldValue::BUI16(v) => Some(v as i64),
            SubfieldValue::BUI24(v) | SubfieldValue::BUI32(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Widens any numeric value to `f64`.
    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            SubfieldValue::R(v) | SubfieldValue::S(v) | SubfieldValue::BFP64(v) => Some(v),
            SubfieldValue::BFP32(v) => Some(v as f64),
            _ => self.as_int().map(|v| v as f64),
        }
    }
}
