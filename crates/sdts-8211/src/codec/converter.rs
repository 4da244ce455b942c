//! Per-type subfield converters.
//!
//! A converter translates between a subfield and its raw bytes. The
//! character family (A, I, R, S, C) is delimiter- or width-driven; the
//! binary family (BI*, BUI*, BFP*) is fixed-width by construction and
//! stored big-endian (network order). Converters are stateless and
//! shared process-wide as `&'static` singletons via the
//! [`registry`](crate::codec::registry).

use crate::error::{DecodeError, EncodeError};
use crate::model::{Subfield, SubfieldType, SubfieldValue};

/// ISO 8211 unit terminator (US): ends a variable-width subfield.
pub const UNIT_TERMINATOR: u8 = 0x1F;

/// ISO 8211 field terminator (RS): ends a field's data area.
pub const FIELD_TERMINATOR: u8 = 0x1E;

/// Codec for one [`SubfieldType`].
///
/// Neither decode path sets the produced subfield's name or mnemonic;
/// that is the caller's job, since converters only know the type.
#[derive(Debug)]
pub struct Converter {
    kind: SubfieldType,
}

impl Converter {
    pub const fn new(kind: SubfieldType) -> Self {
        Converter { kind }
    }

    /// The subfield type this converter handles.
    pub fn kind(&self) -> SubfieldType {
        self.kind
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    /// Decodes a fixed-width subfield from the front of `data`.
    ///
    /// `bit_len` is the declared width in bits (character types consume
    /// `bit_len / 8` bytes). Returns the subfield and the byte count
    /// consumed. A zero-length character slice produces a typed but
    /// unvalued subfield. A `bit_len` too small for a binary type is a
    /// [`DecodeError::LengthMismatch`]; a buffer shorter than the
    /// requested width is [`DecodeError::UnexpectedEof`].
    pub fn decode_fixed(&self, data: &[u8], bit_len: usize) -> Result<(Subfield, usize), DecodeError> {
        let len = bit_len / 8;

        if let Some(intrinsic) = self.kind.intrinsic_width() {
            if len < intrinsic {
                return Err(DecodeError::LengthMismatch {
                    kind: self.kind,
                    requested: len,
                    intrinsic,
                });
            }
            if data.len() < intrinsic {
                return Err(DecodeError::UnexpectedEof {
                    context: self.kind.name(),
                    needed: intrinsic,
                    available: data.len(),
                });
            }
            let value = self.decode_binary(&data[..intrinsic]);
            let mut subfield = Subfield::default();
            subfield.set_value(value);
            return Ok((subfield, intrinsic));
        }

        if data.len() < len {
            return Err(DecodeError::UnexpectedEof {
                context: self.kind.name(),
                needed: len,
                available: data.len(),
            });
        }

        let mut subfield = Subfield::empty("", self.kind);
        if len == 0 {
            // An empty slice still locks the type; the value stays absent.
            return Ok((subfield, 0));
        }

        let text = std::str::from_utf8(&data[..len])
            .map_err(|_| DecodeError::InvalidUtf8 { context: self.kind.name() })?;

        let value = match self.kind {
            SubfieldType::A => SubfieldValue::A(text.to_string()),
            SubfieldType::C => SubfieldValue::C(text.to_string()),
            SubfieldType::I => {
                let v = text.trim().parse::<i64>().map_err(|_| DecodeError::InvalidNumber {
                    kind: self.kind,
                    text: text.to_string(),
                })?;
                SubfieldValue::I(v)
            }
            SubfieldType::R | SubfieldType::S => {
                let v = text.trim().parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
                    kind: self.kind,
                    text: text.to_string(),
                })?;
                if self.kind == SubfieldType::R {
                    SubfieldValue::R(v)
                } else {
                    SubfieldValue::S(v)
                }
            }
            _ => unreachable!("binary types handled above"),
        };
        subfield.set_value(value);

        Ok((subfield, len))
    }

    /// Decodes a variable-width subfield terminated by `delimiter`.
    ///
    /// Scans at most `max_len` bytes for the delimiter; the returned
    /// count excludes the delimiter. Binary types ignore the delimiter
    /// and degenerate to the fixed path, since their width comes from
    /// the type.
    pub fn decode_variable(
        &self,
        data: &[u8],
        max_len: usize,
        delimiter: u8,
    ) -> Result<(Subfield, usize), DecodeError> {
        if let Some(intrinsic) = self.kind.intrinsic_width() {
            return self.decode_fixed(data, intrinsic * 8);
        }

        let limit = max_len.min(data.len());
        let len = data[..limit]
            .iter()
            .position(|&b| b == delimiter)
            .unwrap_or(limit);

        self.decode_fixed(data, len * 8)
    }

    fn decode_binary(&self, data: &[u8]) -> SubfieldValue {
        match self.kind {
            SubfieldType::BI8 => SubfieldValue::BI8(data[0] as i8),
            SubfieldType::BI16 => SubfieldValue::BI16(i16::from_be_bytes([data[0], data[1]])),
            SubfieldType::BI24 => {
                // Sign lives in the most significant of the three bytes.
                let v = ((data[0] as i8 as i32) << 16) | ((data[1] as i32) << 8) | data[2] as i32;
                SubfieldValue::BI24(v)
            }
            SubfieldType::BI32 => {
                SubfieldValue::BI32(i32::from_be_bytes([data[0], data[1], data[2], data[3]]))
            }
            SubfieldType::BUI8 => SubfieldValue::BUI8(data[0]),
            SubfieldType::BUI16 => SubfieldValue::BUI16(u16::from_be_bytes([data[0], data[1]])),
            SubfieldType::BUI24 => {
                let v = ((data[0] as u32) << 16) | ((data[1] as u32) << 8) | data[2] as u32;
                SubfieldValue::BUI24(v)
            }
            SubfieldType::BUI32 => {
                SubfieldValue::BUI32(u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
            }
            SubfieldType::BFP32 => {
                SubfieldValue::BFP32(f32::from_be_bytes([data[0], data[1], data[2], data[3]]))
            }
            SubfieldType::BFP64 => SubfieldValue::BFP64(f64::from_be_bytes([
                data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
            ])),
            _ => unreachable!("not a binary type"),
        }
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    /// Encodes a subfield's value as variable-width bytes (no
    /// delimiter). An unvalued subfield encodes to zero bytes.
    pub fn encode(&self, subfield: &Subfield) -> Result<Vec<u8>, EncodeError> {
        let bytes = match subfield.value() {
            SubfieldValue::Unvalued => Vec::new(),
            SubfieldValue::A(s) | SubfieldValue::C(s) => s.as_bytes().to_vec(),
            SubfieldValue::I(v) => v.to_string().into_bytes(),
            SubfieldValue::R(v) => format!("{v:.8}").into_bytes(),
            SubfieldValue::S(v) => format!("{v:E}").into_bytes(),
            SubfieldValue::BI8(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BI16(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BI24(v) => v.to_be_bytes()[1..].to_vec(),
            SubfieldValue::BI32(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BUI8(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BUI16(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BUI24(v) => v.to_be_bytes()[1..].to_vec(),
            SubfieldValue::BUI32(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BFP32(v) => v.to_be_bytes().to_vec(),
            SubfieldValue::BFP64(v) => v.to_be_bytes().to_vec(),
        };
        Ok(bytes)
    }

    /// Encodes a character subfield at an exact declared width:
    /// zero-filled numerics, space-padded text, over-long values
    /// truncated. Binary types never take a declared width and return
    /// [`EncodeError::FixedWidthUnsupported`]; a fixed-width column
    /// cannot hold "no value" either.
    pub fn encode_fixed(&self, subfield: &Subfield, len: usize) -> Result<Vec<u8>, EncodeError> {
        if self.kind.is_binary() {
            return Err(EncodeError::FixedWidthUnsupported { kind: self.kind });
        }
        if subfield.is_unvalued() {
            return Err(EncodeError::UnvaluedFixedWidth {
                kind: self.kind,
                width: len,
            });
        }

        let s = match subfield.value() {
            // Text pads and truncates to the declared column width.
            SubfieldValue::A(v) | SubfieldValue::C(v) => {
                let mut s = v.clone();
                while s.len() < len {
                    s.push(' ');
                }
                s.truncate(len);
                return Ok(s.into_bytes());
            }
            SubfieldValue::I(v) => v.to_string(),
            SubfieldValue::R(v) => format!("{v:.8}"),
            SubfieldValue::S(v) => format!("{v:E}"),
            // Cross-typed values fall back to the variable rendering.
            other => {
                return self.encode(&{
                    let mut sf = Subfield::default();
                    sf.set_value(other.clone());
                    sf
                });
            }
        };

        // Numerics never truncate: losing digits silently would
        // corrupt the value.
        if s.len() > len {
            return Err(EncodeError::FixedWidthOverflow {
                kind: self.kind,
                width: len,
                needed: s.len(),
            });
        }
        let padded = match s.strip_prefix('-') {
            Some(digits) => format!("-{digits:0>width$}", width = len - 1),
            None => format!("{s:0>len$}"),
        };

        Ok(padded.into_bytes())
    }

    /// A delimiter-only rendering: the placeholder for a column with no
    /// content.
    pub fn encode_empty(&self) -> Vec<u8> {
        vec![UNIT_TERMINATOR]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(kind: SubfieldType) -> Converter {
        Converter::new(kind)
    }

    #[test]
    fn test_decode_fixed_text() {
        let (sf, used) = conv(SubfieldType::A).decode_fixed(b"LE01", 32).unwrap();
        assert_eq!(used, 4);
        assert_eq!(sf.as_str(), Some("LE01"));
        assert_eq!(sf.kind(), Some(SubfieldType::A));
    }

    #[test]
    fn test_decode_fixed_empty_is_typed_unvalued() {
        let (sf, used) = conv(SubfieldType::I).decode_fixed(b"", 0).unwrap();
        assert_eq!(used, 0);
        assert!(sf.is_unvalued());
        assert_eq!(sf.kind(), Some(SubfieldType::I));
    }

    #[test]
    fn test_decode_variable_stops_at_delimiter() {
        let data = b"1234\x1f567";
        let (sf, used) = conv(SubfieldType::I)
            .decode_variable(data, data.len(), UNIT_TERMINATOR)
            .unwrap();
        assert_eq!(used, 4);
        assert_eq!(sf.as_int(), Some(1234));
    }

    #[test]
    fn test_decode_variable_without_delimiter_takes_max() {
        let (sf, used) = conv(SubfieldType::A)
            .decode_variable(b"abcdef", 3, UNIT_TERMINATOR)
            .unwrap();
        assert_eq!(used, 3);
        assert_eq!(sf.as_str(), Some("abc"));
    }

    #[test]
    fn test_decode_real_and_scaled() {
        let (sf, _) = conv(SubfieldType::R).decode_fixed(b"123.456", 56).unwrap();
        assert_eq!(sf.as_double(), Some(123.456));

        let (sf, _) = conv(SubfieldType::S).decode_fixed(b"1.5E2", 40).unwrap();
        assert_eq!(sf.as_double(), Some(150.0));
    }

    #[test]
    fn test_decode_invalid_number_is_an_error() {
        let err = conv(SubfieldType::I).decode_fixed(b"12x4", 32).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn test_decode_binary_big_endian() {
        let (sf, used) = conv(SubfieldType::BI16)
            .decode_fixed(&[0xFF, 0xFE], 16)
            .unwrap();
        assert_eq!(used, 2);
        assert_eq!(sf.as_int(), Some(-2));

        let (sf, _) = conv(SubfieldType::BUI32)
            .decode_fixed(&[0x00, 0x01, 0x00, 0x00], 32)
            .unwrap();
        assert_eq!(sf.as_int(), Some(65536));

        let (sf, _) = conv(SubfieldType::BI24)
            .decode_fixed(&[0xFF, 0xFF, 0xFF], 24)
            .unwrap();
        assert_eq!(sf.as_int(), Some(-1));

        let (sf, _) = conv(SubfieldType::BFP64)
            .decode_fixed(&2.5f64.to_be_bytes(), 64)
            .unwrap();
        assert_eq!(sf.as_double(), Some(2.5));
    }

    #[test]
    fn test_short_bit_length_is_length_mismatch() {
        let err = conv(SubfieldType::BI32)
            .decode_fixed(&[0, 0, 0, 0], 16)
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthMismatch { requested: 2, intrinsic: 4, .. }
        ));
    }

    #[test]
    fn test_short_buffer_is_eof() {
        let err = conv(SubfieldType::BI32).decode_fixed(&[0, 0], 32).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));

        let err = conv(SubfieldType::A).decode_fixed(b"ab", 32).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_encode_roundtrip_character() {
        let mut sf = Subfield::default();
        sf.set_i(-42);
        let bytes = conv(SubfieldType::I).encode(&sf).unwrap();
        assert_eq!(bytes, b"-42");

        let (back, _) = conv(SubfieldType::I)
            .decode_fixed(&bytes, bytes.len() * 8)
            .unwrap();
        assert_eq!(back.as_int(), Some(-42));
    }

    #[test]
    fn test_encode_roundtrip_binary() {
        let mut sf = Subfield::default();
        sf.set_value(SubfieldValue::BI24(-300));
        let bytes = conv(SubfieldType::BI24).encode(&sf).unwrap();
        assert_eq!(bytes.len(), 3);

        let (back, _) = conv(SubfieldType::BI24).decode_fixed(&bytes, 24).unwrap();
        assert_eq!(back.as_int(), Some(-300));
    }

    #[test]
    fn test_encode_unvalued_is_zero_bytes() {
        let sf = Subfield::empty("OBRP", SubfieldType::A);
        assert!(conv(SubfieldType::A).encode(&sf).unwrap().is_empty());
    }

    #[test]
    fn test_encode_fixed_pads_and_truncates() {
        let mut sf = Subfield::default();
        sf.set_i(7);
        let bytes = conv(SubfieldType::I).encode_fixed(&sf, 4).unwrap();
        assert_eq!(bytes, b"0007");

        sf.set_a("toolong");
        let bytes = conv(SubfieldType::A).encode_fixed(&sf, 4).unwrap();
        assert_eq!(bytes, b"tool");
    }

    #[test]
    fn test_encode_fixed_zero_pads_after_the_sign() {
        let mut sf = Subfield::default();
        sf.set_i(-42);
        let bytes = conv(SubfieldType::I).encode_fixed(&sf, 5).unwrap();
        assert_eq!(bytes, b"-0042");

        sf.set_r(1.5);
        let bytes = conv(SubfieldType::R).encode_fixed(&sf, 12).unwrap();
        assert_eq!(bytes, b"001.50000000");

        let (back, _) = conv(SubfieldType::R).decode_fixed(&bytes, 96).unwrap();
        assert_eq!(back.as_double(), Some(1.5));
    }

    #[test]
    fn test_encode_fixed_never_truncates_numerics() {
        let mut sf = Subfield::default();
        sf.set_r(123.456);
        let err = conv(SubfieldType::R).encode_fixed(&sf, 5).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FixedWidthOverflow { width: 5, needed: 12, .. }
        ));

        sf.set_i(123_456);
        let err = conv(SubfieldType::I).encode_fixed(&sf, 4).unwrap_err();
        assert!(matches!(err, EncodeError::FixedWidthOverflow { .. }));
    }

    #[test]
    fn test_encode_fixed_rejects_binary_and_unvalued() {
        let mut sf = Subfield::default();
        sf.set_bi32(1);
        let err = conv(SubfieldType::BI32).encode_fixed(&sf, 4).unwrap_err();
        assert!(matches!(err, EncodeError::FixedWidthUnsupported { .. }));

        let sf = Subfield::empty("OBRP", SubfieldType::A);
        let err = conv(SubfieldType::A).encode_fixed(&sf, 4).unwrap_err();
        assert!(matches!(err, EncodeError::UnvaluedFixedWidth { .. }));
    }

    #[test]
    fn test_encode_empty_is_delimiter_only() {
        assert_eq!(conv(SubfieldType::A).encode_empty(), vec![UNIT_TERMINATOR]);
    }
}
