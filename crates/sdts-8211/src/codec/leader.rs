//! Record leader and directory entries.
//!
//! An ISO 8211 record opens with a 24-byte leader followed by a
//! directory of (tag, length, position) entries. The leader carries
//! the column widths used by every directory entry, and those widths
//! depend on the largest value that any entry needs to represent, so
//! writing is a two-pass affair: register every entry against the
//! leader first, then serialize with the now-final widths.

use std::fmt::Write as _;

use crate::error::EncodeError;

/// Decimal character width needed to render `value` (at least 1).
fn decimal_width(value: usize) -> usize {
    let mut width = 1;
    let mut rest = value / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

/// The 24-byte record leader.
///
/// The three directory column widths only ever grow: each
/// `register_*` call computes the minimum width for the new value and
/// keeps the larger of that and the current width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader {
    record_length: usize,
    leader_id: char,
    field_area_start: usize,
    size_len: usize,
    size_pos: usize,
    size_tag: usize,
}

impl Default for Leader {
    fn default() -> Self {
        Leader {
            record_length: 0,
            leader_id: 'D',
            field_area_start: 0,
            size_len: 1,
            size_pos: 1,
            size_tag: 1,
        }
    }
}

impl Leader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn set_record_length(&mut self, length: usize) {
        self.record_length = length;
    }

    pub fn leader_id(&self) -> char {
        self.leader_id
    }

    pub fn set_leader_id(&mut self, id: char) {
        self.leader_id = id;
    }

    pub fn field_area_start(&self) -> usize {
        self.field_area_start
    }

    pub fn set_field_area_start(&mut self, start: usize) {
        self.field_area_start = start;
    }

    pub fn size_len(&self) -> usize {
        self.size_len
    }

    pub fn size_pos(&self) -> usize {
        self.size_pos
    }

    pub fn size_tag(&self) -> usize {
        self.size_tag
    }

    /// Widens the length column to fit `length` if needed.
    pub fn register_field_length(&mut self, length: usize) {
        self.size_len = self.size_len.max(decimal_width(length));
    }

    /// Widens the position column to fit `position` if needed.
    pub fn register_position(&mut self, position: usize) {
        self.size_pos = self.size_pos.max(decimal_width(position));
    }

    /// Widens the tag column to fit `tag` if needed.
    pub fn register_tag(&mut self, tag: &str) {
        self.size_tag = self.size_tag.max(tag.len());
    }

    /// Serializes the leader into its fixed 24-byte wire form.
    ///
    /// The record length and field-area start get five characters and
    /// each entry-map width gets one; a value that needs more is a
    /// [`EncodeError::LeaderOverflow`], never a truncated leader.
    pub fn encode(&self) -> Result<[u8; 24], EncodeError> {
        for (column, value, width) in [
            ("record length", self.record_length, 5usize),
            ("field area start", self.field_area_start, 5),
            ("size-of-length", self.size_len, 1),
            ("size-of-position", self.size_pos, 1),
            ("size-of-tag", self.size_tag, 1),
        ] {
            if decimal_width(value) > width {
                return Err(EncodeError::LeaderOverflow { column, value, width });
            }
        }

        let mut out = String::with_capacity(24);
        // record length (5), interchange level, leader id, inline code
        // extension, version, application indicator
        let _ = write!(out, "{:05}", self.record_length);
        out.push(' ');
        out.push(self.leader_id);
        out.push(' ');
        out.push(' ');
        out.push(' ');
        // field control length (2), field area start (5), extended
        // character set (3)
        out.push_str("  ");
        let _ = write!(out, "{:05}", self.field_area_start);
        out.push_str("   ");
        // entry map: size-of-length, size-of-position, reserved,
        // size-of-tag
        let _ = write!(out, "{}{}0{}", self.size_len, self.size_pos, self.size_tag);

        let mut bytes = [0u8; 24];
        bytes.copy_from_slice(out.as_bytes());
        Ok(bytes)
    }
}

/// One directory entry: a (tag, length, position) triple.
///
/// An entry does not own its leader; it registers its values against
/// one at construction or mutation time and borrows the final widths
/// when serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    tag: String,
    length: usize,
    position: usize,
}

impl DirEntry {
    /// Creates an entry and registers its three values with `leader`.
    pub fn register(leader: &mut Leader, tag: impl Into<String>, length: usize, position: usize) -> Self {
        let tag = tag.into();
        leader.register_tag(&tag);
        leader.register_field_length(length);
        leader.register_position(position);
        DirEntry { tag, length, position }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_length(&mut self, leader: &mut Leader, length: usize) {
        leader.register_field_length(length);
        self.length = length;
    }

    pub fn set_position(&mut self, leader: &mut Leader, position: usize) {
        leader.register_position(position);
        self.position = position;
    }

    pub fn set_tag(&mut self, leader: &mut Leader, tag: impl Into<String>) {
        self.tag = tag.into();
        leader.register_tag(&self.tag);
    }

    /// Serializes the entry at the leader's current widths: the tag
    /// space-padded, the numbers zero-padded.
    pub fn encode(&self, leader: &Leader) -> Vec<u8> {
        let mut out = String::new();
        let _ = write!(out, "{:<tag_w$}", self.tag, tag_w = leader.size_tag());
        let _ = write!(out, "{:0len_w$}", self.length, len_w = leader.size_len());
        let _ = write!(out, "{:0pos_w$}", self.position, pos_w = leader.size_pos());
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_width() {
        assert_eq!(decimal_width(0), 1);
        assert_eq!(decimal_width(9), 1);
        assert_eq!(decimal_width(10), 2);
        assert_eq!(decimal_width(12345), 5);
    }

    #[test]
    fn test_widths_grow_and_never_shrink() {
        let mut leader = Leader::new();
        assert_eq!(leader.size_len(), 1);

        leader.register_field_length(7);
        assert_eq!(leader.size_len(), 1);

        leader.register_field_length(1234);
        assert_eq!(leader.size_len(), 4);

        // Smaller values after a large one leave the width alone.
        leader.register_field_length(2);
        assert_eq!(leader.size_len(), 4);
    }

    #[test]
    fn test_register_touches_all_three_columns() {
        let mut leader = Leader::new();
        let entry = DirEntry::register(&mut leader, "LINE", 120, 456);
        assert_eq!(leader.size_tag(), 4);
        assert_eq!(leader.size_len(), 3);
        assert_eq!(leader.size_pos(), 3);
        assert_eq!(entry.tag(), "LINE");
    }

    #[test]
    fn test_entry_encodes_at_final_widths() {
        let mut leader = Leader::new();
        let first = DirEntry::register(&mut leader, "LINE", 12, 0);
        // A later, larger entry widens the columns that the first
        // entry will also use when serialized.
        let second = DirEntry::register(&mut leader, "ATID", 3456, 120);

        assert_eq!(first.encode(&leader), b"LINE0012000");
        assert_eq!(second.encode(&leader), b"ATID3456120");
    }

    #[test]
    fn test_leader_wire_form() {
        let mut leader = Leader::new();
        leader.set_record_length(245);
        leader.set_field_area_start(58);
        leader.register_tag("LINE");
        leader.register_field_length(120);
        leader.register_position(99);

        let bytes = leader.encode().unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..5], b"00245");
        assert_eq!(bytes[6], b'D');
        assert_eq!(&bytes[12..17], b"00058");
        assert_eq!(&bytes[20..24], b"3204");
    }

    #[test]
    fn test_oversized_leader_values_are_an_error() {
        let mut leader = Leader::new();
        leader.set_record_length(100_000);
        assert!(matches!(
            leader.encode().unwrap_err(),
            EncodeError::LeaderOverflow { column: "record length", value: 100_000, width: 5 }
        ));

        let mut leader = Leader::new();
        leader.set_field_area_start(1_000_000);
        assert!(matches!(
            leader.encode().unwrap_err(),
            EncodeError::LeaderOverflow { column: "field area start", .. }
        ));

        // Ten-digit field lengths push the entry-map width past its
        // single character.
        let mut leader = Leader::new();
        leader.register_field_length(1_000_000_000);
        assert!(matches!(
            leader.encode().unwrap_err(),
            EncodeError::LeaderOverflow { column: "size-of-length", value: 10, width: 1 }
        ));

        let mut leader = Leader::new();
        leader.set_record_length(99_999);
        leader.set_field_area_start(99_999);
        assert!(leader.encode().is_ok());
    }
}
