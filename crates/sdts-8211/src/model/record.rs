//! Field and Record: the ordered containers of the generic record tree.
//!
//! Order is semantically significant. A run of same-mnemonic fields is
//! a repeating group, and a field's position relative to the groups
//! before it implies its role.

use crate::model::Subfield;

/// An ordered sequence of subfields with a name and mnemonic.
///
/// A field whose mnemonic is a foreign-identifier tag ("ATID", "FRID",
/// "CPID", ...) conventionally holds exactly the MODN + RCID subfields
/// of one foreign identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    name: String,
    mnemonic: String,
    subfields: Vec<Subfield>,
}

impl Field {
    pub fn new(name: impl Into<String>, mnemonic: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            mnemonic: mnemonic.into(),
            subfields: Vec::new(),
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

    pub fn push(&mut self, subfield: Subfield) {
        self.subfields.push(subfield);
    }

    pub fn subfields(&self) -> &[Subfield] {
        &self.subfields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subfield> {
        self.subfields.iter()
    }

    pub fn len(&self) -> usize {
        self.subfields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subfields.is_empty()
    }

    /// First subfield with the given mnemonic, scanning in order.
    pub fn subfield(&self, mnemonic: &str) -> Option<&Subfield> {
        self.subfields.iter().find(|sf| sf.mnemonic() == mnemonic)
    }
}

impl<'a> IntoIterator for &'a Field {
    type Item = &'a Subfield;
    type IntoIter = std::slice::Iter<'a, Subfield>;

    fn into_iter(self) -> Self::IntoIter {
        self.subfields.iter()
    }
}

/// An ordered sequence of fields making up one module record.
///
/// The first field is the module's primary field (mnemonic = module
/// tag) carrying the MODN and RCID subfields; everything after it is
/// secondary, foreign-identifier, or repeating-group fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Last field pushed; handy while assembling a record in place.
    pub fn last_mut(&mut self) -> Option<&mut Field> {
        self.fields.last_mut()
    }

    /// First field with the given mnemonic, scanning in order.
    pub fn field(&self, mnemonic: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.mnemonic() == mnemonic)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(mnemonic: &str, subfield_mnems: &[&str]) -> Field {
        let mut f = Field::new("", mnemonic);
        for m in subfield_mnems {
            f.push(Subfield::new("", *m));
        }
        f
    }

    #[test]
    fn test_subfield_lookup_is_first_match() {
        let mut f = Field::new("Line", "LINE");
        let mut a = Subfield::new("", "RCID");
        a.set_i(1);
        let mut b = Subfield::new("", "RCID");
        b.set_i(2);
        f.push(a);
        f.push(b);

        assert_eq!(f.subfield("RCID").unwrap().as_int(), Some(1));
        assert!(f.subfield("MODN").is_none());
    }

    #[test]
    fn test_field_lookup_preserves_order() {
        let mut r = Record::new();
        r.push(field_with("LINE", &["MODN", "RCID"]));
        r.push(field_with("ATID", &["MODN", "RCID"]));
        r.push(field_with("ATID", &["MODN", "RCID"]));
        r.push(field_with("SADR", &["X", "Y"]));

        assert_eq!(r.len(), 4);
        assert_eq!(r.field("SADR").unwrap().len(), 2);
        let mnems: Vec<_> = r.iter().map(|f| f.mnemonic().to_string()).collect();
        assert_eq!(mnems, ["LINE", "ATID", "ATID", "SADR"]);
    }
}
