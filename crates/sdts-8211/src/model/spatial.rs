//! Spatial address pairs.

use crate::error::IngestError;
use crate::model::subfield::Subfield;

/// One X/Y coordinate pair as carried by a spatial-address field
/// (SADR in geometry modules, DMSA in the spatial-domain module).
///
/// The raw subfields are kept rather than bare doubles so that the
/// declared coordinate type (binary or character) survives a round
/// trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpatialAddress {
    x: Subfield,
    y: Subfield,
}

impl SpatialAddress {
    pub fn new(x: Subfield, y: Subfield) -> Self {
        SpatialAddress { x, y }
    }

    /// Builds a pair of real-typed coordinates labelled "X" and "Y".
    pub fn from_xy(x: f64, y: f64) -> Self {
        let mut sx = Subfield::new("X", "X");
        sx.set_r(x);
        let mut sy = Subfield::new("Y", "Y");
        sy.set_r(y);
        SpatialAddress { x: sx, y: sy }
    }

    /// Reads a pair out of a spatial-address field by subfield
    /// mnemonic. Any subfield that is neither X nor Y makes the whole
    /// field invalid.
    pub fn from_field_subfields<'a>(
        mnemonic: &str,
        subfields: impl Iterator<Item = &'a Subfield>,
    ) -> Result<Self, IngestError> {
        let mut x = None;
        let mut y = None;
        for subfield in subfields {
            match subfield.mnemonic() {
                "X" => x = Some(subfield.clone()),
                "Y" => y = Some(subfield.clone()),
                other => {
                    return Err(IngestError::InvalidSpatialGroup {
                        mnemonic: mnemonic.to_string(),
                        found: other.to_string(),
                    });
                }
            }
        }
        match (x, y) {
            (Some(x), Some(y)) => Ok(SpatialAddress { x, y }),
            (x, _) => Err(IngestError::InvalidSpatialGroup {
                mnemonic: mnemonic.to_string(),
                found: if x.is_none() { "missing X" } else { "missing Y" }.to_string(),
            }),
        }
    }

    pub fn x(&self) -> &Subfield {
        &self.x
    }

    pub fn y(&self) -> &Subfield {
        &self.y
    }

    pub fn x_mut(&mut self) -> &mut Subfield {
        &mut self.x
    }

    pub fn y_mut(&mut self) -> &mut Subfield {
        &mut self.y
    }

    /// The pair as doubles, when both coordinates hold numeric values.
    pub fn xy(&self) -> Option<(f64, f64)> {
        Some((self.x.as_double()?, self.y.as_double()?))
    }
}
