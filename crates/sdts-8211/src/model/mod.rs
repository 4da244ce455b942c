//! The in-memory record tree and its leaf value types.
//!
//! A [`Record`] is an ordered list of [`Field`]s; a field is an ordered
//! list of [`Subfield`]s; a subfield is a run-time-typed value. Order
//! matters at each level: a field's position in the record is what
//! identifies repeating-group membership.

pub mod foreign_id;
pub mod record;
pub mod spatial;
pub mod subfield;

pub use foreign_id::{AttributeID, ForeignID, Usage};
pub use record::{Field, Record};
pub use spatial::SpatialAddress;
pub use subfield::{Subfield, SubfieldType, SubfieldValue};
