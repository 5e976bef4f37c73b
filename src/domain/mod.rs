pub mod availability;
pub mod fields;
pub mod property;

pub use fields::{CanonicalField, FieldKind};
pub use property::{FieldValue, PropertyRecord};
