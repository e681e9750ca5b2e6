//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `ItemName` and
/// `Quantity` are the two value objects of the inventory domain: an item is
/// nothing more than a name bound to a quantity, and two names that compare
/// equal address the same stored record.
///
/// To "modify" a value object, construct a new one. Both implementations only
/// hand out validated values, so holding one is proof the input boundary was
/// crossed successfully.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

impl ValueObject for crate::ItemName {}
impl ValueObject for crate::Quantity {}
