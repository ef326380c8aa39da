//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// with the same values are the same value. To "modify" one, build a new one.
///
/// Contrast with [`crate::Entity`], where identity persists across state
/// changes (two entities with the same id are the same entity).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
