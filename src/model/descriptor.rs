//! Type descriptors and payload shapes.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Whether a descriptor names a single record or a sequence of records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single record, carried on the wire as a JSON object.
    One,
    /// An ordered sequence of records, carried on the wire as a JSON array.
    Many,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "single record"),
            Self::Many => write!(f, "sequence of records"),
        }
    }
}

/// Identifies the record type `T` and whether one or many are expected.
///
/// Descriptors are zero-sized apart from their [`Shape`] and are freely
/// copyable.
///
/// # Example
///
/// ```rust
/// use botenix_client::model::{Shape, TypeDescriptor};
///
/// let many = TypeDescriptor::<serde_json::Value>::many();
/// assert_eq!(many.shape(), Shape::Many);
/// ```
pub struct TypeDescriptor<T> {
    shape: Shape,
    _record: PhantomData<fn() -> T>,
}

impl<T> TypeDescriptor<T> {
    /// A single `T`.
    #[must_use]
    pub const fn one() -> Self {
        Self::with_shape(Shape::One)
    }

    /// A sequence of `T`.
    #[must_use]
    pub const fn many() -> Self {
        Self::with_shape(Shape::Many)
    }

    /// A descriptor with an explicit shape.
    #[must_use]
    pub const fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            _record: PhantomData,
        }
    }

    /// Returns the expected shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the record type's name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

impl<T> Clone for TypeDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypeDescriptor<T> {}

impl<T> PartialEq for TypeDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}

impl<T> Eq for TypeDescriptor<T> {}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::One => write!(f, "TypeDescriptor<{}>", type_name::<T>()),
            Shape::Many => write!(f, "TypeDescriptor<Vec<{}>>", type_name::<T>()),
        }
    }
}

/// A borrowed typed payload: one record or a slice of records.
#[derive(Debug)]
pub enum Payload<'a, M> {
    /// A single record.
    One(&'a M),
    /// A sequence of records.
    Many(&'a [M]),
}

impl<M> Payload<'_, M> {
    /// Returns the shape of the value actually supplied.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::One(_) => Shape::One,
            Self::Many(_) => Shape::Many,
        }
    }
}

impl<M> Clone for Payload<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Payload<'_, M> {}

impl<'a, M> From<&'a M> for Payload<'a, M> {
    fn from(record: &'a M) -> Self {
        Self::One(record)
    }
}

impl<'a, M> From<&'a [M]> for Payload<'a, M> {
    fn from(records: &'a [M]) -> Self {
        Self::Many(records)
    }
}

impl<'a, M> From<&'a Vec<M>> for Payload<'a, M> {
    fn from(records: &'a Vec<M>) -> Self {
        Self::Many(records.as_slice())
    }
}
