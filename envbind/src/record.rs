//! Static field tables describing configuration records
//!
//! A [`Record`] exposes its fields by position: the static
//! [`FieldDescriptor`] table says what each field is annotated with, and the
//! accessor methods hand out the field itself for coercion, structured
//! decoding or recursion. `#[derive(EnvBind)]` generates all of it, but the
//! traits can also be implemented by hand.

use serde::de::DeserializeOwned;

/// Static description of one field of a configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared
    pub name: &'static str,
    /// Raw annotations as `(key, annotation)` pairs
    pub annotations: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    /// Describe a field.
    pub const fn new(name: &'static str, annotations: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, annotations }
    }

    /// Raw annotation attached under `key`, if any.
    pub fn annotation(&self, key: &str) -> Option<&'static str> {
        self.annotations
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

/// A configuration record whose fields can be walked by position.
///
/// Indices refer to positions in [`Record::fields`]. Accessors return `None`
/// for fields that do not support the requested use.
pub trait Record {
    /// Field table in declaration order.
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Field `index` for scalar coercion.
    fn target(&mut self, _index: usize) -> Option<&mut dyn crate::Target> {
        None
    }

    /// Field `index` for structured decoding.
    fn structured(&mut self, _index: usize) -> Option<&mut dyn Structured> {
        None
    }

    /// Field `index` as a nested record, allocating empty indirections.
    fn nested(&mut self, _index: usize) -> Option<&mut dyn Record> {
        None
    }
}

/// A field that can be replaced by decoding JSON.
pub trait Structured {
    /// Replace the value with `bytes` decoded as JSON.
    fn decode_json(&mut self, bytes: &[u8]) -> Result<(), serde_json::Error>;
}

impl<T: DeserializeOwned> Structured for T {
    fn decode_json(&mut self, bytes: &[u8]) -> Result<(), serde_json::Error> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// A field that holds a configuration record, directly or behind an indirection.
pub trait Nested {
    /// The held record, allocating it first if the indirection is empty.
    fn record_mut(&mut self) -> &mut dyn Record;
}

impl<R: Nested + Default> Nested for Option<R> {
    fn record_mut(&mut self) -> &mut dyn Record {
        self.get_or_insert_with(R::default).record_mut()
    }
}

impl<R: Nested + ?Sized> Nested for Box<R> {
    fn record_mut(&mut self) -> &mut dyn Record {
        (**self).record_mut()
    }
}

/// A field that may or may not hold a record (used by macro-generated code).
///
/// Method lookup on `&mut MaybeNested<T>` picks [`ViaNested`] when
/// `T: Nested` and falls back to [`ViaPlain`] otherwise, so a `json` field is
/// recursed into exactly when its type is a record.
#[doc(hidden)]
pub struct MaybeNested<'a, T>(Option<&'a mut T>);

impl<'a, T> MaybeNested<'a, T> {
    pub fn new(field: &'a mut T) -> Self {
        Self(Some(field))
    }
}

#[doc(hidden)]
pub trait ViaNested<'a> {
    fn nested_record(&mut self) -> Option<&'a mut dyn Record>;
}

impl<'a, T: Nested> ViaNested<'a> for MaybeNested<'a, T> {
    fn nested_record(&mut self) -> Option<&'a mut dyn Record> {
        self.0.take().map(|field| field.record_mut())
    }
}

#[doc(hidden)]
pub trait ViaPlain<'a> {
    fn nested_record(&mut self) -> Option<&'a mut dyn Record>;
}

impl<'a, T> ViaPlain<'a> for &mut MaybeNested<'a, T> {
    fn nested_record(&mut self) -> Option<&'a mut dyn Record> {
        None
    }
}
