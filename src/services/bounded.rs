//! Depth-limited serialization
//!
//! `Bounded` wraps any `Serialize` value and counts nesting while the
//! value is being serialized. A sequence, map, struct or enum payload that
//! would open below the limit is written as the truncation marker instead,
//! so self-referential graphs terminate instead of recursing forever.

use serde::ser::{self, Serialize, Serializer};

use super::sanitize::TRUNCATED;

/// A value serialized with at most `remaining` further levels of nesting
pub struct Bounded<'a, T: ?Sized> {
    value: &'a T,
    remaining: usize,
}

impl<'a, T: ?Sized> Bounded<'a, T> {
    /// Wrap `value`, allowing `remaining` levels of nesting below it
    pub const fn new(value: &'a T, remaining: usize) -> Self {
        Self { value, remaining }
    }
}

impl<T: Serialize + ?Sized> Serialize for Bounded<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(DepthLimited {
            inner: serializer,
            remaining: self.remaining,
        })
    }
}

/// Forwards to `inner`, cutting off compound values once `remaining` is 0
struct DepthLimited<S> {
    inner: S,
    remaining: usize,
}

/// An open compound whose children are bounded, or the marker already written
enum Compound<C, O> {
    Open { inner: C, remaining: usize },
    Truncated(O),
}

impl<S: Serializer> DepthLimited<S> {
    fn open<C>(
        self,
        start: impl FnOnce(S) -> Result<C, S::Error>,
    ) -> Result<Compound<C, S::Ok>, S::Error> {
        if self.remaining == 0 {
            return self.inner.serialize_str(TRUNCATED).map(Compound::Truncated);
        }
        Ok(Compound::Open {
            inner: start(self.inner)?,
            remaining: self.remaining - 1,
        })
    }
}

impl<S: Serializer> Serializer for DepthLimited<S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Compound<S::SerializeSeq, S::Ok>;
    type SerializeTuple = Compound<S::SerializeTuple, S::Ok>;
    type SerializeTupleStruct = Compound<S::SerializeTupleStruct, S::Ok>;
    type SerializeTupleVariant = Compound<S::SerializeTupleVariant, S::Ok>;
    type SerializeMap = Compound<S::SerializeMap, S::Ok>;
    type SerializeStruct = Compound<S::SerializeStruct, S::Ok>;
    type SerializeStructVariant = Compound<S::SerializeStructVariant, S::Ok>;

    fn serialize_bool(self, v: bool) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i64(v)
    }

    fn serialize_i128(self, v: i128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i128(v)
    }

    fn serialize_u8(self, v: u8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u64(v)
    }

    fn serialize_u128(self, v: u128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u128(v)
    }

    fn serialize_f32(self, v: f32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<S::Ok, S::Error> {
        self.inner.serialize_char(v)
    }

    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bytes(v)
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<S::Ok, S::Error> {
        // Option adds no nesting
        self.inner.serialize_some(&Bounded::new(value, self.remaining))
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.inner
            .serialize_newtype_struct(name, &Bounded::new(value, self.remaining))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        // Written as `{ variant: value }`, one level deeper
        if self.remaining == 0 {
            return self.inner.serialize_str(TRUNCATED);
        }
        self.inner.serialize_newtype_variant(
            name,
            variant_index,
            variant,
            &Bounded::new(value, self.remaining - 1),
        )
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        self.open(|s| s.serialize_seq(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        self.open(|s| s.serialize_tuple(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        self.open(|s| s.serialize_tuple_struct(name, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        self.open(|s| s.serialize_tuple_variant(name, variant_index, variant, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        self.open(|s| s.serialize_map(len))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        self.open(|s| s.serialize_struct(name, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        self.open(|s| s.serialize_struct_variant(name, variant_index, variant, len))
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

impl<C: ser::SerializeSeq> ser::SerializeSeq for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_element(&Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeTuple> ser::SerializeTuple for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_element(&Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeTupleStruct> ser::SerializeTupleStruct for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_field(&Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeTupleVariant> ser::SerializeTupleVariant for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_field(&Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeMap> ser::SerializeMap for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, .. } => inner.serialize_key(key),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_value(&Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeStruct> ser::SerializeStruct for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_field(key, &Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, .. } => inner.skip_field(key),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}

impl<C: ser::SerializeStructVariant> ser::SerializeStructVariant for Compound<C, C::Ok> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, remaining } => inner.serialize_field(key, &Bounded::new(value, *remaining)),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        match self {
            Self::Open { inner, .. } => inner.skip_field(key),
            Self::Truncated(_) => Ok(()),
        }
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        match self {
            Self::Open { inner, .. } => inner.end(),
            Self::Truncated(ok) => Ok(ok),
        }
    }
}
