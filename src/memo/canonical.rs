//! Canonical Argument Encoding
//!
//! Turns serializable arguments into the byte form hashed into a
//! [`MemoKey`](crate::memo::MemoKey).
//!
//! The encoding is JSON built from `serde_json::Value`, which sorts object
//! members. JSON cannot tell some distinct values apart: non-finite floats
//! become `null`, and so does `Some(None)` next to `None`. Arguments are
//! walked first and such values are rejected instead of colliding.

use serde::ser::{self, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::{MemoError, Result};

/// Encodes `value` canonically, rejecting values without a unique encoding.
pub(crate) fn canonical_json<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    value.serialize(KeyValidator::default())?;

    let mut value = serde_json::to_value(value)?;
    normalize_zeros(&mut value);
    Ok(serde_json::to_vec(&value)?)
}

/// `-0.0 == 0.0`, so both must hash the same.
fn normalize_zeros(value: &mut Value) {
    match value {
        Value::Number(number) => {
            if number.is_f64() && number.as_f64() == Some(0.0) {
                if let Some(zero) = Number::from_f64(0.0) {
                    *number = zero;
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_zeros),
        Value::Object(members) => members.values_mut().for_each(normalize_zeros),
        _ => {}
    }
}

// == Key Validator ==
/// Serializer that produces nothing and fails on values JSON would merge.
///
/// `inside_some` is set while serializing the payload of a `Some`, where a
/// payload that encodes as `null` would look like `None`.
#[derive(Debug, Clone, Copy, Default)]
struct KeyValidator {
    inside_some: bool,
}

type Check = std::result::Result<(), MemoError>;

impl KeyValidator {
    fn null_like(self, what: &str) -> Check {
        if self.inside_some {
            return Err(MemoError::KeySerialization(format!(
                "Some({}) encodes like None",
                what
            )));
        }
        Ok(())
    }
}

fn finite(value: f64) -> Check {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MemoError::KeySerialization(format!(
            "non-finite float {} has no canonical encoding",
            value
        )))
    }
}

impl Serializer for KeyValidator {
    type Ok = ();
    type Error = MemoError;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_bool(self, _: bool) -> Check {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Check {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Check {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Check {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Check {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Check {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Check {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Check {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Check {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Check {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Check {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Check {
        finite(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Check {
        finite(v)
    }

    fn serialize_char(self, _: char) -> Check {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Check {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Check {
        Ok(())
    }

    fn serialize_none(self) -> Check {
        self.null_like("None")
    }

    fn serialize_some<T>(self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator { inside_some: true })
    }

    fn serialize_unit(self) -> Check {
        self.null_like("()")
    }

    fn serialize_unit_struct(self, name: &'static str) -> Check {
        self.null_like(name)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Check {
        Ok(())
    }

    // Newtype structs encode as their content, so `inside_some` carries over.
    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Compound, MemoError> {
        Ok(Compound)
    }
}

/// Checks each member of a compound value on its own.
struct Compound;

impl ser::SerializeSeq for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_element<T>(&mut self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_element<T>(&mut self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_field<T>(&mut self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_field<T>(&mut self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeMap for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_key<T>(&mut self, key: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        key.serialize(KeyValidator::default())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for Compound {
    type Ok = ();
    type Error = MemoError;

    fn serialize_field<T>(&mut self, _: &'static str, value: &T) -> Check
    where
        T: Serialize + ?Sized,
    {
        value.serialize(KeyValidator::default())
    }

    fn end(self) -> Check {
        Ok(())
    }
}
