//! Bare JSON numerals wider than 64 bits.
//!
//! With `serde_json/arbitrary_precision` enabled, serde_json hands every
//! number to `deserialize_any` as a single-entry map keyed by a private token,
//! whose value is the numeral's original text. Reading that text and parsing
//! it ourselves keeps the full 128-bit range instead of going through `f64`.

use core::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};

const TOKEN: &str = "$serde_json::private::Number";

/// Reads the numeral out of serde_json's number map and hands its text to
/// `visitor.visit_str`.
pub(crate) fn visit_number_map<'de, A, V>(mut map: A, visitor: V) -> Result<V::Value, A::Error>
where
    A: MapAccess<'de>,
    V: Visitor<'de>,
{
    if map.next_key_seed(NumberKey)?.is_none() {
        return Err(de::Error::invalid_type(de::Unexpected::Map, &visitor));
    }
    map.next_value_seed(Numeral(visitor))
}

struct NumberKey;

impl<'de> DeserializeSeed<'de> for NumberKey {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_identifier(self)
    }
}

impl<'de> Visitor<'de> for NumberKey {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON number")
    }

    fn visit_str<E>(self, v: &str) -> Result<(), E>
    where
        E: de::Error,
    {
        if v == TOKEN {
            Ok(())
        } else {
            Err(de::Error::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

struct Numeral<V>(V);

impl<'de, V> DeserializeSeed<'de> for Numeral<V>
where
    V: Visitor<'de>,
{
    type Value = V::Value;

    fn deserialize<D>(self, deserializer: D) -> Result<V::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self.0)
    }
}
