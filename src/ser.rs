//! `serde` support, so a parsed document can be handed to any serializer.
//! Spans are dropped, only the values are serialized.

use serde::{Serialize, Serializer};

use crate::value::{Number, SpannedValue, Value};

impl Serialize for SpannedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::PosInt(num) => serializer.serialize_u64(num),
            Self::NegInt(num) => serializer.serialize_i64(num),
            Self::Float(num) if num.is_finite() => serializer.serialize_f64(num),
            // Same as the writer
            Self::Float(_) => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(bool) => serializer.serialize_bool(*bool),
            Self::Number(num) => num.serialize(serializer),
            Self::String(str) => serializer.serialize_str(str),
            Self::Array(array) => serializer.collect_seq(array),
            Self::Object(obj) => serializer.collect_map(obj),
        }
    }
}
