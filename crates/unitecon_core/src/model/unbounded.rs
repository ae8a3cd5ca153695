//! Serde helpers for floats that may legitimately be infinite.
//!
//! LTV, LTV:CAC and payback are `+inf` when a customer never churns, when
//! acquisition is free, or when contribution never turns positive. JSON has
//! no representation for these values and `serde_json` would silently emit
//! `null`, so non-finite values travel as string sentinels instead:
//!
//! | value        | wire form      |
//! |--------------|----------------|
//! | `+inf`       | `"Infinity"`   |
//! | `-inf`       | `"-Infinity"`  |
//! | `NaN`        | `"NaN"`        |
//! | finite `x`   | `x` (number)   |
//!
//! Use with `#[serde(with = "crate::model::unbounded")]`.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub const POSITIVE_INFINITY: &str = "Infinity";
pub const NEGATIVE_INFINITY: &str = "-Infinity";
pub const NOT_A_NUMBER: &str = "NaN";

/// The wire sentinel for a non-finite value, or `None` when finite
#[must_use]
pub fn sentinel(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NOT_A_NUMBER)
    } else if value == f64::INFINITY {
        Some(POSITIVE_INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(NEGATIVE_INFINITY)
    } else {
        None
    }
}

/// Parse a wire sentinel back into a float
#[must_use]
pub fn parse_sentinel(text: &str) -> Option<f64> {
    match text {
        POSITIVE_INFINITY | "inf" | "+inf" | "Inf" => Some(f64::INFINITY),
        NEGATIVE_INFINITY | "-inf" | "-Inf" => Some(f64::NEG_INFINITY),
        NOT_A_NUMBER | "nan" => Some(f64::NAN),
        _ => None,
    }
}

pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match sentinel(*value) {
        Some(marker) => serializer.serialize_str(marker),
        None => serializer.serialize_f64(*value),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(UnboundedVisitor)
}

struct UnboundedVisitor;

impl Visitor<'_> for UnboundedVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a number or one of \"{POSITIVE_INFINITY}\", \"{NEGATIVE_INFINITY}\", \"{NOT_A_NUMBER}\""
        )
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        parse_sentinel(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    // Plain serde_json output carries non-finite floats as null.
    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        value: f64,
    }

    fn round_trip(value: f64) -> (String, f64) {
        let json = serde_json::to_string(&Wrapper { value }).unwrap();
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        (json, back.value)
    }

    #[test]
    fn test_infinity_uses_string_sentinel() {
        let (json, back) = round_trip(f64::INFINITY);
        assert_eq!(json, r#"{"value":"Infinity"}"#);
        assert_eq!(back, f64::INFINITY);

        let (json, back) = round_trip(f64::NEG_INFINITY);
        assert_eq!(json, r#"{"value":"-Infinity"}"#);
        assert_eq!(back, f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_round_trips() {
        let (json, back) = round_trip(f64::NAN);
        assert_eq!(json, r#"{"value":"NaN"}"#);
        assert!(back.is_nan());
    }

    #[test]
    fn test_finite_values_stay_numeric() {
        let (json, back) = round_trip(1.0625);
        assert_eq!(json, r#"{"value":1.0625}"#);
        assert_eq!(back, 1.0625);
    }

    #[test]
    fn test_accepts_integers_and_rejects_garbage() {
        let parsed: Wrapper = serde_json::from_str(r#"{"value":42}"#).unwrap();
        assert_eq!(parsed.value, 42.0);

        assert!(serde_json::from_str::<Wrapper>(r#"{"value":"lots"}"#).is_err());
    }
}
