//! Lenient numeric deserialization.
//!
//! Records written by the browser sheet store numbers the way form inputs
//! produced them: integers, floats, numeric strings, empty strings or nothing
//! at all. These helpers coerce all of those to integers using leading-integer
//! parsing; anything unparseable becomes the field's fallback value.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};

/// Parse the leading integer of a string (`"12abc"` -> 12, `" -3"` -> -3).
///
/// Returns `None` when no digits lead the string.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate rather than fail on absurdly long digit runs.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

struct LenientIntVisitor;

impl<'de> Visitor<'de> for LenientIntVisitor {
    type Value = Option<i64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, or nothing")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(Some(v.trunc() as i64))
        } else {
            Ok(None)
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(i64::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(parse_leading_int(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientIntVisitor)
    }
}

fn lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    d.deserialize_any(LenientIntVisitor)
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// `i32` field; unparseable values become 0.
pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(lenient(d)?.map(saturate_i32).unwrap_or(0))
}

/// `i64` field; unparseable values become 0.
pub fn long<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(lenient(d)?.unwrap_or(0))
}

/// Non-negative `u32` field; negative or unparseable values become 0.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(lenient(d)?
        .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0))
}

/// Character level; unparseable values become 1, others are clamped to 1..=20.
pub fn level<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(lenient(d)?.map(|v| v.clamp(1, 20) as u8).unwrap_or(1))
}

/// Free number (carried weight); accepts floats and numeric strings.
pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string, or nothing")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(if v.is_finite() { v } else { 0.0 })
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<f64, E> {
            Ok(if v { 1.0 } else { 0.0 })
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
            d.deserialize_any(NumberVisitor)
        }
    }

    d.deserialize_any(NumberVisitor)
}

/// Free text that older records sometimes stored as a number or null.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
            d.deserialize_any(TextVisitor)
        }
    }

    d.deserialize_any(TextVisitor)
}

/// Truthy flag; accepts booleans, 0/1 and null.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            Ok(v != 0.0 && !v.is_nan())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(!v.is_empty())
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<bool, D::Error> {
            d.deserialize_any(FlagVisitor)
        }
    }

    d.deserialize_any(FlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "int")]
        score: i32,
        #[serde(default = "one", deserialize_with = "level")]
        level: u8,
        #[serde(default, deserialize_with = "count")]
        xp: u32,
        #[serde(default, deserialize_with = "number")]
        weight: f64,
        #[serde(default, deserialize_with = "flag")]
        inspired: bool,
        #[serde(default, deserialize_with = "text")]
        stealth: String,
    }

    fn one() -> u8 {
        1
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).expect("probe should deserialize")
    }

    #[test]
    fn leading_int_parsing() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("12.9"), Some(12));
        assert_eq!(parse_leading_int(" -3x"), Some(-3));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn numbers_and_strings_coerce() {
        let p = probe(r#"{"score":"16","level":"5","xp":"300","weight":"12.5","inspired":1}"#);
        assert_eq!(p.score, 16);
        assert_eq!(p.level, 5);
        assert_eq!(p.xp, 300);
        assert_eq!(p.weight, 12.5);
        assert!(p.inspired);
    }

    #[test]
    fn empty_or_missing_values_fall_back() {
        let p = probe(r#"{"score":"","level":"","xp":null,"weight":"","stealth":null}"#);
        assert_eq!(p.score, 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp, 0);
        assert_eq!(p.weight, 0.0);
        assert_eq!(p.stealth, "");

        let p = probe("{}");
        assert_eq!(p.level, 1);
        assert!(!p.inspired);
    }

    #[test]
    fn floats_truncate_and_ranges_clamp() {
        let p = probe(r#"{"score":12.7,"level":42,"xp":-50,"stealth":14}"#);
        assert_eq!(p.score, 12);
        assert_eq!(p.level, 20);
        assert_eq!(p.xp, 0);
        assert_eq!(p.stealth, "14");

        let p = probe(r#"{"level":0}"#);
        assert_eq!(p.level, 1);
    }
}
