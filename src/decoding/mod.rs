use std::path::Path;

use num_bigint::BigInt;
use num_traits::Num;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::recovery::{Point, PointSet};

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

const THRESHOLDS_FIELD: &str = "keys";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("value {value:?} is not a valid numeral in base {base}")]
    MalformedNumeral { value: String, base: u32 },
    #[error("base {0:?} is not supported, expected an integer between 2 and 36")]
    UnsupportedBase(String),
    #[error("point key {0:?} is not an integer abscissa")]
    InvalidAbscissa(String),
    #[error("point set record has no `keys` field")]
    MissingThresholds,
    #[error("invalid point set record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

// ##########################################################
// ##################### RECORD SHAPES ######################
// ##########################################################

/// Radix of a point record, either written as a string (`"16"`) or as a number (`16`)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Base {
    Number(u32),
    Text(String),
}

impl Base {
    pub fn radix(&self) -> Result<u32, DecodeError> {
        let radix = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| DecodeError::UnsupportedBase(s.clone()))?,
        };
        if !(MIN_BASE..=MAX_BASE).contains(&radix) {
            return Err(DecodeError::UnsupportedBase(radix.to_string()));
        }
        Ok(radix)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PointRecord {
    pub base: Base,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Thresholds {
    pub n: usize,
    pub k: usize,
}

// ##########################################################
// ######################## DECODING ########################
// ##########################################################

/// Interprets `value` as a numeral in the given base.
/// Digits above 9 are the letters `a` to `z`, case insensitive.
///
/// The whole trimmed value must be a valid numeral: a valid prefix followed by other
/// characters is rejected, e.g. `"4a"` in base 10 is an error rather than 4.
pub fn decode_value(base: u32, value: &str) -> Result<BigInt, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(base.to_string()));
    }
    BigInt::from_str_radix(value.trim(), base).map_err(|_| DecodeError::MalformedNumeral {
        value: value.to_string(),
        base,
    })
}

impl PointRecord {
    pub fn decode(&self) -> Result<BigInt, DecodeError> {
        decode_value(self.base.radix()?, &self.value)
    }
}

/// Parses a point set record of the form `{ "keys": { "n": .., "k": .. }, "<x>": { "base": .., "value": .. }, .. }`.
/// Points keep the order in which they appear in the document.
pub fn parse_point_set(json: &str) -> Result<PointSet, DecodeError> {
    let mut record: Map<String, Value> = serde_json::from_str(json)?;

    let thresholds: Thresholds = match record.shift_remove(THRESHOLDS_FIELD) {
        Some(v) => serde_json::from_value(v)?,
        None => return Err(DecodeError::MissingThresholds),
    };

    let mut points = Vec::with_capacity(record.len());
    for (key, value) in record {
        let x = key
            .trim()
            .parse::<i64>()
            .map_err(|_| DecodeError::InvalidAbscissa(key.clone()))?;
        let point_record: PointRecord = serde_json::from_value(value)?;
        points.push(Point::new(x, point_record.decode()?));
    }

    if points.len() != thresholds.n {
        warn!(
            "point set announces n = {} but contains {} points",
            thresholds.n,
            points.len()
        );
    }
    if thresholds.k > points.len() {
        warn!(
            "point set requires k = {} points but only {} are available",
            thresholds.k,
            points.len()
        );
    }

    Ok(PointSet::new(thresholds.n, thresholds.k, points))
}

pub fn read_point_set(path: impl AsRef<Path>) -> Result<PointSet, anyhow::Error> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read point set {}: {e}", path.display()))?;
    parse_point_set(&json)
        .map_err(|e| anyhow::anyhow!("Failed to decode point set {}: {e}", path.display()))
}

// ##########################################################
// ######################## ENCODING ########################
// ##########################################################

pub fn encode_value(y: &BigInt, base: u32) -> Result<String, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(base.to_string()));
    }
    Ok(y.to_str_radix(base))
}

/// Builds the record decoded by [`parse_point_set`], the i-th point being written in `bases[i]`.
/// Points without a matching base are written in base 10.
pub fn encode_point_set(point_set: &PointSet, bases: &[u32]) -> Result<Value, DecodeError> {
    let mut record = Map::new();
    record.insert(
        THRESHOLDS_FIELD.to_string(),
        serde_json::to_value(Thresholds {
            n: point_set.n,
            k: point_set.k,
        })?,
    );
    for (i, point) in point_set.points.iter().enumerate() {
        let base = bases.get(i).copied().unwrap_or(10);
        let point_record = PointRecord {
            base: Base::Text(base.to_string()),
            value: encode_value(&point.y, base)?,
        };
        record.insert(point.x.to_string(), serde_json::to_value(point_record)?);
    }
    Ok(Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_value_in_various_bases() {
        assert_eq!(decode_value(10, "4").unwrap(), BigInt::from(4));
        assert_eq!(decode_value(2, "111").unwrap(), BigInt::from(7));
        assert_eq!(decode_value(4, "213").unwrap(), BigInt::from(39));
        assert_eq!(decode_value(16, "3ff").unwrap(), BigInt::from(1023));
        assert_eq!(decode_value(16, "3FF").unwrap(), BigInt::from(1023));
        assert_eq!(decode_value(36, "z").unwrap(), BigInt::from(35));
        assert_eq!(decode_value(10, " 12 ").unwrap(), BigInt::from(12));
    }

    #[test]
    fn test_decode_value_beyond_machine_integers() {
        let value = decode_value(16, "ffffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(value, BigInt::from(u128::MAX));
        let value = decode_value(16, "100000000000000000000000000000000").unwrap();
        assert_eq!(value, BigInt::from(u128::MAX) + 1);
    }

    #[test]
    fn test_decode_value_rejects_malformed_numerals() {
        assert!(matches!(
            decode_value(2, "12"),
            Err(DecodeError::MalformedNumeral { base: 2, .. })
        ));
        assert!(matches!(
            decode_value(10, ""),
            Err(DecodeError::MalformedNumeral { .. })
        ));
        assert!(matches!(
            decode_value(16, "xyz"),
            Err(DecodeError::MalformedNumeral { .. })
        ));
    }

    #[test]
    fn test_decode_value_rejects_trailing_garbage() {
        assert!(matches!(
            decode_value(10, "4a"),
            Err(DecodeError::MalformedNumeral { base: 10, .. })
        ));
        assert!(matches!(
            decode_value(2, "101 1"),
            Err(DecodeError::MalformedNumeral { .. })
        ));
    }

    #[test]
    fn test_decode_value_rejects_unsupported_bases() {
        assert!(matches!(
            decode_value(1, "0"),
            Err(DecodeError::UnsupportedBase(_))
        ));
        assert!(matches!(
            decode_value(37, "0"),
            Err(DecodeError::UnsupportedBase(_))
        ));
    }

    #[test]
    fn test_base_accepts_text_and_numbers() {
        let record: PointRecord = serde_json::from_str(r#"{"base": "2", "value": "101"}"#).unwrap();
        assert_eq!(record.decode().unwrap(), BigInt::from(5));
        let record: PointRecord = serde_json::from_str(r#"{"base": 8, "value": "17"}"#).unwrap();
        assert_eq!(record.decode().unwrap(), BigInt::from(15));
        let record: PointRecord =
            serde_json::from_str(r#"{"base": "sixteen", "value": "17"}"#).unwrap();
        assert!(matches!(record.decode(), Err(DecodeError::UnsupportedBase(_))));
    }

    #[test]
    fn test_parse_point_set_keeps_encounter_order() {
        let json = r#"{
            "keys": { "n": 3, "k": 2 },
            "6": { "base": "4", "value": "213" },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "2", "value": "111" }
        }"#;
        let point_set = parse_point_set(json).unwrap();
        assert_eq!(point_set.n, 3);
        assert_eq!(point_set.k, 2);
        assert_eq!(
            point_set.points,
            vec![
                Point::new(6, BigInt::from(39)),
                Point::new(1, BigInt::from(4)),
                Point::new(2, BigInt::from(7)),
            ]
        );
    }

    #[test]
    fn test_parse_point_set_errors() {
        assert!(matches!(
            parse_point_set(r#"{ "1": { "base": "10", "value": "4" } }"#),
            Err(DecodeError::MissingThresholds)
        ));
        assert!(matches!(
            parse_point_set(r#"{ "keys": { "n": 1, "k": 1 }, "one": { "base": "10", "value": "4" } }"#),
            Err(DecodeError::InvalidAbscissa(_))
        ));
        assert!(matches!(
            parse_point_set(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10", "value": "4a" } }"#),
            Err(DecodeError::MalformedNumeral { .. })
        ));
        assert!(matches!(
            parse_point_set(r#"{ "keys": { "n": 1 }, "1": { "base": "10", "value": "4" } }"#),
            Err(DecodeError::InvalidRecord(_))
        ));
        assert!(matches!(
            parse_point_set("[1, 2, 3]"),
            Err(DecodeError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_parse_point_set_tolerates_count_mismatch() {
        let json = r#"{
            "keys": { "n": 5, "k": 3 },
            "1": { "base": "10", "value": "4" }
        }"#;
        let point_set = parse_point_set(json).unwrap();
        assert_eq!(point_set.n, 5);
        assert_eq!(point_set.points.len(), 1);
    }

    #[test]
    fn test_encoded_point_set_decodes_back() {
        let point_set = PointSet::new(
            3,
            2,
            vec![
                Point::new(3, BigInt::from(-250)),
                Point::new(1, BigInt::from(u128::MAX)),
                Point::new(2, BigInt::from(0)),
            ],
        );
        let record = encode_point_set(&point_set, &[2, 36]).unwrap();
        assert_eq!(record["1"]["base"], "36");
        assert_eq!(record["2"]["base"], "10");

        let decoded = parse_point_set(&record.to_string()).unwrap();
        assert_eq!(decoded.points, point_set.points);
        assert_eq!((decoded.n, decoded.k), (3, 2));
    }
}
