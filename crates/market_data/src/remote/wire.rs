//! Numeric coercion for wire values that may arrive as JSON numbers or as
//! decimal strings. Unparsable input is an error, never a silent zero.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub fn parse_f64(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("number {n} is out of range"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{s}'"))?,
        other => return Err(format!("expected a number, got {other}")),
    };
    // NaN binds as NULL in SQLite and would be dropped by INSERT OR IGNORE.
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("non-finite number {value}"))
    }
}

pub fn parse_millis(value: &Value) -> Result<i64, String> {
    let integral = |f: f64| {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    };

    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .ok_or_else(|| format!("invalid timestamp {n}")),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| format!("invalid timestamp '{s}'"))
        }
        other => Err(format!("expected a timestamp, got {other}")),
    }
}

pub fn f64_from_wire<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_f64(&value).map_err(de::Error::custom)
}

pub fn millis_from_wire<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_millis(&value).map_err(de::Error::custom)
}
