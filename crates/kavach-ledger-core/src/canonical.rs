//! Canonical JSON encoding for deterministic payload hashing.
//!
//! The encoding rules:
//! - Map keys sorted by Unicode code point (identical to UTF-8 byte order)
//! - Compact separators (`,` and `:`), no whitespace
//! - ASCII-only output: non-ASCII and control characters are `\uXXXX`
//!   escaped, astral characters as UTF-16 surrogate pairs
//! - Integers in minimal decimal form
//! - Floats in shortest round-trip form: fixed notation for decimal
//!   exponents in `[-4, 16)`, scientific (`1e+16`, `1.5e-07`) otherwise
//! - Non-finite floats are rejected
//!
//! These rules reproduce a `sort_keys`, compact-separator JSON dump, so
//! digests produced here match any implementation that follows them.
//!
//! **This encoding is FROZEN.** Any change alters every payload hash and
//! invalidates every existing chain.

use std::fmt::Write;

use crate::error::{LedgerError, Result};
use crate::value::{Payload, Value};

/// Encode a payload to its canonical bytes.
pub fn canonical_payload_bytes(payload: &Payload) -> Result<Vec<u8>> {
    let mut buf = String::new();
    encode_map(&mut buf, payload, &mut Path::root())?;
    Ok(buf.into_bytes())
}

/// Encode any value to its canonical bytes.
pub fn canonical_value_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut buf = String::new();
    encode_value(&mut buf, value, &mut Path::root())?;
    Ok(buf.into_bytes())
}

/// Location of the value being encoded, for error reporting.
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut out = String::from("root");
        for seg in &self.segments {
            out.push_str(seg);
        }
        out
    }
}

fn encode_value(buf: &mut String, value: &Value, path: &mut Path) -> Result<()> {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Bool(true) => buf.push_str("true"),
        Value::Bool(false) => buf.push_str("false"),
        Value::Integer(i) => {
            let _ = write!(buf, "{i}");
        }
        Value::Float(f) => encode_float(buf, *f, path)?,
        Value::String(s) => encode_text(buf, s),
        Value::Array(items) => {
            buf.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    buf.push(',');
                }
                path.segments.push(format!("[{idx}]"));
                encode_value(buf, item, path)?;
                path.segments.pop();
            }
            buf.push(']');
        }
        Value::Map(map) => encode_map(buf, map, path)?,
    }
    Ok(())
}

/// Encode a map. `BTreeMap` iterates in key byte order, which is the
/// canonical order.
fn encode_map(
    buf: &mut String,
    map: &std::collections::BTreeMap<String, Value>,
    path: &mut Path,
) -> Result<()> {
    buf.push('{');
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            buf.push(',');
        }
        encode_text(buf, key);
        buf.push(':');
        path.segments.push(format!(".{key}"));
        encode_value(buf, value, path)?;
        path.segments.pop();
    }
    buf.push('}');
    Ok(())
}

/// Encode a string literal with ASCII-only escaping.
fn encode_text(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            ' '..='~' => buf.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(buf, "\\u{unit:04x}");
                }
            }
        }
    }
    buf.push('"');
}

/// Encode a float in its single canonical form.
///
/// `{:e}` yields the shortest digit string that round-trips. When two such
/// strings are equally close to the exact value, the one ending in an even
/// digit is used (see [`even_on_tie`]). Only the placement of the decimal
/// point is decided here.
fn encode_float(buf: &mut String, f: f64, path: &Path) -> Result<()> {
    if !f.is_finite() {
        return Err(LedgerError::invalid_payload(
            path.render(),
            format!("non-finite float {f}"),
        ));
    }

    let sci = format!("{f:e}");
    let (mantissa, exp) = sci
        .split_once('e')
        .ok_or_else(|| LedgerError::invalid_payload(path.render(), "unformattable float"))?;
    let exp: i32 = exp
        .parse()
        .map_err(|_| LedgerError::invalid_payload(path.render(), "unformattable float"))?;

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let digits = even_on_tie(digits, exp, f.abs());

    if negative {
        buf.push('-');
    }

    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                buf.push_str(&digits);
                buf.extend(std::iter::repeat('0').take(int_len - digits.len()));
                buf.push_str(".0");
            } else {
                buf.push_str(&digits[..int_len]);
                buf.push('.');
                buf.push_str(&digits[int_len..]);
            }
        } else {
            buf.push_str("0.");
            buf.extend(std::iter::repeat('0').take((-exp - 1) as usize));
            buf.push_str(&digits);
        }
    } else {
        buf.push_str(&digits[..1]);
        if digits.len() > 1 {
            buf.push('.');
            buf.push_str(&digits[1..]);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(buf, "e{sign}{:02}", exp.unsigned_abs());
    }
    Ok(())
}

/// Resolve an exact tie between two shortest digit strings toward the even
/// last digit.
///
/// A tie exists only when the exact decimal expansion of `abs` is the
/// shortest digits with one extra trailing `5`. The alternative must itself
/// round-trip to `abs`, otherwise `digits` is kept.
fn even_on_tie(digits: String, exp: i32, abs: f64) -> String {
    let n = digits.len();
    let last = match digits.as_bytes().last() {
        Some(b) => b - b'0',
        None => return digits,
    };
    if last % 2 == 0 {
        return digits;
    }

    // 767 fractional digits hold the exact expansion of any f64.
    let exact = format!("{abs:.767e}");
    let Some((mantissa, exact_exp)) = exact.split_once('e') else {
        return digits;
    };
    if exact_exp.parse::<i32>() != Ok(exp) {
        return digits;
    }
    let exact_digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exact_digits = exact_digits.trim_end_matches('0');
    if exact_digits.len() != n + 1 || !exact_digits.ends_with('5') {
        return digits;
    }

    let lower = &exact_digits[..n];
    let candidate = if lower == digits {
        if last == 9 {
            return digits;
        }
        let mut upper = lower[..n - 1].to_string();
        upper.push(char::from(b'0' + last + 1));
        upper
    } else {
        lower.to_string()
    };
    if candidate.ends_with('0') {
        return digits;
    }

    let scale = exp - (n as i32 - 1);
    match format!("{candidate}e{scale}").parse::<f64>() {
        Ok(back) if back == abs => candidate,
        _ => digits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;
    use std::collections::BTreeMap;

    fn float_text(f: f64) -> String {
        String::from_utf8(canonical_value_bytes(&Value::Float(f)).unwrap()).unwrap()
    }

    #[test]
    fn test_keys_sorted_and_compact() {
        let mut inner = BTreeMap::new();
        inner.insert("z".to_string(), Value::from("\n\t\"\\\u{01}\u{7f}"));
        let p = payload! {
            "b" => 1,
            "a" => vec![Value::Integer(1), Value::Map(inner)],
        };
        let bytes = canonical_payload_bytes(&p).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":[1,{"z":"\n\t\"\\\u0001\u007f"}],"b":1}"#
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let forward = payload! { "timestamp" => "T1", "alpha" => 1, "omega" => 2 };
        let mut reversed = Payload::new();
        reversed.insert("omega".into(), Value::Integer(2));
        reversed.insert("alpha".into(), Value::Integer(1));
        reversed.insert("timestamp".into(), Value::from("T1"));
        assert_eq!(
            canonical_payload_bytes(&forward).unwrap(),
            canonical_payload_bytes(&reversed).unwrap()
        );
    }

    #[test]
    fn test_non_ascii_escaped() {
        let bytes = canonical_value_bytes(&Value::from("\u{0394}-ops \u{1F681}")).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#""\u0394-ops \ud83d\ude81""#
        );
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(float_text(1e16), "1e+16");
        assert_eq!(float_text(1.5e-7), "1.5e-07");
        assert_eq!(float_text(0.0001), "0.0001");
        assert_eq!(float_text(1e-5), "1e-05");
        assert_eq!(float_text(100.0), "100.0");
        assert_eq!(float_text(-0.0), "-0.0");
        assert_eq!(float_text(0.0), "0.0");
        assert_eq!(float_text(1e15), "1000000000000000.0");
        assert_eq!(float_text(123456789012345.6), "123456789012345.6");
        assert_eq!(float_text(2.5), "2.5");
        assert_eq!(float_text(0.1), "0.1");
        assert_eq!(float_text(-28.5), "-28.5");
        assert_eq!(float_text(5e-324), "5e-324");
        assert_eq!(float_text(f64::MAX), "1.7976931348623157e+308");
    }

    #[test]
    fn test_float_tie_prefers_even_digit() {
        let tie = f64::from_bits(4831830707201211250);
        assert_eq!(tie, 1059438285926254.25);
        assert_eq!(float_text(tie), "1059438285926254.2");
        assert_eq!(float_text(-tie), "-1059438285926254.2");
        assert_eq!("1059438285926254.2".parse::<f64>().unwrap(), tie);
    }

    #[test]
    fn test_integer_and_float_distinct() {
        assert_ne!(
            canonical_value_bytes(&Value::Integer(1)).unwrap(),
            canonical_value_bytes(&Value::Float(1.0)).unwrap()
        );
    }

    #[test]
    fn test_non_finite_rejected_with_path() {
        let p = payload! {
            "timestamp" => "T1",
            "readings" => vec![Value::Float(1.0), Value::Float(f64::NAN)],
        };
        match canonical_payload_bytes(&p) {
            Err(LedgerError::InvalidPayload { path, .. }) => assert_eq!(path, "root.readings[1]"),
            other => panic!("expected InvalidPayload, got {other:?}"),
        }
        assert!(canonical_value_bytes(&Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(canonical_payload_bytes(&Payload::new()).unwrap(), b"{}");
    }
}
