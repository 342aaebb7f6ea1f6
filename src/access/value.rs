use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const SIGN_BIT: u64 = 1 << 63;

/// Data types a value or a function argument position can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Double,
    Varchar,
    Date,
}

impl DataType {
    /// SQL name used in diagnostics
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Int64 => "BIGINT",
            DataType::Double => "DOUBLE",
            DataType::Varchar => "VARCHAR",
            DataType::Date => "DATE",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Typed constant values flowing through the compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int64(i64),
    Double(f64),
    String(String),
    Date(NaiveDateTime),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Double(_) => Some(DataType::Double),
            Value::String(_) => Some(DataType::Varchar),
            Value::Date(_) => Some(DataType::Date),
        }
    }

    /// Check if this value is compatible with the given data type
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        match self.data_type() {
            None => true, // NULL is compatible with any type
            Some(actual) => actual == data_type,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL ordering between two values.
    ///
    /// Returns `None` when either side is NULL or the types are not comparable.
    /// Integers and doubles compare numerically. NaN equals NaN and sorts
    /// above every other number.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Double(a), Value::Double(b)) => Some(compare_doubles(*a, *b)),
            (Value::Int64(a), Value::Double(b)) => Some(compare_doubles(*a as f64, *b)),
            (Value::Double(a), Value::Int64(b)) => Some(compare_doubles(*a, *b as f64)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Order-preserving byte encoding used as the comparand of a native filter.
    ///
    /// For two non-null values of the same type, byte-wise comparison of the
    /// encodings agrees with [`Value::compare`].
    pub fn encode_key(&self) -> Bytes {
        let mut buf = Vec::with_capacity(8);
        match self {
            Value::Null => {}
            Value::Boolean(b) => buf.push(u8::from(*b)),
            Value::Int64(n) => push_u64(&mut buf, (*n as u64) ^ SIGN_BIT),
            Value::Double(d) => {
                // -0.0 and 0.0 compare equal, as do all NaN payloads
                let bits = if *d == 0.0 {
                    0.0f64.to_bits()
                } else if d.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    d.to_bits()
                };
                let ordered = if bits & SIGN_BIT != 0 {
                    !bits
                } else {
                    bits | SIGN_BIT
                };
                push_u64(&mut buf, ordered);
            }
            Value::String(s) => buf.extend_from_slice(s.as_bytes()),
            Value::Date(dt) => {
                // Seconds, then the fraction at full nanosecond precision
                let seconds = dt.and_utc().timestamp();
                push_u64(&mut buf, (seconds as u64) ^ SIGN_BIT);
                let mut nanos = [0u8; 4];
                BigEndian::write_u32(&mut nanos, dt.nanosecond());
                buf.extend_from_slice(&nanos);
            }
        }
        Bytes::from(buf)
    }
}

fn compare_doubles(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn push_u64(buf: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; 8];
    BigEndian::write_u64(&mut word, value);
    buf.extend_from_slice(&word);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(dt) => write!(f, "DATE '{}'", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}
