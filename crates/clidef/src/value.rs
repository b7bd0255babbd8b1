//! Data kinds and conversion of raw argument text into typed values.
//!
//! Every option and parameter carries a [`DataKind`]. The kind is fixed at
//! registration by the Rust type its binder accepts (see [`ValueType`]), so a
//! converted [`Value`] always fits the field it is bound to.

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use url::Url;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Uri,
    File,
    Directory,
}

impl DataKind {
    /// Name used in usage text, e.g. `<int>`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "string",
            Self::DateTime => "datetime",
            Self::Uri => "uri",
            Self::File => "file",
            Self::Directory => "directory",
        }
    }

    /// Boolean options take no value token.
    pub fn is_switch(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Convert `raw` into a value of this kind.
    pub fn parse(self, raw: &str) -> Result<Value, ConversionError> {
        let fail = || ConversionError {
            kind: self,
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();
        match self {
            Self::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(fail())
                }
            }
            Self::Int => trimmed.parse().map(Value::Int).map_err(|_| fail()),
            Self::Float => trimmed.parse().map(Value::Float).map_err(|_| fail()),
            Self::Text => Ok(Value::Text(raw.to_string())),
            Self::DateTime => parse_date_time(trimmed).map(Value::DateTime).ok_or_else(fail),
            // `Url` only accepts absolute URIs.
            Self::Uri => Url::parse(trimmed).map(Value::Uri).map_err(|_| fail()),
            Self::File | Self::Directory if raw.is_empty() => Err(fail()),
            Self::File => Ok(Value::File(PathBuf::from(raw))),
            Self::Directory => Ok(Value::Directory(PathBuf::from(raw))),
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert \"{raw}\" to {kind}")]
pub struct ConversionError {
    pub kind: DataKind,
    pub raw: String,
}

/// A converted argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Uri(Url),
    File(PathBuf),
    Directory(PathBuf),
}

impl Value {
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Bool(_) => DataKind::Bool,
            Self::Int(_) => DataKind::Int,
            Self::Float(_) => DataKind::Float,
            Self::Text(_) => DataKind::Text,
            Self::DateTime(_) => DataKind::DateTime,
            Self::Uri(_) => DataKind::Uri,
            Self::File(_) => DataKind::File,
            Self::Directory(_) => DataKind::Directory,
        }
    }

    /// Rendering used inside usage text: text is quoted, everything else bare.
    pub fn literal(&self) -> String {
        match self {
            Self::Text(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::Uri(v) => f.write_str(v.as_str()),
            Self::File(v) | Self::Directory(v) => write!(f, "{}", v.display()),
        }
    }
}

/// A directory path. Distinguishes the directory kind from plain files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DirPath(pub PathBuf);

impl DirPath {
    pub fn into_inner(self) -> PathBuf {
        self.0
    }
}

impl Deref for DirPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for DirPath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&str> for DirPath {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// Rust types that options and parameters can bind to.
pub trait ValueType: Sized + Send + 'static {
    const KIND: DataKind;

    fn from_value(value: Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

macro_rules! value_type {
    ($ty:ty, $kind:ident) => {
        impl ValueType for $ty {
            const KIND: DataKind = DataKind::$kind;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v.into()),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$kind(self.into())
            }
        }
    };
}

value_type!(bool, Bool);
value_type!(i64, Int);
value_type!(f64, Float);
value_type!(String, Text);
value_type!(NaiveDateTime, DateTime);
value_type!(Url, Uri);
value_type!(PathBuf, File);

impl ValueType for DirPath {
    const KIND: DataKind = DataKind::Directory;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Directory(v) => Some(DirPath(v)),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Directory(self.0)
    }
}
