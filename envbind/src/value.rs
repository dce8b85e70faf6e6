//! Scalar coercion from raw bytes into typed fields

use crate::error::Error;
use crate::record::Record;
use std::any::Any;
use std::fmt;
use std::str::ParseBoolError;

/// Semantic kind of a field, as reported in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bytes,
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    /// `Option<T>`: storage is allocated when a value is found
    Optional,
    /// A configuration record
    Struct,
    /// A type-erased value with no coercion path
    Any,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Optional => "optional",
            Self::Struct => "struct",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// A field that can be assigned from a raw value.
///
/// Implemented for the closed set of scalar kinds, for `Option<T>` of those,
/// and by `#[derive(EnvBind)]` for configuration records (which reject
/// assignment but are valid arguments to [`crate::Parser::get`]).
pub trait Target {
    /// Semantic kind of this field
    fn kind(&self) -> Kind;

    /// Replace the value with `raw` coerced into this field's kind.
    ///
    /// `key` is the looked-up name, used for error reporting.
    fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error>;

    /// View this value as a configuration record, if it is one.
    fn as_record(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

impl Target for Vec<u8> {
    fn kind(&self) -> Kind {
        Kind::Bytes
    }

    fn coerce(&mut self, _key: &str, raw: &[u8]) -> Result<(), Error> {
        *self = raw.to_vec();
        Ok(())
    }
}

impl Target for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn coerce(&mut self, _key: &str, raw: &[u8]) -> Result<(), Error> {
        *self = String::from_utf8_lossy(raw).into_owned();
        Ok(())
    }
}

/// Interpret `raw` as UTF-8 text for numeric and boolean parsing.
fn text<'a>(kind: Kind, key: &str, raw: &'a [u8]) -> Result<&'a str, Error> {
    std::str::from_utf8(raw)
        .map_err(|e| Error::cannot_parse(e, kind, key, &String::from_utf8_lossy(raw)))
}

macro_rules! integer_target {
    ($wide:ty => $($ty:ty: $kind:ident),* $(,)?) => {$(
        impl Target for $ty {
            fn kind(&self) -> Kind {
                Kind::$kind
            }

            fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error> {
                let value = text(Kind::$kind, key, raw)?;
                let parsed = value
                    .parse::<$wide>()
                    .map_err(|e| Error::cannot_parse(e, Kind::$kind, key, value))?;
                *self = <$ty>::try_from(parsed)
                    .map_err(|_| Error::overflow(Kind::$kind, key, value))?;
                Ok(())
            }
        }
    )*};
}

integer_target!(i64 => i8: I8, i16: I16, i32: I32, i64: I64, isize: Isize);
integer_target!(u64 => u8: U8, u16: U16, u32: U32, u64: U64, usize: Usize);

/// Decimal text beyond the range of `f64`.
#[derive(Debug, thiserror::Error)]
#[error("value out of range")]
struct OutOfRange;

/// Parse `value` as `f64`, rejecting text that only fits as an infinity.
fn parse_float(kind: Kind, key: &str, value: &str) -> Result<f64, Error> {
    let parsed = value
        .parse::<f64>()
        .map_err(|e| Error::cannot_parse(e, kind, key, value))?;
    if parsed.is_infinite() && !is_infinity_literal(value) {
        return Err(Error::cannot_parse(OutOfRange, kind, key, value));
    }
    Ok(parsed)
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl Target for f32 {
    fn kind(&self) -> Kind {
        Kind::F32
    }

    fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error> {
        let value = text(Kind::F32, key, raw)?;
        let parsed = parse_float(Kind::F32, key, value)?;
        // Infinities and NaN are representable, only finite magnitudes can overflow.
        if parsed.is_finite() && parsed.abs() > f64::from(f32::MAX) {
            return Err(Error::overflow(Kind::F32, key, value));
        }
        *self = parsed as f32;
        Ok(())
    }
}

impl Target for f64 {
    fn kind(&self) -> Kind {
        Kind::F64
    }

    fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error> {
        let value = text(Kind::F64, key, raw)?;
        *self = parse_float(Kind::F64, key, value)?;
        Ok(())
    }
}

/// Parse the accepted boolean spellings.
fn parse_bool(value: &str) -> Result<bool, ParseBoolError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "False" => Ok(false),
        other => other.parse(),
    }
}

impl Target for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error> {
        let value = text(Kind::Bool, key, raw)?;
        *self = parse_bool(value).map_err(|e| Error::cannot_parse(e, Kind::Bool, key, value))?;
        Ok(())
    }
}

/// Indirection: fresh storage is allocated, then the value is coerced into it.
impl<T: Target + Default> Target for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Optional
    }

    fn coerce(&mut self, key: &str, raw: &[u8]) -> Result<(), Error> {
        self.insert(T::default()).coerce(key, raw)
    }
}

impl Target for Box<dyn Any> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn coerce(&mut self, _key: &str, _raw: &[u8]) -> Result<(), Error> {
        Err(Error::cannot_set_kind(Kind::Any))
    }
}

impl Target for Box<dyn Any + Send + Sync> {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn coerce(&mut self, _key: &str, _raw: &[u8]) -> Result<(), Error> {
        Err(Error::cannot_set_kind(Kind::Any))
    }
}
