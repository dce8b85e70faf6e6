//! Error types for populating configuration records

use crate::value::Kind;
use std::fmt;

/// Boxed underlying cause carried by decode and parse failures.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Decoding stage that failed for a [`Error::DecodeFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// Binary-from-text decoding (standard base64 alphabet)
    Base64,
    /// Structured-text decoding (JSON)
    Json,
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => f.write_str("base64"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Errors that can occur while populating a configuration record.
///
/// Every error aborts the whole call. Fields that were populated before the
/// failing field keep their new values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value passed to `get` is not a configuration record.
    #[error("config must be pointer to struct but got {type_name}")]
    InvalidConfigType {
        /// Fully qualified type name of the rejected value
        type_name: String,
    },

    /// A field is annotated but the annotation has no name, e.g. `env = ""`.
    #[error("tagged field must be named but got [{tag}]")]
    MissingNameTag {
        /// The raw annotation
        tag: String,
    },

    /// An annotation carries a modifier outside `optional`, `base64`, `json`.
    #[error("tag [{tag}] contains unsupported option [{option}]")]
    InvalidTagOption {
        /// The raw annotation
        tag: String,
        /// The offending modifier
        option: String,
    },

    /// A required key is not present in the lookup source.
    #[error("var not found for key [{key}]")]
    VarNotFound {
        /// The key that was looked up
        key: String,
    },

    /// The value could not be decoded by the requested decoder.
    #[error("failed to decode var [{key}] with value [{value}] as [{decoder}]: {source}")]
    DecodeFailure {
        /// The key that was looked up
        key: String,
        /// The raw value returned by the lookup
        value: String,
        /// The decoder that failed
        decoder: Decoder,
        /// Underlying decoder error
        #[source]
        source: Cause,
    },

    /// The value could not be parsed into the field's kind.
    #[error("cannot parse env [{key}] with value [{value}] to kind [{kind}]: {source}")]
    CannotParseEnv {
        /// The field kind parsing was attempted for
        kind: Kind,
        /// The key that was looked up
        key: String,
        /// The value that failed to parse
        value: String,
        /// Underlying parser error
        #[source]
        source: Cause,
    },

    /// The parsed number does not fit the field's width, e.g. `"500"` into `i8`.
    #[error("overflow detected trying to set field of kind [{kind}] to value [{value}] for key [{key}]")]
    Overflow {
        /// The field kind
        kind: Kind,
        /// The key that was looked up
        key: String,
        /// The value that overflowed
        value: String,
    },

    /// The field's kind cannot be assigned from text.
    #[error("cannot set kind [{kind}]")]
    CannotSetKind {
        /// The unassignable kind
        kind: Kind,
    },

    /// A tagged structure contains tagged fields of its own.
    #[error("field [{field}] with key [{key}] contains one or more nested subfields")]
    NestedTags {
        /// Name of the structure-typed field
        field: String,
        /// The field's own key
        key: String,
    },
}

impl Error {
    pub(crate) fn decode_failure(
        source: impl Into<Cause>,
        key: &str,
        value: &str,
        decoder: Decoder,
    ) -> Self {
        Self::DecodeFailure {
            key: key.to_string(),
            value: value.to_string(),
            decoder,
            source: source.into(),
        }
    }

    pub(crate) fn cannot_parse(source: impl Into<Cause>, kind: Kind, key: &str, value: &str) -> Self {
        Self::CannotParseEnv {
            kind,
            key: key.to_string(),
            value: value.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn overflow(kind: Kind, key: &str, value: &str) -> Self {
        Self::Overflow {
            kind,
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a cannot-set-kind error (used by macro-generated code)
    #[doc(hidden)]
    pub fn cannot_set_kind(kind: Kind) -> Self {
        Self::CannotSetKind { kind }
    }
}
