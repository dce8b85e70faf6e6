//! Record traversal and field resolution

use crate::error::{Decoder, Error};
use crate::record::{FieldDescriptor, Record};
use crate::tag::{self, Tag};
use crate::value::{Kind, Target};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, trace};

/// Annotation key used by [`Parser::default`].
pub const DEFAULT_TAG: &str = "env";

/// Look `name` up in the process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
pub fn lookup_env(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Populates configuration records from a lookup function.
///
/// The lookup function maps a key to its value, or `None` when the key is
/// absent. Supplying your own makes the parser testable without touching the
/// process environment:
///
/// ```rust
/// use envbind::{EnvBind, Parser};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, EnvBind)]
/// struct Config {
///     #[bind(cfg = "LOG_LEVEL")]
///     pub log_level: u8,
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let vars = HashMap::from([("LOG_LEVEL", "3")]);
/// let parser = Parser::new("cfg", |name: &str| vars.get(name).map(|v| v.to_string()));
///
/// let config: Config = parser.load()?;
/// assert_eq!(config.log_level, 3);
/// # Ok(())
/// # }
/// ```
pub struct Parser<F = fn(&str) -> Option<String>> {
    tag: String,
    lookup: F,
}

impl Default for Parser {
    /// Parser reading `env` annotations from the process environment.
    fn default() -> Self {
        Self::new(DEFAULT_TAG, lookup_env)
    }
}

impl<F> fmt::Debug for Parser<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl<F> Parser<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Create a parser reading annotations under `tag` and values from `lookup`.
    pub fn new(tag: impl Into<String>, lookup: F) -> Self {
        Self {
            tag: tag.into(),
            lookup,
        }
    }

    /// Annotation key this parser reads.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Populate `config` in place.
    ///
    /// Fields are visited depth-first in declaration order. The first error
    /// aborts the call; fields populated before it keep their new values and
    /// fields never reached keep whatever the caller put there.
    ///
    /// # Errors
    ///
    /// - `config` is not a configuration record
    /// - An annotation is malformed
    /// - A required key is absent, or a value cannot be decoded or coerced
    /// - A tagged nested record has tagged fields of its own
    pub fn get<T: Target + ?Sized>(&self, config: &mut T) -> Result<(), Error> {
        let type_name = std::any::type_name::<T>();
        let Some(record) = config.as_record() else {
            return Err(Error::InvalidConfigType {
                type_name: type_name.to_string(),
            });
        };

        debug!(record = type_name, tag = %self.tag, "populating configuration");
        let mut tag_found = false;
        self.parse(record, &mut tag_found)
    }

    /// Populate a `T::default()` and return it.
    ///
    /// # Errors
    ///
    /// Same as [`Parser::get`].
    pub fn load<T: Target + Default>(&self) -> Result<T, Error> {
        let mut config = T::default();
        self.get(&mut config)?;
        Ok(config)
    }

    /// Walk the fields of `record`, setting `tag_found` when any of them is tagged.
    ///
    /// A tagged field is resolved before its record (if any) is walked. The
    /// nested-tag conflict is checked before the walk's own error surfaces.
    fn parse(&self, record: &mut dyn Record, tag_found: &mut bool) -> Result<(), Error> {
        for (index, field) in record.fields().iter().enumerate() {
            let tag = tag::parse(field, &self.tag)?;

            if let Some(tag) = &tag {
                *tag_found = true;
                self.retrieve(record, index, field, tag)?;
            }

            let Some(nested) = record.nested(index) else {
                continue;
            };
            debug!(field = field.name, "descending into nested record");
            let mut nested_found = false;
            let result = self.parse(nested, &mut nested_found);
            if let Some(tag) = &tag {
                if nested_found {
                    return Err(Error::NestedTags {
                        field: field.name.to_string(),
                        key: tag.name.clone(),
                    });
                }
            }
            result?;
        }

        Ok(())
    }

    /// Look up, decode and assign a single tagged field.
    fn retrieve(
        &self,
        record: &mut dyn Record,
        index: usize,
        field: &FieldDescriptor,
        tag: &Tag,
    ) -> Result<(), Error> {
        let Some(value) = (self.lookup)(&tag.name) else {
            if tag.optional {
                trace!(field = field.name, key = %tag.name, "optional key not set");
                return Ok(());
            }
            return Err(Error::VarNotFound {
                key: tag.name.clone(),
            });
        };

        // base64 always runs first, whatever the modifier order
        let bytes: Cow<'_, [u8]> = if tag.base64 {
            let decoded = STANDARD
                .decode(&value)
                .map_err(|e| Error::decode_failure(e, &tag.name, &value, Decoder::Base64))?;
            Cow::Owned(decoded)
        } else {
            Cow::Borrowed(value.as_bytes())
        };

        if tag.json {
            let target = record
                .structured(index)
                .ok_or_else(|| Error::cannot_set_kind(Kind::Any))?;
            target
                .decode_json(&bytes)
                .map_err(|e| Error::decode_failure(e, &tag.name, &value, Decoder::Json))?;
            trace!(field = field.name, key = %tag.name, "decoded structured value");
            return Ok(());
        }

        let target = record
            .target(index)
            .ok_or_else(|| Error::cannot_set_kind(Kind::Any))?;
        let kind = target.kind();
        target.coerce(&tag.name, &bytes)?;
        trace!(field = field.name, key = %tag.name, %kind, "resolved value");

        Ok(())
    }
}
