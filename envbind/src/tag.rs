//! Annotation parsing: `NAME[,modifier]*`

use crate::error::Error;
use crate::record::FieldDescriptor;

/// Parsed annotation of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Name passed to the lookup function
    pub name: String,
    /// Absence of the key is not an error
    pub optional: bool,
    /// Value is base64-decoded before anything else
    pub base64: bool,
    /// Value is decoded as JSON instead of coerced
    pub json: bool,
}

/// Parse the annotation of `field` under `key`.
///
/// Returns `Ok(None)` when the field carries no annotation under `key`.
pub fn parse(field: &FieldDescriptor, key: &str) -> Result<Option<Tag>, Error> {
    let Some(raw) = field.annotation(key) else {
        return Ok(None);
    };

    let mut tokens = raw.split(',');
    let name = tokens.next().unwrap_or_default();
    if name.is_empty() {
        return Err(Error::MissingNameTag {
            tag: raw.to_string(),
        });
    }

    let mut tag = Tag {
        name: name.to_string(),
        ..Tag::default()
    };
    for token in tokens {
        match token {
            "optional" => tag.optional = true,
            "base64" => tag.base64 = true,
            "json" => tag.json = true,
            other => {
                return Err(Error::InvalidTagOption {
                    tag: raw.to_string(),
                    option: other.to_string(),
                })
            }
        }
    }

    Ok(Some(tag))
}
