//! Attribute parsing for `#[bind(...)]` annotations.
//!
//! This module extracts configuration attributes from struct fields during
//! macro expansion. Annotation strings are carried through verbatim; their
//! grammar is checked by `envbind` when a record is populated.

use syn::{Field, LitStr};

/// Parsed `#[bind(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// `(key, annotation)` pairs in declaration order, e.g. `("env", "PORT,optional")`.
    pub annotations: Vec<(String, String)>,

    /// The field holds a record to recurse into.
    pub nested: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[bind(...)]` attributes from a struct field.
    ///
    /// Attributes other than `bind` are ignored so serde and others can
    /// process them.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("bind") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // key = "NAME,modifiers"
                if meta.input.peek(syn::Token![=]) {
                    let key = match meta.path.get_ident() {
                        Some(ident) => ident.to_string(),
                        None => return Err(meta.error("annotation key must be an identifier")),
                    };
                    if attrs.annotations.iter().any(|(k, _)| *k == key) {
                        return Err(meta.error(format!("duplicate annotation key `{key}`")));
                    }
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.annotations.push((key, value.value()));
                    return Ok(());
                }

                // nested
                if meta.path.is_ident("nested") {
                    attrs.nested = true;
                    return Ok(());
                }

                Err(meta.error("unsupported bind attribute, expected `nested` or `key = \"NAME\"`"))
            })?;
        }

        Ok(attrs)
    }

    /// Some annotation asks for JSON decoding, so the field must be deserializable.
    pub fn needs_structured(&self) -> bool {
        self.annotations.iter().any(|(_, value)| has_json(value))
    }

    /// Some annotation coerces a scalar, so the field must implement `Target`.
    pub fn needs_target(&self) -> bool {
        self.annotations.iter().any(|(_, value)| !has_json(value))
    }
}

fn has_json(annotation: &str) -> bool {
    annotation.split(',').skip(1).any(|token| token == "json")
}
