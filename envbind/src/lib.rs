//! Annotation-driven configuration from environment variables
//!
//! `envbind` populates a configuration struct in place from a key/value
//! lookup source, conventionally the process environment. Each field declares
//! the key it is read from, and how to read it, in a `#[bind(...)]`
//! annotation.
//!
//! # Features
//!
//! - **Declarative**: `#[derive(EnvBind)]` generates the field table
//! - **Caller-supplied defaults**: fields that are not set keep the value
//!   they had before the call
//! - **Strict numbers**: values are checked against the exact width of the
//!   target field (`"500"` into an `i8` is an overflow)
//! - **Encodings**: base64 values, JSON values, or both
//! - **Pluggable source**: any `Fn(&str) -> Option<String>` can stand in for
//!   the environment
//!
//! # Example
//!
//! ```rust
//! use envbind::EnvBind;
//!
//! #[derive(Debug, EnvBind)]
//! struct Config {
//!     #[bind(env = "DATABASE_URL")]
//!     pub database_url: String,
//!
//!     #[bind(env = "MAX_CONNECTIONS,optional")]
//!     pub max_connections: u32,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("DATABASE_URL", "postgres://localhost/db");
//! let mut config = Config {
//!     database_url: String::new(),
//!     max_connections: 10,
//! };
//! envbind::get(&mut config)?;
//!
//! assert_eq!(config.database_url, "postgres://localhost/db");
//! assert_eq!(config.max_connections, 10);
//! #     Ok(())
//! # }
//! ```
//!
//! # Annotations
//!
//! An annotation is `NAME[,modifier]*`, attached under a key:
//! `#[bind(env = "NAME,optional")]`. The key selects which parser reads it;
//! [`get`] reads `env`. Modifiers may appear in any order:
//!
//! - `optional`: an absent key is not an error, the field is left alone
//! - `base64`: the value is decoded from standard base64 first
//! - `json`: the value is decoded as JSON into the field, which must
//!   implement `serde::Deserialize`
//!
//! Without `json`, the value is coerced into one of `String`, `Vec<u8>`,
//! `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64`, `bool`, or an
//! `Option` of those.
//!
//! ```rust
//! # use envbind::EnvBind;
//! # use serde::Deserialize;
//! #[derive(Debug, Default, Deserialize)]
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Config {
//!     // TLS_KEY holds base64; the field gets the raw bytes
//!     #[bind(env = "TLS_KEY,base64")]
//!     pub tls_key: Vec<u8>,
//!
//!     // None unless TIMEOUT_SECS is set
//!     #[bind(env = "TIMEOUT_SECS,optional")]
//!     pub timeout_secs: Option<u64>,
//!
//!     #[bind(env = "ENDPOINT,json")]
//!     pub endpoint: Endpoint,
//! }
//! ```
//!
//! # Nested records
//!
//! `#[bind(nested)]` marks a field holding another `EnvBind` record, directly,
//! as `Option<T>` (allocated on demand) or as `Box<T>`. Its fields are read
//! with the same parser. A nested record may itself be tagged, typically with
//! `json`, but then it must not have tagged fields of its own. `json` fields
//! whose type derives `EnvBind` are walked without the marker.
//!
//! ```rust
//! # use envbind::EnvBind;
//! #[derive(Debug, Default, EnvBind)]
//! struct Database {
//!     #[bind(env = "DB_HOST")]
//!     pub host: String,
//! }
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Config {
//!     #[bind(nested)]
//!     pub database: Option<Database>,
//! }
//! ```

mod error;
mod parser;
mod record;
mod tag;
mod value;

pub use envbind_derive::EnvBind;
pub use error::{Cause, Decoder, Error};
pub use parser::{lookup_env, Parser, DEFAULT_TAG};
pub use record::{FieldDescriptor, Nested, Record, Structured};
pub use tag::{parse as parse_tag, Tag};
pub use value::{Kind, Target};

#[doc(hidden)]
pub mod __private {
    pub use crate::record::{MaybeNested, ViaNested, ViaPlain};
}

/// Populate `config` from the process environment using `env` annotations.
///
/// # Errors
///
/// See [`Parser::get`].
pub fn get<T: Target + ?Sized>(config: &mut T) -> Result<(), Error> {
    Parser::default().get(config)
}

/// Build `T::default()` and populate it from the process environment.
///
/// # Errors
///
/// See [`Parser::get`].
pub fn from_env<T: Target + Default>() -> Result<T, Error> {
    Parser::default().load()
}
