//! JSON encoding and decoding reported through [`Outcome`].
//!
//! Errors coming from `serde_json` are translated into the closed
//! [`CodingFailure`] set, nothing is raised.
//!
//! ```rust
//! use routcome::{json, Outcome};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let person = Person { name: "Bobby".into(), age: 13 };
//! let decoded = json::encode(&person).flat_map(|bytes| json::decode::<Person>(&bytes));
//! assert_eq!(decoded, Outcome::Success(person));
//! ```

use std::fmt::Display;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::error::Category;

use crate::outcome::Outcome;

/// Position and message of a codec error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingContext {
    /// 1-based line, `0` when the error has no position.
    pub line: usize,
    /// 1-based column, `0` when the error has no position.
    pub column: usize,
    pub description: String,
}

impl CodingContext {
    fn from_error(error: &serde_json::Error) -> Self {
        Self {
            line: error.line(),
            column: error.column(),
            description: bare_message(error),
        }
    }
}

impl Display for CodingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            f.write_str(&self.description)
        } else {
            write!(
                f,
                "{} (line {}, column {})",
                self.description, self.line, self.column
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodingFailure {
    #[error("data corrupted: {0}")]
    DataCorrupted(CodingContext),

    #[error("key '{key}' not found: {context}")]
    KeyNotFound { key: String, context: CodingContext },

    #[error("type mismatch: {0}")]
    TypeMismatch(CodingContext),

    #[error("value not found: {0}")]
    ValueNotFound(CodingContext),

    #[error("invalid value: {0}")]
    InvalidValue(CodingContext),

    #[error("{0}")]
    Uncategorized(String),
}

impl CodingFailure {
    /// Maps error raised while decoding into exactly one failure variant.
    pub fn from_decode_error(error: serde_json::Error) -> Self {
        match error.classify() {
            Category::Syntax | Category::Eof => {
                Self::DataCorrupted(CodingContext::from_error(&error))
            }
            Category::Data => Self::from_data_error(&error),
            Category::Io => Self::Uncategorized(format!("Unknown Case: {}", error)),
        }
    }

    /// Maps error raised while encoding into exactly one failure variant.
    pub fn from_encode_error(error: serde_json::Error) -> Self {
        match error.classify() {
            Category::Data | Category::Syntax => {
                Self::InvalidValue(CodingContext::from_error(&error))
            }
            Category::Io | Category::Eof => {
                Self::Uncategorized(format!("Unknown Case: {}", error))
            }
        }
    }

    fn from_data_error(error: &serde_json::Error) -> Self {
        let context = CodingContext::from_error(error);
        let message = context.description.as_str();

        if let Some(key) = missing_field(message) {
            return Self::KeyNotFound {
                key: key.to_owned(),
                context,
            };
        }

        if let Some(unexpected) = message.strip_prefix("invalid type: ") {
            return if unexpected.starts_with("null") || unexpected.starts_with("unit value") {
                Self::ValueNotFound(context)
            } else {
                Self::TypeMismatch(context)
            };
        }

        if message.starts_with("invalid value: ")
            || message.starts_with("invalid length ")
            || message.starts_with("unknown variant ")
        {
            return Self::DataCorrupted(context);
        }

        Self::Uncategorized(format!("Unknown Case: {}", error))
    }
}

/// Extracts key from serde's "missing field `key`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// serde_json appends " at line L column C" to positional errors.
fn bare_message(error: &serde_json::Error) -> String {
    let full = error.to_string();
    if error.line() == 0 {
        return full;
    }

    let suffix = format!(" at line {} column {}", error.line(), error.column());
    match full.strip_suffix(&suffix) {
        Some(message) => message.to_owned(),
        None => full,
    }
}

pub fn decode<T>(bytes: &[u8]) -> Outcome<T, CodingFailure>
where
    T: DeserializeOwned,
{
    Outcome::from(serde_json::from_slice::<T>(bytes).map_err(CodingFailure::from_decode_error))
}

pub fn encode<T>(value: &T) -> Outcome<Bytes, CodingFailure>
where
    T: Serialize + ?Sized,
{
    Outcome::from(
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(CodingFailure::from_encode_error),
    )
}

/// Same as [`encode`] but indented.
pub fn encode_pretty<T>(value: &T) -> Outcome<Bytes, CodingFailure>
where
    T: Serialize + ?Sized,
{
    Outcome::from(
        serde_json::to_vec_pretty(value)
            .map(Bytes::from)
            .map_err(CodingFailure::from_encode_error),
    )
}

#[cfg(test)]
mod tests {
    use super::{bare_message, missing_field};

    #[test]
    fn test_missing_field() {
        assert_eq!(missing_field("missing field `age`"), Some("age"));
        assert_eq!(missing_field("invalid type: null, expected u32"), None);
    }

    #[test]
    fn test_bare_message_strips_position() {
        let error = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert_eq!(
            bare_message(&error),
            "invalid type: string \"x\", expected u32"
        );
    }
}
