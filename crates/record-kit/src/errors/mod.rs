//! Normalisation of arbitrary thrown values into [`SerializedError`].
//!
//! Code across an application catches heterogeneous failures: native Rust
//! errors, JSON error bodies relayed from other services, bare strings.
//! [`serialize_error`] and [`normalize_error`] fold all of them into a single
//! record with stable fields so log sinks and transports only ever see one
//! shape.
//!
//! Field extraction follows JavaScript truthiness: a field that is present
//! but falsy (`""`, `0`, `false`, `null`) is treated as missing and replaced
//! by its default.

mod thrown;
mod value;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

pub use thrown::{CapturedError, Thrown};
use value::{coerce_text, is_falsy};

/// Message used when the thrown value carries none.
pub const DEFAULT_MESSAGE: &str = "Unknown error";

/// Name used when the thrown value carries none.
pub const DEFAULT_NAME: &str = "Error";

const FIELDS: [&str; 4] = ["message", "name", "stack", "code"];

/// Normalised, serialisable representation of any error-like value.
///
/// ## Invariants
/// - `message` and `name` are never empty; missing values take
///   [`DEFAULT_MESSAGE`] and [`DEFAULT_NAME`].
/// - `code` is either absent or a truthy JSON value (usually a string or a
///   number).
///
/// The serialised form always carries all four keys, with `code` rendered as
/// `null` when absent. Deserialisation is lenient and applies the same
/// defaults as [`serialize_error`].
///
/// # Examples
/// ```
/// use record_kit::SerializedError;
///
/// let err = SerializedError::new("bad arg").with_name("TypeError");
/// assert_eq!(err.to_string(), "TypeError: bad arg");
/// assert_eq!(err.stack(), "");
/// assert!(err.code().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SerializedErrorDto", into = "SerializedErrorDto")]
pub struct SerializedError {
    message: String,
    name: String,
    stack: String,
    code: Option<Value>,
}

impl SerializedError {
    /// Create an error with the given message and default remaining fields.
    ///
    /// An empty message falls back to [`DEFAULT_MESSAGE`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let mut error = Self::default();
        let text = message.into();
        if !text.is_empty() {
            error.message = text;
        }
        error
    }

    /// Replace the name, keeping the current one when `name` is empty.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let text = name.into();
        if !text.is_empty() {
            self.name = text;
        }
        self
    }

    /// Replace the stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }

    /// Attach an identifying code. Falsy codes clear it.
    ///
    /// # Examples
    /// ```
    /// use record_kit::SerializedError;
    /// use serde_json::json;
    ///
    /// let err = SerializedError::new("gone").with_code("ENOENT");
    /// assert_eq!(err.code(), Some(&json!("ENOENT")));
    /// assert!(err.with_code(0).code().is_none());
    /// ```
    #[must_use]
    pub fn with_code(mut self, code: impl Into<Value>) -> Self {
        let candidate = code.into();
        self.code = (!is_falsy(&candidate)).then_some(candidate);
        self
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Error name, usually the originating type.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Stack or cause chain, possibly empty.
    #[must_use]
    pub fn stack(&self) -> &str {
        self.stack.as_str()
    }

    /// Identifying code, when one was supplied.
    #[must_use]
    pub const fn code(&self) -> Option<&Value> {
        self.code.as_ref()
    }

    /// Structured-data view: a JSON object holding the four fields.
    ///
    /// # Examples
    /// ```
    /// use record_kit::SerializedError;
    /// use serde_json::json;
    ///
    /// let err = SerializedError::new("boom");
    /// assert_eq!(
    ///     err.to_value(),
    ///     json!({"message": "boom", "name": "Error", "stack": "", "code": null})
    /// );
    /// ```
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "message": self.message,
            "name": self.name,
            "stack": self.stack,
            "code": self.code,
        })
    }

    /// Build from the fields of a JSON object, defaulting anything missing.
    ///
    /// `None` stands for a non-object input and yields all defaults.
    fn from_fields(fields: Option<&Map<String, Value>>) -> Self {
        Self::from_parts(
            lookup(fields, "message"),
            lookup(fields, "name"),
            lookup(fields, "stack"),
            lookup(fields, "code"),
        )
    }

    fn from_parts(
        message: Option<&Value>,
        name: Option<&Value>,
        stack: Option<&Value>,
        code: Option<&Value>,
    ) -> Self {
        let parts = [message, name, stack, code];
        let defaulted: Vec<&str> = FIELDS
            .iter()
            .zip(parts)
            .filter(|(_, part)| part.is_none_or(is_falsy))
            .map(|(key, _)| *key)
            .collect();
        if !defaulted.is_empty() {
            debug!(?defaulted, "error value missing fields; using defaults");
        }

        Self {
            message: text_or(message, DEFAULT_MESSAGE),
            name: text_or(name, DEFAULT_NAME),
            stack: text_or(stack, ""),
            code: code.filter(|value| !is_falsy(value)).cloned(),
        }
    }
}

impl Default for SerializedError {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_owned(),
            name: DEFAULT_NAME.to_owned(),
            stack: String::new(),
            code: None,
        }
    }
}

impl fmt::Display for SerializedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for SerializedError {}

impl From<&CapturedError> for SerializedError {
    fn from(value: &CapturedError) -> Self {
        Self::new(value.message())
            .with_name(value.name())
            .with_stack(value.causes())
            .with_code(value.code())
    }
}

fn lookup<'a>(fields: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    fields.and_then(|map| map.get(key))
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    value
        .filter(|candidate| !is_falsy(candidate))
        .map_or_else(|| default.to_owned(), coerce_text)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedErrorDto {
    #[serde(default)]
    message: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    stack: Value,
    #[serde(default)]
    code: Value,
}

impl From<SerializedError> for SerializedErrorDto {
    fn from(value: SerializedError) -> Self {
        Self {
            message: Value::String(value.message),
            name: Value::String(value.name),
            stack: Value::String(value.stack),
            code: value.code.unwrap_or(Value::Null),
        }
    }
}

impl From<SerializedErrorDto> for SerializedError {
    fn from(value: SerializedErrorDto) -> Self {
        let SerializedErrorDto {
            message,
            name,
            stack,
            code,
        } = value;
        Self::from_parts(Some(&message), Some(&name), Some(&stack), Some(&code))
    }
}

/// Convert any thrown value into a [`SerializedError`].
///
/// Already-normalised values pass through unchanged, which makes the
/// function idempotent. Rust errors contribute their message, type name,
/// cause chain, and (for [`std::io::Error`]) an OS code. JSON objects
/// contribute their `message`, `name`, `stack`, and `code` keys. Anything
/// else yields the defaults.
///
/// # Examples
/// ```
/// use record_kit::{Thrown, serialize_error};
///
/// let parse_failure = "x".parse::<u8>().expect_err("not a number");
/// let err = serialize_error(Thrown::error(parse_failure));
/// assert_eq!(err.name(), "ParseIntError");
///
/// let again = serialize_error(err.clone());
/// assert_eq!(again, err);
///
/// assert_eq!(serialize_error(()).message(), "Unknown error");
/// ```
#[must_use]
pub fn serialize_error(input: impl Into<Thrown>) -> SerializedError {
    match input.into() {
        Thrown::Serialized(error) => error,
        Thrown::Error(captured) => SerializedError::from(&captured),
        Thrown::Value(value) => SerializedError::from_fields(value.as_object()),
    }
}

/// Convert a thrown value into a [`SerializedError`], or `None` when falsy.
///
/// Falsy inputs are absent values, `null`, `false`, `0`, and `""`. Rust
/// errors delegate to [`serialize_error`]; JSON objects and arrays are
/// wrapped field by field; remaining primitives become the message of a
/// default-named error.
///
/// # Examples
/// ```
/// use record_kit::normalize_error;
///
/// assert!(normalize_error("").is_none());
///
/// let err = normalize_error("boom").expect("truthy input");
/// assert_eq!(err.message(), "boom");
/// assert_eq!(err.name(), "Error");
/// ```
#[must_use]
pub fn normalize_error(input: impl Into<Thrown>) -> Option<SerializedError> {
    let thrown = input.into();
    if thrown.is_falsy() {
        debug!("discarding falsy error value");
        return None;
    }

    let normalised = match thrown {
        Thrown::Serialized(error) => error,
        Thrown::Error(captured) => serialize_error(captured),
        Thrown::Value(Value::Object(fields)) => SerializedError::from_fields(Some(&fields)),
        Thrown::Value(Value::Array(_)) => SerializedError::from_fields(None),
        Thrown::Value(primitive) => SerializedError::new(coerce_text(&primitive)),
    };
    Some(normalised)
}

#[cfg(test)]
mod tests;
