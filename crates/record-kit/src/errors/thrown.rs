//! The set of values a caller may hand to the normaliser.

use std::any::type_name;
use std::error::Error as StdError;
use std::fmt;
use std::io;

use serde_json::Value;

use super::{DEFAULT_NAME, SerializedError, value::is_falsy};

/// Any thrown value.
///
/// Build one through the `From` conversions: JSON values, strings, numbers,
/// booleans, `()` and `None` (both absent), or [`SerializedError`]. Rust
/// errors go through [`Thrown::error`] so their type name is captured.
#[derive(Debug)]
pub enum Thrown {
    /// A value that has already been normalised.
    Serialized(SerializedError),
    /// A Rust error value.
    Error(CapturedError),
    /// Plain data: `null`, primitives, arrays, or objects.
    Value(Value),
}

impl Thrown {
    /// Capture a Rust error together with its type name.
    ///
    /// # Examples
    /// ```
    /// use record_kit::{Thrown, serialize_error};
    ///
    /// let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    /// let err = serialize_error(Thrown::error(missing));
    /// assert_eq!(err.to_string(), "Error: no such file");
    /// ```
    #[must_use]
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Error(CapturedError::new(error))
    }

    /// Whether the value is absent, `null`, `false`, zero, or `""`.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Value(value) => is_falsy(value),
            Self::Serialized(_) | Self::Error(_) => false,
        }
    }
}

impl From<SerializedError> for Thrown {
    fn from(value: SerializedError) -> Self {
        Self::Serialized(value)
    }
}

impl From<CapturedError> for Thrown {
    fn from(value: CapturedError) -> Self {
        Self::Error(value)
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Thrown {
    fn from(value: Box<dyn StdError + Send + Sync>) -> Self {
        Self::Error(CapturedError::from(value))
    }
}

impl From<Value> for Thrown {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<()> for Thrown {
    fn from((): ()) -> Self {
        Self::Value(Value::Null)
    }
}

impl<T> From<Option<T>> for Thrown
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Value(Value::Null), Into::into)
    }
}

macro_rules! thrown_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Thrown {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

thrown_from_primitive!(
    &str, String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

/// A Rust error captured with the short name of its type.
pub struct CapturedError {
    name: &'static str,
    error: Box<dyn StdError + Send + Sync>,
}

impl CapturedError {
    /// Capture `error`, recording its type name.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            name: short_type_name(type_name::<E>()),
            error: Box::new(error),
        }
    }

    /// Short type name, for example `ParseIntError`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The error's `Display` text.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// The `source()` chain, one `caused by:` line per cause.
    #[must_use]
    pub fn causes(&self) -> String {
        let mut lines = Vec::new();
        let mut current = self.error.source();
        while let Some(cause) = current {
            lines.push(format!("caused by: {cause}"));
            current = cause.source();
        }
        lines.join("\n")
    }

    /// Identifying code for I/O errors: the OS error number when present,
    /// otherwise the [`io::ErrorKind`] name.
    #[must_use]
    pub fn code(&self) -> Option<Value> {
        let io_error = self.error.downcast_ref::<io::Error>()?;
        Some(io_error.raw_os_error().map_or_else(
            || Value::String(format!("{:?}", io_error.kind())),
            Value::from,
        ))
    }
}

impl From<Box<dyn StdError + Send + Sync>> for CapturedError {
    fn from(value: Box<dyn StdError + Send + Sync>) -> Self {
        Self {
            name: DEFAULT_NAME,
            error: value,
        }
    }
}

impl fmt::Debug for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedError")
            .field("name", &self.name)
            .field("error", &self.error)
            .finish()
    }
}

/// Strip the module path and generic arguments from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
