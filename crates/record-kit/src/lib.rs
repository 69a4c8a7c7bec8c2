//! Error normalisation and timestamp helpers for record tracking.
//!
//! The crate bundles two independent, stateless helpers:
//!
//! - [`errors`] folds any thrown value (a Rust error, a JSON payload, a bare
//!   string) into a [`SerializedError`] with stable fields for logging and
//!   transport.
//! - [`timestamps`] produces ISO-8601 creation/update stamps and parses them
//!   back into [`chrono::DateTime`] values.
//!
//! Neither helper fails: malformed input is defaulted or mapped to `None`.
//!
//! # Example
//!
//! ```
//! use record_kit::{normalize_error, serialize_error, timestamps};
//! use serde_json::json;
//!
//! let error = normalize_error(json!({"message": "x", "code": 42})).expect("truthy input");
//! assert_eq!(error.to_string(), "Error: x");
//! assert_eq!(serialize_error(error.clone()), error);
//!
//! let stamps = timestamps::create_timestamps();
//! assert!(timestamps::parse(Some(stamps.created_at())).is_some());
//! ```

pub mod errors;
pub mod timestamps;

pub use errors::{
    CapturedError, DEFAULT_MESSAGE, DEFAULT_NAME, SerializedError, Thrown, normalize_error,
    serialize_error,
};
pub use timestamps::{TimestampPair, TimestampUpdate, Timestamps};
