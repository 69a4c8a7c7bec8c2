//! Tests for error normalisation and the serialised record shape.

use std::fmt;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;

#[derive(Debug)]
struct ConfigError {
    source: fmt::Error,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to render config")
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[fixture]
fn type_error() -> SerializedError {
    SerializedError::new("bad arg").with_name("TypeError")
}

#[rstest]
fn display_renders_name_and_message(type_error: SerializedError) {
    assert_eq!(type_error.to_string(), "TypeError: bad arg");
}

#[rstest]
fn to_value_exposes_all_four_fields(type_error: SerializedError) {
    let value = type_error.with_code("E_ARG").with_stack("at main").to_value();
    assert_eq!(
        value,
        json!({"message": "bad arg", "name": "TypeError", "stack": "at main", "code": "E_ARG"})
    );
}

#[rstest]
fn empty_builder_inputs_keep_defaults() {
    let error = SerializedError::new("").with_name("");
    assert_eq!(error.message(), DEFAULT_MESSAGE);
    assert_eq!(error.name(), DEFAULT_NAME);
}

#[rstest]
fn serialize_error_passes_normalised_values_through(type_error: SerializedError) {
    let once = serialize_error(type_error.clone());
    assert_eq!(once, type_error);
    assert_eq!(serialize_error(once.clone()), once);
}

#[rstest]
#[case::unit(Thrown::from(()))]
#[case::null(Thrown::from(Value::Null))]
#[case::text(Thrown::from("boom"))]
#[case::number(Thrown::from(42))]
#[case::flag(Thrown::from(true))]
#[case::array(Thrown::from(json!(["boom"])))]
#[case::empty_object(Thrown::from(json!({})))]
fn serialize_error_defaults_non_error_shapes(#[case] input: Thrown) {
    assert_eq!(serialize_error(input), SerializedError::default());
}

#[rstest]
fn serialize_error_reads_object_fields() {
    let error = serialize_error(json!({
        "message": "disk full",
        "name": "StorageError",
        "stack": "at write",
        "code": "ENOSPC",
        "extra": true,
    }));
    assert_eq!(error.message(), "disk full");
    assert_eq!(error.name(), "StorageError");
    assert_eq!(error.stack(), "at write");
    assert_eq!(error.code(), Some(&json!("ENOSPC")));
}

#[rstest]
#[case::empty_message(json!({"message": ""}), DEFAULT_MESSAGE)]
#[case::null_message(json!({"message": null}), DEFAULT_MESSAGE)]
#[case::zero_message(json!({"message": 0}), DEFAULT_MESSAGE)]
#[case::numeric_message(json!({"message": 404}), "404")]
#[case::object_message(json!({"message": {"k": "v"}}), "{\"k\":\"v\"}")]
fn serialize_error_treats_falsy_fields_as_missing(#[case] input: Value, #[case] expected: &str) {
    assert_eq!(serialize_error(input).message(), expected);
}

#[rstest]
fn falsy_codes_are_dropped() {
    let error = serialize_error(json!({"message": "x", "code": 0}));
    assert!(error.code().is_none());
}

#[rstest]
fn serialize_error_captures_rust_errors() {
    let error = serialize_error(Thrown::error(ConfigError {
        source: fmt::Error,
    }));
    assert_eq!(error.name(), "ConfigError");
    assert_eq!(error.message(), "failed to render config");
    assert_eq!(
        error.stack(),
        "caused by: an error occurred when formatting an argument"
    );
    assert!(error.code().is_none());
}

#[rstest]
fn serialize_error_records_io_kind_as_code() {
    let missing = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
    let error = serialize_error(Thrown::error(missing));
    assert_eq!(error.to_string(), "Error: locked");
    assert_eq!(error.code(), Some(&json!("PermissionDenied")));
}

#[rstest]
#[case::unit(Thrown::from(()))]
#[case::none(Thrown::from(None::<String>))]
#[case::null(Thrown::from(Value::Null))]
#[case::empty_text(Thrown::from(""))]
#[case::zero(Thrown::from(0))]
#[case::zero_byte(Thrown::from(0_u8))]
#[case::zero_float(Thrown::from(0.0_f32))]
#[case::false_flag(Thrown::from(false))]
fn normalize_error_discards_falsy_values(#[case] input: Thrown) {
    assert_eq!(normalize_error(input), None);
}

#[rstest]
fn normalize_error_wraps_strings() {
    let error = normalize_error("boom");
    assert_eq!(
        error.map(|value| value.to_value()),
        Some(json!({"message": "boom", "name": "Error", "stack": "", "code": null}))
    );
}

#[rstest]
#[case::integer(Thrown::from(404), "404")]
#[case::float(Thrown::from(2.5), "2.5")]
#[case::flag(Thrown::from(true), "true")]
#[case::owned(Thrown::from(String::from("late")), "late")]
#[case::large_float(Thrown::from(1e21), "1e+21")]
#[case::tiny_float(Thrown::from(1e-7), "1e-7")]
#[case::byte(Thrown::from(7_u8), "7")]
#[case::index(Thrown::from(12_usize), "12")]
#[case::single_precision(Thrown::from(0.5_f32), "0.5")]
fn normalize_error_coerces_primitives_to_messages(#[case] input: Thrown, #[case] expected: &str) {
    let error = normalize_error(input);
    assert_eq!(error.as_ref().map(SerializedError::message), Some(expected));
    assert_eq!(error.as_ref().map(SerializedError::name), Some(DEFAULT_NAME));
}

#[rstest]
fn normalize_error_wraps_objects_directly() {
    let error = normalize_error(json!({"message": "x", "code": 42}));
    assert_eq!(
        error.map(|value| value.to_value()),
        Some(json!({"message": "x", "name": "Error", "stack": "", "code": 42}))
    );
}

#[rstest]
fn normalize_error_wraps_arrays_with_defaults() {
    assert_eq!(
        normalize_error(json!([1, 2])),
        Some(SerializedError::default())
    );
}

#[rstest]
fn normalize_error_keeps_normalised_values(type_error: SerializedError) {
    assert_eq!(normalize_error(type_error.clone()), Some(type_error));
}

#[rstest]
fn normalize_error_delegates_rust_errors() {
    let error = normalize_error(Thrown::error(ConfigError {
        source: fmt::Error,
    }));
    assert_eq!(
        error.as_ref().map(SerializedError::name),
        Some("ConfigError")
    );
}

#[rstest]
fn serialises_with_null_code(type_error: SerializedError) {
    let encoded = serde_json::to_value(&type_error);
    assert_eq!(
        encoded.ok(),
        Some(json!({"message": "bad arg", "name": "TypeError", "stack": "", "code": null}))
    );
}

#[rstest]
#[case::partial(r#"{"message": "late"}"#, "late", DEFAULT_NAME)]
#[case::empty_fields(r#"{"message": "", "name": ""}"#, DEFAULT_MESSAGE, DEFAULT_NAME)]
#[case::full(
    r#"{"message": "bad arg", "name": "TypeError", "stack": "", "code": null}"#,
    "bad arg",
    "TypeError"
)]
fn deserialises_leniently(#[case] json: &str, #[case] message: &str, #[case] name: &str) {
    let decoded: Result<SerializedError, _> = serde_json::from_str(json);
    let error = match decoded {
        Ok(error) => error,
        Err(err) => panic!("lenient decoding rejected {json}: {err}"),
    };
    assert_eq!(error.message(), message);
    assert_eq!(error.name(), name);
}
