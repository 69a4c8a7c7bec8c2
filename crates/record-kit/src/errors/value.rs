//! JavaScript-flavoured truthiness and text coercion over JSON values.

use serde_json::{Number, Value};

/// Whether `value` counts as falsy: `null`, `false`, zero, or `""`.
///
/// Arrays and objects are always truthy, even when empty.
pub(super) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => is_zero(number),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Render `value` as message text.
///
/// Strings are taken verbatim. Numbers follow JavaScript's `String(x)`:
/// whole floats drop their fraction (`1.0` renders as `1`) and very large or
/// very small magnitudes switch to exponent notation. Arrays and objects
/// render as compact JSON.
pub(super) fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => render_number(number),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn is_zero(number: &Number) -> bool {
    number.as_u64() == Some(0)
        || number.as_i64() == Some(0)
        || number.as_f64().is_some_and(|float| float == 0.0)
}

fn render_number(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => render_float(float),
        _ => number.to_string(),
    }
}

/// Positional notation inside `[1e-6, 1e21)`, exponent notation outside it
/// with an explicit `+` on positive exponents (`1e+21`, `1e-7`).
fn render_float(float: f64) -> String {
    let magnitude = float.abs();
    if magnitude == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&magnitude) {
        return float.to_string();
    }
    let exponent_form = format!("{float:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}
