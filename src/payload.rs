//! Payload building
//!
//! Turns a form snapshot and/or caller-injected fields into the payload that
//! is sent, and later reported back in every lifecycle state.

use crate::types::{ControlKind, FormData, FormSnapshot, InjectedData, JsonData};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Field names accepted from injected data
static RE_FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-\[\]]*$").unwrap());

/// Value submitted by a checked checkbox/radio without a value attribute
const DEFAULT_CHECKED_VALUE: &str = "on";

/// Text form of an injected value
///
/// Strings, numbers and booleans coerce; null, arrays and objects do not.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether `name` is acceptable as an injected field name
pub fn is_field_name(name: &str) -> bool {
    RE_FIELD_NAME.is_match(name)
}

/// Drop injected entries with an invalid name or a value that cannot be
/// sent as text
///
/// Pure: the same input always yields the same output, and filtering an
/// already filtered mapping changes nothing.
pub fn filter_injected_data(injected: Option<&InjectedData>) -> InjectedData {
    injected
        .into_iter()
        .flatten()
        .filter(|(key, value)| is_field_name(key) && value_to_text(value).is_some())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Filtered injected entries as text pairs, in mapping order
pub fn injected_fields(injected: Option<&InjectedData>) -> Vec<(String, String)> {
    filter_injected_data(injected)
        .iter()
        .filter_map(|(key, value)| value_to_text(value).map(|text| (key.clone(), text)))
        .collect()
}

/// Controls of `form` that take part in a native submission, as pairs
pub fn native_fields(form: &FormSnapshot) -> Vec<(String, String)> {
    form.controls
        .iter()
        .filter(|control| !control.disabled)
        .filter_map(|control| {
            let name = control.name.as_deref().filter(|n| !n.is_empty())?;
            let value = match control.kind {
                ControlKind::Submit | ControlKind::Button => return None,
                ControlKind::Checkbox | ControlKind::Radio => {
                    if !control.checked {
                        return None;
                    }
                    control
                        .value
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CHECKED_VALUE.to_string())
                }
                ControlKind::Text | ControlKind::Hidden => {
                    control.value.clone().unwrap_or_default()
                }
            };
            Some((name.to_string(), value))
        })
        .collect()
}

/// Form payload: native fields in document order, then injected fields
///
/// Name collisions are kept as separate entries.
pub fn extract_form_data(form: &FormSnapshot, injected: Option<&InjectedData>) -> FormData {
    native_fields(form)
        .into_iter()
        .chain(injected_fields(injected))
        .collect()
}

/// JSON payload: the filtered injected data is the whole record
pub fn build_json_data(injected: Option<&InjectedData>) -> JsonData {
    let mut data = JsonData::new();
    for (key, value) in filter_injected_data(injected) {
        data.insert(key, value);
    }
    data
}
