//! Core types for tofu-forms

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied fields merged into an outgoing payload
pub type InjectedData = serde_json::Map<String, serde_json::Value>;

/// JSON payload: a flat record, last write wins
pub type JsonData = serde_json::Map<String, serde_json::Value>;

/// Lifecycle status of a request, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing submitted yet
    Idle,
    /// Request in flight
    Loading,
    /// Request accepted
    Success,
    /// Request failed
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// State of a single submission
///
/// `data` is the exact payload sent on the attempt that produced the state,
/// injected fields included.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<D> {
    /// No submission yet
    Idle,
    /// Payload is being sent
    Loading {
        /// Payload being sent
        data: D,
    },
    /// Payload was accepted
    Success {
        /// Payload that was sent
        data: D,
    },
    /// Submission failed
    Error {
        /// Why it failed
        error: Error,
        /// Payload that was attempted
        data: D,
    },
}

impl<D> RequestState<D> {
    /// Status tag of this state
    pub const fn status(&self) -> Status {
        match self {
            Self::Idle => Status::Idle,
            Self::Loading { .. } => Status::Loading,
            Self::Success { .. } => Status::Success,
            Self::Error { .. } => Status::Error,
        }
    }

    /// Success and Error are terminal; only they fire completion callbacks
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }

    /// Payload carried by this state, if any
    pub const fn data(&self) -> Option<&D> {
        match self {
            Self::Idle => None,
            Self::Loading { data } | Self::Success { data } | Self::Error { data, .. } => {
                Some(data)
            }
        }
    }

    /// Error carried by this state, if any
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<D> Default for RequestState<D> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Form payload: ordered multi-map, duplicate names preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// Create an empty form payload
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry, keeping any existing entries with the same name
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name`, in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Kind of form control, as far as form encoding cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Text-like input, textarea or select
    Text,
    /// Hidden input
    Hidden,
    /// Checkbox, submitted only when checked
    Checkbox,
    /// Radio button, submitted only when checked
    Radio,
    /// Submit button, never part of the payload
    Submit,
    /// Plain button, never part of the payload
    Button,
}

/// One control of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormControl {
    /// `name` attribute; unnamed controls are not submitted
    pub name: Option<String>,
    /// Current value; `None` for a checkbox/radio without a value attribute
    pub value: Option<String>,
    /// Control kind
    pub kind: ControlKind,
    /// Checked state for checkboxes and radios
    #[serde(default)]
    pub checked: bool,
    /// Disabled controls are not submitted
    #[serde(default)]
    pub disabled: bool,
}

/// Snapshot of a form's controls in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    /// Controls in document order
    pub controls: Vec<FormControl>,
}

impl FormSnapshot {
    /// Create an empty snapshot
    pub const fn new() -> Self {
        Self {
            controls: Vec::new(),
        }
    }

    /// Add a named text control
    #[must_use]
    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.control(FormControl {
            name: Some(name.into()),
            value: Some(value.into()),
            kind: ControlKind::Text,
            checked: false,
            disabled: false,
        })
    }

    /// Add a named hidden control
    #[must_use]
    pub fn hidden(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.control(FormControl {
            name: Some(name.into()),
            value: Some(value.into()),
            kind: ControlKind::Hidden,
            checked: false,
            disabled: false,
        })
    }

    /// Add a checkbox
    #[must_use]
    pub fn checkbox(self, name: impl Into<String>, value: Option<&str>, checked: bool) -> Self {
        self.control(FormControl {
            name: Some(name.into()),
            value: value.map(ToString::to_string),
            kind: ControlKind::Checkbox,
            checked,
            disabled: false,
        })
    }

    /// Add an arbitrary control
    #[must_use]
    pub fn control(mut self, control: FormControl) -> Self {
        self.controls.push(control);
        self
    }
}
