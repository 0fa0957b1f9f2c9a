//! Schema-driven validation of collected form input.
//!
//! Every declared field is checked and all problems are returned (does
//! not stop at the first error). The submit handler only runs when the
//! error list comes back empty.

use std::collections::BTreeMap;

use celulog_core::datetime;

use crate::schema::{FieldKind, FieldSpec};

/// Values collected from the user, keyed by field name.
///
/// Backed by a `BTreeMap` so iteration order, and with it any rendered
/// error summary, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// The trimmed value, or `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A problem with one field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the field the problem is about.
    pub field: String,
    /// User-facing message.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// An ordered set of fields validated together.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every field against its spec.
    /// Returns all errors found, in field declaration order.
    pub fn validate(&self, values: &FormValues) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for spec in &self.fields {
            let Some(value) = values.get(&spec.name) else {
                if spec.required {
                    errors.push(FieldError {
                        field: spec.name.clone(),
                        message: spec.missing_message(),
                    });
                }
                continue;
            };

            match &spec.kind {
                FieldKind::Select { options }
                | FieldKind::SearchSelect { options }
                | FieldKind::Radio { options } => {
                    if !options.iter().any(|o| o.value == value) {
                        errors.push(FieldError {
                            field: spec.name.clone(),
                            message: format!(
                                "{:?} is not one of the {} options",
                                value, spec.label
                            ),
                        });
                    }
                }
                FieldKind::Date => {
                    if datetime::parse_plain_date(value).is_err() {
                        errors.push(FieldError {
                            field: spec.name.clone(),
                            message: format!("{} must be a yyyy-MM-dd date", spec.label),
                        });
                    }
                }
                FieldKind::DateTime => {
                    if datetime::parse_timestamp(value).is_err() {
                        errors.push(FieldError {
                            field: spec.name.clone(),
                            message: format!("{} must be a date and time", spec.label),
                        });
                    }
                }
            }
        }

        errors
    }

    /// Validate and, only when clean, hand the values to `handler`.
    /// On failure the handler is not invoked and the collected errors
    /// come back instead.
    pub fn submit<T>(
        &self,
        values: &FormValues,
        handler: impl FnOnce(&FormValues) -> T,
    ) -> Result<T, Vec<FieldError>> {
        let errors = self.validate(values);
        if errors.is_empty() {
            Ok(handler(values))
        } else {
            Err(errors)
        }
    }
}
