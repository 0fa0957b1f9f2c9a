//! Form schema definitions.
//!
//! A form is an ordered list of [`FieldSpec`]s. Each spec names the value
//! it collects, carries the user-facing copy (label, placeholder,
//! description) and a [`FieldKind`] saying which widget collects it.
//! Field kinds are a closed enum and renderers match on them
//! exhaustively, so adding a widget kind is a compile-time decision
//! rather than a silently skipped field.

use serde::{Deserialize, Serialize};

/// One selectable option in a select, searchable select or radio group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the user (e.g. `Turno A`).
    pub label: String,

    /// Value submitted with the form (e.g. `a`).
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive substring match against the label. The searchable
    /// select narrows its option list with this as the user types.
    pub fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Which widget collects a field, with the data that widget needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Fixed-option dropdown.
    Select { options: Vec<Choice> },

    /// Dropdown with a query box that narrows options by label substring.
    SearchSelect { options: Vec<Choice> },

    /// Mutually exclusive option group, all options visible at once.
    Radio { options: Vec<Choice> },

    /// Calendar day, submitted as `yyyy-MM-dd`.
    Date,

    /// Calendar day plus hour and minute, submitted as
    /// `yyyy-MM-dd HH:mm:00`. The day, hour and minute are chosen
    /// separately and assembled into one string, never round-tripped
    /// through a zone conversion that could shift the day.
    DateTime,
}

impl FieldKind {
    /// Options backing the field. Empty for kinds without option lists.
    pub fn options(&self) -> &[Choice] {
        match self {
            FieldKind::Select { options }
            | FieldKind::SearchSelect { options }
            | FieldKind::Radio { options } => options,
            FieldKind::Date | FieldKind::DateTime => &[],
        }
    }
}

/// A single field of a form: what to collect and how to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key under which the collected value is stored.
    pub name: String,

    /// Label shown with the widget.
    pub label: String,

    /// Hint shown while the field is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Secondary line under the label. Radio groups use this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Message reported when the field is required but missing.
    /// A generic message is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether submit requires a value. Defaults to true.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Widget kind plus its data.
    pub kind: FieldKind,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: None,
            description: None,
            message: None,
            required: true,
            kind,
        }
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Override the missing-value message for this field.
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(text.into());
        self
    }

    /// Allow the field to be left blank.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Message reported when the field is required but has no value.
    pub fn missing_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("{} is required", self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifts() -> Vec<Choice> {
        vec![
            Choice::new("Turno A", "a"),
            Choice::new("Turno B", "b"),
            Choice::new("Turno C", "c"),
        ]
    }

    #[test]
    fn choice_matches_is_case_insensitive_substring() {
        let c = Choice::new("Fibra Longa Klabin", "fibra longa klabin");
        assert!(c.matches("longa"));
        assert!(c.matches("KLABIN"));
        assert!(c.matches(""));
        assert!(!c.matches("curta"));
    }

    #[test]
    fn options_accessor_covers_all_kinds() {
        let select = FieldKind::Select { options: shifts() };
        assert_eq!(select.options().len(), 3);

        let search = FieldKind::SearchSelect { options: shifts() };
        assert_eq!(search.options()[0].label, "Turno A");

        let radio = FieldKind::Radio { options: shifts() };
        assert_eq!(radio.options()[2].value, "c");

        assert!(FieldKind::Date.options().is_empty());
        assert!(FieldKind::DateTime.options().is_empty());
    }

    #[test]
    fn builder_fills_copy_and_flags() {
        let spec = FieldSpec::new("shift", "Turno", FieldKind::Select { options: shifts() })
            .placeholder("Selecionar turno")
            .message("Selecione um turno");
        assert_eq!(spec.name, "shift");
        assert!(spec.required);
        assert_eq!(spec.placeholder.as_deref(), Some("Selecionar turno"));
        assert_eq!(spec.missing_message(), "Selecione um turno");

        let optional = FieldSpec::new("firstDate", "Data inicial", FieldKind::Date).optional();
        assert!(!optional.required);
        assert_eq!(optional.missing_message(), "Data inicial is required");
    }

    #[test]
    fn serde_roundtrip() {
        let spec = FieldSpec::new(
            "operator",
            "Operador",
            FieldKind::SearchSelect {
                options: vec![Choice::new("Felipe Rodrigues", "felipe rodrigues")],
            },
        )
        .placeholder("Selecionar operador");

        let json = serde_json::to_string_pretty(&spec).unwrap();
        let back: FieldSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn required_defaults_to_true_when_absent_from_json() {
        let spec: FieldSpec = serde_json::from_str(
            r#"{"name": "createdAt", "label": "Data e Hora", "kind": "DateTime"}"#,
        )
        .unwrap();
        assert!(spec.required);
        assert_eq!(spec.kind, FieldKind::DateTime);
    }
}
