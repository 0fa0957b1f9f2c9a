//! Form layouts for the three screens, plus conversion of collected
//! values into drafts and search filters.
//!
//! Field names and validation messages match what the backend-facing
//! records use: `celuloseType` for the material, `createdAt` for the
//! timestamp, and the `firstDate`/`seccondDate` pair (misspelling
//! included) for search bounds.

use anyhow::{anyhow, Result};
use celulog_core::catalog::{self, CatalogEntry, MATERIAL_ALL};
use celulog_core::{datetime, LoadDraft, LoadFilter};
use celulog_forms::{Choice, FieldKind, FieldSpec, FormSchema, FormValues};

fn choices(entries: &[CatalogEntry]) -> Vec<Choice> {
    entries
        .iter()
        .map(|e| Choice::new(e.label, e.value))
        .collect()
}

/// Material options with the catch-all "Todos" in front, search only.
fn material_choices_with_all() -> Vec<Choice> {
    let mut options = vec![Choice::new("Todos", MATERIAL_ALL)];
    options.extend(choices(catalog::MATERIALS));
    options
}

/// Registration form: operator, shift and material.
pub fn create_form() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::new(
            "operator",
            "Operador",
            FieldKind::SearchSelect {
                options: choices(catalog::OPERATORS),
            },
        )
        .placeholder("Selecionar operador")
        .message("Selecione um operador"),
        FieldSpec::new(
            "shift",
            "Turno",
            FieldKind::Select {
                options: choices(catalog::SHIFTS),
            },
        )
        .placeholder("Selecionar turno")
        .message("Selecione um turno"),
        FieldSpec::new(
            "celuloseType",
            "Celulose",
            FieldKind::Radio {
                options: choices(catalog::MATERIALS),
            },
        )
        .description("Selecionar tipo de celulose")
        .message("Selecione um tipo de celulose"),
    ])
}

/// Edit form: the registration fields plus the timestamp.
pub fn update_form() -> FormSchema {
    let mut fields = Vec::from(create_form().fields());
    fields.push(
        FieldSpec::new("createdAt", "Data e Hora", FieldKind::DateTime)
            .message("Selecione a data e hora"),
    );
    FormSchema::new(fields)
}

/// Search form: material plus an optional date range. Every field may
/// stay empty; an empty form searches everything.
pub fn search_form() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::new(
            "celuloseType",
            "Material",
            FieldKind::Select {
                options: material_choices_with_all(),
            },
        )
        .placeholder("Todos")
        .description("Selecionar tipo de celulose")
        .optional(),
        FieldSpec::new("firstDate", "Data inicial", FieldKind::Date).optional(),
        FieldSpec::new("seccondDate", "Data final", FieldKind::Date).optional(),
    ])
}

fn required<'a>(values: &'a FormValues, name: &str) -> Result<&'a str> {
    values
        .get(name)
        .ok_or_else(|| anyhow!("field {:?} missing after validation", name))
}

/// Build a new-load draft from validated registration values. The
/// timestamp is the current local minute and the weight and unit are
/// the fixed per-load defaults.
pub fn new_draft(values: &FormValues, timezone: &str) -> Result<LoadDraft> {
    Ok(LoadDraft::new_entry(
        required(values, "celuloseType")?,
        required(values, "operator")?,
        required(values, "shift")?,
        datetime::now_datetime_string(),
        timezone,
    ))
}

/// Build a replacement draft from validated edit values.
pub fn edit_draft(values: &FormValues, id: &str, timezone: &str) -> Result<LoadDraft> {
    let created_at = datetime::canonicalize(required(values, "createdAt")?)?;
    Ok(LoadDraft::new_entry(
        required(values, "celuloseType")?,
        required(values, "operator")?,
        required(values, "shift")?,
        created_at,
        timezone,
    )
    .with_id(id))
}

/// Turn validated search values into a filter. "Todos" and an absent
/// material both mean "do not filter by material".
pub fn filter_from_values(values: &FormValues) -> LoadFilter {
    let material = values
        .get("celuloseType")
        .filter(|m| *m != MATERIAL_ALL)
        .map(str::to_string);
    LoadFilter {
        material,
        first_date: values.get("firstDate").map(str::to_string),
        second_date: values.get("seccondDate").map(str::to_string),
    }
}
