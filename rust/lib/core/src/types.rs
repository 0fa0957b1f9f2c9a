use serde::{Deserialize, Serialize};

/// Average weight assigned to every registered load, in kilograms.
pub const DEFAULT_AVERAGE_WEIGHT: f64 = 3000.0;

/// Measurement unit used for load weights.
pub const DEFAULT_UNIT: &str = "KG";

/// A cellulose load as the backend returns it.
///
/// Field names follow the backend's camelCase JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    /// Backend-assigned identifier.
    pub id: String,

    /// Material catalog value, e.g. `"Fibra Longa Klabin"`.
    pub material: String,

    /// Average weight of the load.
    pub average_weight: f64,

    /// Weight unit, always `"KG"` in practice.
    pub unit: String,

    /// Registration timestamp in `yyyy-MM-dd HH:mm:ss` or ISO-8601 form.
    pub created_at: String,

    /// IANA timezone the timestamp was recorded in. Older records
    /// predate this field, so it is tolerated as absent on read.
    #[serde(default)]
    pub timezone: String,

    /// Operator catalog value.
    pub operator: String,

    /// Shift catalog value (`"a"` through `"e"`).
    pub shift: String,
}

/// Per-material weight total for the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub material: String,
    pub total_weight: f64,
}

/// Search filter for the load history.
///
/// `None` in `material` means "all materials"; `None` dates leave that
/// bound open. The struct itself stays wire-agnostic; the client crate
/// owns the two competing JSON spellings of the date bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LoadFilter {
    pub material: Option<String>,
    /// Inclusive lower bound, plain `yyyy-MM-dd` date.
    pub first_date: Option<String>,
    /// Inclusive upper bound, plain `yyyy-MM-dd` date.
    pub second_date: Option<String>,
}

impl LoadFilter {
    /// True when no field narrows the search.
    pub fn is_unbounded(&self) -> bool {
        self.material.is_none() && self.first_date.is_none() && self.second_date.is_none()
    }
}

/// Payload for creating or editing a load.
///
/// `id` is absent on create and set by the backend; edits carry the id
/// in the URL as well, so it is skipped from the body when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub material: String,
    pub average_weight: f64,
    pub unit: String,
    pub created_at: String,
    pub timezone: String,
    pub operator: String,
    pub shift: String,
}

impl LoadDraft {
    /// Draft for a brand-new load with the fixed weight and unit every
    /// registration carries.
    pub fn new_entry(
        material: impl Into<String>,
        operator: impl Into<String>,
        shift: impl Into<String>,
        created_at: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            material: material.into(),
            average_weight: DEFAULT_AVERAGE_WEIGHT,
            unit: DEFAULT_UNIT.to_string(),
            created_at: created_at.into(),
            timezone: timezone.into(),
            operator: operator.into(),
            shift: shift.into(),
        }
    }

    /// Same draft bound to an existing record id, for edits.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
