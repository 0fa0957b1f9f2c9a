//! Fixed option catalogs.
//!
//! The plant runs with a closed roster of operators, five rotating
//! shifts, and a short list of approved cellulose materials. These are
//! configuration data, not user input, so they live as constants.
//! Labels are the human-facing Portuguese strings; values are what the
//! backend stores.

/// One catalog option: display label plus stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub value: &'static str,
}

/// Sentinel material value meaning "do not filter by material".
pub const MATERIAL_ALL: &str = "all";

pub const MATERIALS: &[CatalogEntry] = &[
    CatalogEntry {
        label: "Fibra Longa Klabin",
        value: "fibra longa klabin",
    },
    CatalogEntry {
        label: "Fibra Curta Klabin",
        value: "fibra curta klabin",
    },
    CatalogEntry {
        label: "Fibra Longa UPM PULP",
        value: "fibra longa upm pulp",
    },
    CatalogEntry {
        label: "Fibra Longa Mercer",
        value: "fibra longa mercer",
    },
    CatalogEntry {
        label: "Fibra Longa Rottneros",
        value: "fibra longa rottneros",
    },
];

pub const OPERATORS: &[CatalogEntry] = &[
    CatalogEntry {
        label: "Aldo Vitorino da Silva",
        value: "aldo vitorino da silva",
    },
    CatalogEntry {
        label: "Carlos Eduardo Aparecido Stetiski Dutra",
        value: "carlos eduardo aparecido stetiski dutra",
    },
    CatalogEntry {
        label: "Felipe Rodrigues",
        value: "felipe rodrigues",
    },
    CatalogEntry {
        label: "Luciano Hattanda Sugiyama",
        value: "luciano hattanda sugiyama",
    },
    CatalogEntry {
        label: "Saimon de Matos Leandro",
        value: "saimon de matos leandro",
    },
];

pub const SHIFTS: &[CatalogEntry] = &[
    CatalogEntry {
        label: "Turno A",
        value: "a",
    },
    CatalogEntry {
        label: "Turno B",
        value: "b",
    },
    CatalogEntry {
        label: "Turno C",
        value: "c",
    },
    CatalogEntry {
        label: "Turno D",
        value: "d",
    },
    CatalogEntry {
        label: "Turno E",
        value: "e",
    },
];

/// Look up the display label for a stored value.
pub fn label_for(entries: &[CatalogEntry], value: &str) -> Option<&'static str> {
    entries.iter().find(|e| e.value == value).map(|e| e.label)
}

/// Whether a value belongs to the catalog.
pub fn is_known(entries: &[CatalogEntry], value: &str) -> bool {
    entries.iter().any(|e| e.value == value)
}
