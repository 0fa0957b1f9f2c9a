//! Search-filter wire encoding.
//!
//! Two backend generations disagree on the filter payload's field
//! names: the older API reads `first_date`/`seccond_date`, the newer
//! one `firstDate`/`seccondDate`. The misspelled "seccond" is part of
//! the contract on both sides and must be preserved verbatim. Which
//! spelling goes on the wire is an explicit client setting instead of
//! something guessed per request.

use celulog_core::LoadFilter;
use serde::{Deserialize, Serialize};

/// Field spelling used in `POST /celulose/filtered` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterWire {
    /// `first_date` / `seccond_date`.
    Snake,
    /// `firstDate` / `seccondDate`. Current backend default.
    #[default]
    Camel,
}

impl FilterWire {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterWire::Snake => "snake",
            FilterWire::Camel => "camel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "snake" => Some(FilterWire::Snake),
            "camel" => Some(FilterWire::Camel),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterWire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct SnakeFilter<'a> {
    material: &'a str,
    first_date: Option<&'a str>,
    seccond_date: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CamelFilter<'a> {
    material: &'a str,
    first_date: Option<&'a str>,
    seccond_date: Option<&'a str>,
}

/// Encode a filter for the wire. A missing material goes out as the
/// empty string and missing dates as explicit `null`s; the backend
/// treats both as "unbounded".
pub(crate) fn filter_body(filter: &LoadFilter, wire: FilterWire) -> serde_json::Value {
    let material = filter.material.as_deref().unwrap_or("");
    let first_date = filter.first_date.as_deref();
    let seccond_date = filter.second_date.as_deref();
    let encoded = match wire {
        FilterWire::Snake => serde_json::to_value(SnakeFilter {
            material,
            first_date,
            seccond_date,
        }),
        FilterWire::Camel => serde_json::to_value(CamelFilter {
            material,
            first_date,
            seccond_date,
        }),
    };
    // Both structs serialize infallibly: strings and options only.
    encoded.unwrap_or_else(|_| serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_filter() -> LoadFilter {
        LoadFilter {
            material: Some("fibra curta klabin".into()),
            first_date: Some("2024-03-01".into()),
            second_date: None,
        }
    }

    #[test]
    fn camel_spelling_keeps_the_misspelled_seccond() {
        let body = filter_body(&sample_filter(), FilterWire::Camel);
        assert_eq!(
            body,
            serde_json::json!({
                "material": "fibra curta klabin",
                "firstDate": "2024-03-01",
                "seccondDate": null,
            })
        );
    }

    #[test]
    fn snake_spelling_keeps_the_misspelled_seccond() {
        let body = filter_body(&sample_filter(), FilterWire::Snake);
        assert_eq!(
            body,
            serde_json::json!({
                "material": "fibra curta klabin",
                "first_date": "2024-03-01",
                "seccond_date": null,
            })
        );
    }

    #[test]
    fn unbounded_filter_sends_empty_material_and_nulls() {
        let body = filter_body(&LoadFilter::default(), FilterWire::Camel);
        assert_eq!(
            body,
            serde_json::json!({
                "material": "",
                "firstDate": null,
                "seccondDate": null,
            })
        );
    }

    #[test]
    fn wire_parses_and_displays() {
        assert_eq!(FilterWire::parse("snake"), Some(FilterWire::Snake));
        assert_eq!(FilterWire::parse("camel"), Some(FilterWire::Camel));
        assert_eq!(FilterWire::parse("kebab"), None);
        assert_eq!(FilterWire::Camel.to_string(), "camel");
        assert_eq!(FilterWire::default(), FilterWire::Camel);
    }
}
