//! Plain-text tables for load listings and day totals.

use celulog_core::{datetime, DailySummary, Load};

const LOAD_HEADERS: [&str; 7] = [
    "ID",
    "Material",
    "Peso Médio",
    "Data",
    "Hora",
    "Operador",
    "Turno",
];

/// Weights are whole kilograms almost always; print them without a
/// decimal point unless one is needed.
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        format!("{}", weight)
    }
}

fn load_cells(load: &Load) -> Vec<String> {
    let date = datetime::local_date(&load.created_at).unwrap_or_else(|_| "-".to_string());
    let time = datetime::local_time(&load.created_at).unwrap_or_else(|_| "-".to_string());
    vec![
        load.id.clone(),
        load.material.clone(),
        format!("{} {}", format_weight(load.average_weight), load.unit),
        date,
        time,
        load.operator.clone(),
        load.shift.clone(),
    ]
}

/// Column-aligned listing of loads. With `numbered`, a 1-based row
/// index leads each line so screen commands can refer to rows.
pub fn render_loads(loads: &[Load], numbered: bool) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(loads.len() + 1);

    let mut header: Vec<String> = Vec::new();
    if numbered {
        header.push("#".to_string());
    }
    header.extend(LOAD_HEADERS.iter().map(|h| h.to_string()));
    rows.push(header);

    for (i, load) in loads.iter().enumerate() {
        let mut cells = Vec::new();
        if numbered {
            cells.push((i + 1).to_string());
        }
        cells.extend(load_cells(load));
        rows.push(cells);
    }

    align(&rows)
}

/// Day totals, one line per material: `fibra longa klabin: 9000 KG`.
pub fn render_summary(rows: &[DailySummary]) -> String {
    rows.iter()
        .map(|row| format!("  {}: {} KG", row.material, format_weight(row.total_weight)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pad every column to its widest cell. Widths count characters, so
/// accented headers line up.
fn align(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = widths[i].saturating_sub(cell.chars().count());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ");
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
