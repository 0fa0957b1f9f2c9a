//! Terminal prompts.
//!
//! Renders a [`celulog_forms`] schema as an interactive questionnaire:
//! each widget kind maps to a line-based prompt loop that keeps asking
//! until the answer would pass validation. Confirmation dialogs go
//! through the [`Confirmer`] broker so the single-slot guarantee holds
//! even when the prompt is a plain y/N line.
//!
//! Every function takes the reader and writer explicitly; tests drive
//! them with in-memory buffers.

use std::io::{self, BufRead, Write};

use celulog_confirm::{ConfirmOptions, Confirmer, Tone};
use celulog_core::datetime;
use celulog_forms::{Choice, FieldKind, FieldSpec, FormSchema, FormValues};

/// Read one trimmed line. A closed input stream is an error, not an
/// empty answer, so callers can tell EOF apart from a blank line.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

fn field_header(spec: &FieldSpec) -> String {
    match (&spec.placeholder, &spec.description) {
        (Some(hint), _) => format!("{} ({})", spec.label, hint),
        (None, Some(hint)) => format!("{} ({})", spec.label, hint),
        (None, None) => spec.label.clone(),
    }
}

/// Numbered pick list. Accepts a row number or the option value
/// itself; a blank line skips optional fields.
fn choose<R: BufRead, W: Write>(
    spec: &FieldSpec,
    options: &[&Choice],
    reader: &mut R,
    writer: &mut W,
) -> io::Result<Option<String>> {
    for (i, choice) in options.iter().enumerate() {
        writeln!(writer, "  {}. {}", i + 1, choice.label)?;
    }
    loop {
        write!(writer, "> ")?;
        writer.flush()?;
        let line = read_line(reader)?;
        if line.is_empty() {
            if spec.required {
                writeln!(writer, "{}", spec.missing_message())?;
                continue;
            }
            return Ok(None);
        }
        if let Ok(i) = line.parse::<usize>() {
            if (1..=options.len()).contains(&i) {
                return Ok(Some(options[i - 1].value.clone()));
            }
        }
        if let Some(choice) = options.iter().find(|c| c.value.eq_ignore_ascii_case(&line)) {
            return Ok(Some(choice.value.clone()));
        }
        writeln!(writer, "Choose 1-{}.", options.len())?;
    }
}

/// Search loop for long option lists. A query narrows by label; a
/// single hit is taken as the answer, several fall back to a numbered
/// pick over the hits.
fn pick_searchable<R: BufRead, W: Write>(
    spec: &FieldSpec,
    options: &[Choice],
    reader: &mut R,
    writer: &mut W,
) -> io::Result<Option<String>> {
    loop {
        write!(writer, "Search: ")?;
        writer.flush()?;
        let query = read_line(reader)?;
        if query.is_empty() {
            if spec.required {
                writeln!(writer, "{}", spec.missing_message())?;
                continue;
            }
            return Ok(None);
        }
        let hits: Vec<&Choice> = options.iter().filter(|c| c.matches(&query)).collect();
        match hits.len() {
            0 => writeln!(writer, "No match for {:?}.", query)?,
            1 => {
                writeln!(writer, "-> {}", hits[0].label)?;
                return Ok(Some(hits[0].value.clone()));
            }
            _ => {
                if let Some(value) = choose(spec, &hits, reader, writer)? {
                    return Ok(Some(value));
                }
                // Blank at the pick list backs out to a new search.
            }
        }
    }
}

fn read_date<R: BufRead, W: Write>(
    spec: &FieldSpec,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<Option<String>> {
    loop {
        write!(writer, "{} (yyyy-MM-dd): ", spec.label)?;
        writer.flush()?;
        let line = read_line(reader)?;
        if line.is_empty() {
            if spec.required {
                writeln!(writer, "{}", spec.missing_message())?;
                continue;
            }
            return Ok(None);
        }
        match datetime::parse_plain_date(&line) {
            Ok(date) => return Ok(Some(date.format(datetime::WIRE_DATE_FORMAT).to_string())),
            Err(err) => writeln!(writer, "{}", err)?,
        }
    }
}

fn read_clock<R: BufRead, W: Write>(
    label: &str,
    max: u32,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<u32> {
    loop {
        write!(writer, "{} (0-{}): ", label, max)?;
        writer.flush()?;
        match read_line(reader)?.parse::<u32>() {
            Ok(n) if n <= max => return Ok(n),
            _ => writeln!(writer, "Enter a number 0-{}.", max)?,
        }
    }
}

fn read_datetime<R: BufRead, W: Write>(
    spec: &FieldSpec,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<Option<String>> {
    writeln!(writer, "{}", field_header(spec))?;
    loop {
        write!(writer, "Date (yyyy-MM-dd): ")?;
        writer.flush()?;
        let line = read_line(reader)?;
        if line.is_empty() {
            if spec.required {
                writeln!(writer, "{}", spec.missing_message())?;
                continue;
            }
            return Ok(None);
        }
        let date = match datetime::parse_plain_date(&line) {
            Ok(date) => date.format(datetime::WIRE_DATE_FORMAT).to_string(),
            Err(err) => {
                writeln!(writer, "{}", err)?;
                continue;
            }
        };
        let hour = read_clock("Hour", 23, reader, writer)?;
        let minute = read_clock("Minute", 59, reader, writer)?;
        match datetime::compose_datetime(&date, hour, minute) {
            Ok(stamp) => return Ok(Some(stamp)),
            Err(err) => writeln!(writer, "{}", err)?,
        }
    }
}

/// Prompt for one field according to its widget kind.
pub fn read_field<R: BufRead, W: Write>(
    spec: &FieldSpec,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<Option<String>> {
    match &spec.kind {
        FieldKind::Select { options } | FieldKind::Radio { options } => {
            writeln!(writer, "{}", field_header(spec))?;
            let refs: Vec<&Choice> = options.iter().collect();
            choose(spec, &refs, reader, writer)
        }
        FieldKind::SearchSelect { options } => {
            writeln!(writer, "{}", field_header(spec))?;
            pick_searchable(spec, options, reader, writer)
        }
        FieldKind::Date => read_date(spec, reader, writer),
        FieldKind::DateTime => read_datetime(spec, reader, writer),
    }
}

/// Walk the schema and prompt for every field `values` does not
/// already carry. Seeded fields, e.g. from command-line flags, are
/// never asked again.
pub fn fill_form<R: BufRead, W: Write>(
    schema: &FormSchema,
    mut values: FormValues,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<FormValues> {
    for spec in schema.fields() {
        if values.get(&spec.name).is_some() {
            continue;
        }
        if let Some(value) = read_field(spec, reader, writer)? {
            values.set(spec.name.clone(), value);
        }
    }
    Ok(values)
}

/// Run a confirmation dialog over the broker and the terminal.
///
/// `assume_yes` answers without opening a prompt at all. Anything but
/// an explicit yes, `y`/`yes`/`s`/`sim`, declines.
pub async fn confirm_with<R: BufRead, W: Write>(
    confirmer: &Confirmer,
    options: ConfirmOptions,
    assume_yes: bool,
    reader: &mut R,
    writer: &mut W,
) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let pending = confirmer.request(options.clone())?;
    writeln!(writer)?;
    let marker = if options.tone == Tone::Destructive { "! " } else { "" };
    writeln!(writer, "{}{}", marker, options.title)?;
    if let Some(description) = &options.description {
        writeln!(writer, "{}", description)?;
    }
    write!(
        writer,
        "{} / {} [y/N]: ",
        options.confirm_label, options.cancel_label
    )?;
    writer.flush()?;
    let answer = match read_line(reader) {
        Ok(line) => line.to_lowercase(),
        Err(err) => {
            confirmer.dismiss();
            return Err(err.into());
        }
    };
    let accepted = matches!(answer.as_str(), "y" | "yes" | "s" | "sim");
    confirmer.resolve(accepted);
    Ok(pending.wait().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shift_spec() -> FieldSpec {
        FieldSpec::new(
            "shift",
            "Turno",
            FieldKind::Select {
                options: vec![
                    Choice::new("Turno A", "a"),
                    Choice::new("Turno B", "b"),
                    Choice::new("Turno C", "c"),
                ],
            },
        )
        .message("Selecione um turno")
    }

    fn material_spec() -> FieldSpec {
        FieldSpec::new(
            "celuloseType",
            "Material",
            FieldKind::SearchSelect {
                options: vec![
                    Choice::new("Fibra Curta Klabin", "fibra curta klabin"),
                    Choice::new("Fibra Longa Klabin", "fibra longa klabin"),
                    Choice::new("Fibra Longa Mercer", "fibra longa mercer"),
                ],
            },
        )
    }

    fn run_field(spec: &FieldSpec, input: &str) -> (Option<String>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let value = read_field(spec, &mut reader, &mut out).unwrap();
        (value, String::from_utf8(out).unwrap())
    }

    #[test]
    fn select_accepts_row_number() {
        let (value, out) = run_field(&shift_spec(), "2\n");
        assert_eq!(value.as_deref(), Some("b"));
        assert!(out.contains("1. Turno A"));
        assert!(out.contains("3. Turno C"));
    }

    #[test]
    fn select_accepts_value_text() {
        let (value, _) = run_field(&shift_spec(), "c\n");
        assert_eq!(value.as_deref(), Some("c"));
    }

    #[test]
    fn select_reprompts_on_nonsense() {
        let (value, out) = run_field(&shift_spec(), "9\nbanana\n1\n");
        assert_eq!(value.as_deref(), Some("a"));
        assert_eq!(out.matches("Choose 1-3.").count(), 2);
    }

    #[test]
    fn required_select_rejects_blank() {
        let (value, out) = run_field(&shift_spec(), "\n2\n");
        assert_eq!(value.as_deref(), Some("b"));
        assert!(out.contains("Selecione um turno"));
    }

    #[test]
    fn optional_date_skips_on_blank() {
        let spec = FieldSpec::new("firstDate", "Data inicial", FieldKind::Date).optional();
        let (value, _) = run_field(&spec, "\n");
        assert_eq!(value, None);
    }

    #[test]
    fn date_rejects_local_format() {
        let spec = FieldSpec::new("firstDate", "Data inicial", FieldKind::Date).optional();
        let (value, out) = run_field(&spec, "05/03/2024\n2024-03-05\n");
        assert_eq!(value.as_deref(), Some("2024-03-05"));
        assert!(out.contains("05/03/2024"));
    }

    #[test]
    fn datetime_composes_wire_timestamp() {
        let spec = FieldSpec::new("createdAt", "Data e Hora", FieldKind::DateTime)
            .message("Selecione a data e hora");
        let (value, out) = run_field(&spec, "2024-03-05\n14\n30\n");
        assert_eq!(value.as_deref(), Some("2024-03-05 14:30:00"));
        assert!(out.contains("Hour (0-23): "));
        assert!(out.contains("Minute (0-59): "));
    }

    #[test]
    fn clock_input_is_range_checked() {
        let mut reader = Cursor::new(b"24\nxx\n7\n".to_vec());
        let mut out = Vec::new();
        let hour = read_clock("Hour", 23, &mut reader, &mut out).unwrap();
        assert_eq!(hour, 7);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Enter a number 0-23.").count(), 2);
    }

    #[test]
    fn searchable_narrows_then_picks() {
        let (value, out) = run_field(&material_spec(), "klabin\n2\n");
        assert_eq!(value.as_deref(), Some("fibra longa klabin"));
        assert!(out.contains("1. Fibra Curta Klabin"));
        assert!(out.contains("2. Fibra Longa Klabin"));
        assert!(!out.contains("Mercer"));
    }

    #[test]
    fn searchable_single_hit_autopicks() {
        let (value, out) = run_field(&material_spec(), "mercer\n");
        assert_eq!(value.as_deref(), Some("fibra longa mercer"));
        assert!(out.contains("-> Fibra Longa Mercer"));
    }

    #[test]
    fn searchable_retries_when_nothing_matches() {
        let (value, out) = run_field(&material_spec(), "zzz\nmercer\n");
        assert_eq!(value.as_deref(), Some("fibra longa mercer"));
        assert!(out.contains("No match for \"zzz\"."));
    }

    #[test]
    fn eof_surfaces_as_error() {
        let mut reader = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = read_field(&shift_spec(), &mut reader, &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn fill_form_skips_seeded_fields() {
        let schema = FormSchema::new(vec![
            shift_spec(),
            FieldSpec::new("firstDate", "Data inicial", FieldKind::Date).optional(),
        ]);
        let mut values = FormValues::new();
        values.set("shift", "a");
        let mut reader = Cursor::new(b"\n".to_vec());
        let mut out = Vec::new();
        let filled = fill_form(&schema, values, &mut reader, &mut out).unwrap();
        assert_eq!(filled.get("shift"), Some("a"));
        assert_eq!(filled.get("firstDate"), None);
        // The seeded select never printed its menu.
        assert!(!String::from_utf8(out).unwrap().contains("Turno A"));
    }

    #[tokio::test]
    async fn confirm_accepts_sim() {
        let confirmer = Confirmer::new();
        let options = ConfirmOptions::new("Confirmar registro")
            .description("Tem certeza que deseja adicionar um novo registro?")
            .labels("Sim, registrar", "Cancelar");
        let mut reader = Cursor::new(b"sim\n".to_vec());
        let mut out = Vec::new();
        let accepted = confirm_with(&confirmer, options, false, &mut reader, &mut out)
            .await
            .unwrap();
        assert!(accepted);
        assert!(!confirmer.is_open());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Confirmar registro"));
        assert!(text.contains("Sim, registrar / Cancelar [y/N]: "));
    }

    #[tokio::test]
    async fn confirm_defaults_to_declined() {
        let confirmer = Confirmer::new();
        let mut reader = Cursor::new(b"\n".to_vec());
        let mut out = Vec::new();
        let accepted = confirm_with(
            &confirmer,
            ConfirmOptions::new("Download"),
            false,
            &mut reader,
            &mut out,
        )
        .await
        .unwrap();
        assert!(!accepted);
        assert!(!confirmer.is_open());
    }

    #[tokio::test]
    async fn assume_yes_skips_the_prompt() {
        let confirmer = Confirmer::new();
        let mut reader = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let accepted = confirm_with(
            &confirmer,
            ConfirmOptions::new("Download"),
            true,
            &mut reader,
            &mut out,
        )
        .await
        .unwrap();
        assert!(accepted);
        assert!(!confirmer.is_open());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn broker_slot_frees_after_each_prompt() {
        let confirmer = Confirmer::new();
        for answer in [&b"y\n"[..], &b"n\n"[..]] {
            let mut reader = Cursor::new(answer.to_vec());
            let mut out = Vec::new();
            confirm_with(
                &confirmer,
                ConfirmOptions::new("Download"),
                false,
                &mut reader,
                &mut out,
            )
            .await
            .unwrap();
        }
        assert!(!confirmer.is_open());
    }

    #[tokio::test]
    async fn destructive_prompt_is_flagged() {
        let confirmer = Confirmer::new();
        let options = ConfirmOptions::new("Confirmar exclusão").tone(Tone::Destructive);
        let mut reader = Cursor::new(b"n\n".to_vec());
        let mut out = Vec::new();
        confirm_with(&confirmer, options, false, &mut reader, &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("! Confirmar exclusão"));
    }
}
