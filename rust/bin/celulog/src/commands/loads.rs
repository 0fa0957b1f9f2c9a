//! One-shot load commands: list, register, edit, remove, search.

use std::io;
use std::path::Path;

use anyhow::Result;
use celulog_client::CelluloseClient;
use celulog_confirm::Confirmer;
use celulog_forms::{FieldError, FormValues};
use celulog_query::{LoadService, QueryKey};
use tracing::debug;

use crate::config::{self, ClientConfig, Settings};
use crate::dialogs;
use crate::forms;
use crate::prompt;
use crate::table;
use crate::{EditArgs, RegisterArgs, SearchArgs};

/// Build the service for the resolved settings. Server resolution is
/// `--server` flag, then `CELULOG_SERVER`, then the current context.
pub(crate) fn connect(
    config_path: &Path,
    server_flag: Option<&str>,
) -> Result<(LoadService, Settings)> {
    let config = ClientConfig::load(config_path)?;
    let env_server = std::env::var("CELULOG_SERVER").ok();
    let settings = config::settings(&config, server_flag, env_server.as_deref());
    if settings.server.is_empty() {
        anyhow::bail!(
            "No server URL configured. Run `celulog context create <name> --server <url>` or pass --server."
        );
    }
    debug!(server = %settings.server, wire = %settings.filter_wire, "resolved connection settings");
    let client = CelluloseClient::new(&settings.server).with_wire(settings.filter_wire);
    Ok((LoadService::new(client), settings))
}

fn validation_error(errors: Vec<FieldError>) -> anyhow::Error {
    let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow::anyhow!("{}", lines.join("\n"))
}

/// Most recent loads, as a table or JSON.
pub async fn latest(config_path: &Path, server: Option<&str>, json: bool) -> Result<()> {
    let (service, _) = connect(config_path, server)?;
    let loads = service.latest().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&loads)?);
    } else if loads.is_empty() {
        println!("No loads recorded yet.");
    } else {
        println!("{}", table::render_loads(&loads, false));
    }
    Ok(())
}

/// Today's totals per material.
pub async fn day(config_path: &Path, server: Option<&str>, json: bool) -> Result<()> {
    let (service, _) = connect(config_path, server)?;
    let summary = service.day_summary().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Total do dia ({}):", chrono::Local::now().format("%d/%m/%Y"));
    if summary.is_empty() {
        println!("  (no loads today)");
    } else {
        println!("{}", table::render_summary(&summary));
    }
    Ok(())
}

/// Search the history and optionally export the hits to a worksheet.
pub async fn search(
    config_path: &Path,
    server: Option<&str>,
    args: &SearchArgs,
    json: bool,
) -> Result<()> {
    let (service, _) = connect(config_path, server)?;

    let mut values = FormValues::new();
    if let Some(material) = args.material.as_deref() {
        values.set("celuloseType", material);
    }
    if let Some(from) = args.from.as_deref() {
        values.set("firstDate", from);
    }
    if let Some(to) = args.to.as_deref() {
        values.set("seccondDate", to);
    }

    let filter = forms::search_form()
        .submit(&values, forms::filter_from_values)
        .map_err(validation_error)?;

    let loads = service.filtered(&filter).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&loads)?);
    } else if loads.is_empty() {
        println!("No loads matched.");
    } else {
        println!("{}", table::render_loads(&loads, false));
    }

    if let Some(path) = args.export.as_deref() {
        if loads.is_empty() {
            println!("Nothing to export.");
            return Ok(());
        }
        let confirmer = Confirmer::new();
        let mut input = io::stdin().lock();
        let mut screen = io::stderr();
        let go = prompt::confirm_with(
            &confirmer,
            dialogs::download(),
            args.yes,
            &mut input,
            &mut screen,
        )
        .await?;
        if go {
            let bytes = celulog_report::export_loads(&loads)?;
            std::fs::write(path, bytes)?;
            println!("Wrote {} loads to {}.", loads.len(), path);
        }
    }
    Ok(())
}

/// Register a new load. Flags pre-fill form fields; anything missing
/// is prompted for.
pub async fn register(
    config_path: &Path,
    server: Option<&str>,
    args: &RegisterArgs,
    json: bool,
) -> Result<()> {
    let (service, settings) = connect(config_path, server)?;

    let mut values = FormValues::new();
    if let Some(operator) = args.operator.as_deref() {
        values.set("operator", operator);
    }
    if let Some(shift) = args.shift.as_deref() {
        values.set("shift", shift);
    }
    if let Some(material) = args.material.as_deref() {
        values.set("celuloseType", material);
    }

    let mut input = io::stdin().lock();
    let mut screen = io::stderr();
    let schema = forms::create_form();
    let values = prompt::fill_form(&schema, values, &mut input, &mut screen)?;
    let draft = schema
        .submit(&values, |v| forms::new_draft(v, &settings.timezone))
        .map_err(validation_error)??;

    let confirmer = Confirmer::new();
    let go = prompt::confirm_with(
        &confirmer,
        dialogs::register(),
        args.yes,
        &mut input,
        &mut screen,
    )
    .await?;
    if !go {
        println!("Cancelled.");
        return Ok(());
    }

    let created = service
        .create(&draft, &[QueryKey::Latest, QueryKey::DaySummary])
        .await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        match &created.id {
            Some(id) => println!("Load registered with id {}.", id),
            None => println!("Load registered."),
        }
    }
    Ok(())
}

/// Replace an existing load.
pub async fn edit(
    config_path: &Path,
    server: Option<&str>,
    args: &EditArgs,
    json: bool,
) -> Result<()> {
    let (service, settings) = connect(config_path, server)?;

    let mut values = FormValues::new();
    if let Some(operator) = args.operator.as_deref() {
        values.set("operator", operator);
    }
    if let Some(shift) = args.shift.as_deref() {
        values.set("shift", shift);
    }
    if let Some(material) = args.material.as_deref() {
        values.set("celuloseType", material);
    }
    if let Some(created_at) = args.created_at.as_deref() {
        values.set("createdAt", created_at);
    }

    let mut input = io::stdin().lock();
    let mut screen = io::stderr();
    let schema = forms::update_form();
    let values = prompt::fill_form(&schema, values, &mut input, &mut screen)?;
    let draft = schema
        .submit(&values, |v| forms::edit_draft(v, &args.id, &settings.timezone))
        .map_err(validation_error)??;

    let confirmer = Confirmer::new();
    let go = prompt::confirm_with(
        &confirmer,
        dialogs::update(),
        args.yes,
        &mut input,
        &mut screen,
    )
    .await?;
    if !go {
        println!("Cancelled.");
        return Ok(());
    }

    let updated = service
        .update(&draft, &[QueryKey::Latest, QueryKey::DaySummary])
        .await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Load {} updated.", args.id);
    }
    Ok(())
}

/// Remove a load after the destructive-action prompt.
pub async fn remove(
    config_path: &Path,
    server: Option<&str>,
    id: &str,
    assume_yes: bool,
) -> Result<()> {
    let (service, _) = connect(config_path, server)?;

    let confirmer = Confirmer::new();
    let mut input = io::stdin().lock();
    let mut screen = io::stderr();
    let go = prompt::confirm_with(
        &confirmer,
        dialogs::delete(),
        assume_yes,
        &mut input,
        &mut screen,
    )
    .await?;
    if !go {
        println!("Cancelled.");
        return Ok(());
    }

    service
        .delete(id, &[QueryKey::Latest, QueryKey::DaySummary])
        .await?;
    println!("Load {} removed.", id);
    Ok(())
}

/// Show the resolved settings and probe the server.
pub async fn status(config_path: &Path, server: Option<&str>) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let env_server = std::env::var("CELULOG_SERVER").ok();
    let settings = config::settings(&config, server, env_server.as_deref());

    let context = config.current().map(|c| c.name.as_str()).unwrap_or("-");
    println!("Context:  {}", context);
    println!(
        "Server:   {}",
        if settings.server.is_empty() {
            "-"
        } else {
            settings.server.as_str()
        }
    );
    println!("Wire:     {}", settings.filter_wire);
    println!("Timezone: {}", settings.timezone);

    if settings.server.is_empty() {
        println!("Status:   no server configured");
        return Ok(());
    }

    let client = CelluloseClient::new(&settings.server).with_wire(settings.filter_wire);
    match client.latest().await {
        Ok(loads) => println!("Status:   connected ({} recent loads)", loads.len()),
        Err(err) => println!("Status:   unreachable ({})", err),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_join_one_per_line() {
        let err = validation_error(vec![
            FieldError {
                field: "operator".into(),
                message: "Selecione um operador".into(),
            },
            FieldError {
                field: "shift".into(),
                message: "Selecione um turno".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "operator: Selecione um operador\nshift: Selecione um turno"
        );
    }
}
