//! Interactive session.
//!
//! Two screens mirror the product's two pages. The entry screen shows
//! today's totals and the latest loads and takes registrations; the
//! search screen runs filtered history searches and exports. Rows are
//! addressed by the printed 1-based index.
//!
//! Mutations that fail print the error and leave the screen up; only
//! terminal I/O failures end the session.

use std::io::{self, StdinLock, Stdout, Write};
use std::path::Path;

use anyhow::Result;
use celulog_confirm::{ConfirmOptions, Confirmer};
use celulog_core::{Load, LoadFilter};
use celulog_forms::FormValues;
use celulog_query::{LoadService, QueryKey};

use crate::commands::loads::connect;
use crate::dialogs;
use crate::forms;
use crate::prompt;
use crate::table;

enum Screen {
    Entry,
    Search,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Register,
    Edit(usize),
    Delete(usize),
    Search,
    Export,
    Refresh,
    Back,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let word = parts.next().unwrap_or("");
    let arg = parts.next().and_then(|n| n.parse::<usize>().ok());
    match (word, arg) {
        ("r" | "register", _) => Command::Register,
        ("e" | "edit", Some(n)) => Command::Edit(n),
        ("d" | "delete", Some(n)) => Command::Delete(n),
        ("s" | "search", _) => Command::Search,
        ("x" | "export", _) => Command::Export,
        ("u" | "refresh", _) => Command::Refresh,
        ("b" | "back", _) => Command::Back,
        ("q" | "quit", _) => Command::Quit,
        ("h" | "help" | "?", _) => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Row lookup for `edit <n>` / `delete <n>`.
fn pick(rows: &[Load], index: usize) -> Option<&Load> {
    index.checked_sub(1).and_then(|i| rows.get(i))
}

pub async fn run(config_path: &Path, server: Option<&str>) -> Result<()> {
    let (service, settings) = connect(config_path, server)?;
    let mut session = Session {
        service,
        timezone: settings.timezone,
        confirmer: Confirmer::new(),
        input: io::stdin().lock(),
        out: io::stdout(),
    };
    session.run().await
}

struct Session {
    service: LoadService,
    timezone: String,
    confirmer: Confirmer,
    input: StdinLock<'static>,
    out: Stdout,
}

impl Session {
    async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "celulog session (h for help, q to quit)")?;
        let mut screen = Screen::Entry;
        loop {
            let next = match screen {
                Screen::Entry => self.entry_screen().await?,
                Screen::Search => self.search_screen().await?,
            };
            match next {
                Some(s) => screen = s,
                None => return Ok(()),
            }
        }
    }

    /// Prompt for one command. `None` means stdin closed.
    fn command(&mut self, prompt_text: &str) -> io::Result<Option<Command>> {
        write!(self.out, "{}", prompt_text)?;
        self.out.flush()?;
        match prompt::read_line(&mut self.input) {
            Ok(line) => Ok(Some(parse_command(&line))),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Confirm over the broker. `Ok(None)` means stdin closed, which
    /// callers read as declined.
    async fn confirm(&mut self, options: ConfirmOptions) -> Result<Option<bool>> {
        let asked =
            prompt::confirm_with(&self.confirmer, options, false, &mut self.input, &mut self.out)
                .await;
        match asked {
            Ok(go) => Ok(Some(go)),
            Err(err) => match err.downcast_ref::<io::Error>() {
                Some(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
                _ => Err(err),
            },
        }
    }

    // ── Entry screen ────────────────────────────────────────────────

    async fn draw_entry(&mut self) -> Result<Vec<Load>> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Total do dia ({}):",
            chrono::Local::now().format("%d/%m/%Y")
        )?;
        match self.service.day_summary().await {
            Ok(rows) if rows.is_empty() => writeln!(self.out, "  (no loads today)")?,
            Ok(rows) => writeln!(self.out, "{}", table::render_summary(&rows))?,
            Err(err) => writeln!(self.out, "  error: {}", err)?,
        }
        writeln!(self.out)?;
        let loads = match self.service.latest().await {
            Ok(loads) => loads,
            Err(err) => {
                writeln!(self.out, "error: {}", err)?;
                return Ok(Vec::new());
            }
        };
        if loads.is_empty() {
            writeln!(self.out, "No loads recorded yet.")?;
        } else {
            writeln!(self.out, "{}", table::render_loads(&loads, true))?;
        }
        Ok(loads)
    }

    async fn entry_screen(&mut self) -> Result<Option<Screen>> {
        loop {
            let rows = self.draw_entry().await?;
            let command = match self.command("entry> ")? {
                Some(command) => command,
                None => return Ok(None),
            };
            match command {
                Command::Register => self.register().await?,
                Command::Edit(n) => match pick(&rows, n) {
                    Some(load) => {
                        self.edit(load, &[QueryKey::Latest, QueryKey::DaySummary])
                            .await?
                    }
                    None => writeln!(self.out, "No such row.")?,
                },
                Command::Delete(n) => match pick(&rows, n) {
                    Some(load) => {
                        self.delete(load, &[QueryKey::Latest, QueryKey::DaySummary])
                            .await?
                    }
                    None => writeln!(self.out, "No such row.")?,
                },
                Command::Refresh => self.service.refresh().await,
                Command::Search => return Ok(Some(Screen::Search)),
                Command::Export => writeln!(self.out, "Export works from the search screen.")?,
                Command::Back => writeln!(self.out, "Already on the entry screen.")?,
                Command::Quit => return Ok(None),
                Command::Help => self.help_entry()?,
                Command::Unknown(line) => {
                    writeln!(self.out, "Unknown command {:?}. h for help.", line)?
                }
            }
        }
    }

    async fn register(&mut self) -> Result<()> {
        let schema = forms::create_form();
        let filled =
            prompt::fill_form(&schema, FormValues::new(), &mut self.input, &mut self.out);
        let values = match filled {
            Ok(values) => values,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.out, "Cancelled.")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let timezone = self.timezone.clone();
        let draft = match schema.submit(&values, |v| forms::new_draft(v, &timezone)) {
            Ok(Ok(draft)) => draft,
            Ok(Err(err)) => {
                writeln!(self.out, "error: {}", err)?;
                return Ok(());
            }
            Err(errors) => {
                for e in errors {
                    writeln!(self.out, "{}", e)?;
                }
                return Ok(());
            }
        };
        if self.confirm(dialogs::register()).await? != Some(true) {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }
        let created = self
            .service
            .create(&draft, &[QueryKey::Latest, QueryKey::DaySummary])
            .await;
        match created {
            Ok(_) => writeln!(self.out, "Load registered.")?,
            Err(err) => writeln!(self.out, "error: {}", err)?,
        }
        Ok(())
    }

    async fn edit(&mut self, load: &Load, keys: &[QueryKey]) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Alteração de registro")?;
        writeln!(self.out, "Preencha as informações a serem alteradas")?;
        writeln!(
            self.out,
            "{}",
            table::render_loads(std::slice::from_ref(load), false)
        )?;
        let schema = forms::update_form();
        let filled =
            prompt::fill_form(&schema, FormValues::new(), &mut self.input, &mut self.out);
        let values = match filled {
            Ok(values) => values,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.out, "Cancelled.")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let timezone = self.timezone.clone();
        let draft = match schema.submit(&values, |v| forms::edit_draft(v, &load.id, &timezone)) {
            Ok(Ok(draft)) => draft,
            Ok(Err(err)) => {
                writeln!(self.out, "error: {}", err)?;
                return Ok(());
            }
            Err(errors) => {
                for e in errors {
                    writeln!(self.out, "{}", e)?;
                }
                return Ok(());
            }
        };
        if self.confirm(dialogs::update()).await? != Some(true) {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }
        match self.service.update(&draft, keys).await {
            Ok(_) => writeln!(self.out, "Load {} updated.", load.id)?,
            Err(err) => writeln!(self.out, "error: {}", err)?,
        }
        Ok(())
    }

    async fn delete(&mut self, load: &Load, keys: &[QueryKey]) -> Result<()> {
        if self.confirm(dialogs::delete()).await? != Some(true) {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }
        match self.service.delete(&load.id, keys).await {
            Ok(()) => writeln!(self.out, "Load {} removed.", load.id)?,
            Err(err) => writeln!(self.out, "error: {}", err)?,
        }
        Ok(())
    }

    fn help_entry(&mut self) -> io::Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  r, register      register a new load")?;
        writeln!(self.out, "  e, edit <n>      change row n")?;
        writeln!(self.out, "  d, delete <n>    remove row n")?;
        writeln!(self.out, "  u, refresh       refetch the day and latest views")?;
        writeln!(self.out, "  s, search        go to the search screen")?;
        writeln!(self.out, "  q, quit          leave")?;
        Ok(())
    }

    // ── Search screen ───────────────────────────────────────────────

    fn prompt_filter(&mut self) -> Result<Option<LoadFilter>> {
        let schema = forms::search_form();
        loop {
            let filled =
                prompt::fill_form(&schema, FormValues::new(), &mut self.input, &mut self.out);
            let values = match filled {
                Ok(values) => values,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(err) => return Err(err.into()),
            };
            match schema.submit(&values, forms::filter_from_values) {
                Ok(filter) => return Ok(Some(filter)),
                Err(errors) => {
                    for e in errors {
                        writeln!(self.out, "{}", e)?;
                    }
                }
            }
        }
    }

    async fn draw_search(&mut self, filter: &LoadFilter) -> Result<Vec<Load>> {
        if self.service.cached_filtered(filter).await.is_none() {
            writeln!(self.out, "Buscando...")?;
        }
        let loads = match self.service.filtered(filter).await {
            Ok(loads) => loads,
            Err(err) => {
                writeln!(self.out, "error: {}", err)?;
                return Ok(Vec::new());
            }
        };
        if loads.is_empty() {
            writeln!(self.out, "No loads matched.")?;
        } else {
            writeln!(self.out, "{}", table::render_loads(&loads, true))?;
        }
        Ok(loads)
    }

    async fn search_screen(&mut self) -> Result<Option<Screen>> {
        writeln!(self.out)?;
        let mut filter = match self.prompt_filter()? {
            Some(filter) => filter,
            None => return Ok(None),
        };
        loop {
            let rows = self.draw_search(&filter).await?;
            let command = match self.command("search> ")? {
                Some(command) => command,
                None => return Ok(None),
            };
            match command {
                Command::Search => match self.prompt_filter()? {
                    Some(next) => filter = next,
                    None => return Ok(None),
                },
                Command::Export => self.export(&rows).await?,
                Command::Edit(n) => match pick(&rows, n) {
                    Some(load) => self.edit(load, &[QueryKey::Filtered]).await?,
                    None => writeln!(self.out, "No such row.")?,
                },
                Command::Delete(n) => match pick(&rows, n) {
                    Some(load) => self.delete(load, &[QueryKey::Filtered]).await?,
                    None => writeln!(self.out, "No such row.")?,
                },
                Command::Refresh => self.service.invalidate(&[QueryKey::Filtered]).await,
                Command::Register => {
                    writeln!(self.out, "Register works from the entry screen.")?
                }
                Command::Back => return Ok(Some(Screen::Entry)),
                Command::Quit => return Ok(None),
                Command::Help => self.help_search()?,
                Command::Unknown(line) => {
                    writeln!(self.out, "Unknown command {:?}. h for help.", line)?
                }
            }
        }
    }

    async fn export(&mut self, rows: &[Load]) -> Result<()> {
        if rows.is_empty() {
            writeln!(self.out, "Nothing to export.")?;
            return Ok(());
        }
        if self.confirm(dialogs::download()).await? != Some(true) {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }
        match celulog_report::export_loads(rows) {
            Ok(bytes) => {
                std::fs::write(celulog_report::DEFAULT_EXPORT_FILE, bytes)?;
                writeln!(
                    self.out,
                    "Wrote {} loads to {}.",
                    rows.len(),
                    celulog_report::DEFAULT_EXPORT_FILE
                )?;
            }
            Err(err) => writeln!(self.out, "error: {}", err)?,
        }
        Ok(())
    }

    fn help_search(&mut self) -> io::Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  s, search        enter a new filter")?;
        writeln!(self.out, "  x, export        write the results to export.xlsx")?;
        writeln!(self.out, "  e, edit <n>      change row n")?;
        writeln!(self.out, "  d, delete <n>    remove row n")?;
        writeln!(self.out, "  u, refresh       refetch the search results")?;
        writeln!(self.out, "  b, back          return to the entry screen")?;
        writeln!(self.out, "  q, quit          leave")?;
        Ok(())
    }
}
