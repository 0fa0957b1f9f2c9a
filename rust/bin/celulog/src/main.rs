//! `celulog` — the cellulose load logbook CLI.
//!
//! Terminal twin of the plant's data-entry screens: register incoming
//! loads, watch the day's totals, search the history, export
//! worksheets. Contexts hold the server URL and wire settings, like
//! kubectl contexts hold clusters.

mod commands;
mod config;
mod dialogs;
mod forms;
mod prompt;
mod table;

use clap::{Args, Parser, Subcommand};

/// Cellulose load logbook.
#[derive(Parser, Debug)]
#[command(name = "celulog", about = "Cellulose load logbook CLI")]
struct Cli {
    /// Path to client config file (default: ~/.celulog/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Server base URL: stored by `context create`/`set`, a
    /// per-invocation override everywhere else.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (server URL, timezone, filter wire spelling).
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Show the most recent loads.
    Latest,

    /// Show today's totals per material.
    Day,

    /// Search the history, optionally exporting the hits to .xlsx.
    Search(SearchArgs),

    /// Register a new load.
    Register(RegisterArgs),

    /// Change an existing load.
    Edit(EditArgs),

    /// Remove a load.
    Remove {
        /// Record ID.
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show resolved settings and probe the server.
    Status,

    /// Interactive entry and search screens.
    Session,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Material to filter by ("all" clears the filter).
    #[arg(long)]
    material: Option<String>,

    /// Start date, yyyy-MM-dd.
    #[arg(long = "from")]
    from: Option<String>,

    /// End date, yyyy-MM-dd.
    #[arg(long = "to")]
    to: Option<String>,

    /// Write the hits to an .xlsx file (default: export.xlsx).
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = celulog_report::DEFAULT_EXPORT_FILE
    )]
    export: Option<String>,

    /// Skip confirmations.
    #[arg(long = "yes", short = 'y')]
    yes: bool,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    /// Operator name.
    #[arg(long)]
    operator: Option<String>,

    /// Shift letter, a through e.
    #[arg(long)]
    shift: Option<String>,

    /// Cellulose material.
    #[arg(long)]
    material: Option<String>,

    /// Skip confirmations.
    #[arg(long = "yes", short = 'y')]
    yes: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Record ID.
    id: String,

    /// Operator name.
    #[arg(long)]
    operator: Option<String>,

    /// Shift letter, a through e.
    #[arg(long)]
    shift: Option<String>,

    /// Cellulose material.
    #[arg(long)]
    material: Option<String>,

    /// Registration timestamp, yyyy-MM-dd HH:mm.
    #[arg(long = "at")]
    created_at: Option<String>,

    /// Skip confirmations.
    #[arg(long = "yes", short = 'y')]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context. `--server` sets its URL.
    Create {
        /// Context name.
        name: String,
        /// IANA timezone recorded on new loads.
        #[arg(long)]
        timezone: Option<String>,
        /// Filter field spelling: camel or snake.
        #[arg(long = "filter-wire")]
        wire: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long = "filter-wire")]
        wire: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging. Quiet by default; RUST_LOG=info shows the
    // service-layer cache and mutation logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let server = cli.server.as_deref();
    let json = cli.output == "json";

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create {
                name,
                timezone,
                wire,
            } => {
                commands::context::create(
                    &name,
                    server,
                    timezone.as_deref(),
                    wire.as_deref(),
                    &config_path,
                )?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set {
                name,
                timezone,
                wire,
            } => {
                commands::context::set(
                    &name,
                    server,
                    timezone.as_deref(),
                    wire.as_deref(),
                    &config_path,
                )?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Latest => {
            commands::loads::latest(&config_path, server, json).await?;
        }

        Commands::Day => {
            commands::loads::day(&config_path, server, json).await?;
        }

        Commands::Search(args) => {
            commands::loads::search(&config_path, server, &args, json).await?;
        }

        Commands::Register(args) => {
            commands::loads::register(&config_path, server, &args, json).await?;
        }

        Commands::Edit(args) => {
            commands::loads::edit(&config_path, server, &args, json).await?;
        }

        Commands::Remove { id, yes } => {
            commands::loads::remove(&config_path, server, &id, yes).await?;
        }

        Commands::Status => {
            commands::loads::status(&config_path, server).await?;
        }

        Commands::Session => {
            commands::session::run(&config_path, server).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn context_create_takes_filter_wire_flag() {
        let cli = Cli::try_parse_from([
            "celulog",
            "context",
            "create",
            "plant-1",
            "--server",
            "http://plant1.local:8080/api",
            "--filter-wire",
            "snake",
        ])
        .unwrap();
        match cli.command {
            Commands::Context {
                action: ContextAction::Create { name, wire, .. },
            } => {
                assert_eq!(name, "plant-1");
                assert_eq!(wire.as_deref(), Some("snake"));
            }
            other => panic!("expected context create, got: {:?}", other),
        }
    }

    #[test]
    fn context_set_takes_filter_wire_flag() {
        let cli = Cli::try_parse_from([
            "celulog",
            "context",
            "set",
            "plant-1",
            "--filter-wire",
            "camel",
        ])
        .unwrap();
        match cli.command {
            Commands::Context {
                action: ContextAction::Set { wire, .. },
            } => assert_eq!(wire.as_deref(), Some("camel")),
            other => panic!("expected context set, got: {:?}", other),
        }
    }
}
