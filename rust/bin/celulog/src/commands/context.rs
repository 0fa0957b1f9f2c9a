//! Context management commands.

use std::path::Path;

use anyhow::Result;
use celulog_client::FilterWire;

use crate::config::{ClientConfig, Context};

pub fn parse_wire(raw: Option<&str>) -> Result<Option<FilterWire>> {
    match raw {
        None => Ok(None),
        Some(s) => match FilterWire::parse(s) {
            Some(wire) => Ok(Some(wire)),
            None => anyhow::bail!("Unknown filter wire {:?}. Use \"camel\" or \"snake\".", s),
        },
    }
}

/// Create a new context and make it current when it is the first one.
pub fn create(
    name: &str,
    server: Option<&str>,
    timezone: Option<&str>,
    wire: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    if config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!(
            "Context \"{}\" already exists. Run `celulog context set {}` to change it.",
            name,
            name
        );
    }

    let mut ctx = Context::new(name);
    if let Some(server) = server {
        ctx.server = server.to_string();
    }
    if let Some(timezone) = timezone {
        ctx.timezone = timezone.to_string();
    }
    if let Some(wire) = parse_wire(wire)? {
        ctx.filter_wire = wire;
    }
    config.upsert_context(ctx);
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(config_path)?;

    println!("Context \"{}\" created.", name);
    Ok(())
}

/// List all contexts.
pub fn list(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: celulog context create <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40} {:6} {:20}", "", "NAME", "SERVER", "WIRE", "TIMEZONE");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context {
            "*"
        } else {
            " "
        };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        println!(
            "{:2} {:20} {:40} {:6} {:20}",
            marker,
            ctx.name,
            server,
            ctx.filter_wire.as_str(),
            ctx.timezone
        );
    }

    Ok(())
}

/// Switch current context.
pub fn use_context(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    if !config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!(
            "Context \"{}\" not found. Run `celulog context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

/// Set properties on a context.
pub fn set(
    name: &str,
    server: Option<&str>,
    timezone: Option<&str>,
    wire: Option<&str>,
    config_path: &Path,
) -> Result<()> {
    let wire = parse_wire(wire)?;
    let mut config = ClientConfig::load(config_path)?;

    let ctx = config
        .get_mut(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if let Some(s) = server {
        ctx.server = s.to_string();
    }
    if let Some(tz) = timezone {
        ctx.timezone = tz.to_string();
    }
    if let Some(wire) = wire {
        ctx.filter_wire = wire;
    }

    config.save(config_path)?;
    println!("Context \"{}\" updated.", name);
    Ok(())
}

/// Delete a context.
pub fn delete(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;

    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }

    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
