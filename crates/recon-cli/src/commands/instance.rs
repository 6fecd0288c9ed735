//! Instance management commands

use colored::Colorize;
use recon_store::Instance;
use serde_json::json;

use crate::cli::InstanceAction;
use crate::context::AppContext;
use crate::error::Result;

/// Run an `instance` subcommand
pub async fn run_instance(ctx: &AppContext, action: InstanceAction) -> Result<()> {
    match action {
        InstanceAction::Add {
            id,
            url,
            token,
            name,
        } => {
            let mut instance = Instance::new(id, url, token);
            if let Some(name) = name {
                instance = instance.with_name(name);
            }
            let instance = ctx.registry.add(instance)?;
            println!(
                "{} Registered instance {} ({})",
                "OK".green().bold(),
                instance.id.cyan(),
                instance.url
            );
            Ok(())
        }
        InstanceAction::List { json } => list(ctx, json),
        InstanceAction::Remove { id } => {
            let removed = ctx.registry.remove(&id)?;
            ctx.snapshots.remove_instance(&removed.id)?;
            println!("{} Removed instance {}", "OK".green().bold(), removed.id.cyan());
            Ok(())
        }
        InstanceAction::Test { id } => {
            let client = ctx.client(&id)?;
            let views = client.store_views().await?;
            println!(
                "{} Connected to {} ({} store views)",
                "OK".green().bold(),
                id.cyan(),
                views.len()
            );
            Ok(())
        }
    }
}

fn list(ctx: &AppContext, json: bool) -> Result<()> {
    let instances = ctx.registry.list()?;

    if json {
        // Tokens stay out of scripted output
        let output: Vec<_> = instances
            .iter()
            .map(|i| {
                json!({
                    "id": i.id,
                    "name": i.name,
                    "url": i.url,
                    "is_active": i.is_active,
                    "created_at": i.created_at,
                    "updated_at": i.updated_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if instances.is_empty() {
        println!(
            "{} (use {} to add one)",
            "No instances registered".dimmed(),
            "recon instance add".cyan()
        );
        return Ok(());
    }

    println!("{}", "Instances".bold());
    println!();
    for instance in &instances {
        let marker = if instance.is_active {
            "+".green()
        } else {
            "-".dimmed()
        };
        println!(
            "  {} {} {} {}",
            marker,
            instance.id.cyan(),
            instance.url,
            format!("({})", instance.name).dimmed()
        );
    }
    Ok(())
}
