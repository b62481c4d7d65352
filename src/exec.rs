//! Command execution for doko.
//!
//! Every handler funnels through here: the assembled command line is printed
//! with a colored marker, then run through the host's shell unless --dryrun
//! was given. The child's exit status is deliberately not inspected; doko
//! relays the command, it does not supervise it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

pub fn execute(command: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{} {}", "dry-run:".yellow().bold(), command);
        return Ok(());
    }

    println!("{} {}", "running:".green().bold(), command);
    let _ = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .context("Failed to spawn shell")?;
    Ok(())
}
