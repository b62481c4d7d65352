//! Action handlers.
//!
//! Each handler is a pure function of (parsed arguments, invocation context,
//! config) returning the logical command tuple(s); the shared assemble +
//! execute path in main processes every handler's result identically.

use anyhow::{bail, Context, Result};

use crate::compose::ComposeCommand;
use crate::config::Config;
use crate::context::InvocationContext;
use crate::git;

/// `doko run`: start the service against the resolved database.
pub fn run(
    ctx: &InvocationContext,
    config: &Config,
    port: Option<u16>,
    verbose: bool,
    args: &[String],
) -> ComposeCommand {
    let port = port.unwrap_or_else(|| config.port());
    let mut cmd = ComposeCommand::new(config.service(), "odoo")
        .runtime_flag("-p", Some(&format!("{0}:{0}", port)))
        .env("DB_NAME", &ctx.db_name)
        .flag("--workers", Some("0"));
    if !verbose {
        // werkzeug request logging drowns everything else at INFO
        cmd = cmd.flag("--log-handler", Some("werkzeug:WARNING"));
    }
    passthrough(cmd, args)
}

/// `doko migrate <version>`: run the marabunta migration up to a version.
pub fn migrate(
    ctx: &InvocationContext,
    config: &Config,
    version: &str,
    args: &[String],
) -> Result<ComposeCommand> {
    let version = resolve_version(version, config)?;
    let cmd = ComposeCommand::new(config.service(), "migrate")
        .env("MARABUNTA_FORCE_VERSION", &version)
        .env("DB_NAME", &ctx.db_name);
    Ok(passthrough(cmd, args))
}

/// `doko dropdb`: drop the resolved database. The core database is protected
/// behind --force. The resolved name is always the first positional.
pub fn dropdb(
    ctx: &InvocationContext,
    config: &Config,
    force: bool,
    args: &[String],
) -> Result<ComposeCommand> {
    if ctx.db_name == config.core_db() && !force {
        bail!(
            "Refusing to drop the core database '{}' (pass --force to override)",
            ctx.db_name
        );
    }
    let cmd = ComposeCommand::new(config.service(), "dropdb").arg(&ctx.db_name);
    Ok(passthrough(cmd, args))
}

/// `doko fork`: create a database from the core template, then copy the core
/// filestore alongside it. Two sequential invocations; extra args go to the
/// createdb invocation.
pub fn fork(ctx: &InvocationContext, config: &Config, args: &[String]) -> Vec<ComposeCommand> {
    let createdb = passthrough(
        ComposeCommand::new(config.service(), "createdb")
            .flag("--template", Some(config.core_db()))
            .arg(&ctx.db_name),
        args,
    );
    let copy_filestore = ComposeCommand::new(config.service(), "cp")
        .flag("-rf", None)
        .arg(&format!("{}/{}", config.filestore(), config.core_db()))
        .arg(&format!("{}/{}", config.filestore(), ctx.db_name));
    vec![createdb, copy_filestore]
}

/// `doko shell`: open an interactive shell on the resolved database.
pub fn shell(ctx: &InvocationContext, config: &Config, args: &[String]) -> ComposeCommand {
    let cmd = ComposeCommand::new(config.service(), "shell")
        .env("MIGRATE", "false")
        .env("DB_NAME", &ctx.db_name)
        .flag("--shell-interface", Some("ipython"));
    passthrough(cmd, args)
}

/// `doko test`: run the test suite on the fixed test database, with demo data
/// and without migrations. Positional args name modules to update.
pub fn test(_ctx: &InvocationContext, config: &Config, args: &[String]) -> ComposeCommand {
    let mut cmd = ComposeCommand::new(config.service(), "runtests")
        .env("MIGRATE", "false")
        .env("DEMO", "true")
        .env("DB_NAME", config.test_db())
        .flag("--workers", Some("0"))
        .flag("--test-enable", None)
        .flag("--stop-after-init", None);
    for module in args {
        cmd = cmd.flag("--update", Some(module));
    }
    cmd
}

/// `doko sing`: run named anthem scripts, converting path notation to dotted
/// module notation.
pub fn sing(ctx: &InvocationContext, config: &Config, args: &[String]) -> ComposeCommand {
    let mut cmd = ComposeCommand::new(config.service(), "anthem").env("DB_NAME", &ctx.db_name);
    for song in args {
        cmd = cmd.arg(&dotted(song));
    }
    cmd
}

/// `doko install`: install the named modules, then stop.
pub fn install(ctx: &InvocationContext, config: &Config, args: &[String]) -> ComposeCommand {
    module_batch(ctx, config, "--install", args)
}

/// `doko upgrade`: update the named modules, then stop.
pub fn upgrade(ctx: &InvocationContext, config: &Config, args: &[String]) -> ComposeCommand {
    module_batch(ctx, config, "--update", args)
}

fn module_batch(
    ctx: &InvocationContext,
    config: &Config,
    flag: &str,
    modules: &[String],
) -> ComposeCommand {
    let mut cmd = ComposeCommand::new(config.service(), "odoo")
        .env("MIGRATE", "false")
        .env("DB_NAME", &ctx.db_name)
        .flag("--stop-after-init", None);
    for module in modules {
        cmd = cmd.flag(flag, Some(module));
    }
    cmd
}

fn passthrough(mut cmd: ComposeCommand, args: &[String]) -> ComposeCommand {
    for arg in args {
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Convert a path-style script reference to dotted module notation.
fn dotted(path: &str) -> String {
    path.replace('/', ".")
}

/// Resolve a migration version argument. The literal `latest` is looked up in
/// the migration manifest at the repository root.
fn resolve_version(version: &str, config: &Config) -> Result<String> {
    if version != "latest" {
        return Ok(version.to_string());
    }
    let manifest = git::toplevel()?.join(config.manifest());
    let contents = std::fs::read_to_string(&manifest)
        .with_context(|| format!("Failed to read migration manifest {}", manifest.display()))?;
    latest_manifest_version(&contents)
        .with_context(|| format!("No 'version:' entry found in {}", manifest.display()))
}

/// Last line containing `version:` wins; its trailing token is the version.
fn latest_manifest_version(contents: &str) -> Option<String> {
    contents
        .lines()
        .rev()
        .find(|line| line.contains("version:"))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
}
