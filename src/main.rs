use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod compose;
mod config;
mod context;
mod exec;
mod git;

use compose::{assemble, ComposeCommand};
use config::Config;
use context::{ContextFlags, InvocationContext};

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "doko")]
#[command(version = VERSION)]
#[command(about = "docker-compose front-end for Odoo development databases", long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(group(ArgGroup::new("db_select").args(["core", "test", "scratch"])))]
struct Cli {
    /// Target database name (overrides branch-based resolution)
    #[arg(long, global = true)]
    dbname: Option<String>,

    /// Print the command instead of executing it
    #[arg(long, global = true)]
    dryrun: bool,

    /// Disable migrations (MIGRATE=false)
    #[arg(long, global = true)]
    nomig: bool,

    /// Enable demo data (DEMO=true)
    #[arg(long, global = true)]
    demo: bool,

    /// Target the core database
    #[arg(long, global = true)]
    core: bool,

    /// Target the fixed test database (migrations disabled)
    #[arg(long, global = true)]
    test: bool,

    /// Target the disposable scratch database (migrations disabled)
    #[arg(long, global = true)]
    scratch: bool,

    /// Path to config file (default: ./doko.toml)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the service against the resolved database
    Run {
        /// Published port (same number on host and container)
        #[arg(long)]
        port: Option<u16>,
        /// Keep verbose web-server request logs
        #[arg(long)]
        verbose: bool,
        /// Extra arguments passed through to the service
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run migrations up to a version ("latest" resolves from the manifest)
    Migrate {
        /// Target version
        version: String,
        /// Extra arguments passed through to the service
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Drop the resolved database
    Dropdb {
        /// Required when dropping the core database
        #[arg(long)]
        force: bool,
        /// Extra arguments passed through to the service
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create a database from the core template and copy its filestore
    Fork {
        /// Extra arguments passed through to the createdb invocation
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Open an interactive shell on the resolved database
    Shell {
        /// Extra arguments passed through to the service
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the test suite on the test database
    Test {
        /// Modules to update before testing
        args: Vec<String>,
    },
    /// Run anthem songs (path notation is converted to dotted notation)
    Sing {
        /// Songs to run
        args: Vec<String>,
    },
    /// Install modules, then stop
    Install {
        /// Modules to install
        args: Vec<String>,
    },
    /// Update modules, then stop
    Upgrade {
        /// Modules to update
        args: Vec<String>,
    },
}

fn main() {
    // Load .env file if present (before parsing CLI so env vars are available)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // The clap group only covers flags given before the subcommand; global
    // flags parsed on the subcommand itself bypass it, so enforce the
    // exclusion here regardless of position.
    if [cli.core, cli.test, cli.scratch].iter().filter(|set| **set).count() > 1 {
        bail!("--core, --test and --scratch are mutually exclusive");
    }

    let config =
        Config::load(cli.config_path.as_deref()).context("Failed to load configuration")?;

    let flags = ContextFlags {
        core: cli.core,
        test: cli.test,
        scratch: cli.scratch,
        dbname: cli.dbname.clone(),
        nomig: cli.nomig,
        demo: cli.demo,
    };
    let ctx = InvocationContext::resolve(&flags, &config)?;

    let cmds: Vec<ComposeCommand> = match cli.command {
        Commands::Run {
            port,
            verbose,
            args,
        } => vec![commands::run(&ctx, &config, port, verbose, &args)],
        Commands::Migrate { version, args } => {
            vec![commands::migrate(&ctx, &config, &version, &args)?]
        }
        Commands::Dropdb { force, args } => vec![commands::dropdb(&ctx, &config, force, &args)?],
        Commands::Fork { args } => commands::fork(&ctx, &config, &args),
        Commands::Shell { args } => vec![commands::shell(&ctx, &config, &args)],
        Commands::Test { args } => vec![commands::test(&ctx, &config, &args)],
        Commands::Sing { args } => vec![commands::sing(&ctx, &config, &args)],
        Commands::Install { args } => vec![commands::install(&ctx, &config, &args)],
        Commands::Upgrade { args } => vec![commands::upgrade(&ctx, &config, &args)],
    };

    for cmd in &cmds {
        exec::execute(&assemble(cmd, &ctx.override_env), cli.dryrun)?;
    }

    Ok(())
}
