// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around the Stratis provisioning stage

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage_stratis::{StorageConfig, StratisStage};
use storage_sys::{
    StageLogger, SysSettings, SystemCommandRunner, Tool, ToolPaths, UdevAliasResolver,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Provision Stratis pools and filesystems from a declarative config
#[derive(Parser)]
#[command(name = "stratis-provision")]
#[command(about = "Create Stratis pools and filesystems from a TOML config", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait on pool devices, then create pools and filesystems
    Apply {
        /// Storage config (TOML)
        #[arg(long)]
        config: PathBuf,
        /// Runtime settings (TOML); defaults apply when omitted
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Log every step without touching devices
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the commands `apply` would run, in order
    Plan {
        /// Storage config (TOML)
        #[arg(long)]
        config: PathBuf,
        /// Runtime settings (TOML); defaults apply when omitted
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Show which executable each tool resolves to
    Tools {
        /// Runtime settings (TOML); defaults apply when omitted
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&Path>) -> Result<SysSettings> {
    match path {
        Some(path) => SysSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(SysSettings::default()),
    }
}

fn load_config(path: &Path) -> Result<StorageConfig> {
    StorageConfig::load(path)
        .with_context(|| format!("Failed to load storage config from {}", path.display()))
}

fn apply(config: &Path, settings: Option<&Path>, dry_run: bool) -> Result<()> {
    let config = load_config(config)?;
    let settings = load_settings(settings)?;
    let tools = ToolPaths::with_overrides(&settings.tools);

    let runner = if dry_run {
        SystemCommandRunner::dry_run()
    } else {
        SystemCommandRunner::new()
    };
    let resolver = UdevAliasResolver::new(&runner, &tools, &settings)
        .with_dry_run(runner.is_dry_run());

    let logger = StageLogger::new().scoped("disks");
    StratisStage::new(&runner, &resolver, &tools)
        .create_stratis_filesystems(&logger, &config)
        .context("Stratis provisioning failed")?;

    tracing::info!(
        "Stratis provisioning complete: {} pool(s), {} filesystem(s)",
        config.stratis_pools.len(),
        config.stratis_filesystems.len()
    );
    Ok(())
}

fn plan(config: &Path, settings: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let settings = load_settings(settings)?;
    let tools = ToolPaths::with_overrides(&settings.tools);

    let runner = SystemCommandRunner::dry_run();
    let resolver = UdevAliasResolver::new(&runner, &tools, &settings).with_dry_run(true);

    for command in StratisStage::new(&runner, &resolver, &tools).plan(&config) {
        println!("# {}", command.description);
        println!("{}", command.rendered());
    }
    Ok(())
}

fn tools(settings: Option<&Path>) -> Result<()> {
    let settings = load_settings(settings)?;
    let tools = ToolPaths::with_overrides(&settings.tools);

    for tool in Tool::ALL {
        match tools.locate(tool) {
            Ok(path) => println!("{tool}: {}", path.display()),
            Err(e) => println!("{tool}: not found ({e})"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("storage_stratis=info,storage_sys=info,warn")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            config,
            settings,
            dry_run,
        } => apply(&config, settings.as_deref(), dry_run),
        Commands::Plan { config, settings } => plan(&config, settings.as_deref()),
        Commands::Tools { settings } => tools(settings.as_deref()),
    }
}
