//! Devcycle command-line shell
//!
//! The shell composes the device engine into user-facing commands. It owns all
//! state the engine must not hold between calls.
//!
//! # Architecture
//!
//! - [`cli`]: Argument parsing
//! - [`config`]: Settings file discovery and validation
//! - [`shell`]: Command handlers, selection and auto-detect state
//! - [`selection`]: List index to instance id mapping
//! - [`render`]: Text for engine results
//! - [`watch`]: Periodic headphone detection
//!
//! # Platform Support
//!
//! - **Windows**: Full support
//! - **Other targets**: Builds, but every device command fails with
//!   "Platform not supported"

pub mod cli;
pub mod config;
pub mod render;
pub mod selection;
pub mod shell;
pub mod watch;

#[cfg(test)]
mod testing;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use devcycle_windows::WindowsPlatform;
use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use config::LoadedConfig;
use shell::Shell;

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::WARN
    } else if cli.verbose || cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Enhanced logging for debug builds
    #[cfg(debug_assertions)]
    {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .with_file(true)
            .with_line_number(true)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}

/// Application entry point
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let LoadedConfig { mut config, source } = config::load(cli.config.as_deref())?;
    if let Some(class) = cli.class {
        config.device_class = class;
    }
    tracing::debug!(
        source = ?source,
        class = %config.device_class,
        "Configuration ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Config = cli.command {
        let location = source
            .or_else(config::default_config_path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        writeln!(out, "# {location}")?;
        serde_json::to_writer_pretty(&mut out, &config)?;
        writeln!(out)?;
        return Ok(());
    }

    if let Commands::Watch {
        interval_ms: Some(ms),
    } = cli.command
    {
        config.poll_interval_ms = ms;
    }
    let mut shell = Shell::new(WindowsPlatform::new(), config);

    match &cli.command {
        Commands::List => shell.list(&mut out, cli.json),
        Commands::Detect => shell.detect(&mut out, cli.json),
        Commands::RefreshVendor => shell.refresh_vendor(&mut out, cli.json).map(|_| ()),
        Commands::Refresh(args) => shell.refresh(&mut out, &args.target()),
        Commands::Enable(args) => shell.set_state(&mut out, &args.target(), true),
        Commands::Disable(args) => shell.set_state(&mut out, &args.target(), false),
        Commands::Watch { .. } => run_watch(&mut shell, &mut out, cli.json),
        Commands::Config => Ok(()),
    }
}

fn run_watch(
    shell: &mut Shell<WindowsPlatform>,
    out: &mut dyn Write,
    json: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("Interrupt received");
            }
            on_interrupt.cancel();
        });

        let polls = shell.watch(out, json, cancel).await?;
        tracing::info!(polls, "Watch finished");
        Ok::<(), anyhow::Error>(())
    })
}
