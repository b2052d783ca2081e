//! # Command Line Interface
//!
//! Local tooling around the resolver: resolve a credential, check the backend,
//! print the API version and list the extraction table.
//!
//! Backend settings come from a TOML settings file (`--config`) holding the
//! host keys, or from `CREDRESOLVER_VAULT_*` / `VAULT_*` environment variables.

pub mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{load_settings_file, BackendConfig, ObservabilityConfig};
use crate::mapping::CredentialTypeMapper;
use crate::observability::{init_observability, log_config_info};
use crate::resolver::{ResolutionRequest, Resolver};
use output::{OutputFormat, ResolutionView};

#[derive(Parser, Debug)]
#[command(name = "credential-resolver")]
#[command(about = "Resolve credential references from HashiCorp Vault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML settings file with ext.cred.hashicorp.vault.* keys
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json or table)
    #[arg(short, long, global = true, default_value = "json")]
    pub output: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one credential and print the four canonical slots
    Resolve {
        /// Secret path, e.g. kv/windowscred
        #[arg(long)]
        id: String,

        /// Credential type, e.g. windows
        #[arg(long = "type")]
        credential_type: String,

        /// Target system address
        #[arg(long)]
        ip: Option<String>,

        /// Requesting agent name
        #[arg(long)]
        mid: Option<String>,

        /// Print secret slots instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Check that the secret backend is reachable
    Health,

    /// Print the resolver API version
    Version,

    /// List supported credential types and their field rules
    Types,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;

    let mut observability = ObservabilityConfig::from_env();
    if cli.verbose {
        observability.log_level = "debug".to_string();
    }
    let metrics = init_observability(&observability);

    match cli.command {
        Commands::Version => {
            println!("{}", crate::API_VERSION);
        }

        Commands::Types => {
            let views = output::profile_views(&CredentialTypeMapper::new());
            output::print_profiles(&views, format)?;
        }

        Commands::Health => {
            let resolver = build_resolver(cli.config.as_ref(), &observability)?;
            resolver.health_check().await.context("Secret backend health check failed")?;
            println!("Secret backend at {} is healthy", resolver.backend_config().address);
        }

        Commands::Resolve { id, credential_type, ip, mid, show_secrets } => {
            let resolver =
                build_resolver(cli.config.as_ref(), &observability)?.with_metrics(metrics);

            let mut request = ResolutionRequest::new(id, credential_type);
            if let Some(ip) = ip {
                request = request.with_ip(ip);
            }
            if let Some(mid) = mid {
                request = request.with_mid(mid);
            }

            let resolution = resolve_until_interrupted(&resolver, &request).await?;
            output::print_resolution(&ResolutionView::new(&resolution, show_secrets), format)?;
        }
    }

    Ok(())
}

fn build_resolver(
    config_path: Option<&PathBuf>,
    observability: &ObservabilityConfig,
) -> anyhow::Result<Resolver> {
    let config = match config_path {
        Some(path) => {
            let settings = load_settings_file(path)?;
            BackendConfig::from_settings(&settings)?
        }
        None => BackendConfig::from_env()?,
    };

    log_config_info(&config, observability);
    Ok(Resolver::from_config(config)?)
}

/// Resolve, cancelling the call on Ctrl-C.
async fn resolve_until_interrupted(
    resolver: &Resolver,
    request: &ResolutionRequest,
) -> anyhow::Result<crate::resolver::Resolution> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling resolution");
                cancel.cancel();
            }
        })
    };

    let result = resolver.resolve_with_cancellation(request, &cancel).await;
    watcher.abort();

    result.with_context(|| format!("Failed to resolve credential '{}'", request.id))
}
