//! Grid simulator entry point: CLI wiring, engine lifecycle and API startup.

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use grid_sim::cli::{CliOptions, Command, parse_args, print_usage};
use grid_sim::config::ServiceConfig;
use grid_sim::engine::{ExternalEngine, RemoteEngine, SimulationSelector};
use grid_sim::grid::types::SimulationInput;
use grid_sim::telemetry::init_tracing;

/// Loads the config file (or defaults) and applies CLI overrides.
fn load_config(cli: &CliOptions) -> Result<ServiceConfig> {
    let mut cfg = match cli.config {
        Some(ref path) => ServiceConfig::from_toml_file(Path::new(path))?,
        None => ServiceConfig::default(),
    };

    if let Some(ref host) = cli.host {
        cfg.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if let Some(ref url) = cli.engine_url {
        cfg.engine.url = Some(url.clone());
    }
    if let Some(ms) = cli.engine_timeout_ms {
        cfg.engine.timeout_ms = ms;
    }
    if cli.json_logs {
        cfg.logging.json = true;
    }

    let errors = cfg.validate();
    if let Some(first) = errors.first() {
        for e in &errors {
            eprintln!("{e}");
        }
        anyhow::bail!("invalid configuration ({} error(s), first: {})", errors.len(), first.field);
    }
    Ok(cfg)
}

/// Connects the configured engine, if any. Handshake failure is not fatal.
async fn start_engine(cfg: &ServiceConfig) -> Result<Option<Arc<RemoteEngine>>> {
    let Some(ref url) = cfg.engine.url else {
        info!("no engine configured, using analytic model only");
        return Ok(None);
    };
    let engine = Arc::new(
        RemoteEngine::new(url.clone(), cfg.engine.timeout())
            .context("failed to build engine client")?,
    );
    engine.initialize().await;
    Ok(Some(engine))
}

async fn run(cli: CliOptions, cfg: ServiceConfig) -> Result<()> {
    let engine = start_engine(&cfg).await?;
    let selector = match engine {
        Some(ref engine) => {
            SimulationSelector::with_engine(engine.clone(), cfg.engine.timeout())
        }
        None => SimulationSelector::analytic_only(),
    };

    let outcome = match cli.command {
        Command::Simulate {
            load_mw,
            generation_mw,
        } => simulate_once(&selector, &cfg, load_mw, generation_mw).await,
        Command::Serve => serve(selector, &cfg).await,
    };

    if let Some(engine) = engine {
        engine.shutdown().await;
    }
    outcome
}

async fn simulate_once(
    selector: &SimulationSelector,
    cfg: &ServiceConfig,
    load_mw: f64,
    generation_mw: f64,
) -> Result<()> {
    let input = SimulationInput::with_ceiling(load_mw, generation_mw, cfg.limits.max_mw)?;
    let result = selector.simulate(&input).await?;
    info!("{result}");
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("failed to serialize result")?
    );
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(selector: SimulationSelector, cfg: &ServiceConfig) -> Result<()> {
    use grid_sim::api::{self, AppState};

    let addr = cfg.server.socket_addr()?;
    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0; the API is reachable from the network");
    }
    let state = Arc::new(AppState::new(selector, cfg.limits.max_mw));
    api::serve(state, addr)
        .await
        .with_context(|| format!("server error on {addr}"))?;
    info!("shutdown complete");
    Ok(())
}

#[cfg(not(feature = "api"))]
async fn serve(_selector: SimulationSelector, _cfg: &ServiceConfig) -> Result<()> {
    warn!("built without the `api` feature; nothing to serve");
    print_usage();
    Ok(())
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    };

    init_tracing(&cfg.logging);

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(run(cli, cfg)) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
