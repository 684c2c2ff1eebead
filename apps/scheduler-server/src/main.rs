mod shutdown;
mod web;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use url::Url;

use job_scheduler::config::JobSchedulerConfig;
use job_scheduler::JobScheduler;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

const MODULE_NAME: &str = "job_scheduler";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` when no query is given so the file is created on first run.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Window installation job scheduler
#[derive(Parser)]
#[command(name = "scheduler-server")]
#[command(about = "Window installation job scheduler: REST API and live calendar")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep all data in memory instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized inside
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Scheduler server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Detect DB backend from URL scheme. Only SQLite is compiled in.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case("sqlite::memory:") || raw.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address '{}:{}'",
                config.server.host, config.server.port
            )
        })
}

async fn connect(db_config: &DatabaseConfig, base_dir: &Path) -> Result<sea_orm::DatabaseConnection> {
    detect_from_dsn(db_config)?;
    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), base_dir, true)?;

    let mut opts = ConnectOptions::new(dsn.clone());
    // every pooled connection to :memory: would see its own database
    let max_conns = if dsn == "sqlite::memory:" {
        1
    } else {
        db_config.max_conns.unwrap_or(10)
    };
    let busy_timeout = Duration::from_millis(u64::from(db_config.busy_timeout_ms.unwrap_or(5000)));
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy_timeout));

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {dsn}"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing job_scheduler module...");
    let module_cfg: JobSchedulerConfig = config.module_config(MODULE_NAME)?;
    let addr = bind_addr(&config)?;

    let scheduler = match (&config.database, args.mock) {
        (_, true) => {
            tracing::info!("--mock set, keeping data in memory");
            JobScheduler::in_memory(&module_cfg).await?
        }
        (Some(db_config), false) => {
            let conn = connect(db_config, Path::new(&config.server.home_dir)).await?;
            JobScheduler::with_database(conn, &module_cfg).await?
        }
        (None, false) => {
            tracing::warn!("No database configuration found, keeping data in memory");
            JobScheduler::in_memory(&module_cfg).await?
        }
    };

    let router = scheduler.register_rest(axum::Router::new());
    let router = web::finalize_router(router, &config.server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "Signal handling failed, shutting down");
            }
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .map_err(|e| anyhow!(e))?;

    tracing::info!("Scheduler server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config)?;
    let module_cfg: JobSchedulerConfig = config.module_config(MODULE_NAME)?;
    if !args.mock {
        if let Some(db_config) = &config.database {
            detect_from_dsn(db_config)?;
        }
    }
    if module_cfg.seed.users.is_empty() {
        tracing::warn!("No users configured; nobody will be able to sign in");
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}
