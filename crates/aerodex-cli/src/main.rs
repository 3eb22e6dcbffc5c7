use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aerodex_api::AppState;
use aerodex_cli::seed::read_seed_file;
use aerodex_cli::{export, Command, Config, ExportFormat, Settings};
use aerodex_client::AviationClient;
use aerodex_core::{load_config, validate_icao_codes, AppError, Reconciler, SyncStats};
use aerodex_db::AirportRepository;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::parse();

    // stderr keeps stdout clean for JSON and CSV output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app_err) => eprintln!("Error: {}", app_err.user_message()),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let file = load_config(config.config.as_deref())?;
    let settings = config.resolve(&file);

    match config.command {
        Command::Sync {
            codes,
            file: seed_file,
            output,
        } => sync(&settings, codes, seed_file, output).await,
        Command::Migrate { down, status } => migrate(&settings, down, status).await,
        Command::Serve { .. } => serve(&settings).await,
        Command::Show { icao } => show(&settings, &icao).await,
        Command::Export { format, limit } => export_airports(&settings, format, limit).await,
        Command::Stats => show_stats(&settings).await,
    }
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let url = settings.require_database_url()?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.db.max_connections)
        .connect(url)
        .await
        .map_err(AppError::DatabaseError)?;

    Ok(pool)
}

/// Apply, revert or report schema migrations
async fn migrate(settings: &Settings, down: bool, status: bool) -> anyhow::Result<()> {
    let pool = connect(settings).await?;

    if status {
        let states = aerodex_db::migration_status(&pool).await?;
        if !states.iter().any(|s| s.applied || s.dirty) {
            println!("No migrations have been applied yet");
        }
        for state in &states {
            let label = if state.dirty {
                "dirty"
            } else if state.applied {
                "applied"
            } else {
                "pending"
            };
            println!("  {:>4}  {:<8} {}", state.version, label, state.description);
        }
        return Ok(());
    }

    if down {
        info!("Rolling back migrations...");
        aerodex_db::rollback(&pool).await?;
    } else {
        aerodex_db::migrate(&pool).await?;
    }
    Ok(())
}

/// Run one reconciliation and print or save the outcomes
async fn sync(
    settings: &Settings,
    codes: Vec<String>,
    seed_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let codes = match seed_file {
        Some(path) => read_seed_file(&path)?,
        None => codes,
    };
    validate_icao_codes(&codes)?;

    let client = AviationClient::new(&settings.aviation_api_url, &settings.http)?;
    let repo = AirportRepository::new(connect(settings).await?);
    let reconciler = Reconciler::new(repo, client);

    let start = Instant::now();
    let outcomes = reconciler.run(&codes).await?;
    let stats = SyncStats::from_outcomes(&outcomes);

    info!(
        skipped = stats.skipped,
        inserted = stats.inserted,
        not_found = stats.not_found,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Sync complete: {} codes",
        stats.total()
    );

    let json = serde_json::to_string_pretty(&outcomes)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Outcomes written");
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Run the HTTP API until Ctrl-C
async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let pool = connect(settings).await?;
    aerodex_db::migrate(&pool).await?;

    let client = AviationClient::new(&settings.aviation_api_url, &settings.http)?;
    let repo = AirportRepository::new(pool);

    let state = AppState {
        sync: Arc::new(Reconciler::new(repo.clone(), client)),
        airports: Arc::new(repo),
    };

    info!(
        addr = %settings.server.bind_addr(),
        upstream = %settings.aviation_api_url,
        "Starting server"
    );
    aerodex_api::serve(state, &settings.server)
        .await
        .context("Server error")?;

    Ok(())
}

/// Print one stored airport as JSON
async fn show(settings: &Settings, icao: &str) -> anyhow::Result<()> {
    let repo = AirportRepository::new(connect(settings).await?);

    let airport = repo
        .find_by_icao(icao)
        .await?
        .ok_or_else(|| AppError::AirportNotFound(icao.to_string()))?;

    println!("{}", serde_json::to_string_pretty(&airport)?);
    Ok(())
}

/// Show directory statistics
async fn show_stats(settings: &Settings) -> anyhow::Result<()> {
    let repo = AirportRepository::new(connect(settings).await?);
    let stats = repo.get_stats().await?;

    println!("\nAirport Directory Statistics\n");
    println!("  Total airports:        {}", stats.total_airports);
    println!("  Active:                {}", stats.active_airports);
    println!("  With control tower:    {}", stats.with_control_tower);
    if let Some(last_update) = stats.last_update {
        println!("  Last update:           {}", last_update);
    }
    println!();

    Ok(())
}

/// Export stored airports to stdout
async fn export_airports(
    settings: &Settings,
    format: ExportFormat,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let repo = AirportRepository::new(connect(settings).await?);

    info!("Exporting airports...");
    let airports = repo.list_all(limit).await?;

    if airports.is_empty() {
        eprintln!("No airports found to export.");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    export::write_airports(&mut out, &airports, format)?;
    out.flush()?;

    info!("Export complete: {} airports", airports.len());
    Ok(())
}
