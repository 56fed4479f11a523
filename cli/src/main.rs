mod render;
mod script;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use deathrecap_core::context::{
    config_path, default_status_table_path, load_config, load_config_file, load_status_table,
};
use deathrecap_core::{DeathRecap, RecapConfig, SignalHandler, StatusTable};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use render::{ReplayReport, render_report};
use script::Script;

#[derive(Parser)]
#[command(version, about = "Replay combat scripts and print death recaps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a combat script and print the recap of one death
    Replay {
        #[arg(short, long)]
        script: PathBuf,
        /// Player to show (defaults to the most recent death)
        #[arg(short, long)]
        player: Option<u32>,
        /// Death to show, 0 = newest
        #[arg(short, long, default_value_t = 0)]
        death: usize,
        /// Settings file (defaults to the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Status sheet (defaults to the one in the user config directory)
        #[arg(long)]
        statuses: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show the effective settings
    Config,
}

fn main() -> Result<(), String> {
    let _log_guard = init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            player,
            death,
            config,
            statuses,
            json,
        } => replay(&script, player, death, config.as_deref(), statuses.as_deref(), json),
        Commands::Config => show_config(),
    }
}

fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If DEATHRECAP_LOG_PATH is set, log to that file instead of stderr
    if let Ok(path) = std::env::var("DEATHRECAP_LOG_PATH") {
        let path = PathBuf::from(path);
        if let (Some(dir), Some(file)) = (path.parent(), path.file_name()) {
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    None
}

fn resolve_config(path: Option<&Path>) -> RecapConfig {
    match path {
        Some(path) => load_config_file(path).unwrap_or_else(|err| {
            tracing::warn!("{}; using defaults", err);
            RecapConfig::default()
        }),
        None => load_config(),
    }
}

fn resolve_statuses(path: Option<&Path>) -> StatusTable {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_status_table_path().filter(|p| p.exists()),
    };

    match path.map(|p| load_status_table(&p)) {
        Some(Ok(table)) => table,
        Some(Err(err)) => {
            tracing::warn!("{}; continuing without status names", err);
            StatusTable::new()
        }
        None => StatusTable::new(),
    }
}

fn replay(
    script_path: &Path,
    player: Option<u32>,
    death: usize,
    settings_path: Option<&Path>,
    statuses_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let script = Script::load(script_path)?;
    let config = resolve_config(settings_path);
    let european = config.european_number_format;

    let mut statuses = resolve_statuses(statuses_path);
    statuses.extend_from_file(script.status_sheet());

    let mut recap = DeathRecap::new(config, Box::new(statuses), Box::new(script.roster()));
    let now = chrono::Local::now().naive_local();
    let signals = script.to_signals(now)?;
    tracing::info!("Replaying {} signals from {}", signals.len(), script_path.display());
    recap.handle_signals(&signals);

    if let Some(player_id) = player {
        recap.select_player(player_id);
    }
    recap.select_episode(death);

    let report = ReplayReport {
        players: recap.player_summaries(now),
        deaths: recap.death_list(now),
        timeline: recap.current_timeline(),
    };

    // A rendering bug must not lose the recorded history
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
        if json {
            serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
        } else {
            Ok(render_report(&report, european))
        }
    }));

    match rendered {
        Ok(Ok(text)) => {
            println!("{}", text);
            Ok(())
        }
        Ok(Err(err)) => Err(err),
        Err(_) => {
            tracing::error!("Failed to draw recap");
            Err("failed to draw recap".to_string())
        }
    }
}

fn show_config() -> Result<(), String> {
    let path = config_path().map_err(|e| e.to_string())?;
    let config = load_config();
    let contents = toml::to_string_pretty(&config).map_err(|e| e.to_string())?;

    println!("Config file: {}", path.display());
    if let Some(statuses) = default_status_table_path() {
        println!("Status sheet: {}", statuses.display());
    }
    println!();
    print!("{}", contents);
    Ok(())
}
