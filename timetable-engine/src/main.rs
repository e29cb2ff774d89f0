use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use timetable_engine::batch;
use timetable_engine::output::Feed;
use timetable_engine::resolve::{Engine, EngineConfig};

/// Log to stderr so stdout carries only the feed.
fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: timetable-engine <batch.json>");
        return ExitCode::from(2);
    };

    let config = EngineConfig::from_env();
    info!(
        path = %path.display(),
        apply_variations = config.apply_variations,
        "loading batch"
    );

    let timetable = match batch::load(&path) {
        Ok(timetable) => timetable,
        Err(e) => {
            error!("failed to load batch: {e}");
            return ExitCode::FAILURE;
        }
    };

    let schedules = match Engine::new(config).resolve(timetable) {
        Ok(schedules) => schedules,
        Err(e) => {
            error!("failed to resolve timetable: {e}");
            return ExitCode::FAILURE;
        }
    };

    let feed = Feed::from_schedules(&schedules);
    match serde_json::to_string_pretty(&feed) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to serialize feed: {e}");
            ExitCode::FAILURE
        }
    }
}
