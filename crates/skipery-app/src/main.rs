mod boot;
mod cli;
mod repl;

use std::process::ExitCode;

use skipery_ai::SessionStore;
use skipery_common::{SessionId, SkiperyError};
use skipery_config::SkiperyConfig;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn subscriber(directive: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn init_logging(directive: &str) {
    subscriber(directive).init();
}

async fn run(args: cli::Args, config: SkiperyConfig) -> Result<(), SkiperyError> {
    let storage = boot::open_storage(&args, &config)?;

    if args.list {
        let sessions = storage
            .store
            .list_sessions()
            .await
            .map_err(|e| SkiperyError::Storage(e.to_string()))?;
        for summary in &sessions {
            println!("{}", repl::render_summary(summary));
        }
        return Ok(());
    }

    let agent = boot::build_agent(&config, &storage)?;
    let session = args.session.map(SessionId::from).unwrap_or_default();
    repl::run(&agent, session).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();

    // Config is read before the configured level is known.
    let loaded = {
        let directive = args.log_level.as_deref().unwrap_or("info");
        let _provisional = tracing::subscriber::set_default(subscriber(directive));
        skipery_config::load_config(args.config.as_deref())
    };
    let level = match &loaded {
        Ok(config) => config.logging.level.as_directive(),
        Err(_) => "info",
    };
    init_logging(args.log_level.as_deref().unwrap_or(level));

    tracing::info!("skipery v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        SkiperyConfig::default()
    });

    match run(args, config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
