use anyhow::Result;
use clap::Parser;
use fable_generator::app::App;
use fable_generator::config::Config;
use fable_generator::server::{self, AppState};
use fable_generator::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "fable-generator")]
#[command(about = "Serve illustrated children's fables over HTTP")]
struct CliArgs {
    /// Address to listen on, overriding BIND_ADDRESS.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Directory for debug copies of generated images, overriding OUTPUT_DIR.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

/// Console logging plus an optional `app.log` file under `LOG_DIR`.
/// The returned guard must live until shutdown so buffered lines flush.
fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.log_level.parse::<EnvFilter>().unwrap_or_else(|e| {
            eprintln!(
                "WARN: LOG_LEVEL='{}' is not a valid tracing filter ({}); falling back to 'info'",
                config.log_level, e
            );
            EnvFilter::new("info")
        }),
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, "app.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    let _log_guard = init_tracing(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "fable-generator starting");

    let app = match App::from_config(&config) {
        Ok(app) => Some(app),
        Err(Error::Configuration(msg)) => {
            warn!("{}; /generate_fable will reject requests until it is set", msg);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let addr = config.bind_address;
    let state = Arc::new(AppState::new(Arc::new(config), app));
    let router = server::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    info!("fable-generator stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn test_cli_parses_overrides() {
        let args = CliArgs::try_parse_from([
            "fable-generator",
            "--bind",
            "0.0.0.0:9000",
            "--output-dir",
            "/tmp/fables",
        ])
        .unwrap();

        assert_eq!(args.bind.unwrap().port(), 9000);
        assert_eq!(args.output_dir.unwrap().to_string_lossy(), "/tmp/fables");
    }

    #[test]
    fn test_cli_rejects_invalid_bind() {
        assert!(CliArgs::try_parse_from(["fable-generator", "--bind", "nowhere"]).is_err());
    }
}
