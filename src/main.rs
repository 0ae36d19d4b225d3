use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parley::backend::{ChatBackend, HttpBackend};
use parley::core::config::{self, CliOverrides, ResolvedConfig};
use parley::core::runtime::{self, OneShot, action_channel};
use parley::core::state::App;
use parley::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "parley", about = "Minimal terminal chat client")]
struct Args {
    /// Base URL of the chat server (overrides config and PARLEY_BASE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Pause before each request is sent, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Keep the input usable while a reply is pending
    #[arg(long)]
    no_lockout: bool,

    /// Hide message timestamps
    #[arg(long)]
    no_timestamps: bool,

    /// Send a single message, print the reply and exit
    #[arg(short, long)]
    message: Option<String>,
}

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        Default::default()
    });
    let cli = CliOverrides {
        base_url: args.url,
        pacing_delay_ms: args.delay_ms,
        no_lockout: args.no_lockout,
        no_timestamps: args.no_timestamps,
    };
    let resolved = config::resolve(&file_config, &cli);

    let backend = HttpBackend::new(&resolved.base_url, &resolved.endpoint, resolved.timeout)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    log::info!("Parley starting up, talking to {}", backend.url());
    let backend: Arc<dyn ChatBackend> = Arc::new(backend);

    match args.message {
        Some(message) => one_shot(backend, resolved, &message).await,
        None => tui::run(App::from_config(backend, &resolved)).map(|()| ExitCode::SUCCESS),
    }
}

/// Sends one message without the TUI and prints the bot's entry.
///
/// Exits with status 1 when nothing was sent or the turn failed.
async fn one_shot(
    backend: Arc<dyn ChatBackend>,
    resolved: ResolvedConfig,
    message: &str,
) -> io::Result<ExitCode> {
    let resolved = ResolvedConfig {
        pacing_delay: Duration::ZERO,
        ..resolved
    };
    let mut app = App::from_config(backend, &resolved);
    let (tx, mut rx) = action_channel();

    match runtime::one_shot(&mut app, message, &tx, &mut rx).await {
        OneShot::Rejected => {
            eprintln!("Nothing to send");
            Ok(ExitCode::FAILURE)
        }
        OneShot::Replied { text, ok } => {
            println!("{}", text);
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
