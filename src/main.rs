//! mudprobe - run a probe script against a game server

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mudprobe::{scenario, Profile, ProbeConfig, Runner, Script, WsClient};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Websocket smoke-test harness for MUD-style game servers
#[derive(Parser, Debug)]
#[command(
    name = "mudprobe",
    version,
    about = "Run a scripted websocket probe against a game server"
)]
struct Args {
    /// Server URL (ws://host:port/ or wss://host:port/)
    #[arg(short, long)]
    url: Option<String>,

    /// Skip TLS certificate verification (self-signed test servers)
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Seconds to wait for each checked reply (default: wait forever)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Builtin scenario to run (signup, play, character-names, motd,
    /// legacy-register)
    #[arg(short, long, default_value = "signup", conflicts_with = "script")]
    scenario: String,

    /// Run a script from a JSON file instead of a builtin scenario
    #[arg(long)]
    script: Option<PathBuf>,

    /// Account username
    #[arg(long)]
    username: Option<String>,

    /// Account password
    #[arg(long)]
    password: Option<String>,

    /// Account email (registration only)
    #[arg(long)]
    email: Option<String>,

    /// Character name
    #[arg(long)]
    character: Option<String>,

    /// Append a random suffix to the username and character name so repeated
    /// runs don't collide on registration
    #[arg(long)]
    unique: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudprobe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Layered config (defaults, mudprobe.toml, MUDPROBE_* env), then CLI
    let mut config = ProbeConfig::load().context("failed to load configuration")?;
    if let Some(url) = args.url {
        config.url = url;
    }
    if args.insecure {
        config.insecure = true;
    }
    if let Some(secs) = args.timeout {
        config.recv_timeout_secs = Some(secs);
    }

    let mut profile = Profile::default();
    if let Some(username) = args.username {
        profile.username = username;
    }
    if let Some(password) = args.password {
        profile.password = password;
    }
    if let Some(email) = args.email {
        profile.email = email;
    }
    if let Some(character) = args.character {
        profile.character = character;
    }
    if args.unique {
        profile = profile.with_unique_suffix();
    }

    let script = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            Script::from_json(&text)
                .with_context(|| format!("failed to parse script {}", path.display()))?
        }
        None => match scenario::by_name(&args.scenario, &profile) {
            Some(script) => script,
            None => bail!(
                "unknown scenario '{}', expected one of: {}",
                args.scenario,
                scenario::NAMES.join(", ")
            ),
        },
    };

    info!(url = %config.url, steps = script.steps.len(), "connecting");
    let client = WsClient::connect(&config.url, config.tls_policy()).await?;
    let runner = Runner::new(client).with_recv_timeout(config.recv_timeout());

    match runner.run(&script).await {
        Ok(report) => {
            info!(
                exchanges = report.exchanges.len(),
                drained = report.drained.len(),
                "run complete"
            );
            Ok(())
        }
        Err(e) if e.is_scripted() => {
            error!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
