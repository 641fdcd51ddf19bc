mod platform;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dashboard_engine::{
    ensure_dir, ApiSettings, Credential, DirectoryDownloadSink, EngineHandle, Persistence,
    ReqwestProjectRepository, TokenStore,
};
use dashboard_logging::{dashboard_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use url::Url;

/// Terminal dashboard for generated document projects.
#[derive(Parser, Debug)]
#[command(name = "dashboard", version)]
struct Args {
    /// Backend origin serving the project API
    #[arg(long, env = "DASHBOARD_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Directory holding the remembered credential
    #[arg(long, env = "DASHBOARD_STATE_DIR", default_value = ".dashboard")]
    state_dir: PathBuf,

    /// Directory where downloaded PDFs are saved
    #[arg(long, env = "DASHBOARD_DOWNLOAD_DIR", default_value = "downloads")]
    download_dir: PathBuf,

    /// Sign in with this bearer token before starting
    #[arg(long, env = "DASHBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// User id stored alongside the token
    #[arg(long, requires = "token")]
    user_id: Option<String>,

    /// Keep the token across restarts instead of for this run only
    #[arg(long, requires = "token")]
    remember: bool,

    /// Forget stored credentials and exit
    #[arg(long, conflicts_with = "token")]
    logout: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid base url {raw:?}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("base url {raw:?} cannot carry a path");
    }
    Ok(url)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dashboard_logging::initialize(args.log.into(), args.log_level.into(), &args.log_file);
    let base_url = parse_base_url(&args.base_url)?;

    let tokens = Arc::new(TokenStore::with_state_dir(&args.state_dir));
    if args.logout {
        tokens.logout().context("could not clear stored credentials")?;
        println!("Signed out.");
        return Ok(());
    }
    if let Some(token) = &args.token {
        let mut credential = Credential::new(token.clone());
        if let Some(user_id) = &args.user_id {
            credential = credential.with_user_id(user_id.clone());
        }
        let persistence = if args.remember {
            Persistence::Durable
        } else {
            Persistence::Session
        };
        tokens
            .remember(&credential, persistence)
            .context("could not store credential")?;
    }
    if tokens.get().is_none() {
        eprintln!("Warning: no stored credential; the backend will likely reject requests.");
    }

    ensure_dir(&args.download_dir).with_context(|| {
        format!(
            "download directory {} is not usable",
            args.download_dir.display()
        )
    })?;

    let settings = ApiSettings {
        base_url: args.base_url.clone(),
        request_timeout: Duration::from_secs(args.timeout_secs),
        ..ApiSettings::default()
    };
    let repository = ReqwestProjectRepository::new(settings, tokens.clone())
        .context("could not build http client")?;
    let engine = EngineHandle::new(
        Arc::new(repository),
        Arc::new(DirectoryDownloadSink::new(args.download_dir.clone())),
    )
    .context("could not start engine runtime")?;

    dashboard_info!("Starting dashboard against {}", base_url);
    platform::run_app(engine, tokens, base_url)?;
    Ok(())
}
