//! Verdict command-line client.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use verdict_api::{HttpTransport, PollTransport};
use verdict_client::{ClientConfig, ClientSession, Notice, Notifier, PollStore};
use verdict_types::PollId;
use verdict_utils::LogFormat;
use verdict_wallet::{DevWallet, WalletSession};

#[derive(Parser)]
#[command(name = "verdict", about = "Create polls and vote from the terminal")]
struct Cli {
    /// Base URL of the poll service.
    /// When a config file is provided, defaults to the file's value.
    #[arg(long, env = "VERDICT_SERVICE_URL")]
    service_url: Option<String>,

    /// Wallet address to vote and create polls as.
    #[arg(long, env = "VERDICT_WALLET_ADDRESS")]
    address: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VERDICT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VERDICT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VERDICT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Check that the service and its backends are reachable.
    Status,

    /// List every poll with its current tallies.
    Polls,

    /// Show one poll.
    Show { id: u64 },

    /// Create a poll.
    Create {
        #[arg(long, short)]
        question: String,

        /// An option; repeat for each one.
        #[arg(long = "option", short = 'o', required = true)]
        options: Vec<String>,
    },

    /// Vote on a poll.
    Vote {
        poll: u64,
        /// Zero-based option index, as shown by `polls`.
        option: usize,
    },
}

/// Prints notices for the user: successes to stdout, failures to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_failure() {
            eprintln!("error: {notice}");
        } else {
            println!("{notice}");
        }
    }
}

type Session = ClientSession<HttpTransport, DevWallet, ConsoleNotifier>;

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)?,
        None => ClientConfig::default(),
    };

    if let Some(url) = &cli.service_url {
        config.service_url = url.clone();
    }
    if let Some(address) = &cli.address {
        config.wallet_address = Some(address.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;
    Ok(config)
}

fn build_session(config: &ClientConfig) -> anyhow::Result<Session> {
    let store = PollStore::new(config.http_transport()?).with_max_options(config.max_options);
    let wallet = DevWallet::new(
        config
            .wallet_address
            .clone()
            .unwrap_or_else(|| DevWallet::DEFAULT_ADDRESS.to_string()),
        config.wallet_delay(),
    );
    Ok(ClientSession::new(
        store,
        WalletSession::new(wallet),
        ConsoleNotifier,
    ))
}

async fn run(command: Command, mut session: Session) -> anyhow::Result<ExitCode> {
    match command {
        Command::Status => {
            let health = session.store().transport().ping().await?;
            print!("{}", render::health(&health));
        }
        Command::Polls => {
            let Ok(polls) = session.refresh().await else {
                return Ok(ExitCode::FAILURE);
            };
            print!("{}", render::polls(&polls, session.selection()));
        }
        Command::Show { id } => {
            let poll = session.store().transport().fetch_poll(PollId::new(id)).await?;
            print!("{}", render::poll(&poll, session.selection()));
        }
        Command::Create { question, options } => {
            if session.connect_wallet().await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            let Ok(created) = session.create_poll(&question, &options).await else {
                return Ok(ExitCode::FAILURE);
            };
            if let Some(poll) = &created.poll {
                print!("{}", render::poll(poll, session.selection()));
            }
            if let Some(receipt) = &created.receipt {
                print!("{}", render::receipt(receipt));
            }
        }
        Command::Vote { poll, option } => {
            let poll_id = PollId::new(poll);
            if session.refresh().await.is_err() || session.connect_wallet().await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            if let Err(e) = session.select(poll_id, option) {
                eprintln!("error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            let Ok(cast) = session.vote(poll_id).await else {
                return Ok(ExitCode::FAILURE);
            };
            if let Some(receipt) = &cast.receipt {
                print!("{}", render::receipt(receipt));
            }
            if let Some(poll) = session.store().poll(poll_id) {
                print!("{}", render::poll(&poll, session.selection()));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    verdict_utils::init_logging(config.log_format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }
    tracing::debug!(service_url = %config.service_url, "starting");
    let session = build_session(&config)?;
    run(cli.command, session).await
}
