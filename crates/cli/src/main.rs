mod config;
mod output;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use artshop_chain::JsonRpcContract;
use artshop_core::{
    AccountProvider, LifecycleClient, LifecycleError, LifecycleSession, NewArtwork, Operation,
    Request, RequestArgs, StaticAccountProvider,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Artwork provenance lifecycle client.
#[derive(Parser)]
#[command(
    name = "artshop",
    version,
    about = "Artwork provenance lifecycle client"
)]
struct Cli {
    /// Path to the configuration file (default: ./artshop.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new artwork; the active account becomes its origin artist
    Create {
        #[command(flatten)]
        artwork: ArtworkArgs,
    },

    /// Frame a created artwork
    Frame {
        /// Artwork id
        id: u64,
    },

    /// Put a framed artwork up for adoption
    Offer {
        /// Artwork id
        id: u64,
        /// Listing price in ether
        #[arg(long)]
        price: Decimal,
    },

    /// Adopt an artwork, paying the origin artist
    Adopt {
        /// Artwork id
        id: u64,
        /// Payment in ether (defaults to the listed price)
        #[arg(long)]
        payment: Option<Decimal>,
    },

    /// Pack an adopted artwork
    Pack {
        /// Artwork id
        id: u64,
    },

    /// Pick up a packed artwork; the active account becomes its shipper
    PickUp {
        /// Artwork id
        id: u64,
    },

    /// Mark a picked-up artwork as shipped
    Ship {
        /// Artwork id
        id: u64,
    },

    /// Mark a shipped artwork as delivered
    Deliver {
        /// Artwork id
        id: u64,
    },

    /// Show an artwork's details and state
    Fetch {
        /// Artwork id
        id: u64,
    },

    /// Dispatch an operation by request code (0 create, 1 frame, 2 offer,
    /// 3 adopt, 4 pack, 5 pick up, 6 ship, 7 deliver, 8 fetch)
    Request {
        /// Request code, 0-8
        code: u8,
        /// Artwork id (all codes except 0)
        #[arg(long)]
        id: Option<u64>,
        /// Listing price in ether (code 2)
        #[arg(long)]
        price: Option<Decimal>,
        /// Payment in ether (code 3)
        #[arg(long)]
        payment: Option<Decimal>,
        #[command(flatten)]
        artwork: ArtworkArgs,
    },

    /// List contract events
    Events {
        /// First block to include
        #[arg(long, default_value = "0")]
        from_block: u64,
    },

    /// Show the active signing account
    Account,
}

/// Artwork metadata for creation.
#[derive(Args, Debug, Default)]
struct ArtworkArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long, default_value = "0")]
    year: u32,
    #[arg(long)]
    medium: Option<String>,
    #[arg(long)]
    style: Option<String>,
    #[arg(long)]
    artist_name: Option<String>,
    #[arg(long)]
    artist_info: Option<String>,
    #[arg(long)]
    artist_location: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<ArtworkArgs> for NewArtwork {
    fn from(args: ArtworkArgs) -> Self {
        NewArtwork {
            title: args.title,
            year: args.year,
            medium: args.medium,
            style: args.style,
            artist_name: args.artist_name,
            artist_info: args.artist_info,
            artist_location: args.artist_location,
            notes: args.notes,
        }
    }
}

/// What a command asks the session to do once the contract is wired up.
enum Action {
    /// Run `request`, first loading artwork `id` when given.
    Run { id: Option<u64>, request: Request },
    Events { from_block: u64 },
    Account,
}

fn main() {
    let cli = Cli::parse();

    let action = match build_action(cli.command) {
        Ok(action) => action,
        Err(msg) => {
            output::report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(msg) => {
            output::report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    init_tracing(config.log_level.as_deref());

    let (rpc, pinned) = match config.rpc_config().and_then(|rpc| Ok((rpc, config.account()?))) {
        Ok(pair) => pair,
        Err(msg) => {
            output::report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    debug!(rpc_url = %rpc.rpc_url, contract = %rpc.contract_address, "configured");

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            output::report_error(
                &format!("failed to create tokio runtime: {}", e),
                cli.output,
                cli.quiet,
            );
            process::exit(1);
        }
    };

    let contract = Arc::new(JsonRpcContract::new(rpc));
    let accounts: Arc<dyn AccountProvider> = match pinned {
        Some(account) => {
            debug!(%account, "using pinned signing account");
            Arc::new(StaticAccountProvider::new(account))
        }
        None => contract.clone(),
    };
    let code = rt.block_on(execute(contract, accounts, action, cli.output, cli.quiet));
    process::exit(code);
}

fn init_tracing(configured: Option<&str>) {
    let default = configured.unwrap_or("warn").to_string();
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Validate arguments and turn a subcommand into an [`Action`]. Runs before
/// any configuration is loaded, so bad input never touches the network.
fn build_action(command: Commands) -> Result<Action, String> {
    let transition = |id: u64, request: Request| Action::Run {
        id: Some(id),
        request,
    };
    let action = match command {
        Commands::Create { artwork } => Action::Run {
            id: None,
            request: Request::Create(artwork.into()),
        },
        Commands::Frame { id } => transition(id, Request::Frame),
        Commands::Offer { id, price } => transition(id, Request::OfferForAdoption { price }),
        Commands::Adopt { id, payment } => transition(id, Request::Adopt { payment }),
        Commands::Pack { id } => transition(id, Request::Pack),
        Commands::PickUp { id } => transition(id, Request::PickUp),
        Commands::Ship { id } => transition(id, Request::Ship),
        Commands::Deliver { id } => transition(id, Request::Deliver),
        Commands::Fetch { id } => Action::Run {
            id: None,
            request: Request::FetchDetails { id },
        },
        Commands::Request {
            code,
            id,
            price,
            payment,
            artwork,
        } => {
            let operation = Operation::from_request_code(code)
                .ok_or_else(|| format!("unknown request code {}; expected 0-8", code))?;
            if operation != Operation::Create && id.is_none() {
                return Err(format!("request code {} ({}) requires --id", code, operation));
            }
            if operation == Operation::OfferForAdoption && price.is_none() {
                return Err(format!("request code {} ({}) requires --price", code, operation));
            }
            let args = RequestArgs {
                artwork: artwork.into(),
                id: id.unwrap_or(0),
                price: price.unwrap_or(Decimal::ZERO),
                payment,
            };
            let request = Request::from_code(code, args)
                .ok_or_else(|| format!("unknown request code {}; expected 0-8", code))?;
            let preload = match operation {
                Operation::Create | Operation::FetchDetails => None,
                _ => id,
            };
            Action::Run {
                id: preload,
                request,
            }
        }
        Commands::Events { from_block } => Action::Events { from_block },
        Commands::Account => Action::Account,
    };
    Ok(action)
}

/// Run one action against the contract. Returns the process exit code.
async fn execute(
    contract: Arc<JsonRpcContract>,
    accounts: Arc<dyn AccountProvider>,
    action: Action,
    output: OutputFormat,
    quiet: bool,
) -> i32 {
    match action {
        Action::Account => match accounts.active_account().await {
            Ok(account) => {
                output::print_account(&account, output);
                0
            }
            Err(e) => {
                output::report_lifecycle_error(&LifecycleError::from(e), output, quiet);
                1
            }
        },
        Action::Events { from_block } => {
            let client = LifecycleClient::new(contract, accounts);
            let mut session = LifecycleSession::new(client).with_event_cursor(from_block);
            match session.refresh_events().await {
                Ok(_) => {
                    output::print_events(session.events(), output, quiet);
                    0
                }
                Err(e) => {
                    output::report_lifecycle_error(&e, output, quiet);
                    1
                }
            }
        }
        Action::Run { id, request } => {
            // Writes need a signer; reads go to the read endpoint regardless.
            if request.operation().is_write() {
                if let Err(e) = accounts.active_account().await {
                    output::report_lifecycle_error(&LifecycleError::from(e), output, quiet);
                    return 1;
                }
            }
            let client = LifecycleClient::new(contract, accounts);
            let mut session = LifecycleSession::new(client);
            if let Some(id) = id {
                if let Err(e) = session.run(Request::FetchDetails { id }).await {
                    output::report_lifecycle_error(&e, output, quiet);
                    return 1;
                }
            }
            match session.run(request).await {
                Ok(_) => {
                    output::print_record(session.record(), session.status(), output, quiet);
                    0
                }
                Err(e) => {
                    output::report_lifecycle_error(&e, output, quiet);
                    1
                }
            }
        }
    }
}
