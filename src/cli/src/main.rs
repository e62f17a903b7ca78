//! Admin CLI for the custody escrow ledger.

mod commands;
mod config;
mod errors;
mod store;

use anyhow::Result;
use colored::Colorize;
use config::CliConfig;
use errors::CliError;
use std::path::PathBuf;
use store::parse_address;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vault::Address;

/// Command line arguments for the admin CLI.
#[derive(Debug, StructOpt)]
#[structopt(name = "vault", about = "Custody escrow ledger admin CLI")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the store directory
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// Caller address (hex) for gated operations
    #[structopt(long)]
    caller: Option<String>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the admin CLI.
#[derive(Debug, StructOpt)]
enum Command {
    /// Initialize the store, registering the owner and initial trustee
    #[structopt(name = "init")]
    Init {
        /// Owner address (hex)
        owner: String,
    },

    /// Assign a new trustee
    #[structopt(name = "set-trustee")]
    SetTrustee {
        /// Trustee address (hex)
        addr: String,
    },

    /// Add a token to the deposit allow-list
    #[structopt(name = "allow-token")]
    AllowToken {
        /// Token contract address (hex)
        token: String,
    },

    /// Add a sender to the deposit allow-list
    #[structopt(name = "allow-sender")]
    AllowSender {
        /// Sender address (hex)
        sender: String,
    },

    /// Deposit tokens into custody
    #[structopt(name = "deposit")]
    Deposit {
        /// Token contract address (hex)
        #[structopt(long)]
        token: String,

        /// Amount to deposit
        #[structopt(long)]
        amount: u128,

        /// Receiver address (hex)
        #[structopt(long)]
        receiver: String,

        /// Metadata tag
        #[structopt(long, default_value = "0")]
        tag: u64,
    },

    /// Release a pending deposit to its receiver
    #[structopt(name = "approve")]
    Approve {
        /// Deposit id
        deposit_id: u64,
    },

    /// Return a pending deposit to its sender
    #[structopt(name = "revert")]
    Revert {
        /// Deposit id
        deposit_id: u64,
    },

    /// Show the status of a deposit
    #[structopt(name = "status")]
    Status {
        /// Deposit id
        deposit_id: u64,
    },

    /// List all deposits in creation order
    #[structopt(name = "deposits")]
    Deposits,

    /// Show a holder's balance for a token
    #[structopt(name = "balance")]
    Balance {
        /// Token contract address (hex)
        #[structopt(long)]
        token: String,

        /// Holder address (hex)
        #[structopt(long)]
        holder: String,
    },

    /// Mint tokens in the bundled ledger
    #[structopt(name = "mint")]
    Mint {
        /// Token contract address (hex)
        #[structopt(long)]
        token: String,

        /// Recipient address (hex)
        #[structopt(long)]
        to: String,

        /// Amount to mint
        #[structopt(long)]
        amount: u128,
    },

    /// Authorize the vault to pull the caller's tokens
    #[structopt(name = "authorize")]
    Authorize {
        /// Token contract address (hex)
        #[structopt(long)]
        token: String,

        /// Amount to authorize
        #[structopt(long)]
        amount: u128,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    // Determine the store directory
    let data_dir = match &opt.data_dir {
        Some(path) => path.clone(),
        None => PathBuf::from(&config.data_dir),
    };

    // Run the appropriate command
    match opt.cmd {
        Command::Init { owner } => {
            let custody = commands::init::run(&data_dir, &owner)?;
            println!("{} {}", "Vault initialized. Custody account:".green(), custody);
        }
        Command::SetTrustee { addr } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::set_trustee::run(&data_dir, &caller, &addr)?;
            println!("{} {}", "Trustee set:".green(), addr);
        }
        Command::AllowToken { token } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::allow_token::run(&data_dir, &caller, &token)?;
            println!("{} {}", "Token allowed:".green(), token);
        }
        Command::AllowSender { sender } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::allow_sender::run(&data_dir, &caller, &sender)?;
            println!("{} {}", "Sender allowed:".green(), sender);
        }
        Command::Deposit {
            token,
            amount,
            receiver,
            tag,
        } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            let id = commands::deposit::run(&data_dir, &caller, &token, amount, &receiver, tag)?;
            println!("{} {}", "Deposit recorded with id:".green(), id);
        }
        Command::Approve { deposit_id } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::approve::run(&data_dir, &caller, deposit_id)?;
            println!("{} {}", "Deposit approved:".green(), deposit_id);
        }
        Command::Revert { deposit_id } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::revert::run(&data_dir, &caller, deposit_id)?;
            println!("{} {}", "Deposit reverted:".green(), deposit_id);
        }
        Command::Status { deposit_id } => {
            let status = commands::status::run(&data_dir, deposit_id)?;
            println!("{} {}", "Status:".green(), status);
        }
        Command::Deposits => {
            let records = commands::deposits::run(&data_dir)?;
            if records.is_empty() {
                println!("{}", "No deposits recorded".yellow());
            }
            for record in records {
                println!("{}", record);
            }
        }
        Command::Balance { token, holder } => {
            let balance = commands::balance::run(&data_dir, &token, &holder)?;
            println!("{} {}", "Balance:".green(), balance);
        }
        Command::Mint { token, to, amount } => {
            let new_balance = commands::mint::run(&data_dir, &token, &to, amount)?;
            println!("{} {}", "Minted. New balance:".green(), new_balance);
        }
        Command::Authorize { token, amount } => {
            let caller = resolve_caller(&opt.caller, &config)?;
            commands::authorize::run(&data_dir, &caller, &token, amount)?;
            println!("{} {}", "Vault authorized for:".green(), amount);
        }
    }

    Ok(())
}

/// Resolves the caller identity from the command line or the config file.
fn resolve_caller(opt_caller: &Option<String>, config: &CliConfig) -> Result<Address, CliError> {
    let hex_addr = match opt_caller {
        Some(addr) => addr.clone(),
        None if !config.caller.is_empty() => config.caller.clone(),
        None => {
            return Err(CliError::MissingCaller(
                "pass --caller or set it in the config file".to_string(),
            ))
        }
    };

    parse_address(&hex_addr)
}
