mod commands;
mod tui;
mod utils;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use ncp_sweep_cloud::RootAccount;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ncp-sweep")]
#[command(
    about = "Bulk sub-account management and resource cleanup for NAVER Cloud Platform",
    long_about = "Reads root account credentials from a spreadsheet and lists, activates or \
deactivates the sub-accounts of every account in it. `deactivate --cleanup` deletes the \
account's resources first, in dependency order."
)]
struct Cli {
    /// Spreadsheet of root accounts (AccountName, AccessKey, SecretKey, ...).
    /// Required by every command except `template` and `version`
    #[arg(short, long, global = true, env = "NCP_SWEEP_FILE")]
    file: Option<PathBuf>,

    /// Only process the root account with this AccountName
    #[arg(short, long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every sub-account of each root account
    List,
    /// Activate sub-accounts and reset their passwords
    Activate {
        /// Password for rows that have none (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Only target this sub-account login when a row names none
        #[arg(short, long)]
        login: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Deactivate sub-accounts, optionally deleting all resources first
    Deactivate {
        /// Delete servers, storage, networks, databases and the rest before deactivating
        #[arg(long)]
        cleanup: bool,
        /// Resource filter file (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print what would be deleted without calling the API
        #[arg(long)]
        dry_run: bool,
        /// Only target this sub-account login when a row names none
        #[arg(short, long)]
        login: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write a credential spreadsheet template
    Template {
        /// Where to write the template
        #[arg(short, long, default_value = ncp_sweep_config::TEMPLATE_FILE_NAME)]
        output: PathBuf,
    },
    /// Interactive terminal UI for deactivation and cleanup
    Tui {
        /// Resource filter file (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file
    if matches!(cli.command, Commands::Tui { .. }) {
        utils::init_file_logging();
    } else {
        utils::init_logging();
    }

    match cli.command {
        Commands::Version => {
            println!("ncp-sweep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Template { output } => commands::template::handle(&output),
        Commands::List => {
            let accounts = load_accounts(cli.file, cli.account.as_deref())?;
            commands::list::handle(&accounts).await
        }
        Commands::Activate {
            password,
            login,
            yes,
        } => {
            let accounts = load_accounts(cli.file, cli.account.as_deref())?;
            commands::activate::handle(accounts, password, login, yes).await
        }
        Commands::Deactivate {
            cleanup,
            config,
            dry_run,
            login,
            yes,
        } => {
            let accounts = load_accounts(cli.file, cli.account.as_deref())?;
            let args = commands::deactivate::DeactivateArgs {
                cleanup,
                config,
                dry_run,
                login,
                yes,
            };
            commands::deactivate::handle(accounts, args).await
        }
        Commands::Tui { config } => {
            let accounts = load_accounts(cli.file, cli.account.as_deref())?;
            commands::tui::handle(accounts, config).await
        }
    }
}

/// Load the spreadsheet, or exit with a usage error when none was given.
fn load_accounts(file: Option<PathBuf>, account: Option<&str>) -> anyhow::Result<Vec<RootAccount>> {
    let Some(file) = file else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required argument was not provided: --file <FILE>\n\n\
                 Pass -f/--file or set NCP_SWEEP_FILE (`ncp-sweep template` writes an empty spreadsheet)",
            )
            .exit();
    };
    utils::load_accounts(&file, account)
}
