use anyhow::{Context, Result, bail};
use bankscrape_core::{AccountField, AccountUpdate, UpdateMode};
use bankscrape_ingest::capture::{load_matrix_csv, load_table};
use bankscrape_ingest::portal::ACCOUNT_MARKER;
use bankscrape_ingest::{FixtureSource, RecordMapper, TransactionLayout, extract, strip_header_rows};
use bankscrape_store::open_stores;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

mod config;
mod session;

use config::{DEFAULT_CONFIG_FILE, init_config, load_config};
use session::{RowOrder, Session, account_listing, add_new_accounts};

#[derive(Parser, Debug)]
#[command(name = "bankscrape", version, about = "Bank page scraper: accounts and transactions to JSON")]
struct Cli {
    /// Config file (default: ./bankscrape.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config file
    Init,

    /// Scrape accounts and their history from captured pages, print, save
    Sync {
        /// Directory with contracts.json and transactions/<account>.json
        #[arg(long)]
        fixtures: PathBuf,

        /// Only fetch history for this account
        #[arg(long)]
        account: Option<String>,

        /// Column layout of the history table (history | statement)
        #[arg(long, default_value = "history")]
        layout: TransactionLayout,

        /// Keep history rows in page order instead of deposits-then-withdrawals
        #[arg(long)]
        page_order: bool,

        /// Add to the stored data instead of replacing it
        #[arg(long)]
        append: bool,
    },

    /// Add accounts from a captured accounts table
    ImportAccounts {
        /// Captured table (.json or .csv with a class column)
        #[arg(long, conflicts_with = "matrix", required_unless_present = "matrix")]
        table: Option<PathBuf>,

        /// Raw cell matrix (.csv, header rows included, no class column)
        #[arg(long)]
        matrix: Option<PathBuf>,
    },

    /// Add transactions of one account from a captured history table
    ImportTransactions {
        #[arg(long)]
        account: String,

        #[arg(long)]
        table: PathBuf,

        #[arg(long, default_value = "history")]
        layout: TransactionLayout,

        #[arg(long)]
        page_order: bool,
    },

    /// Print stored accounts (optionally one)
    Accounts {
        #[arg(long)]
        name: Option<String>,
    },

    /// Print stored transactions of one account
    Transactions {
        #[arg(long)]
        account: String,
    },

    /// Print accounts with their transactions
    Print,

    /// Replace (update) or accumulate (add) one account field
    Update {
        name: String,

        /// currency | balance | nature
        #[arg(long)]
        field: AccountField,

        #[arg(long)]
        value: String,

        #[arg(long, default_value = "update")]
        mode: UpdateMode,
    },

    /// Empty both stores
    Reset,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = if verbose { "bankscrape=debug" } else { "bankscrape=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if let Command::Init = cli.command {
        return init_config(&config_path);
    }
    let cfg = load_config(&config_path)?;
    let (mut accounts, mut transactions) = open_stores(&cfg.store_paths());

    match cli.command {
        Command::Init => {}

        Command::Sync {
            fixtures,
            account,
            layout,
            page_order,
            append,
        } => {
            if !fixtures.is_dir() {
                bail!("fixtures directory not found: {}", fixtures.display());
            }
            let row_order = if page_order { RowOrder::Page } else { RowOrder::Grouped };
            let mut session = Session::new(
                FixtureSource::new(&fixtures),
                accounts,
                transactions,
                cfg.history_from()?,
            )
            .with_portal(cfg.portal())
            .with_mapper(RecordMapper::new(layout))
            .with_row_order(row_order);

            println!("{}", session.sync(account.as_deref(), append)?);
        }

        Command::ImportAccounts { table, matrix } => {
            let rows = match (table, matrix) {
                (Some(path), _) => extract(&load_table(&path)?, ACCOUNT_MARKER, None),
                (None, Some(path)) => strip_header_rows(load_matrix_csv(&path)?),
                (None, None) => bail!("pass --table or --matrix"),
            };
            let mapped = RecordMapper::default().accounts(&rows)?;
            let added = add_new_accounts(&mut accounts, mapped)?;
            accounts.save()?;
            println!("Added {} account(s), {} stored", added, accounts.len());
        }

        Command::ImportTransactions {
            account,
            table,
            layout,
            page_order,
        } => {
            if !accounts.contains(&account) {
                warn!(account = %account, "no stored account with this name");
            }
            let page = load_table(&table)?;
            let row_order = if page_order { RowOrder::Page } else { RowOrder::Grouped };
            let tagged = row_order.classify(&page);
            let txns = RecordMapper::new(layout)
                .transactions(&tagged, &account)
                .with_context(|| format!("mapping {}", table.display()))?;
            let count = txns.len();
            transactions.extend(txns);
            transactions.save()?;
            println!("Added {} transaction(s) to {}", count, account);
        }

        Command::Accounts { name } => {
            println!("{}", account_listing(&mut accounts, &transactions, name.as_deref())?);
        }

        Command::Transactions { account } => {
            let selected = transactions.for_account(&account);
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }

        Command::Print => {
            accounts.sync_transactions(&transactions)?;
            println!("{}", accounts.to_json_pretty()?);
        }

        Command::Update {
            name,
            field,
            value,
            mode,
        } => {
            let update = AccountUpdate::parse(field, &value)?;
            let updated = accounts.update(&name, update, mode)?;
            println!("{}", serde_json::to_string_pretty(updated)?);
            accounts.save()?;
        }

        Command::Reset => {
            accounts.reset();
            transactions.reset();
            accounts.save()?;
            transactions.save()?;
            println!(
                "Reset {} and {}",
                accounts.path().display(),
                transactions.path().display()
            );
        }
    }

    Ok(())
}
