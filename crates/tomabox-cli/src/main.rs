//! tomabox CLI — `tomabox` command.
//!
//! Interactive front end: optionally mint fresh tokens into
//! `accounts-N.json` batches, pick one batch, then run the treasure-box
//! campaign against it until interrupted.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};

use tomabox::config::{DEFAULT_BASE_URL, DEFAULT_QUERY_FILE};
use tomabox::{
    load_campaign_records, read_queries, AccountFileRef, AccountStore, ApiClient, CampaignRunner,
    Config, Console, OverflowPolicy, TokenMinter,
};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// tomabox — mint Tomarket session tokens in batches and run referral
/// treasure-box campaigns over them.
#[derive(Parser, Debug)]
#[command(
    name = "tomabox",
    about = "Tomarket referral batch runner",
    version,
    long_about = "tomabox — Tomarket referral batch runner\n\nReads login payloads from queries.txt, files their tokens into\naccounts-N.json batches, and loops the referral treasure box over a batch."
)]
struct Cli {
    /// Referral code applied on login and for every account
    #[arg(long, env = "REFF_CODE", hide_env_values = true)]
    referral_code: Option<String>,

    /// Directory holding queries.txt and accounts-*.json
    #[arg(long, env = "TOMABOX_DIR", default_value = ".")]
    dir: PathBuf,

    /// API root of the mini-app backend
    #[arg(long, env = "TOMABOX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Identity source file name inside --dir
    #[arg(long, default_value = DEFAULT_QUERY_FILE)]
    query_file: String,

    /// Skip the first menu
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Accounts per batch file when generating (skips the prompt)
    #[arg(long)]
    per_file: Option<String>,

    /// 1-based index of the batch file to run (skips the prompt)
    #[arg(long)]
    file: Option<String>,

    /// Move records that overflow an existing batch into new files instead of dropping them
    #[arg(long)]
    spill_overflow: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Mint tokens from queries.txt, then run
    Generate,
    /// Run an existing accounts-*.json batch
    Existing,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();
    // REFF_CODE may live in ./.env; real environment variables win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let console = Console::new();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            console.fail(format!("Failed To Start Runtime: {e}"));
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(cli, console.clone()) => result,
            _ = tokio::signal::ctrl_c() => {
                log::debug!("interrupted");
                std::process::exit(0);
            }
        }
    });

    if let Err(e) = result {
        console.fail(format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, console: Console) -> Result<()> {
    let config = Config::new(cli.referral_code.unwrap_or_default(), &cli.dir)?
        .with_base_url(cli.base_url)
        .with_query_file(cli.query_file);
    let store = AccountStore::new(&config.work_dir);

    let mode = match cli.mode {
        Some(mode) => mode,
        None => {
            console.menu_item(1, "Generate Tokens");
            console.menu_item(2, "Use Existing accounts-*.json");
            match parse_index(&ask(&console, "Select Option").await?, 2) {
                Some(1) => Mode::Generate,
                Some(_) => Mode::Existing,
                None => {
                    return Err(anyhow!(
                        "Invalid Initial Choice. Please Run The Script Again And Choose A Valid Option"
                    ))
                }
            }
        }
    };

    if mode == Mode::Generate {
        let answer = match cli.per_file {
            Some(n) => n,
            None => ask(&console, "How Much Accounts Each 'accounts-*.json'?").await?,
        };
        let per_file = parse_count(&answer)?;
        let policy = if cli.spill_overflow {
            OverflowPolicy::Spill
        } else {
            OverflowPolicy::Truncate
        };
        cmd_generate(&config, &store, per_file, policy, &console).await?;
    }

    let files = store.discover_required()?;
    for (i, file) in files.iter().enumerate() {
        console.menu_item(i + 1, &file.file_name());
    }
    let answer = match cli.file {
        Some(n) => n,
        None => ask(&console, "Select File You Want To Use").await?,
    };
    let selected = select_file(&files, &answer)?;

    cmd_campaign(&config, &store, selected, &console).await
}

// ── Command implementations ───────────────────────────────────────────────────

/// Mint tokens for every payload and merge them into the batch files.
async fn cmd_generate(
    config: &Config,
    store: &AccountStore,
    per_file: usize,
    policy: OverflowPolicy,
    console: &Console,
) -> Result<()> {
    let queries = read_queries(&config.query_path())?;
    let client = ApiClient::new(config)?;
    let minter = TokenMinter::new(client, config, console.clone());

    let report = store
        .reconcile(&queries, per_file, policy, &minter, console)
        .await
        .context("failed to update account files")?;

    log::info!(
        "reconciled {} queries: {} files updated, {} created, {} tokens refreshed, {} dropped",
        queries.len(),
        report.updated.len(),
        report.created.len(),
        report.refreshed,
        report.dropped
    );
    if report.dropped > 0 {
        console.warn(format!(
            "{} New Accounts Did Not Fit And Were Dropped",
            report.dropped
        ));
    }
    Ok(())
}

/// Load one batch and loop the campaign over it.
async fn cmd_campaign(
    config: &Config,
    store: &AccountStore,
    file: &AccountFileRef,
    console: &Console,
) -> Result<()> {
    let records = load_campaign_records(store, &file.path, console);
    let client = ApiClient::new(config)?;
    let runner = CampaignRunner::new(client, config, console.clone());
    runner.run_forever(&records).await;
    Ok(())
}

// ── Prompt helpers ────────────────────────────────────────────────────────────

/// Prompt on a blocking thread so Ctrl-C stays responsive.
async fn ask(console: &Console, question: &str) -> Result<String> {
    let console = console.clone();
    let question = question.to_string();
    tokio::task::spawn_blocking(move || console.prompt(&question))
        .await
        .context("prompt task failed")?
        .context("failed to read from stdin")
}

/// Parse a 1-based menu choice in `1..=max`.
fn parse_index(input: &str, max: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
}

/// Parse the batch capacity; must be a positive integer.
fn parse_count(input: &str) -> Result<usize> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid number: '{}'", input.trim()))?;
    if n <= 0 {
        return Err(anyhow!("The Number Must Be Greater Than Zero."));
    }
    usize::try_from(n).map_err(|_| anyhow!("number too large: {n}"))
}

fn select_file<'a>(files: &'a [AccountFileRef], input: &str) -> Result<&'a AccountFileRef> {
    parse_index(input, files.len())
        .map(|i| &files[i - 1])
        .ok_or_else(|| {
            anyhow!("Invalid Choice. Please Run The Script Again And Choose A Valid Option")
        })
}
