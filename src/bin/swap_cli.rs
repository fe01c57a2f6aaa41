use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser as _, Subcommand};
use onion_swap::captcha::ArithmeticChallenge;
use onion_swap::config::{
    ClientConfig, DEFAULT_PROBE_PATH, DEFAULT_SERVICE_PORT, default_store_path,
};
use onion_swap::endpoint;
use onion_swap::render;
use onion_swap::swap::store::SqliteSwapStore;
use onion_swap::swap::{Coin, SwapApiClient, SwapOrderRequest};
use onion_swap::transport::http::DEFAULT_TOR_PROXY;
use onion_swap::transport::{HttpTransport, TransportConfig};

#[derive(Debug, clap::Parser)]
struct Args {
    /// Candidate service host; repeat to give several. Defaults to the built-in onion hosts.
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_SERVICE_PORT)]
    port: u16,

    #[arg(long, default_value = DEFAULT_PROBE_PATH)]
    probe_path: String,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_TOR_PROXY, conflicts_with = "no_proxy")]
    proxy: String,

    #[arg(long)]
    no_proxy: bool,

    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Coins,
    Rate {
        #[arg(long, ignore_case = true)]
        from: Coin,

        #[arg(long, ignore_case = true)]
        to: Coin,

        #[arg(long)]
        amount: String,
    },
    Create {
        #[arg(long, ignore_case = true)]
        from: Coin,

        #[arg(long, ignore_case = true)]
        to: Coin,

        #[arg(long)]
        amount: String,

        #[arg(long)]
        receiving_address: String,

        #[arg(long)]
        refund_address: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    Status {
        #[arg(long)]
        swap_id: String,
    },
    List,
    Show {
        #[arg(long)]
        swap_id: String,
    },
    Delete {
        #[arg(long)]
        swap_id: String,
    },
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut cfg = ClientConfig::default();
        if !self.endpoints.is_empty() {
            cfg.hosts = self.endpoints.clone();
        }
        cfg.port = self.port;
        cfg.probe_path = self.probe_path.clone();
        cfg.timeout = Duration::from_secs(self.timeout_secs);
        cfg.transport = if self.no_proxy {
            TransportConfig::direct()
        } else {
            TransportConfig {
                proxy: Some(self.proxy.clone()),
            }
        };
        cfg.store_path = self.store_path.clone().unwrap_or_else(default_store_path);
        cfg
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    onion_swap::logging::init().ok();
    let args = Args::parse();
    let cfg = args.client_config();

    match args.command {
        Command::Coins => {
            for coin in Coin::ALL {
                println!("{coin}");
            }
        }
        Command::Rate { from, to, amount } => {
            let amount = validate_amount(&amount)?;
            let client = connect(&cfg).await?;
            let quote = client.quote_rate(from.code(), to.code(), &amount).await?;
            println!("{}", render::render_quote(&quote, from.code(), to.code()));
        }
        Command::Create {
            from,
            to,
            amount,
            receiving_address,
            refund_address,
            yes,
        } => {
            let order = SwapOrderRequest::new(
                from,
                to,
                amount.trim(),
                receiving_address.trim(),
                refund_address.trim(),
            );
            let missing = order.missing_fields();
            anyhow::ensure!(
                missing.is_empty(),
                "all fields must be filled: missing {}",
                missing.join(", ")
            );
            validate_amount(&order.amount)?;
            human_check()?;

            if !yes {
                println!(
                    "{}",
                    render::render_order_confirmation(
                        &order.amount,
                        &order.from_coin,
                        &order.to_coin,
                        &order.receiving_address,
                        &order.refund_address,
                    )
                );
                if !confirm("Do you want to proceed? [y/N] ")? {
                    println!("Swap cancelled.");
                    return Ok(());
                }
            }

            let client = connect(&cfg).await?;
            let record = client.create_swap(&order).await?;

            if record.has_service_id() {
                let mut store =
                    SqliteSwapStore::open(cfg.store_path.clone()).context("open swap store")?;
                store.save(&record).context("save swap record")?;
            } else {
                tracing::warn!("service response has no transaction_id; swap not saved locally");
            }

            println!("{}", render::render_created(&record, &order.from_coin));
        }
        Command::Status { swap_id } => {
            let swap_id = required_swap_id(&swap_id)?;
            human_check()?;

            let client = connect(&cfg).await?;
            let status = client.get_swap_status(&swap_id).await?;
            println!("{}", render::render_status(&swap_id, &status));
        }
        Command::List => {
            let store = SqliteSwapStore::open(cfg.store_path.clone()).context("open swap store")?;
            let ids = store.list().context("list swaps")?;
            if ids.is_empty() {
                println!("No saved swaps found.");
            }
            for id in ids {
                println!("{id}");
            }
        }
        Command::Show { swap_id } => {
            let swap_id = required_swap_id(&swap_id)?;
            let store = SqliteSwapStore::open(cfg.store_path.clone()).context("open swap store")?;
            let record = store
                .get(&swap_id)
                .context("get swap")?
                .with_context(|| format!("swap {swap_id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&record.to_json())?);
        }
        Command::Delete { swap_id } => {
            let swap_id = required_swap_id(&swap_id)?;
            let mut store =
                SqliteSwapStore::open(cfg.store_path.clone()).context("open swap store")?;
            let deleted = store.delete(&swap_id).context("delete swap")?;
            anyhow::ensure!(deleted, "swap {swap_id} not found");
            println!("Swap {swap_id} deleted successfully!");
        }
    }

    Ok(())
}

async fn connect(cfg: &ClientConfig) -> Result<SwapApiClient> {
    let transport = Arc::new(HttpTransport::new(&cfg.transport).context("create transport")?);
    let base = endpoint::resolve(
        transport.as_ref(),
        &cfg.candidates(),
        &cfg.probe_path,
        cfg.timeout,
    )
    .await?;
    Ok(SwapApiClient::new(transport, base).with_timeout(cfg.timeout))
}

fn validate_amount(amount: &str) -> Result<String> {
    let amount = amount.trim();
    anyhow::ensure!(!amount.is_empty(), "amount is required");
    let value: f64 = amount
        .parse()
        .with_context(|| format!("amount must be a number: {amount}"))?;
    anyhow::ensure!(
        value.is_finite() && value > 0.0,
        "amount must be a positive number: {amount}"
    );
    Ok(amount.to_string())
}

fn required_swap_id(swap_id: &str) -> Result<String> {
    let swap_id = swap_id.trim();
    anyhow::ensure!(!swap_id.is_empty(), "swap id is required");
    Ok(swap_id.to_string())
}

fn human_check() -> Result<()> {
    let challenge = ArithmeticChallenge::generate(&mut rand::thread_rng());
    let answer = prompt(&format!("CAPTCHA: {} ", challenge.question()))?;
    anyhow::ensure!(challenge.verify(&answer), "CAPTCHA verification failed");
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(question)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn prompt(question: &str) -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{question}").context("write prompt")?;
    stdout.flush().context("flush prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read answer")?;
    Ok(line)
}
