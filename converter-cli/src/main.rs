//! Converter CLI
//!
//! Headless shell over the conversion pipeline:
//! - `currencies` lists the supported currencies
//! - `convert` performs a single conversion through the interactor
//! - `watch` drives the orchestrator from stdin and prints every state change

mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use converter_client::ConversionApiClient;
use converter_core::{ConversionOrchestrator, ConverterInteractor, ViewState};
use converter_types::{Currency, FormattedAmount, all_currencies, parse_amount};

#[derive(Parser)]
#[command(name = "converter")]
#[command(author, version, about = "Currency converter CLI", long_about = None)]
struct Cli {
    /// Base URL of the exchange API
    #[arg(long, env = "CONVERTER_API_URL")]
    api_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported currencies
    Currencies,
    /// Convert an amount once and print the result
    Convert {
        /// Amount to convert (`.` or `,` as decimal separator)
        amount: String,
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
    },
    /// Interactive shell driving the live conversion pipeline
    Watch,
}

fn init_tracing(json: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,converter_core=debug,converter_client=debug".into()),
        )
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = config::Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    match cli.command {
        Commands::Currencies => {
            for currency in all_currencies() {
                println!("{}\t{}", currency.code(), currency.symbol());
            }
        }

        Commands::Convert { amount, from, to } => {
            let amount = parse_amount(&amount);
            if amount <= 0.0 {
                anyhow::bail!("Amount must be a positive number");
            }
            let from: Currency = from.parse()?;
            let to: Currency = to.parse()?;

            let client = ConversionApiClient::new(&config.client_config())?;
            tracing::debug!(base_url = %client.base_url(), "client ready");
            let interactor = ConverterInteractor::new(client);

            match interactor.convert(amount, from, to).await {
                Ok(value) => println!("{}", FormattedAmount::new(value, to)),
                Err(err) => {
                    let (title, details) = err.title_and_details();
                    eprintln!("✗ {}: {}", title, details);
                    std::process::exit(1);
                }
            }
        }

        Commands::Watch => watch(&config).await?,
    }

    Ok(())
}

async fn watch(config: &config::Config) -> Result<()> {
    let client = ConversionApiClient::new(&config.client_config())?;
    let interactor = Arc::new(ConverterInteractor::new(client));
    let orchestrator = ConversionOrchestrator::spawn(interactor, config.orchestrator_config());

    println!(
        "Currencies: {}",
        ConversionOrchestrator::currency_titles().join(", ")
    );
    println!("Commands: amount <text>, from <code>, to <code>, toggle, dismiss, quit");

    let mut updates = orchestrator.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            print_state(&state);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
        let argument = argument.trim();
        match command {
            "" => {}
            "amount" => orchestrator.set_amount_text(argument),
            "from" => orchestrator.set_source_currency_name(argument),
            "to" => orchestrator.set_target_currency_name(argument),
            "toggle" => orchestrator.toggle_direction(),
            "dismiss" => {
                if let Some(alert) = orchestrator.state().alert {
                    orchestrator.dismiss_alert(alert.id);
                }
            }
            "quit" | "exit" => break,
            other => eprintln!("Unknown command: {}", other),
        }
    }

    orchestrator.shutdown();
    // The printer ends once the pipeline drops its state sender.
    printer.await?;
    Ok(())
}

fn print_state(state: &ViewState) {
    let pending = if state.pending { " (converting...)" } else { "" };
    let result = if state.result_text.is_empty() {
        "-"
    } else {
        state.result_text.as_str()
    };
    println!("[{}] {}{}", state.direction_icon, result, pending);

    if let Some(alert) = &state.alert {
        match &alert.info.message {
            Some(message) => println!("! {}: {}", alert.info.title, message),
            None => println!("! {}", alert.info.title),
        }
        println!("  type `dismiss` to {}", alert.info.dismiss_label);
    }
}
