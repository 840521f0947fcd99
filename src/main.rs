use azul_datavault::application::validator::{
    validate_sale, validate_token_deletion, validate_tokenization,
};
use azul_datavault::config::GatewayConfig;
use azul_datavault::domain::data_vault::DataVaultResponse;
use azul_datavault::domain::ports::GatewayOperation;
use azul_datavault::interfaces::csv::sale_reader::SaleReader;
use azul_datavault::interfaces::envelope::GatewayRequest;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a card tokenization request and print its gateway envelope
    Tokenize {
        /// JSON file with `cardNumber`, `expiration` and `CVC`
        input: PathBuf,

        #[command(flatten)]
        gateway: GatewayConfig,
    },
    /// Validate a token deletion request and print its gateway envelope
    Delete {
        /// JSON file with `dataVaultToken`
        input: PathBuf,

        #[command(flatten)]
        gateway: GatewayConfig,
    },
    /// Validate a tokenized sale request and print its gateway envelope
    Sale {
        /// JSON file with one sale, or a CSV file with `--csv`
        input: PathBuf,

        /// Read a CSV batch, one sale per row. Invalid rows are reported and skipped.
        #[arg(long)]
        csv: bool,

        #[command(flatten)]
        gateway: GatewayConfig,
    },
    /// Interpret a DataVault response
    Response {
        /// JSON file with the gateway's response
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Tokenize { input, gateway } => {
            let request = validate_tokenization(&read_json(&input)?).into_diagnostic()?;
            print_envelope(&gateway, &request, true)
        }
        Command::Delete { input, gateway } => {
            let request = validate_token_deletion(&read_json(&input)?).into_diagnostic()?;
            print_envelope(&gateway, &request, true)
        }
        Command::Sale {
            input,
            csv: false,
            gateway,
        } => {
            let request = validate_sale(&read_json(&input)?).into_diagnostic()?;
            print_envelope(&gateway, &request, true)
        }
        Command::Sale {
            input,
            csv: true,
            gateway,
        } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = SaleReader::new(file);
            for (row, result) in reader.sales().enumerate() {
                match result {
                    Ok(request) => print_envelope(&gateway, &request, false)?,
                    Err(e) => {
                        eprintln!("Error validating sale request (row {}): {}", row + 1, e);
                    }
                }
            }
            Ok(())
        }
        Command::Response { input } => {
            let file = File::open(input).into_diagnostic()?;
            let response: DataVaultResponse = serde_json::from_reader(file).into_diagnostic()?;
            let card = response.into_token().into_diagnostic()?;
            println!(
                "approved,{},{},{}",
                card.brand.unwrap_or_default(),
                card.masked_card_number.unwrap_or_default(),
                card.token
            );
            Ok(())
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path).into_diagnostic()?;
    serde_json::from_reader(file).into_diagnostic()
}

fn print_envelope<T: GatewayOperation>(
    gateway: &GatewayConfig,
    operation: &T,
    pretty: bool,
) -> Result<()> {
    let request = GatewayRequest::build(gateway, operation).into_diagnostic()?;
    let output = json!({
        "url": request.url.as_str(),
        "body": request.body,
    });

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &output).into_diagnostic()?;
    } else {
        serde_json::to_writer(&mut writer, &output).into_diagnostic()?;
    }
    writeln!(writer).into_diagnostic()
}
