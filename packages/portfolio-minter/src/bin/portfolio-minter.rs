//! Portfolio minter binary.
//!
//! ```bash
//! # Deploy the contract to the signer account (signer becomes the owner)
//! portfolio-minter deploy target/near/portfolio_nft/portfolio_nft.wasm
//!
//! # Mint a portfolio
//! portfolio-minter mint --name "John Doe" --email john@example.com --github johndoe
//!
//! # Inspect
//! portfolio-minter show 1
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use near_gas::NearGas;
use portfolio_minter::rpc::RpcClient;
use portfolio_minter::signer::load_signer;
use portfolio_minter::store::deploy_contract;
use portfolio_minter::{
    Config, ContractStore, FormController, Notice, PortfolioStore, PortfolioViewer,
};
use portfolio_types::Platform;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portfolio-minter")]
#[command(about = "Mint and inspect verified portfolio NFTs")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file stem (`<stem>.toml`, optional)
    #[arg(long, global = true, env = "PORTFOLIO_CONFIG", default_value = "portfolio")]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the contract wasm to the signer account and initialize it
    Deploy {
        wasm: PathBuf,
    },

    /// Mint a portfolio from the given fields
    Mint {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        github: Option<String>,

        #[arg(long)]
        codechef: Option<String>,

        #[arg(long)]
        linkedin: Option<String>,

        /// Account receiving the portfolio (defaults to the signer)
        #[arg(long)]
        receiver: Option<String>,
    },

    /// Print a minted portfolio
    Show {
        token_id: u64,
    },

    /// Print the number of minted portfolios
    Total,

    /// Print the account allowed to mint
    Owner,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    info!(contract = %config.contract_id, rpc = %config.rpc_url, "Configuration loaded");

    match cli.command {
        Command::Deploy { wasm } => {
            let code = std::fs::read(&wasm)
                .with_context(|| format!("reading {}", wasm.display()))?;
            let rpc = RpcClient::new(&config.rpc_url, &config.fallback_rpc_url);
            let signer = load_signer(&config)?;
            let contract_id =
                deploy_contract(&rpc, &signer, code, NearGas::from_tgas(config.gas_tgas)).await?;
            println!("{contract_id}");
        }

        Command::Mint {
            name,
            email,
            github,
            codechef,
            linkedin,
            receiver,
        } => {
            let store = ContractStore::from_config(&config)?;
            let receiver = receiver
                .or_else(|| store.signer_account().map(|a| a.to_string()))
                .context("no receiver account")?;

            let mut form = FormController::new(store);
            form.connect_wallet(receiver);
            form.set_name(name);
            form.set_email(email);
            for (platform, handle) in [
                (Platform::Github, github),
                (Platform::CodeChef, codechef),
                (Platform::LinkedIn, linkedin),
            ] {
                if let Some(handle) = handle {
                    form.set_handle(platform, handle)?;
                }
            }

            match form.mint().await {
                Ok(token_id) => println!("{}", Notice::minted(token_id)),
                Err(e) => {
                    eprintln!("{}", Notice::for_error(&e));
                    return Err(e.into());
                }
            }
        }

        Command::Show { token_id } => {
            let store = ContractStore::read_only(&config)?;
            let mut viewer = PortfolioViewer::new();
            let total = viewer.refresh_total(&store).await?;
            anyhow::ensure!(
                viewer.select(token_id),
                "token {token_id} is out of range (1..={total})"
            );
            if let Some(record) = viewer.load(&store).await? {
                println!("{}", serde_json::to_string_pretty(record)?);
            }
        }

        Command::Total => {
            let store = ContractStore::read_only(&config)?;
            println!("{}", store.total_portfolios().await?);
        }

        Command::Owner => {
            let store = ContractStore::read_only(&config)?;
            println!("{}", store.owner().await?);
        }
    }

    Ok(())
}
