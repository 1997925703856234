//! Paymint command line
//!
//! Usage:
//!   cargo run --bin paymint -- quote 100
//!   cargo run --bin paymint -- invoices --payee 0x...
//!   cargo run --bin paymint -- create-payroll --issuer 0x... --project Launch \
//!       --client-email ops@client.io --due 2024-03-01 --recipient 0xa=1.5
//!
//! Environment variables:
//!   PAYMINT_API_BASE - backend base URL (default: http://localhost:5000)
//!   PAYMINT_SURCHARGE_BPS - surcharge for new records (default: 250)

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::info;
use paymint::{
    api::ApiClient,
    config::Config,
    forms::{InvoiceDraft, PayrollDraft},
    render,
    store::{DashboardStats, InvoiceStore, PayrollStore, TransactionStore},
};

#[derive(Parser, Debug)]
#[command(name = "paymint", version, about = "Invoices and payrolls on Sui")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show surcharge and total for an amount in SUI
    Quote {
        amount: String,
        #[arg(long)]
        bps: Option<u32>,
    },
    /// List invoices, optionally for one payee wallet
    Invoices {
        #[arg(long)]
        payee: Option<String>,
    },
    /// Show one invoice
    Invoice { id: String },
    /// Create an invoice payable to `--payee`
    CreateInvoice {
        #[arg(long)]
        payee: String,
        #[arg(long)]
        payer: String,
        /// Amount in SUI
        #[arg(long)]
        amount: String,
        #[arg(long)]
        service: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        due: String,
    },
    /// List payrolls by issuer or client email
    Payrolls {
        #[arg(long, conflicts_with = "client")]
        issuer: Option<String>,
        #[arg(long)]
        client: Option<String>,
    },
    /// Show one payroll with its recipients
    Payroll { id: String },
    /// Create a payroll run
    CreatePayroll {
        #[arg(long)]
        issuer: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        client_email: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: String,
        /// wallet=amount in SUI; repeat for each team member
        #[arg(long = "recipient", value_parser = parse_recipient, required = true)]
        recipients: Vec<(String, f64)>,
    },
    /// Ask the backend to pay a payroll from a wallet
    PayPayroll {
        id: String,
        #[arg(long)]
        wallet: String,
    },
    /// List transactions, optionally for one payee wallet
    Transactions {
        #[arg(long)]
        payee: Option<String>,
    },
    /// Invoice counts and volume for a payee
    Dashboard {
        #[arg(long)]
        payee: String,
    },
    /// Deployed contract package and fee recipient
    ContractInfo,
}

fn parse_recipient(raw: &str) -> Result<(String, f64), String> {
    let (wallet, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected wallet=amount, got '{}'", raw))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount in '{}'", raw))?;
    Ok((wallet.trim().to_string(), amount))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env();
    paymint::init_logging(config.rust_log.as_deref());
    let api = ApiClient::new(&config)?;
    info!("🔗 Backend: {}", api.base_url());

    match cli.command {
        Command::Quote { amount, bps } => {
            let amount = paymint::forms::parse_display_amount(&amount)?;
            print!("{}", render::quote(amount, bps.unwrap_or(config.surcharge_bps)));
        }
        Command::Invoices { payee } => {
            let mut store = InvoiceStore::new();
            store.fetch(&api, payee.as_deref()).await;
            print!("{}", render::invoice_table(&store.invoices));
        }
        Command::Invoice { id } => {
            let invoice = api.get_invoice(&id).await?;
            print!("{}", render::invoice_detail(&invoice));
        }
        Command::CreateInvoice {
            payee,
            payer,
            amount,
            service,
            description,
            due,
        } => {
            let request = InvoiceDraft {
                payer,
                amount,
                service,
                description,
                due_date: due,
            }
            .into_request(Some(&payee), config.surcharge_bps)?;
            let invoice = api.create_invoice(&request).await?;
            info!("✅ Invoice #{} created", invoice.client_id);
            print!("{}", render::invoice_detail(&invoice));
        }
        Command::Payrolls { issuer, client } => {
            let mut store = PayrollStore::new();
            match client {
                Some(email) => store.fetch_by_client(&api, &email).await,
                None => store.fetch(&api, issuer.as_deref()).await,
            }
            if let Some(error) = &store.error {
                return Err(error.clone().into());
            }
            print!("{}", render::payroll_table(&store.payrolls));
        }
        Command::Payroll { id } => {
            let mut store = PayrollStore::new();
            store.fetch_one(&api, &id).await;
            match &store.active {
                Some(payroll) => print!("{}", render::payroll_detail(payroll)),
                None => {
                    let error = store.error.unwrap_or_else(|| "payroll not found".to_string());
                    return Err(error.into());
                }
            }
        }
        Command::CreatePayroll {
            issuer,
            project,
            client_email,
            description,
            due,
            recipients,
        } => {
            let request = PayrollDraft {
                project_name: project,
                client_email,
                description,
                due_date: due,
                recipients,
            }
            .into_request(Some(&issuer), config.surcharge_bps)?;
            let mut store = PayrollStore::new();
            let payroll = store.create(&api, &request).await?;
            info!("✅ Payroll {} created", payroll.id);
            print!("{}", render::payroll_detail(&payroll));
        }
        Command::PayPayroll { id, wallet } => {
            let mut store = PayrollStore::new();
            let payroll = store.pay(&api, &id, &wallet).await?;
            print!("{}", render::payroll_detail(&payroll));
        }
        Command::Transactions { payee } => {
            let mut store = TransactionStore::new();
            store.fetch(&api, payee.as_deref()).await;
            print!("{}", render::transaction_table(&store.txs));
        }
        Command::Dashboard { payee } => {
            let mut store = InvoiceStore::new();
            store.fetch(&api, Some(&payee)).await;
            let stats = DashboardStats::from_invoices(&store.invoices);
            print!("{}", render::dashboard(&stats));
        }
        Command::ContractInfo => {
            let info = api.contract_info().await?;
            println!("Package:            {}", info.package_id);
            println!("Platform recipient: {}", info.platform_recipient);
        }
    }

    Ok(())
}
