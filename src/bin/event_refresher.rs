//! Event refresher
//!
//! Reads platform events as JSON lines on stdin (one
//! `{"event": ..., "data": ...}` object per line, as relayed by the realtime
//! transport) and refetches the wallet's invoices and transactions when they
//! change. Prints the invoice table once input ends.
//!
//! Usage:
//!   relay | cargo run --bin event_refresher
//!
//! Environment variables:
//!   PAYMINT_WALLET - wallet address whose lists are refreshed (required)
//!   PAYMINT_API_BASE - backend base URL (default: http://localhost:5000)
//!   PAYMINT_EVENT_BUFFER - channel size (default: 256)

use dotenv::dotenv;
use log::{error, info, warn};
use paymint::{
    api::ApiClient,
    config::Config,
    events::{join_wallet_message, parse_event, run_refresh_loop, RefreshTargets},
    render,
    store::WalletSession,
};
use std::{env, sync::Arc};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, RwLock},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let config = Config::from_env();
    paymint::init_logging(config.rust_log.as_deref());

    let address = env::var("PAYMINT_WALLET").map_err(|_| "PAYMINT_WALLET must be set")?;
    let api = ApiClient::new(&config)?;

    info!("🚀 Event refresher");
    info!("   ├─ Backend: {}", api.base_url());
    info!("   ├─ Wallet: {}", address);
    info!("   └─ Channel buffer: {}", config.event_buffer);
    // the relay subscribes with this message
    println!("{}", join_wallet_message(&address));

    let wallet = Arc::new(RwLock::new(WalletSession::connected(address.clone())));
    let targets = RefreshTargets::default();

    // Initial load so the first event has something to refresh
    targets.invoices.write().await.fetch(&api, Some(&address)).await;
    targets.transactions.write().await.fetch(&api, Some(&address)).await;

    let (tx, rx) = mpsc::channel(config.event_buffer);
    let refresh = tokio::spawn(run_refresh_loop(rx, api, wallet, targets.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_event(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    error!("Refresh loop stopped");
                    break;
                }
            }
            Err(e) => warn!("Skipping unrecognised event: {}", e),
        }
    }
    drop(tx);

    let handled = refresh.await?;
    let invoices = targets.invoices.read().await;
    print!("{}", render::invoice_table(&invoices.invoices));
    info!("✅ Handled {} events", handled);

    Ok(())
}
