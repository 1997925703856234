//! Platform events and list refresh
//!
//! The backend pushes `invoice-created` and `invoice-paid` events to the room
//! of the connected wallet. The transport is external; whatever carries the
//! events decodes them into [`PlatformEvent`] and sends them down an `mpsc`
//! channel. [`run_refresh_loop`] consumes that channel and refetches the
//! affected lists for the connected wallet.

use {
    crate::{
        api::ApiClient,
        store::{InvoiceStore, TransactionStore, WalletSession},
    },
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    tokio::sync::{mpsc, RwLock},
};

/// Payload attached to invoice events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEventData {
    /// Invoice as the backend serialised it; may be partial
    pub invoice: serde_json::Value,
}

impl InvoiceEventData {
    pub fn service(&self) -> &str {
        self.invoice
            .get("service")
            .and_then(|s| s.as_str())
            .unwrap_or("invoice")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum PlatformEvent {
    InvoiceCreated(InvoiceEventData),
    InvoicePaid(InvoiceEventData),
}

/// Which lists an event invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshPlan {
    pub invoices: bool,
    pub transactions: bool,
}

impl PlatformEvent {
    pub fn refresh_plan(&self) -> RefreshPlan {
        match self {
            PlatformEvent::InvoiceCreated(_) => RefreshPlan {
                invoices: true,
                transactions: false,
            },
            PlatformEvent::InvoicePaid(_) => RefreshPlan {
                invoices: true,
                transactions: true,
            },
        }
    }

    /// User-facing notification text
    pub fn notification(&self) -> String {
        match self {
            PlatformEvent::InvoiceCreated(data) => {
                format!("New invoice created: {}", data.service())
            }
            PlatformEvent::InvoicePaid(data) => {
                format!("Payment received for: {}", data.service())
            }
        }
    }
}

/// Decode one `{"event": ..., "data": ...}` message
pub fn parse_event(raw: &str) -> Result<PlatformEvent, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Message that subscribes the transport to a wallet's room
pub fn join_wallet_message(address: &str) -> serde_json::Value {
    serde_json::json!({ "event": "join-wallet", "data": address })
}

/// Stores kept fresh by the refresh loop
#[derive(Debug, Clone, Default)]
pub struct RefreshTargets {
    pub invoices: Arc<RwLock<InvoiceStore>>,
    pub transactions: Arc<RwLock<TransactionStore>>,
}

/// Consume events until the channel closes; returns how many were handled
pub async fn run_refresh_loop(
    mut rx: mpsc::Receiver<PlatformEvent>,
    api: ApiClient,
    wallet: Arc<RwLock<WalletSession>>,
    targets: RefreshTargets,
) -> usize {
    let mut handled = 0;

    while let Some(event) = rx.recv().await {
        log::info!("🔔 {}", event.notification());

        let address = {
            let wallet = wallet.read().await;
            wallet.active_address().map(str::to_string)
        };
        let Some(address) = address else {
            log::debug!("No wallet connected, skipping refresh");
            continue;
        };

        let plan = event.refresh_plan();
        if plan.invoices {
            targets
                .invoices
                .write()
                .await
                .fetch(&api, Some(&address))
                .await;
        }
        if plan.transactions {
            targets
                .transactions
                .write()
                .await
                .fetch(&api, Some(&address))
                .await;
        }
        handled += 1;
    }

    log::info!("Event channel closed after {} refreshes", handled);
    handled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoice_created() {
        let event = parse_event(
            r#"{"event":"invoice-created","data":{"invoice":{"service":"Logo design"}}}"#,
        )
        .unwrap();
        assert_eq!(event.notification(), "New invoice created: Logo design");
        assert_eq!(
            event.refresh_plan(),
            RefreshPlan {
                invoices: true,
                transactions: false
            }
        );
    }

    #[test]
    fn test_parse_invoice_paid() {
        let event = parse_event(r#"{"event":"invoice-paid","data":{"invoice":{}}}"#).unwrap();
        assert_eq!(event.notification(), "Payment received for: invoice");
        assert!(event.refresh_plan().transactions);
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(parse_event(r#"{"event":"invoice-deleted","data":{"invoice":{}}}"#).is_err());
    }

    #[test]
    fn test_join_wallet_message() {
        assert_eq!(
            join_wallet_message("0xabc").to_string(),
            r#"{"data":"0xabc","event":"join-wallet"}"#
        );
    }
}
