//! Request-scoped record stores
//!
//! Each store is a plain value owned by whoever renders or refreshes a view.
//! Nothing here is global: callers create a store, fill it from an
//! [`ApiClient`], and drop it when done.
//!
//! Fetch failures are logged and leave the list empty. The payroll store
//! additionally remembers the last error message and a loading flag.

use {
    crate::{
        api::ApiClient,
        error::ApiError,
        model::{CreatePayrollRequest, Invoice, Payroll, Status, TransactionRecord},
        units,
    },
    serde::Serialize,
};

#[derive(Debug, Clone, Default)]
pub struct InvoiceStore {
    pub invoices: Vec<Invoice>,
}

impl InvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with the payee's invoices (all invoices when `None`)
    pub async fn fetch(&mut self, api: &ApiClient, payee_id: Option<&str>) {
        match api.list_invoices(payee_id).await {
            Ok(invoices) => {
                log::debug!("Fetched {} invoices", invoices.len());
                self.invoices = invoices;
            }
            Err(e) => {
                log::error!("fetchInvoices error: {}", e);
                self.invoices.clear();
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    pub txs: Vec<TransactionRecord>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch(&mut self, api: &ApiClient, payee_id: Option<&str>) {
        match api.list_transactions(payee_id).await {
            Ok(txs) => {
                log::debug!("Fetched {} transactions", txs.len());
                self.txs = txs;
            }
            Err(e) => {
                log::error!("fetchTxs error: {}", e);
                self.txs.clear();
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayrollStore {
    pub payrolls: Vec<Payroll>,
    pub active: Option<Payroll>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PayrollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch(&mut self, api: &ApiClient, issuer: Option<&str>) {
        self.begin();
        let result = api.list_payrolls(issuer).await;
        self.finish_list(result, "fetchPayrolls");
    }

    pub async fn fetch_by_client(&mut self, api: &ApiClient, email: &str) {
        self.begin();
        let result = api.list_payrolls_by_client(email).await;
        self.finish_list(result, "fetchPayrollsByClient");
    }

    pub async fn fetch_one(&mut self, api: &ApiClient, id: &str) {
        self.begin();
        match api.get_payroll(id).await {
            Ok(payroll) => self.active = Some(payroll),
            Err(e) => {
                log::error!("fetchPayroll error: {}", e);
                self.active = None;
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Create on the backend and put the new payroll first in the list
    pub async fn create(
        &mut self,
        api: &ApiClient,
        request: &CreatePayrollRequest,
    ) -> Result<Payroll, ApiError> {
        self.begin();
        let result = api.create_payroll(request).await;
        self.loading = false;
        match result {
            Ok(payroll) => {
                self.payrolls.insert(0, payroll.clone());
                Ok(payroll)
            }
            Err(e) => {
                log::error!("createPayroll error: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Ask the backend to pay out a payroll and merge the result
    pub async fn pay(
        &mut self,
        api: &ApiClient,
        id: &str,
        wallet_address: &str,
    ) -> Result<Payroll, ApiError> {
        self.begin();
        let result = api.pay_payroll(id, wallet_address).await;
        self.loading = false;
        match result {
            Ok(payroll) => {
                self.replace(payroll.clone());
                self.active = Some(payroll.clone());
                Ok(payroll)
            }
            Err(e) => {
                log::error!("payPayroll error: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Swap in an updated copy of a payroll already in the list
    pub fn replace(&mut self, payroll: Payroll) {
        if let Some(slot) = self.payrolls.iter_mut().find(|p| p.id == payroll.id) {
            *slot = payroll;
        }
    }

    pub fn set_active(&mut self, payroll: Option<Payroll>) {
        self.active = payroll;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish_list(&mut self, result: Result<Vec<Payroll>, ApiError>, op: &str) {
        match result {
            Ok(payrolls) => self.payrolls = payrolls,
            Err(e) => {
                log::error!("{} error: {}", op, e);
                self.payrolls.clear();
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }
}

/// Connected wallet, owned by the session rather than a global
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<String>,
    pub connected: bool,
}

impl WalletSession {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            connected: true,
        }
    }

    pub fn set_address(&mut self, address: Option<String>) {
        self.address = address;
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn reset(&mut self) {
        self.address = None;
        self.connected = false;
    }

    pub fn disconnect(&mut self) {
        self.reset();
        log::info!("Wallet disconnected");
    }

    /// Address usable for requests: only when connected
    pub fn active_address(&self) -> Option<&str> {
        if self.connected {
            self.address.as_deref()
        } else {
            None
        }
    }
}

/// Invoice counts and volume for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub pending_invoices: usize,
    /// Sum of base amounts in SUI
    pub total_amount: f64,
}

impl DashboardStats {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        Self {
            total_invoices: invoices.len(),
            paid_invoices: invoices.iter().filter(|i| i.status == Status::Paid).count(),
            pending_invoices: invoices.iter().filter(|i| i.status == Status::Unpaid).count(),
            total_amount: invoices
                .iter()
                .map(|i| units::to_display_unit(i.amount))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(id: &str, amount: u64, status: Status) -> Invoice {
        Invoice {
            id: id.to_string(),
            payee_id: "0xpayee".to_string(),
            client_id: 1000,
            payer: "client@example.com".to_string(),
            amount,
            surcharge_bps: 250,
            status,
            service: "Service".to_string(),
            description: None,
            due_date: 1_700_000_000,
            metadata_hash: None,
            object_id: None,
            tx_digest: None,
        }
    }

    #[test]
    fn test_dashboard_stats() {
        let invoices = vec![
            invoice("a", 1_000_000_000, Status::Paid),
            invoice("b", 500_000_000, Status::Unpaid),
            invoice("c", 2_000_000_000, Status::Overdue),
        ];
        let stats = DashboardStats::from_invoices(&invoices);
        assert_eq!(stats.total_invoices, 3);
        assert_eq!(stats.paid_invoices, 1);
        assert_eq!(stats.pending_invoices, 1);
        assert_eq!(stats.total_amount, 3.5);
    }

    #[test]
    fn test_dashboard_empty() {
        assert_eq!(DashboardStats::from_invoices(&[]), DashboardStats::default());
    }

    #[test]
    fn test_wallet_session() {
        let mut wallet = WalletSession::default();
        assert_eq!(wallet.active_address(), None);

        wallet.set_address(Some("0xabc".to_string()));
        assert_eq!(wallet.active_address(), None);
        wallet.set_connected(true);
        assert_eq!(wallet.active_address(), Some("0xabc"));

        wallet.disconnect();
        assert_eq!(wallet, WalletSession::default());
    }

    #[test]
    fn test_payroll_store_local_ops() {
        let mut store = PayrollStore::new();
        store.error = Some("boom".to_string());
        store.clear_error();
        assert!(store.error.is_none());
        store.set_active(None);
        assert!(store.active.is_none());
    }
}
