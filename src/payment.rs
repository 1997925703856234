//! Payment assembly
//!
//! Builds the transfer the payer's wallet must sign to settle an invoice or
//! payroll: split the exact integer total off the gas coin and hand it to
//! `{package}::invoice::pay_invoice` (or `pay_payroll`) together with the
//! shared record object and the platform fee recipient. The contract splits
//! the coin between payee/recipients and the platform.
//!
//! Signing and submission belong to the wallet, reached through
//! [`WalletSigner`]. After a successful signature the backend is told via
//! mark-paid; if that call fails the payment still counts as done and the
//! outcome is flagged so the caller can warn.

use {
    crate::{
        api::ApiClient,
        error::PaymentError,
        fee::FeeBreakdown,
        model::{ContractInfo, Invoice, Payroll, Status},
        units,
    },
    async_trait::async_trait,
    reqwest::Url,
    serde::{Deserialize, Serialize},
};

/// Native coin type passed as the Move type argument
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Move module holding both payment entry points
pub const CONTRACT_MODULE: &str = "invoice";

pub type WalletError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayableKind {
    Invoice,
    Payroll,
}

impl PayableKind {
    pub fn move_function(&self) -> &'static str {
        match self {
            PayableKind::Invoice => "pay_invoice",
            PayableKind::Payroll => "pay_payroll",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayableKind::Invoice => "invoice",
            PayableKind::Payroll => "payroll",
        }
    }
}

/// Coin object owned by the payer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCoin {
    pub coin_object_id: String,
    /// MIST
    pub balance: u64,
}

/// Everything the wallet needs to build and sign the payment transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub kind: PayableKind,
    /// Backend id of the invoice or payroll
    pub record_id: String,
    /// Shared on-chain object passed by mutable reference
    pub object_id: String,
    /// Amount split off the gas coin, MIST
    pub split_amount: u64,
    /// `{package}::invoice::{function}`
    pub target: String,
    pub type_arguments: Vec<String>,
    pub platform_recipient: String,
    pub breakdown: FeeBreakdown,
    /// Sum of the payer's coins, MIST
    pub available_balance: u64,
}

impl PaymentPlan {
    pub fn build(
        kind: PayableKind,
        record_id: &str,
        object_id: Option<&str>,
        base_amount: u64,
        fee_rate_bps: u32,
        contract: &ContractInfo,
        coins: &[WalletCoin],
    ) -> Result<Self, PaymentError> {
        let object_id = object_id
            .filter(|o| !o.is_empty())
            .ok_or(PaymentError::MissingObject)?;

        let breakdown = FeeBreakdown::new(base_amount, fee_rate_bps);

        if coins.is_empty() {
            return Err(PaymentError::NoCoins);
        }
        let available = coins
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.balance));
        if available < breakdown.total {
            return Err(PaymentError::InsufficientBalance {
                needed: units::to_display_unit(breakdown.total),
                available: units::to_display_unit(available),
            });
        }

        Ok(Self {
            kind,
            record_id: record_id.to_string(),
            object_id: object_id.to_string(),
            split_amount: breakdown.total,
            target: format!(
                "{}::{}::{}",
                contract.package_id,
                CONTRACT_MODULE,
                kind.move_function()
            ),
            type_arguments: vec![SUI_COIN_TYPE.to_string()],
            platform_recipient: contract.platform_recipient.clone(),
            breakdown,
            available_balance: available,
        })
    }
}

/// The connected wallet extension
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Coins of `coin_type` owned by `owner`
    async fn coins(&self, owner: &str, coin_type: &str) -> Result<Vec<WalletCoin>, WalletError>;

    /// Build, sign and execute the plan; returns the transaction digest
    async fn sign_and_execute(&self, plan: &PaymentPlan) -> Result<String, WalletError>;
}

/// Result of a settled payment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub kind: PayableKind,
    pub record_id: String,
    pub tx_digest: String,
    /// Total paid, MIST
    pub total: u64,
    /// Invoice service name; payrolls have none
    pub service: Option<String>,
    /// Signed and executed, but the backend was not updated
    pub status_sync_failed: bool,
}

impl PaymentOutcome {
    /// Query parameters for the payment result page
    pub fn result_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("success".to_string(), "true".to_string()),
            ("txDigest".to_string(), self.tx_digest.clone()),
            (
                "amount".to_string(),
                units::to_display_unit(self.total).to_string(),
            ),
        ];
        match (&self.kind, &self.service) {
            (PayableKind::Invoice, Some(service)) => {
                params.push(("service".to_string(), service.clone()))
            }
            _ => params.push(("type".to_string(), self.kind.as_str().to_string())),
        }
        params
    }

    /// `{app}/payment-result?...` for this outcome
    pub fn result_url(&self, app_base: &Url) -> Url {
        result_url(app_base, self.result_params())
    }
}

/// Query parameters for a failed payment
pub fn failure_params(error: &PaymentError) -> Vec<(String, String)> {
    vec![
        ("success".to_string(), "false".to_string()),
        ("error".to_string(), error.to_string()),
    ]
}

pub fn failure_url(app_base: &Url, error: &PaymentError) -> Url {
    result_url(app_base, failure_params(error))
}

fn result_url(app_base: &Url, params: Vec<(String, String)>) -> Url {
    let mut url = app_base.clone();
    url.set_path("/payment-result");
    url.set_query(None);
    url.query_pairs_mut().extend_pairs(params);
    url
}

/// Turn raw wallet errors into something a payer can act on
pub fn friendly_wallet_error(message: &str) -> String {
    if message.contains("Insufficient gas") {
        "Insufficient SUI for gas fees. Please ensure you have at least 0.01 SUI extra for transaction fees.".to_string()
    } else if message.contains("Insufficient funds") {
        "Insufficient SUI balance. Please add more SUI to your wallet.".to_string()
    } else if message.contains("rejected") {
        "Transaction was rejected. Please try again.".to_string()
    } else {
        message.to_string()
    }
}

/// Pay an invoice from `payer`'s wallet and record it with the backend
pub async fn settle_invoice(
    api: &ApiClient,
    wallet: &dyn WalletSigner,
    invoice: &Invoice,
    payer: &str,
) -> Result<PaymentOutcome, PaymentError> {
    if invoice.status == Status::Paid {
        return Err(PaymentError::AlreadyPaid);
    }

    let plan = prepare(
        api,
        wallet,
        payer,
        PayableKind::Invoice,
        &invoice.id,
        invoice.object_id.as_deref(),
        invoice.amount,
        invoice.surcharge_bps,
    )
    .await?;
    let tx_digest = execute(wallet, &plan).await?;

    let status_sync_failed = match api.mark_invoice_paid(&invoice.id, &tx_digest).await {
        Ok(_) => false,
        Err(e) => {
            log::warn!(
                "Payment successful but failed to update status. Transaction: {} ({})",
                tx_digest,
                e
            );
            true
        }
    };

    Ok(PaymentOutcome {
        kind: PayableKind::Invoice,
        record_id: invoice.id.clone(),
        tx_digest,
        total: plan.breakdown.total,
        service: Some(invoice.service.clone()),
        status_sync_failed,
    })
}

/// Fund a payroll from `payer`'s wallet; the contract distributes to recipients
pub async fn settle_payroll(
    api: &ApiClient,
    wallet: &dyn WalletSigner,
    payroll: &Payroll,
    payer: &str,
) -> Result<PaymentOutcome, PaymentError> {
    if payroll.status == Status::Paid {
        return Err(PaymentError::AlreadyPaid);
    }

    let plan = prepare(
        api,
        wallet,
        payer,
        PayableKind::Payroll,
        &payroll.id,
        payroll.object_id.as_deref(),
        payroll.total_amount,
        payroll.surcharge_bps,
    )
    .await?;
    let tx_digest = execute(wallet, &plan).await?;

    let status_sync_failed = match api.mark_payroll_paid(&payroll.id, &tx_digest).await {
        Ok(_) => false,
        Err(e) => {
            log::warn!(
                "Payroll paid but failed to update status. Transaction: {} ({})",
                tx_digest,
                e
            );
            true
        }
    };

    Ok(PaymentOutcome {
        kind: PayableKind::Payroll,
        record_id: payroll.id.clone(),
        tx_digest,
        total: plan.breakdown.total,
        service: None,
        status_sync_failed,
    })
}

#[allow(clippy::too_many_arguments)]
async fn prepare(
    api: &ApiClient,
    wallet: &dyn WalletSigner,
    payer: &str,
    kind: PayableKind,
    record_id: &str,
    object_id: Option<&str>,
    base_amount: u64,
    fee_rate_bps: u32,
) -> Result<PaymentPlan, PaymentError> {
    if payer.trim().is_empty() {
        return Err(PaymentError::WalletNotConnected);
    }
    // fail before any network call when the record cannot be paid on-chain
    if object_id.map_or(true, str::is_empty) {
        return Err(PaymentError::MissingObject);
    }

    let contract = api.contract_info().await?;
    let coins = wallet
        .coins(payer, SUI_COIN_TYPE)
        .await
        .map_err(|e| PaymentError::Wallet(friendly_wallet_error(&e.to_string())))?;

    log::debug!(
        "Available coins: {:?}",
        coins
            .iter()
            .map(|c| (c.coin_object_id.as_str(), units::to_display_unit(c.balance)))
            .collect::<Vec<_>>()
    );

    let plan = PaymentPlan::build(
        kind,
        record_id,
        object_id,
        base_amount,
        fee_rate_bps,
        &contract,
        &coins,
    )?;

    log::info!(
        "💸 Paying {} {}: {} via {}",
        kind.as_str(),
        record_id,
        units::format_smallest_as_display(plan.split_amount, 4),
        plan.target
    );
    Ok(plan)
}

async fn execute(wallet: &dyn WalletSigner, plan: &PaymentPlan) -> Result<String, PaymentError> {
    match wallet.sign_and_execute(plan).await {
        Ok(digest) => {
            log::info!("✅ Payment executed: {}", digest);
            Ok(digest)
        }
        Err(e) => {
            let message = friendly_wallet_error(&e.to_string());
            log::error!("Payment failed: {}", e);
            Err(PaymentError::Wallet(message))
        }
    }
}
