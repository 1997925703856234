//! Invoice and payroll records as the backend serves them
//!
//! Field names follow the API's JSON (camelCase, Mongo-style `_id`). Amounts
//! are integer MIST. Status strings outside `unpaid | paid | overdue` are
//! rejected during deserialization rather than carried around as free text.

use {
    crate::fee::FeeBreakdown,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Lifecycle of an invoice or payroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Unpaid,
    Paid,
    Overdue,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unpaid => "unpaid",
            Status::Paid => "paid",
            Status::Overdue => "overdue",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    /// Wallet that receives the funds
    pub payee_id: String,
    /// Human-facing invoice number
    #[serde(default)]
    pub client_id: u32,
    pub payer: String,
    pub amount: u64,
    pub surcharge_bps: u32,
    pub status: Status,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_hash: Option<String>,
    /// Shared on-chain invoice object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Digest of the settling transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_digest: Option<String>,
}

impl Invoice {
    pub fn fee_breakdown(&self) -> FeeBreakdown {
        FeeBreakdown::new(self.amount, self.surcharge_bps)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecipient {
    pub wallet: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    #[serde(rename = "_id")]
    pub id: String,
    pub issuer: String,
    pub client_email: String,
    pub recipients: Vec<PayrollRecipient>,
    /// Sum of recipient amounts, fixed at creation
    pub total_amount: u64,
    pub surcharge_bps: u32,
    #[serde(default)]
    pub metadata_hash: String,
    pub due_date: i64,
    #[serde(default)]
    pub created_at: i64,
    pub status: Status,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_tx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl Payroll {
    pub fn fee_breakdown(&self) -> FeeBreakdown {
        FeeBreakdown::new(self.total_amount, self.surcharge_bps)
    }

    /// Sum of the recipient amounts (saturating)
    pub fn recipients_total(&self) -> u64 {
        sum_recipients(&self.recipients)
    }
}

pub(crate) fn sum_recipients(recipients: &[PayrollRecipient]) -> u64 {
    recipients
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.amount))
}

/// Entry of the payee's transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: u64,
    pub date: String,
    pub status: String,
}

/// Deployed contract details served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub package_id: String,
    /// Address that receives the surcharge
    pub platform_recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub payee_id: String,
    pub payer: String,
    pub client_id: u32,
    pub amount: u64,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub surcharge_bps: u32,
    pub metadata_hash: String,
    pub due_date: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayrollRequest {
    pub issuer: String,
    pub client_email: String,
    pub recipients: Vec<PayrollRecipient>,
    pub total_amount: u64,
    pub surcharge_bps: u32,
    pub metadata_hash: String,
    pub due_date: i64,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    pub tx_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPayrollRequest {
    pub wallet_address: String,
}
