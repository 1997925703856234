//! Creation-form validation
//!
//! Drafts hold what a user typed (amounts in SUI, dates as text). Turning a
//! draft into an API request is the only place inputs are validated: the
//! conversion and fee helpers trust what they are given.

use {
    crate::{
        error::FormError,
        fee::MAX_FEE_BPS,
        model::{sum_recipients, CreateInvoiceRequest, CreatePayrollRequest, PayrollRecipient},
        units,
    },
    base64::{engine::general_purpose::STANDARD, Engine as _},
    chrono::{DateTime, NaiveDate},
    rand::Rng,
    serde::Serialize,
};

/// Metadata recorded with every invoice
const INVOICE_METADATA: &str = "Paymint invoice";

/// Invoice numbers are drawn from this range
const INVOICE_NUMBER_MIN: u32 = 1_000;
const INVOICE_NUMBER_MAX: u32 = 11_000;

#[derive(Debug, Clone, Default)]
pub struct InvoiceDraft {
    pub payer: String,
    /// Amount in SUI as typed
    pub amount: String,
    pub service: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    pub due_date: String,
}

impl InvoiceDraft {
    /// Validate and convert, drawing a fresh invoice number
    pub fn into_request(
        self,
        payee: Option<&str>,
        surcharge_bps: u32,
    ) -> Result<CreateInvoiceRequest, FormError> {
        let number = rand::thread_rng().gen_range(INVOICE_NUMBER_MIN..INVOICE_NUMBER_MAX);
        self.into_request_numbered(payee, surcharge_bps, number)
    }

    pub fn into_request_numbered(
        self,
        payee: Option<&str>,
        surcharge_bps: u32,
        client_id: u32,
    ) -> Result<CreateInvoiceRequest, FormError> {
        let payer = required("payer", &self.payer)?;
        let service = required("service", &self.service)?;
        if self.due_date.trim().is_empty() {
            return Err(FormError::MissingField("due date"));
        }
        if self.amount.trim().is_empty() {
            return Err(FormError::MissingField("amount"));
        }
        let payee = payee
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(FormError::WalletNotConnected)?;
        check_rate(surcharge_bps)?;

        let amount = parse_display_amount(&self.amount)?;
        let due_date = parse_due_date(&self.due_date)?;

        Ok(CreateInvoiceRequest {
            payee_id: payee.to_string(),
            payer,
            client_id,
            amount: units::to_smallest_unit(amount),
            service,
            description: non_empty(self.description),
            surcharge_bps,
            metadata_hash: hex::encode(INVOICE_METADATA),
            due_date,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PayrollDraft {
    pub project_name: String,
    pub client_email: String,
    pub description: Option<String>,
    pub due_date: String,
    /// (wallet, amount in SUI)
    pub recipients: Vec<(String, f64)>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayrollMetadata<'a> {
    project_name: &'a str,
    description: &'a str,
}

impl PayrollDraft {
    pub fn into_request(
        self,
        issuer: Option<&str>,
        surcharge_bps: u32,
    ) -> Result<CreatePayrollRequest, FormError> {
        let issuer = issuer
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .ok_or(FormError::WalletNotConnected)?;
        let project_name = required("project name", &self.project_name)?;
        let client_email = required("client email", &self.client_email)?;
        if self.due_date.trim().is_empty() {
            return Err(FormError::MissingField("due date"));
        }
        check_rate(surcharge_bps)?;

        if self.recipients.is_empty() {
            return Err(FormError::NoRecipients);
        }
        let mut recipients = Vec::with_capacity(self.recipients.len());
        for (index, (wallet, amount)) in self.recipients.iter().enumerate() {
            let wallet = wallet.trim();
            if wallet.is_empty() {
                return Err(FormError::InvalidRecipient {
                    index,
                    reason: "wallet is empty".to_string(),
                });
            }
            if !amount.is_finite() || *amount <= 0.0 {
                return Err(FormError::InvalidRecipient {
                    index,
                    reason: format!("amount {} must be positive", amount),
                });
            }
            recipients.push(PayrollRecipient {
                wallet: wallet.to_string(),
                amount: units::to_smallest_unit(*amount),
            });
        }

        let due_date = parse_due_date(&self.due_date)?;
        let description = non_empty(self.description);
        let metadata = PayrollMetadata {
            project_name: &project_name,
            description: description.as_deref().unwrap_or_default(),
        };
        // two string fields; serialization cannot fail
        let metadata_json = serde_json::to_string(&metadata).unwrap_or_default();

        Ok(CreatePayrollRequest {
            issuer: issuer.to_string(),
            client_email,
            total_amount: sum_recipients(&recipients),
            recipients,
            surcharge_bps,
            metadata_hash: format!("0x{}", STANDARD.encode(metadata_json)),
            due_date,
            project_name,
            description,
        })
    }
}

/// Parse a user-typed SUI amount; must be a positive finite number
pub fn parse_display_amount(raw: &str) -> Result<f64, FormError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidAmount(raw.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(FormError::InvalidAmount(raw.to_string()));
    }
    Ok(value)
}

/// Epoch seconds from `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_due_date(raw: &str) -> Result<i64, FormError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| FormError::InvalidDueDate(raw.to_string()))?;
        return Ok(midnight.and_utc().timestamp());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp())
        .map_err(|_| FormError::InvalidDueDate(raw.to_string()))
}

fn check_rate(bps: u32) -> Result<(), FormError> {
    if bps > MAX_FEE_BPS {
        return Err(FormError::FeeRateOutOfRange(bps));
    }
    Ok(())
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_draft() -> InvoiceDraft {
        InvoiceDraft {
            payer: "client@example.com".to_string(),
            amount: "2.5".to_string(),
            service: "Design work".to_string(),
            description: Some("  ".to_string()),
            due_date: "2024-01-31".to_string(),
        }
    }

    #[test]
    fn test_invoice_request() {
        let req = invoice_draft()
            .into_request_numbered(Some("0xpayee"), 250, 4242)
            .unwrap();
        assert_eq!(req.amount, 2_500_000_000);
        assert_eq!(req.client_id, 4242);
        assert_eq!(req.payee_id, "0xpayee");
        assert_eq!(req.description, None);
        assert_eq!(req.due_date, 1_706_659_200);
        assert_eq!(req.metadata_hash, "5061796d696e7420696e766f696365");
    }

    #[test]
    fn test_invoice_number_range() {
        for _ in 0..50 {
            let req = invoice_draft().into_request(Some("0xpayee"), 250).unwrap();
            assert!((1_000..11_000).contains(&req.client_id));
        }
    }

    #[test]
    fn test_invoice_rejections() {
        let mut draft = invoice_draft();
        draft.payer = " ".to_string();
        assert_eq!(
            draft.into_request(Some("0xp"), 250).unwrap_err(),
            FormError::MissingField("payer")
        );

        let mut draft = invoice_draft();
        draft.amount = "abc".to_string();
        assert!(matches!(
            draft.into_request(Some("0xp"), 250),
            Err(FormError::InvalidAmount(_))
        ));

        let mut draft = invoice_draft();
        draft.amount = "-1".to_string();
        assert!(matches!(
            draft.into_request(Some("0xp"), 250),
            Err(FormError::InvalidAmount(_))
        ));

        assert_eq!(
            invoice_draft().into_request(None, 250).unwrap_err(),
            FormError::WalletNotConnected
        );
        assert_eq!(
            invoice_draft().into_request(Some("0xp"), 10_001).unwrap_err(),
            FormError::FeeRateOutOfRange(10_001)
        );
    }

    fn payroll_draft() -> PayrollDraft {
        PayrollDraft {
            project_name: "Launch".to_string(),
            client_email: "ops@client.io".to_string(),
            description: None,
            due_date: "2024-03-01T12:00:00Z".to_string(),
            recipients: vec![("0xa".to_string(), 1.5), ("0xb".to_string(), 0.25)],
        }
    }

    #[test]
    fn test_payroll_total_is_recipient_sum() {
        let req = payroll_draft().into_request(Some("0xissuer"), 250).unwrap();
        assert_eq!(req.recipients[0].amount, 1_500_000_000);
        assert_eq!(req.recipients[1].amount, 250_000_000);
        assert_eq!(req.total_amount, 1_750_000_000);
        assert_eq!(req.due_date, 1_709_294_400);
    }

    #[test]
    fn test_payroll_metadata_hash() {
        let req = payroll_draft().into_request(Some("0xissuer"), 250).unwrap();
        let encoded = req.metadata_hash.strip_prefix("0x").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, br#"{"projectName":"Launch","description":""}"#);

        let mut draft = payroll_draft();
        draft.description = Some("Q1 retainer".to_string());
        let req = draft.into_request(Some("0xissuer"), 250).unwrap();
        let decoded = STANDARD
            .decode(req.metadata_hash.strip_prefix("0x").unwrap())
            .unwrap();
        assert_eq!(
            decoded,
            br#"{"projectName":"Launch","description":"Q1 retainer"}"#
        );
    }

    #[test]
    fn test_payroll_rejections() {
        let mut draft = payroll_draft();
        draft.recipients.clear();
        assert_eq!(
            draft.into_request(Some("0xi"), 250).unwrap_err(),
            FormError::NoRecipients
        );

        let mut draft = payroll_draft();
        draft.recipients[1].0 = "".to_string();
        assert!(matches!(
            draft.into_request(Some("0xi"), 250),
            Err(FormError::InvalidRecipient { index: 1, .. })
        ));

        let mut draft = payroll_draft();
        draft.recipients[0].1 = 0.0;
        assert!(matches!(
            draft.into_request(Some("0xi"), 250),
            Err(FormError::InvalidRecipient { index: 0, .. })
        ));

        let mut draft = payroll_draft();
        draft.due_date = "next week".to_string();
        assert!(matches!(
            draft.into_request(Some("0xi"), 250),
            Err(FormError::InvalidDueDate(_))
        ));
    }
}
