//! Backend API client
//!
//! Thin typed wrapper over the Paymint REST endpoints. Every request sends
//! and expects JSON. A non-2xx response becomes [`ApiError::Status`] carrying
//! the response text, or the status reason when the body is empty.
//!
//! GET requests are retried with exponential backoff on transport errors and
//! 5xx responses. POSTs are sent once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), paymint::error::ApiError> {
//! use paymint::{api::ApiClient, config::Config};
//!
//! let client = ApiClient::new(&Config::from_env())?;
//! let invoices = client.list_invoices(Some("0xpayee")).await?;
//! println!("{} invoices", invoices.len());
//! # Ok(())
//! # }
//! ```

use {
    crate::{
        config::Config,
        error::{ApiError, ApiResult},
        model::{
            ContractInfo, CreateInvoiceRequest, CreatePayrollRequest, Invoice, MarkPaidRequest,
            PayPayrollRequest, Payroll, TransactionRecord,
        },
        retry::ExponentialBackoff,
    },
    reqwest::{Client, Response, Url},
    serde::{de::DeserializeOwned, Serialize},
    std::time::Duration,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    retry_max: u32,
    retry_initial: Duration,
    retry_max_delay: Duration,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base.clone()));
        }

        let http = Client::builder().timeout(config.http_timeout).build()?;

        Ok(Self {
            http,
            base,
            retry_max: config.retry_max,
            retry_initial: config.retry_initial,
            retry_max_delay: config.retry_max_delay,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build `{base}/{segments...}?{query}` with each piece percent-encoded
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    // ----- invoices -----

    pub async fn list_invoices(&self, payee_id: Option<&str>) -> ApiResult<Vec<Invoice>> {
        let query: Vec<(&str, &str)> = payee_id.map(|p| ("payeeId", p)).into_iter().collect();
        let url = self.endpoint(&["api", "invoices"], &query)?;
        self.get_json(url).await
    }

    pub async fn get_invoice(&self, id: &str) -> ApiResult<Invoice> {
        let url = self.endpoint(&["api", "invoices", id], &[])?;
        self.get_json(url).await
    }

    pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> ApiResult<Invoice> {
        let url = self.endpoint(&["api", "invoices", "create"], &[])?;
        self.post_json(url, request).await
    }

    pub async fn mark_invoice_paid(&self, id: &str, tx_digest: &str) -> ApiResult<Invoice> {
        let url = self.endpoint(&["api", "invoices", id, "mark-paid"], &[])?;
        let body = MarkPaidRequest {
            tx_digest: tx_digest.to_string(),
        };
        self.post_json(url, &body).await
    }

    pub async fn contract_info(&self) -> ApiResult<ContractInfo> {
        let url = self.endpoint(&["api", "invoices", "contracts", "info"], &[])?;
        self.get_json(url).await
    }

    // ----- payrolls -----

    pub async fn list_payrolls(&self, issuer: Option<&str>) -> ApiResult<Vec<Payroll>> {
        let query: Vec<(&str, &str)> = issuer.map(|i| ("issuer", i)).into_iter().collect();
        let url = self.endpoint(&["api", "payrolls"], &query)?;
        self.get_json(url).await
    }

    pub async fn list_payrolls_by_client(&self, email: &str) -> ApiResult<Vec<Payroll>> {
        let url = self.endpoint(&["api", "payrolls", "client", email], &[])?;
        self.get_json(url).await
    }

    pub async fn get_payroll(&self, id: &str) -> ApiResult<Payroll> {
        let url = self.endpoint(&["api", "payrolls", id], &[])?;
        self.get_json(url).await
    }

    pub async fn create_payroll(&self, request: &CreatePayrollRequest) -> ApiResult<Payroll> {
        let url = self.endpoint(&["api", "payrolls"], &[])?;
        self.post_json(url, request).await
    }

    pub async fn pay_payroll(&self, id: &str, wallet_address: &str) -> ApiResult<Payroll> {
        let url = self.endpoint(&["api", "payrolls", id, "pay"], &[])?;
        let body = PayPayrollRequest {
            wallet_address: wallet_address.to_string(),
        };
        self.post_json(url, &body).await
    }

    pub async fn mark_payroll_paid(&self, id: &str, tx_digest: &str) -> ApiResult<Payroll> {
        let url = self.endpoint(&["api", "payrolls", id, "mark-paid"], &[])?;
        let body = MarkPaidRequest {
            tx_digest: tx_digest.to_string(),
        };
        self.post_json(url, &body).await
    }

    // ----- transactions -----

    pub async fn list_transactions(
        &self,
        payee_id: Option<&str>,
    ) -> ApiResult<Vec<TransactionRecord>> {
        let query: Vec<(&str, &str)> = payee_id.map(|p| ("payeeId", p)).into_iter().collect();
        let url = self.endpoint(&["api", "transactions"], &query)?;
        self.get_json(url).await
    }

    // ----- plumbing -----

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let mut backoff =
            ExponentialBackoff::new(self.retry_initial, self.retry_max_delay, self.retry_max);

        loop {
            log::debug!("GET {}", url);
            let result = match self.http.get(url.clone()).send().await {
                Ok(response) => decode(response).await,
                Err(e) => Err(ApiError::from(e)),
            };

            match result {
                Err(e) if e.is_transient() => {
                    log::warn!("GET {} failed: {}", url, e);
                    if backoff.sleep().await.is_err() {
                        return Err(e);
                    }
                }
                other => return other,
            }
        }
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("POST {}", url);
        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            text
        };
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = Config {
            api_base: base.to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments_and_query() {
        let api = client("http://localhost:5000/");
        let url = api
            .endpoint(&["api", "payrolls", "client", "a b#c"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/payrolls/client/a%20b%23c");

        let url = api
            .endpoint(&["api", "invoices"], &[("payeeId", "0x1&x=2")])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/invoices?payeeId=0x1%26x%3D2");
    }

    #[test]
    fn test_base_with_prefix_path() {
        let api = client("https://host.test/backend");
        let url = api.endpoint(&["api", "transactions"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://host.test/backend/api/transactions");
    }

    #[test]
    fn test_invalid_base_rejected() {
        let config = Config {
            api_base: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidUrl(_))));
    }
}
