use thiserror::Error;

/// Failures talking to the backend API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connection, timeout or body decoding failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; carries the body text or the status reason
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    /// Worth another GET attempt
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::InvalidUrl(_) => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Creation-form validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid due date: {0}")]
    InvalidDueDate(String),

    #[error("fee rate {0} bps exceeds 10000")]
    FeeRateOutOfRange(u32),

    #[error("payroll needs at least one recipient")]
    NoRecipients,

    #[error("recipient {index} is invalid: {reason}")]
    InvalidRecipient { index: usize, reason: String },

    #[error("wallet not connected")]
    WalletNotConnected,
}

/// Failures while assembling or settling a payment
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("No SUI coins found in your wallet.")]
    NoCoins,

    #[error("Insufficient balance. Need {needed} SUI, have {available} SUI")]
    InsufficientBalance { needed: f64, available: f64 },

    #[error("record has no on-chain object")]
    MissingObject,

    #[error("record is already paid")]
    AlreadyPaid,

    #[error("wallet not connected")]
    WalletNotConnected,

    /// Wallet-side failure, message already mapped for the user
    #[error("{0}")]
    Wallet(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
