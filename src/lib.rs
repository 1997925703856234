//! # Paymint client core
//!
//! Client side of a Web3 invoicing and payroll platform on Sui. Payees issue
//! invoices, issuers run multi-recipient payrolls, and payers settle both with
//! a single on-chain transaction that splits funds between the recipients and
//! the platform fee address.
//!
//! ## Module Organization
//!
//! - `units` - MIST/SUI conversion and display formatting
//! - `fee` - surcharge and total-payable math
//! - `model` - invoice, payroll and transaction records
//! - `forms` - validation of creation drafts
//! - `api` - backend REST client
//! - `store` - request-scoped record stores, wallet session, dashboard stats
//! - `payment` - payment plan assembly and settlement through a wallet
//! - `events` - platform events and list refresh
//! - `render` - plain-text tables for the command line
//! - `config` - environment configuration

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod fee;
pub mod forms;
pub mod model;
pub mod payment;
pub mod render;
pub mod retry;
pub mod store;
pub mod units;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, FormError, PaymentError};
pub use fee::{compute_fee, compute_total, FeeBreakdown};
pub use model::{Invoice, Payroll, PayrollRecipient, Status};
pub use units::{format_display, to_display_unit, to_smallest_unit};

/// Initialise `env_logger` on stderr with `filter` (`RUST_LOG` syntax),
/// defaulting to `info`
pub fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    builder
        .parse_filters(filter.unwrap_or("info"))
        .target(env_logger::Target::Stderr);
    // ignore a second initialisation from tests or embedding binaries
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging(Some("paymint=debug"));
        init_logging(None);
        assert!(log::log_enabled!(target: "paymint", log::Level::Debug));
    }
}
