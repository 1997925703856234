//! Platform surcharge math
//!
//! Rates are basis points (hundredths of a percent, 250 = 2.5%). The float
//! functions work in whatever unit the caller passes and keep fractional
//! fees, which is what display code wants. The `_smallest` variants work on
//! integer MIST and truncate the fee exactly like the on-chain contract:
//! `fee = floor(base * bps / 10000)`.
//!
//! None of these functions range-check the rate.

use {crate::units, serde::Serialize};

/// Fixed surcharge applied by the creation forms (2.5%)
pub const DEFAULT_SURCHARGE_BPS: u32 = 250;

/// 100% in basis points
pub const MAX_FEE_BPS: u32 = 10_000;

pub fn compute_fee(base_amount: f64, fee_rate_bps: u32) -> f64 {
    base_amount * fee_rate_bps as f64 / MAX_FEE_BPS as f64
}

pub fn compute_total(base_amount: f64, fee_rate_bps: u32) -> f64 {
    base_amount + compute_fee(base_amount, fee_rate_bps)
}

/// Integer fee in MIST, truncated toward zero
pub fn compute_fee_smallest(base_amount: u64, fee_rate_bps: u32) -> u64 {
    // u128 keeps base * bps from overflowing for any u64 base
    let fee = base_amount as u128 * fee_rate_bps as u128 / MAX_FEE_BPS as u128;
    fee as u64
}

/// Exact amount to request from the wallet
pub fn compute_total_smallest(base_amount: u64, fee_rate_bps: u32) -> u64 {
    base_amount.saturating_add(compute_fee_smallest(base_amount, fee_rate_bps))
}

/// Base, fee and total of a payable record, all in MIST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub base: u64,
    pub fee_rate_bps: u32,
    pub fee: u64,
    pub total: u64,
}

impl FeeBreakdown {
    pub fn new(base: u64, fee_rate_bps: u32) -> Self {
        let fee = compute_fee_smallest(base, fee_rate_bps);
        Self {
            base,
            fee_rate_bps,
            fee,
            total: base.saturating_add(fee),
        }
    }

    /// Fee recomputed in SUI without truncation, as summaries show it
    pub fn display_fee(&self) -> f64 {
        compute_fee(units::to_display_unit(self.base), self.fee_rate_bps)
    }

    /// Total recomputed in SUI without truncation
    pub fn display_total(&self) -> f64 {
        compute_total(units::to_display_unit(self.base), self.fee_rate_bps)
    }

    /// Integer total converted to SUI (what the payment result reports)
    pub fn total_in_display(&self) -> f64 {
        units::to_display_unit(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_concrete() {
        assert_eq!(compute_fee(100.0, 250), 2.5);
        assert_eq!(compute_total(100.0, 250), 102.5);
    }

    #[test]
    fn test_zero_rate() {
        for base in [0.0, 1.0, 42.42, 1e12] {
            assert_eq!(compute_fee(base, 0), 0.0);
            assert_eq!(compute_total(base, 0), base);
        }
        assert_eq!(compute_fee_smallest(123_456, 0), 0);
    }

    #[test]
    fn test_zero_base() {
        for bps in [0, 1, 250, 10_000] {
            assert_eq!(compute_fee(0.0, bps), 0.0);
            assert_eq!(compute_total(0.0, bps), 0.0);
            assert_eq!(compute_total_smallest(0, bps), 0);
        }
    }

    #[test]
    fn test_total_never_below_base() {
        for bps in (0..=MAX_FEE_BPS).step_by(125) {
            for base in [0.0, 0.001, 1.0, 99.99, 5_000.0] {
                assert!(compute_total(base, bps) >= base);
            }
            for base in [0u64, 1, 39, 1_000_000_000, u64::MAX / 4] {
                assert!(compute_total_smallest(base, bps) >= base);
            }
        }
    }

    #[test]
    fn test_smallest_unit_fee_truncates() {
        // 2.5% of 39 MIST is 0.975 MIST
        assert_eq!(compute_fee_smallest(39, 250), 0);
        assert_eq!(compute_total_smallest(39, 250), 39);
        assert_eq!(compute_fee_smallest(1_000_000_001, 250), 25_000_000);
        assert_eq!(compute_total_smallest(2_500_000_000, 250), 2_562_500_000);
    }

    #[test]
    fn test_no_intermediate_overflow() {
        let base = u64::MAX / 2;
        assert_eq!(compute_fee_smallest(base, MAX_FEE_BPS), base);
    }

    #[test]
    fn test_breakdown() {
        let breakdown = FeeBreakdown::new(100_000_000_000, DEFAULT_SURCHARGE_BPS);
        assert_eq!(breakdown.fee, 2_500_000_000);
        assert_eq!(breakdown.total, 102_500_000_000);
        assert_eq!(breakdown.display_fee(), 2.5);
        assert_eq!(breakdown.display_total(), 102.5);
        assert_eq!(breakdown.total_in_display(), 102.5);
    }
}
