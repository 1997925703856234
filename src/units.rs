//! Unit conversion helpers
//!
//! Amounts travel on the ledger and through the backend API as integer MIST.
//! Forms and summaries work in SUI (1 SUI = 1,000,000,000 MIST).
//!
//! `to_smallest_unit` floors after multiplying, so input with more than nine
//! fractional digits loses the remainder and a display -> smallest -> display
//! round trip is not exact. The product `m / 1e9 * 1e9` can land just below
//! `m` (15 MIST comes back as 14.999...), so a value that is exactly the
//! quotient of a whole MIST amount maps back to that amount instead of being
//! floored. Starting from the integer side the round trip is exact.

use chrono::{Local, TimeZone};

/// MIST per SUI
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Label appended by [`format_display`]
pub const DISPLAY_UNIT: &str = "SUI";

/// Default number of decimals shown in summaries
pub const DEFAULT_DECIMALS: usize = 4;

/// Convert MIST to SUI. Pure quotient, no rounding.
pub fn to_display_unit(smallest_units: u64) -> f64 {
    smallest_units as f64 / MIST_PER_SUI as f64
}

/// Convert SUI to MIST, flooring any sub-MIST remainder.
///
/// When `display_amount` is exactly `to_display_unit(m)` for the nearest
/// whole `m`, returns `m` even if the product fell a hair short of it.
///
/// Negative and non-finite input is not validated here; the float-to-int
/// cast saturates (negatives and NaN become 0).
pub fn to_smallest_unit(display_amount: f64) -> u64 {
    let product = display_amount * MIST_PER_SUI as f64;
    let nearest = product.round();
    if nearest >= 0.0 && to_display_unit(nearest as u64) == display_amount {
        return nearest as u64;
    }
    product.floor() as u64
}

/// Fixed-point rendering with the display-unit label, e.g. `"102.5000 SUI"`.
pub fn format_display(display_amount: f64, decimal_places: usize) -> String {
    format!("{} {}", format_currency(display_amount, decimal_places), DISPLAY_UNIT)
}

/// [`format_display`] with four decimal places
pub fn format_display_default(display_amount: f64) -> String {
    format_display(display_amount, DEFAULT_DECIMALS)
}

/// Format an amount held in MIST as SUI
pub fn format_smallest_as_display(smallest_units: u64, decimal_places: usize) -> String {
    format_display(to_display_unit(smallest_units), decimal_places)
}

/// Fixed-point number without a unit label.
///
/// Rounds half away from zero at the last kept place. `format!` alone would
/// round exact ties to even.
///
/// The tie is judged on the scaled product `amount * 10^places`, not on the
/// exact binary value of `amount`: `2.675` at two places gives `"2.68"` even
/// though the stored double sits just below 2.675.
pub fn format_currency(amount: f64, decimal_places: usize) -> String {
    let scale = 10f64.powi(decimal_places as i32);
    let scaled = amount * scale;
    let rounded = if scaled.is_finite() {
        scaled.round() / scale
    } else {
        amount
    };
    format!("{:.*}", decimal_places, rounded)
}

/// Render a fee rate in basis points as a percentage, e.g. 250 -> `"2.50%"`
pub fn format_bps_percent(bps: u32) -> String {
    format!("{:.2}%", bps as f64 / 100.0)
}

/// Render epoch seconds as a local date-time; `"-"` when absent or zero
pub fn format_date(ts: Option<i64>) -> String {
    match ts {
        None | Some(0) => "-".to_string(),
        Some(secs) => match Local.timestamp_opt(secs, 0).single() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "-".to_string(),
        },
    }
}
