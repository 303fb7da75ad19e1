//! Terminal rendering helpers.
//!
//! All numeric formatting for the CLI lives here; the core crate only
//! computes. Currency amounts show two decimals, hours two, kilometers one.
//! Missing instants render as a placeholder glyph.

use chrono::{DateTime, Local, Utc};

use wb_core::Km;

/// Placeholder shown for an instant that is not set.
pub const PLACEHOLDER: &str = "–";

/// Formats a currency amount with two decimals.
///
/// Common ISO 4217 codes get their symbol; anything else falls back to
/// `CODE amount`.
pub fn money(amount: f64, currency: &str) -> String {
    match currency {
        "EUR" => format!("€{amount:.2}"),
        "USD" => format!("${amount:.2}"),
        "GBP" => format!("£{amount:.2}"),
        _ => format!("{currency} {amount:.2}"),
    }
}

/// Formats an hour count with two decimals.
pub fn hours(value: f64) -> String {
    format!("{value:.2} h")
}

/// Formats a travel distance with one decimal.
pub fn km(distance: Km) -> String {
    format!("{:.1} km", distance.value())
}

/// Formats an optional instant as a local wall-clock time.
pub fn instant(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}
