//! Rates command for inspecting and updating the billing configuration.

use std::io::Write;

use anyhow::{Context, Result, bail};

use wb_core::{Rate, RateConfig};
use wb_db::Database;

use crate::format;

/// Writes the human-readable rate lines.
///
/// Shared with `status`.
pub fn write_rates<W: Write>(writer: &mut W, rates: &RateConfig, currency: &str) -> Result<()> {
    writeln!(
        writer,
        "Hourly rate: {}",
        format::money(rates.hourly_rate.value(), currency)
    )?;
    writeln!(
        writer,
        "Travel rate: {}/km",
        format::money(rates.travel_rate_per_km.value(), currency)
    )?;
    writeln!(
        writer,
        "Standard fee: {}",
        if rates.apply_standard_fee { "on" } else { "off" }
    )?;
    Ok(())
}

pub fn show<W: Write>(writer: &mut W, db: &Database, json: bool, currency: &str) -> Result<()> {
    let rates = db.load_rates()?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rates)?)?;
    } else {
        write_rates(writer, &rates, currency)?;
    }
    Ok(())
}

pub fn set<W: Write>(
    writer: &mut W,
    db: &Database,
    hourly: Option<f64>,
    travel: Option<f64>,
    standard_fee: Option<bool>,
    currency: &str,
) -> Result<()> {
    if hourly.is_none() && travel.is_none() && standard_fee.is_none() {
        bail!("nothing to update, pass --hourly, --travel, or --standard-fee");
    }

    let mut rates = db.load_rates()?;
    if let Some(value) = hourly {
        rates.hourly_rate = Rate::new(value).context("invalid hourly rate")?;
    }
    if let Some(value) = travel {
        rates.travel_rate_per_km = Rate::new(value).context("invalid travel rate")?;
    }
    if let Some(value) = standard_fee {
        rates.apply_standard_fee = value;
    }
    db.save_rates(&rates)?;

    write_rates(writer, &rates, currency)?;
    Ok(())
}
