//! Total command for showing the itemized cost breakdown.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use wb_core::{CostBreakdown, RateConfig, Session};
use wb_db::Database;

use crate::format;

/// JSON output structure.
#[derive(Debug, Serialize)]
struct TotalExport<'a> {
    session: &'a Session,
    breakdown: CostBreakdown,
    currency: &'a str,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool, currency: &str) -> Result<()> {
    let session = db.load_session()?;
    let rates = db.load_rates()?;

    if json {
        let export = TotalExport {
            session: &session,
            breakdown: wb_core::breakdown(&session, &rates),
            currency,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&export)?)?;
    } else {
        write_breakdown(writer, &session, &rates, currency)?;
    }

    Ok(())
}

/// Writes the human-readable breakdown.
///
/// Also used by `stop` to show the result of the session that just ended.
pub fn write_breakdown<W: Write>(
    writer: &mut W,
    session: &Session,
    rates: &RateConfig,
    currency: &str,
) -> Result<()> {
    let breakdown = wb_core::breakdown(session, rates);

    writeln!(writer, "Total: {}", format::money(breakdown.total, currency))?;
    writeln!(writer)?;

    if session.is_closed() {
        writeln!(
            writer,
            "  Hours × hourly rate: {} worked (billed {}) × {} = {}",
            format::hours(breakdown.worked_hours),
            format::hours(breakdown.billed_hours),
            format::money(rates.hourly_rate.value(), currency),
            format::money(breakdown.labour_cost, currency),
        )?;
        writeln!(
            writer,
            "  Km × travel rate: {} × {} = {}",
            format::km(session.distance_km),
            format::money(rates.travel_rate_per_km.value(), currency),
            format::money(breakdown.travel_cost, currency),
        )?;
        writeln!(
            writer,
            "  Standard fee: {}",
            format::money(breakdown.standard_fee, currency),
        )?;
    } else {
        writeln!(writer, "Stop the session to compute a total.")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use wb_core::{Km, Rate, SessionState};

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
            + chrono::Duration::minutes(minutes)
    }

    fn seed(db: &Database, minutes: i64, km: f64) {
        let session = Session {
            state: SessionState::Closed {
                started_at: ts(0),
                ended_at: ts(minutes),
            },
            distance_km: Km::new(km).unwrap(),
        };
        db.save_session(&session).unwrap();
        db.save_rates(&RateConfig {
            hourly_rate: Rate::new(45.0).unwrap(),
            travel_rate_per_km: Rate::new(0.35).unwrap(),
            apply_standard_fee: true,
        })
        .unwrap();
    }

    #[test]
    fn total_itemizes_closed_session() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 75, 20.0);

        let mut output = Vec::new();
        run(&mut output, &db, false, "EUR").unwrap();

        let output = String::from_utf8(output).unwrap();
        let expected = "Total: €79.50\n\n  \
            Hours × hourly rate: 1.25 h worked (billed 1.50 h) × €45.00 = €67.50\n  \
            Km × travel rate: 20.0 km × €0.35 = €7.00\n  \
            Standard fee: €5.00\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn total_hints_until_session_stopped() {
        let db = Database::open_in_memory().unwrap();
        db.save_session(&Session {
            state: SessionState::Open { started_at: ts(0) },
            distance_km: Km::new(20.0).unwrap(),
        })
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, false, "EUR").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Total: €0.00\n\nStop the session to compute a total.\n"
        );
    }

    #[test]
    fn total_is_zero_for_idle_session() {
        let db = Database::open_in_memory().unwrap();
        db.save_rates(&RateConfig {
            hourly_rate: Rate::new(99.0).unwrap(),
            travel_rate_per_km: Rate::new(9.0).unwrap(),
            apply_standard_fee: true,
        })
        .unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, false, "EUR").unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Total: €0.00\n"));
    }

    #[test]
    fn total_json_exports_session_and_breakdown() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 75, 20.0);

        let mut output = Vec::new();
        run(&mut output, &db, true, "EUR").unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["session"]["state"], "closed");
        assert_eq!(json["session"]["distance_km"], 20.0);
        assert_eq!(json["breakdown"]["billed_hours"], 1.5);
        assert_eq!(json["breakdown"]["labour_cost"], 67.5);
        assert_eq!(json["breakdown"]["travel_cost"], 7.0);
        assert_eq!(json["breakdown"]["standard_fee"], 5.0);
        assert_eq!(json["breakdown"]["total"], 79.5);
        assert_eq!(json["currency"], "EUR");
    }

    #[test]
    fn total_json_for_idle_session_is_zero() {
        let db = Database::open_in_memory().unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, true, "EUR").unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["session"]["state"], "idle");
        assert_eq!(json["breakdown"]["total"], 0.0);
    }
}
