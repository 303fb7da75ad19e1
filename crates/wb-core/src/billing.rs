//! Billing calculation.
//!
//! Turns a session and a rate configuration into an itemized cost
//! breakdown. Every function here is total: missing timestamps, negative
//! intervals, and zero rates all degrade to well-defined zero values
//! instead of errors. Results are derived on every call, never cached.
//!
//! # Billing policy
//!
//! Worked hours are the raw interval length. Billed hours round the
//! interval up in half-hour increments: whole hours plus nothing for an
//! exact hour boundary, plus half an hour for a remainder of 1-30 minutes,
//! plus a full hour for a remainder of 31-59 minutes. Seconds past the
//! minute are truncated.

use serde::Serialize;

use crate::session::Session;
use crate::types::{Km, Rate};

/// Flat surcharge in currency units, applied per session when enabled.
pub const STANDARD_FEE: f64 = 5.0;

/// Seconds per hour.
const HOUR_SECS: i64 = 3600;

/// Rate configuration supplied by the caller.
///
/// Immutable for the duration of one calculation. Defaults to zero rates
/// with the standard fee disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RateConfig {
    /// Hourly labour rate in currency units.
    pub hourly_rate: Rate,
    /// Travel rate in currency units per kilometer.
    pub travel_rate_per_km: Rate,
    /// Whether the flat standard fee is charged.
    pub apply_standard_fee: bool,
}

/// An itemized cost breakdown, derived from a session and a rate
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// Raw interval length in hours, unrounded.
    pub worked_hours: f64,
    /// Chargeable hours after half-hour rounding. Never less than the
    /// worked hours for intervals of a minute or more.
    pub billed_hours: f64,
    /// Billed hours times the hourly rate.
    pub labour_cost: f64,
    /// Distance times the travel rate.
    pub travel_cost: f64,
    /// The flat surcharge, or zero when disabled.
    pub standard_fee: f64,
    /// Sum of the cost lines, or zero while the session is not closed.
    pub total: f64,
}

/// Raw worked time in hours.
///
/// Zero unless the session is closed. A closed interval whose end precedes
/// its start counts as zero worked time rather than a negative value.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "session lengths are far below 2^52 seconds"
)]
pub fn worked_hours(session: &Session) -> f64 {
    session
        .duration_seconds()
        .map_or(0.0, |secs| secs as f64 / HOUR_SECS as f64)
}

/// Chargeable time in hours after half-hour rounding.
///
/// Zero unless the session is closed.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "session lengths are far below 2^52 hours"
)]
pub fn billed_hours(session: &Session) -> f64 {
    let Some(total_seconds) = session.duration_seconds() else {
        return 0.0;
    };

    let full_hours = total_seconds / HOUR_SECS;
    let remainder_minutes = (total_seconds - full_hours * HOUR_SECS) / 60;
    let extra = match remainder_minutes {
        0 => 0.0,
        1..=30 => 0.5,
        _ => 1.0,
    };

    full_hours as f64 + extra
}

/// Labour cost: billed hours times the hourly rate.
#[must_use]
pub fn labour_cost(billed_hours: f64, rates: &RateConfig) -> f64 {
    billed_hours * rates.hourly_rate.value()
}

/// Travel cost: distance times the per-km rate.
#[must_use]
pub fn travel_cost(distance: Km, rates: &RateConfig) -> f64 {
    distance.value() * rates.travel_rate_per_km.value()
}

/// The flat surcharge, or zero when disabled.
#[must_use]
pub fn standard_fee(rates: &RateConfig) -> f64 {
    if rates.apply_standard_fee {
        STANDARD_FEE
    } else {
        0.0
    }
}

/// The billed total.
///
/// Zero until the session is closed; a running or idle session has no
/// meaningful total. For a closed session this is labour plus travel plus
/// the standard fee, so travel and fee are charged even when a clock
/// anomaly produced zero billable hours.
#[must_use]
pub fn total(session: &Session, rates: &RateConfig) -> f64 {
    if !session.is_closed() {
        return 0.0;
    }
    let labour = labour_cost(billed_hours(session), rates);
    labour + travel_cost(session.distance_km, rates) + standard_fee(rates)
}

/// Computes the full cost breakdown.
///
/// This is the single entry point callers should use; the individual
/// functions above exist for the lines of the breakdown.
#[must_use]
pub fn breakdown(session: &Session, rates: &RateConfig) -> CostBreakdown {
    let worked_hours = worked_hours(session);
    let billed = billed_hours(session);
    let labour_cost = labour_cost(billed, rates);
    let travel_cost = travel_cost(session.distance_km, rates);
    let standard_fee = standard_fee(rates);

    CostBreakdown {
        worked_hours,
        billed_hours: billed,
        labour_cost,
        travel_cost,
        standard_fee,
        total: total(session, rates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn closed(minutes: i64, km: f64) -> Session {
        Session {
            state: SessionState::Closed {
                started_at: base(),
                ended_at: base() + Duration::minutes(minutes),
            },
            distance_km: Km::new(km).unwrap(),
        }
    }

    fn rates(hourly: f64, travel: f64, fee: bool) -> RateConfig {
        RateConfig {
            hourly_rate: Rate::new(hourly).unwrap(),
            travel_rate_per_km: Rate::new(travel).unwrap(),
            apply_standard_fee: fee,
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "billed hours are exact multiples of 0.5")]
    fn billed_hours_rounding_boundaries() {
        // (duration minutes, expected billed hours)
        let table = [
            (60, 1.0),
            (61, 1.5),
            (90, 1.5),
            (91, 2.0),
            (119, 2.0),
            (120, 2.0),
        ];
        for (minutes, expected) in table {
            assert_eq!(
                billed_hours(&closed(minutes, 0.0)),
                expected,
                "duration of {minutes} minutes"
            );
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn billed_hours_truncates_seconds_past_the_minute() {
        // 1h 00m 59s: the stray seconds never reach a rounding target
        let session = Session {
            state: SessionState::Closed {
                started_at: base(),
                ended_at: base() + Duration::seconds(HOUR_SECS + 59),
            },
            distance_km: Km::ZERO,
        };
        assert_eq!(billed_hours(&session), 1.0);
    }

    #[test]
    fn billed_at_least_worked_for_whole_minute_sessions() {
        for minutes in 1..=360 {
            let session = closed(minutes, 0.0);
            assert!(
                billed_hours(&session) >= worked_hours(&session),
                "billed < worked at {minutes} minutes"
            );
        }
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn open_and_idle_sessions_compute_zero() {
        let idle = Session::default();
        assert_eq!(worked_hours(&idle), 0.0);
        assert_eq!(billed_hours(&idle), 0.0);
        assert_eq!(total(&idle, &rates(45.0, 0.35, true)), 0.0);

        let open = Session {
            state: SessionState::Open { started_at: base() },
            distance_km: Km::new(20.0).unwrap(),
        };
        // Total is meaningless until stopped, even with distance and fee set
        assert_eq!(total(&open, &rates(45.0, 0.35, true)), 0.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn negative_interval_still_charges_travel_and_fee() {
        let session = Session {
            state: SessionState::Closed {
                started_at: base() + Duration::hours(2),
                ended_at: base(),
            },
            distance_km: Km::new(10.0).unwrap(),
        };
        let config = rates(45.0, 0.5, true);

        assert_eq!(worked_hours(&session), 0.0);
        assert_eq!(billed_hours(&session), 0.0);
        // The session is closed, so travel and fee are charged
        assert_eq!(total(&session, &config), 10.0 * 0.5 + STANDARD_FEE);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn breakdown_for_typical_callout() {
        // 1h 15m at 45.00/h with 20 km at 0.35/km plus the standard fee
        let session = closed(75, 20.0);
        let config = rates(45.0, 0.35, true);

        let result = breakdown(&session, &config);
        assert_eq!(result.worked_hours, 1.25);
        assert_eq!(result.billed_hours, 1.5);
        assert_eq!(result.labour_cost, 67.5);
        assert_eq!(result.travel_cost, 7.0);
        assert_eq!(result.standard_fee, 5.0);
        assert_eq!(result.total, 79.5);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn breakdown_without_travel_or_fee() {
        // Exactly 2h at 45.00/h, nothing else
        let session = closed(120, 0.0);
        let config = rates(45.0, 0.35, false);

        let result = breakdown(&session, &config);
        assert_eq!(result.worked_hours, 2.0);
        assert_eq!(result.billed_hours, 2.0);
        assert_eq!(result.labour_cost, 90.0);
        assert_eq!(result.travel_cost, 0.0);
        assert_eq!(result.standard_fee, 0.0);
        assert_eq!(result.total, 90.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn idle_session_totals_zero_regardless_of_rates() {
        let idle = Session::default();
        let result = breakdown(&idle, &rates(99.0, 9.0, true));
        assert_eq!(result.total, 0.0);
        assert_eq!(result.labour_cost, 0.0);
    }

    #[test]
    fn breakdown_is_idempotent() {
        let session = closed(75, 20.0);
        let config = rates(45.0, 0.35, true);

        let first = breakdown(&session, &config);
        let second = breakdown(&session, &config);
        assert_eq!(first, second);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values intended")]
    fn zero_rates_are_passed_through() {
        let session = closed(90, 15.0);
        let result = breakdown(&session, &RateConfig::default());
        assert_eq!(result.billed_hours, 1.5);
        assert_eq!(result.labour_cost, 0.0);
        assert_eq!(result.travel_cost, 0.0);
        assert_eq!(result.standard_fee, 0.0);
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn breakdown_serializes_all_lines() {
        let session = closed(75, 20.0);
        let config = rates(45.0, 0.35, true);
        let json = serde_json::to_value(breakdown(&session, &config)).unwrap();

        assert_eq!(json["billed_hours"], 1.5);
        assert_eq!(json["labour_cost"], 67.5);
        assert_eq!(json["travel_cost"], 7.0);
        assert_eq!(json["standard_fee"], 5.0);
        assert_eq!(json["total"], 79.5);
    }
}
