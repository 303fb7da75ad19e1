//! Stop command for ending the running work session.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use wb_db::Database;

use crate::format;

use super::total;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    now: DateTime<Utc>,
    currency: &str,
) -> Result<()> {
    let mut session = db.load_session()?;

    if !session.is_open() {
        writeln!(writer, "No running session to stop.")?;
        return Ok(());
    }

    session.stop(now);
    db.save_session(&session)?;

    let rates = db.load_rates()?;
    writeln!(
        writer,
        "Session stopped at {}.",
        format::instant(session.ended_at())
    )?;
    writeln!(writer)?;
    total::write_breakdown(writer, &session, &rates, currency)?;
    Ok(())
}
