//! Status command for showing the current session and rates.

use std::io::Write;

use anyhow::Result;

use wb_db::Database;

use crate::format;
use crate::Config;

use super::rates::write_rates;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    let session = db.load_session()?;
    let rate_config = db.load_rates()?;

    writeln!(writer, "Work session status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer)?;
    writeln!(writer, "State: {}", session.state)?;
    writeln!(writer, "Started: {}", format::instant(session.started_at()))?;
    writeln!(writer, "Ended: {}", format::instant(session.ended_at()))?;
    writeln!(writer, "Distance: {}", format::km(session.distance_km))?;
    writeln!(writer)?;
    write_rates(writer, &rate_config, &config.currency)?;

    Ok(())
}
