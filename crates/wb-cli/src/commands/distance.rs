//! Distance command for setting the travel distance.

use std::io::Write;

use anyhow::{Context, Result};

use wb_core::Km;
use wb_db::Database;

use crate::format;

pub fn run<W: Write>(writer: &mut W, db: &Database, km: f64) -> Result<()> {
    let distance = Km::new(km).context("invalid distance")?;

    let mut session = db.load_session()?;
    session.distance_km = distance;
    db.save_session(&session)?;

    writeln!(writer, "Distance set to {}.", format::km(distance))?;
    Ok(())
}
