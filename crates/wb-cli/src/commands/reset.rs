//! Reset command for discarding the current session.

use std::io::Write;

use anyhow::Result;

use wb_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    db.clear_session()?;
    writeln!(writer, "Session reset.")?;
    Ok(())
}
