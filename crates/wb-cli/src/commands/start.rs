//! Start command for beginning a work session.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use wb_db::Database;

use crate::format;

pub fn run<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    let mut session = db.load_session()?;

    if session.is_open() {
        writeln!(
            writer,
            "A session is already running since {}. Stop it before starting a new one.",
            format::instant(session.started_at())
        )?;
        return Ok(());
    }

    session.start(now);
    db.save_session(&session)?;

    writeln!(
        writer,
        "Session started at {}.",
        format::instant(session.started_at())
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
            + chrono::Duration::minutes(minutes)
    }

    #[test]
    fn start_opens_session() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();

        run(&mut output, &db, ts(0)).unwrap();

        let session = db.load_session().unwrap();
        assert!(session.is_open());
        assert_eq!(session.started_at(), Some(ts(0)));

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Session started at "));
    }

    #[test]
    fn start_refuses_while_running() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();

        run(&mut output, &db, ts(0)).unwrap();
        run(&mut output, &db, ts(5)).unwrap();

        // First start instant is kept
        let session = db.load_session().unwrap();
        assert_eq!(session.started_at(), Some(ts(0)));

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("already running"));
    }

    #[test]
    fn start_after_stop_begins_fresh_interval() {
        let db = Database::open_in_memory().unwrap();
        let mut session = db.load_session().unwrap();
        session.start(ts(0));
        session.stop(ts(10));
        db.save_session(&session).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, ts(30)).unwrap();

        let session = db.load_session().unwrap();
        assert!(session.is_open());
        assert_eq!(session.started_at(), Some(ts(30)));
        assert_eq!(session.ended_at(), None);
    }
}
