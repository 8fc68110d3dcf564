use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

const BEST_SCORE_KEY: &str = "bestScore";

/// Best-score persistence: one scalar key in a tiny key-value table.
///
/// Schema:
/// - kv(meta_key TEXT PRIMARY KEY, meta_value TEXT)
///
/// Values are stored as TEXT. Failures degrade rather than propagate to
/// the game loop: a missing or unreadable store reads as 0, and a
/// failed write only logs a warning.
pub struct ScoreStore {
    conn: Connection,
}

impl ScoreStore {
    /// Create or open the store under `dir`, ensure schema exists.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, rusqlite::Error> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|_e| rusqlite::Error::ExecuteReturnedResults)?;
        let conn = Connection::open(dir.join("scores.db"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT meta_value FROM kv WHERE meta_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO kv (meta_key, meta_value) VALUES (?1, ?2)
             ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Stored best score; 0 when absent or unreadable.
    pub fn load_best(&self) -> u64 {
        match self.get(BEST_SCORE_KEY) {
            Ok(Some(text)) => text.parse().unwrap_or_else(|_| {
                log::warn!("best score in store is not a number: {text:?}");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("failed to read best score: {e}");
                0
            }
        }
    }

    /// Persist a new best score. Write failures are non-fatal.
    pub fn save_best(&mut self, best: u64) {
        if let Err(e) = self.set(BEST_SCORE_KEY, &best.to_string()) {
            log::warn!("failed to persist best score {best}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn best_score_roundtrip() {
        let td = tempdir().unwrap();
        let path = td.path().join("session");
        let mut store = ScoreStore::open(&path).expect("open store");
        // Fresh store reads as zero.
        assert_eq!(store.load_best(), 0);
        store.save_best(1234);
        assert_eq!(store.load_best(), 1234);
        // Overwrite, then reopen and read back.
        store.save_best(5678);
        drop(store);
        let store = ScoreStore::open(&path).expect("reopen store");
        assert_eq!(store.load_best(), 5678);
    }

    #[test]
    fn best_score_is_stored_as_text() {
        let td = tempdir().unwrap();
        let mut store = ScoreStore::open(td.path()).unwrap();
        store.save_best(42);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn garbage_value_degrades_to_zero() {
        let td = tempdir().unwrap();
        let mut store = ScoreStore::open(td.path()).unwrap();
        store.set(BEST_SCORE_KEY, "not a number").unwrap();
        assert_eq!(store.load_best(), 0);
    }
}
