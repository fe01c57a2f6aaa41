use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use rusqlite::{Connection, OptionalExtension as _, params};
use serde_json::{Map, Value};

use super::{SwapRecord, unix_now};

#[derive(Debug)]
pub struct SqliteSwapStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteSwapStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create swap store dir {}", dir.display()))?;
        }

        let conn =
            Connection::open(&path).with_context(|| format!("open sqlite {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("set sqlite busy_timeout")?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .context("configure sqlite pragmas")?;

        migrate(&conn).context("migrate sqlite schema")?;

        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saving an identifier that already exists replaces its body.
    pub fn save(&mut self, record: &SwapRecord) -> Result<()> {
        let body = serde_json::to_string(&record.to_json())
            .with_context(|| format!("encode swap {}", record.swap_id))?;
        self.conn
            .execute(
                r#"
INSERT INTO swaps (swap_id, body, saved_at) VALUES (?1, ?2, ?3)
ON CONFLICT(swap_id) DO UPDATE SET body = excluded.body
"#,
                params![&record.swap_id, body, unix_now()],
            )
            .with_context(|| format!("save swap {}", record.swap_id))?;
        tracing::debug!(swap_id = %record.swap_id, "saved swap record");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT swap_id FROM swaps ORDER BY saved_at, swap_id")
            .context("prepare list swaps")?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query list swaps")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("read swap row")?);
        }
        Ok(out)
    }

    pub fn get(&self, swap_id: &str) -> Result<Option<SwapRecord>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT body, saved_at FROM swaps WHERE swap_id = ?1",
                params![swap_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .with_context(|| format!("get swap {swap_id}"))?;

        let Some((body, saved_at)) = row else {
            return Ok(None);
        };
        let fields: Map<String, Value> = serde_json::from_str(&body)
            .with_context(|| format!("decode stored swap {swap_id}"))?;

        let mut record = SwapRecord::from_response(fields);
        record.swap_id = swap_id.to_string();
        record.stamp_created_at(saved_at);
        Ok(Some(record))
    }

    /// Returns `false` when no record with this identifier exists.
    pub fn delete(&mut self, swap_id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM swaps WHERE swap_id = ?1", params![swap_id])
            .with_context(|| format!("delete swap {swap_id}"))?;
        Ok(rows == 1)
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS swaps (
  swap_id TEXT PRIMARY KEY,
  body TEXT NOT NULL,
  saved_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS swaps_saved_at_idx ON swaps(saved_at);
"#,
    )
    .context("create tables")?;
    Ok(())
}
