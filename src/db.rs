use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS quotes (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp  INTEGER NOT NULL,
                author_id  INTEGER NOT NULL,
                text       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS command_usage (
                user_id  INTEGER NOT NULL,
                command  TEXT NOT NULL,
                count    INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, command)
            );",
        )?;
        Ok(())
    }

    /// Store a quote and return its 0-based index.
    pub fn add_quote(
        &self,
        author_id: u64,
        text: &str,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock();
        let now = Utc::now().timestamp();
        conn.execute(
            "INSERT INTO quotes (timestamp, author_id, text) VALUES (?1, ?2, ?3)",
            params![now, author_id as i64, text],
        )?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok((count as u64).saturating_sub(1))
    }

    /// Fetch a quote by its 0-based position in insertion order.
    pub fn get_quote(
        &self,
        index: u64,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let Ok(offset) = i64::try_from(index) else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        let text = conn
            .query_row(
                "SELECT text FROM quotes ORDER BY id LIMIT 1 OFFSET ?1",
                params![offset],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    #[cfg(test)]
    pub fn quote_count(&self) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn record_command(
        &self,
        user_id: u64,
        command: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO command_usage (user_id, command, count) VALUES (?1, ?2, 1)
             ON CONFLICT(user_id, command) DO UPDATE SET count = count + 1",
            params![user_id as i64, command],
        )?;
        Ok(())
    }

    /// Per-command usage for a user, most used first.
    pub fn command_usage(
        &self,
        user_id: u64,
    ) -> Result<Vec<(String, u64)>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT command, count FROM command_usage
             WHERE user_id = ?1
             ORDER BY count DESC, command ASC",
        )?;
        let rows = stmt.query_map(params![user_id as i64], |row| {
            let command: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((command, count as u64))
        })?;
        let mut usage = Vec::new();
        for row in rows {
            usage.push(row?);
        }
        Ok(usage)
    }
}
